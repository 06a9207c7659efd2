//! Error types for the pledge engine.
//!
//! Missing quotes and zero denominators are not errors: they are reported as
//! flags and `None` values inside the reports. The variants below cover input
//! that cannot be given a meaningful value at all, including magnitudes whose
//! products no longer fit in a `Decimal`.

use thiserror::Error;

/// Result type for pledge engine operations.
pub type PledgeResult<T> = Result<T, PledgeError>;

/// Errors that can occur when building engine inputs.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PledgeError {
    /// A strategy parameter is outside its accepted range.
    #[error("Invalid parameter {name} = {value}: {reason}")]
    InvalidParameter {
        /// Parameter name.
        name: String,
        /// The rejected value.
        value: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// Invalid holding data.
    #[error("Invalid holding '{symbol}': {reason}")]
    InvalidHolding {
        /// The user-facing symbol.
        symbol: String,
        /// The reason the holding is invalid.
        reason: String,
    },

    /// A price quote that cannot be a last-traded price.
    #[error("Invalid quote for {symbol}: {price}")]
    InvalidQuote {
        /// The quote symbol.
        symbol: String,
        /// The rejected price.
        price: String,
    },

    /// Not enough input to produce any numeric report.
    #[error("Insufficient input: {reason}")]
    InsufficientInput {
        /// What is missing.
        reason: String,
    },

    /// A derived figure does not fit in a decimal.
    #[error("Arithmetic overflow computing {quantity}")]
    Overflow {
        /// The figure being computed.
        quantity: String,
    },

    /// Invalid policy configuration.
    #[error("Invalid configuration: {reason}")]
    InvalidConfig {
        /// The reason the configuration is invalid.
        reason: String,
    },
}

impl PledgeError {
    /// Create an invalid parameter error.
    #[must_use]
    pub fn invalid_parameter(
        name: impl Into<String>,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    /// Create an invalid holding error.
    #[must_use]
    pub fn invalid_holding(symbol: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidHolding {
            symbol: symbol.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid quote error.
    #[must_use]
    pub fn invalid_quote(symbol: impl Into<String>, price: impl ToString) -> Self {
        Self::InvalidQuote {
            symbol: symbol.into(),
            price: price.to_string(),
        }
    }

    /// Create an insufficient input error.
    #[must_use]
    pub fn insufficient_input(reason: impl Into<String>) -> Self {
        Self::InsufficientInput {
            reason: reason.into(),
        }
    }

    /// Create an arithmetic overflow error.
    #[must_use]
    pub fn overflow(quantity: impl Into<String>) -> Self {
        Self::Overflow {
            quantity: quantity.into(),
        }
    }

    /// Create an invalid configuration error.
    #[must_use]
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PledgeError::invalid_parameter("loan_to_value", "1.5", "must be in (0, 1]");
        assert!(err.to_string().contains("loan_to_value"));
        assert!(err.to_string().contains("1.5"));

        let err = PledgeError::invalid_holding("0050", "negative quantity");
        assert!(err.to_string().contains("0050"));
        assert!(err.to_string().contains("negative quantity"));

        let err = PledgeError::invalid_quote("0050.TW", -1);
        assert!(err.to_string().contains("0050.TW"));

        let err = PledgeError::overflow("loan amount");
        assert_eq!(err.to_string(), "Arithmetic overflow computing loan amount");
    }

    #[test]
    fn test_error_clone() {
        let err = PledgeError::insufficient_input("no holdings");
        let cloned = err.clone();
        assert_eq!(err, cloned);
    }
}
