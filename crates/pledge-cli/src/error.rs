//! CLI error types.

use rust_decimal::Decimal;
use thiserror::Error;

use pledge_core::PledgeError;
use pledge_traits::TraitError;

/// CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Malformed `KEY=VALUE` argument.
    #[error("Invalid value: {0}. Use SYMBOL=VALUE.")]
    InvalidAssignment(String),

    /// Number that does not parse.
    #[error("Invalid number: {0}")]
    InvalidNumber(String),

    /// Value outside the accepted input range.
    #[error("Invalid {name}: {value}. Must be between {min} and {max}.")]
    OutOfRange {
        /// Argument name.
        name: &'static str,
        /// Rejected value.
        value: Decimal,
        /// Lower bound.
        min: Decimal,
        /// Upper bound.
        max: Decimal,
    },

    /// Functionality compiled out.
    #[error("{0} is not available: rebuild with --features {1}")]
    FeatureDisabled(&'static str, &'static str),

    /// Portfolio file error.
    #[error("Portfolio file error: {0}")]
    Portfolio(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Engine rejected the input.
    #[error(transparent)]
    Pledge(#[from] PledgeError),

    /// Price source error.
    #[error("Price source error: {0}")]
    Source(#[from] TraitError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// CLI result type.
pub type CliResult<T> = Result<T, CliError>;
