//! Stress scenario definitions.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maintenance ratio (percent) at or below which a position is at risk of a
/// margin call.
pub const MARGIN_CALL_THRESHOLD: Decimal = dec!(140);

/// The standard price shocks: 0% down to -50% in 10% steps.
#[must_use]
pub fn standard_shocks() -> Vec<Decimal> {
    vec![
        dec!(0),
        dec!(-0.10),
        dec!(-0.20),
        dec!(-0.30),
        dec!(-0.40),
        dec!(-0.50),
    ]
}

/// Classification of a stressed maintenance ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarginStatus {
    /// Ratio strictly above the threshold.
    Safe,
    /// Ratio at or below the threshold.
    AtRisk,
    /// No loan outstanding, so the ratio is not defined.
    Undefined,
}

impl MarginStatus {
    /// Classifies an optional ratio against `threshold`.
    ///
    /// The comparison is strict: a ratio equal to the threshold is at risk.
    #[must_use]
    pub fn classify(ratio: Option<Decimal>, threshold: Decimal) -> Self {
        match ratio {
            Some(r) if r > threshold => Self::Safe,
            Some(_) => Self::AtRisk,
            None => Self::Undefined,
        }
    }

    /// Returns the status label.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Safe => "Safe",
            Self::AtRisk => "At Risk",
            Self::Undefined => "N/A",
        }
    }
}

impl fmt::Display for MarginStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Formats a shock fraction as a whole-percent label, e.g. `-10%`.
#[must_use]
pub fn shock_label(shock: Decimal) -> String {
    format!("{}%", (shock * Decimal::ONE_HUNDRED).normalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_shocks_order() {
        let shocks = standard_shocks();
        assert_eq!(shocks.len(), 6);
        assert_eq!(shocks[0], Decimal::ZERO);
        assert!(shocks.windows(2).all(|w| w[0] > w[1]));
    }

    #[test]
    fn test_classify_boundary() {
        assert_eq!(
            MarginStatus::classify(Some(dec!(140)), MARGIN_CALL_THRESHOLD),
            MarginStatus::AtRisk
        );
        assert_eq!(
            MarginStatus::classify(Some(dec!(140.0001)), MARGIN_CALL_THRESHOLD),
            MarginStatus::Safe
        );
        assert_eq!(
            MarginStatus::classify(None, MARGIN_CALL_THRESHOLD),
            MarginStatus::Undefined
        );
    }

    #[test]
    fn test_shock_label() {
        assert_eq!(shock_label(dec!(-0.10)), "-10%");
        assert_eq!(shock_label(Decimal::ZERO), "0%");
        assert_eq!(shock_label(dec!(-0.125)), "-12.5%");
    }
}
