//! Policy configuration for engine runs.

use super::{DEFAULT_EXCHANGE_SUFFIX, SHARES_PER_LOT};
use crate::error::{PledgeError, PledgeResult};
use crate::stress::{standard_shocks, MARGIN_CALL_THRESHOLD};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Configuration for pledge-engine runs.
///
/// Holds the policy constants of the model (lot size, margin-call line, shock
/// set, reinvestment fallback) and the parallelism knobs. The defaults encode
/// the usual local-market conventions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Shares per lot.
    pub lot_size: u32,

    /// Maintenance ratio (percent) that a scenario must exceed to be safe.
    pub margin_call_threshold: Decimal,

    /// Price shocks for the stress table, as fractions (-0.1 for -10%).
    pub stress_scenarios: Vec<Decimal>,

    /// Suffix appended to bare exchange codes to form quote symbols.
    pub exchange_suffix: String,

    /// Price used for the reinvestment target when it has no quote.
    pub reinvestment_fallback_price: Decimal,

    /// Enable parallel valuation (requires 'parallel' feature).
    pub parallel: bool,

    /// Minimum holdings count to trigger parallel valuation.
    pub parallel_threshold: usize,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            lot_size: SHARES_PER_LOT,
            margin_call_threshold: MARGIN_CALL_THRESHOLD,
            stress_scenarios: standard_shocks(),
            exchange_suffix: DEFAULT_EXCHANGE_SUFFIX.to_string(),
            reinvestment_fallback_price: dec!(200),
            parallel: true,
            parallel_threshold: 100,
        }
    }
}

impl PolicyConfig {
    /// Creates a new config with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a config that always values sequentially.
    #[must_use]
    pub fn sequential() -> Self {
        Self {
            parallel: false,
            ..Self::default()
        }
    }

    /// Sets the lot size.
    #[must_use]
    pub fn with_lot_size(mut self, lot_size: u32) -> Self {
        self.lot_size = lot_size;
        self
    }

    /// Sets the margin-call threshold (percent).
    #[must_use]
    pub fn with_margin_call_threshold(mut self, threshold: Decimal) -> Self {
        self.margin_call_threshold = threshold;
        self
    }

    /// Sets the stress scenarios.
    #[must_use]
    pub fn with_stress_scenarios(mut self, scenarios: Vec<Decimal>) -> Self {
        self.stress_scenarios = scenarios;
        self
    }

    /// Sets the exchange suffix.
    #[must_use]
    pub fn with_exchange_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.exchange_suffix = suffix.into();
        self
    }

    /// Sets the reinvestment fallback price.
    #[must_use]
    pub fn with_reinvestment_fallback_price(mut self, price: Decimal) -> Self {
        self.reinvestment_fallback_price = price;
        self
    }

    /// Sets whether to use parallel processing.
    #[must_use]
    pub fn with_parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }

    /// Sets the threshold for parallel processing.
    #[must_use]
    pub fn with_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Returns true if parallel processing should be used for the given count.
    #[must_use]
    pub fn should_parallelize(&self, count: usize) -> bool {
        cfg!(feature = "parallel") && self.parallel && count >= self.parallel_threshold
    }

    /// Checks the policy values.
    ///
    /// # Errors
    ///
    /// Returns [`PledgeError::InvalidConfig`] for a zero lot size, a
    /// non-positive threshold or fallback price, or a shock at or below -100%.
    pub fn validate(&self) -> PledgeResult<()> {
        if self.lot_size == 0 {
            return Err(PledgeError::invalid_config("lot_size must be positive"));
        }
        if self.margin_call_threshold <= Decimal::ZERO {
            return Err(PledgeError::invalid_config(
                "margin_call_threshold must be positive",
            ));
        }
        if self.reinvestment_fallback_price.is_sign_negative() {
            return Err(PledgeError::invalid_config(
                "reinvestment_fallback_price must not be negative",
            ));
        }
        if let Some(bad) = self
            .stress_scenarios
            .iter()
            .find(|s| **s < Decimal::NEGATIVE_ONE)
        {
            return Err(PledgeError::invalid_config(format!(
                "stress scenario {bad} is below -100%"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let config = PolicyConfig::default();
        assert_eq!(config.lot_size, 1000);
        assert_eq!(config.margin_call_threshold, dec!(140));
        assert_eq!(config.stress_scenarios.len(), 6);
        assert_eq!(config.exchange_suffix, ".TW");
        assert_eq!(config.reinvestment_fallback_price, dec!(200));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = PolicyConfig::new()
            .with_lot_size(1)
            .with_margin_call_threshold(dec!(130))
            .with_stress_scenarios(vec![dec!(0), dec!(-0.25)])
            .with_exchange_suffix(".TWO")
            .with_threshold(50);

        assert_eq!(config.lot_size, 1);
        assert_eq!(config.margin_call_threshold, dec!(130));
        assert_eq!(config.stress_scenarios, vec![dec!(0), dec!(-0.25)]);
        assert_eq!(config.exchange_suffix, ".TWO");
        assert_eq!(config.parallel_threshold, 50);
    }

    #[test]
    fn test_validate_rejects() {
        assert!(PolicyConfig::new().with_lot_size(0).validate().is_err());
        assert!(PolicyConfig::new()
            .with_margin_call_threshold(Decimal::ZERO)
            .validate()
            .is_err());
        assert!(PolicyConfig::new()
            .with_stress_scenarios(vec![dec!(-1.5)])
            .validate()
            .is_err());
        assert!(PolicyConfig::new()
            .with_reinvestment_fallback_price(dec!(-1))
            .validate()
            .is_err());
    }

    #[test]
    fn test_should_parallelize() {
        let config = PolicyConfig::new().with_threshold(100);

        #[cfg(feature = "parallel")]
        {
            assert!(!config.should_parallelize(50));
            assert!(config.should_parallelize(100));
        }

        #[cfg(not(feature = "parallel"))]
        {
            assert!(!config.should_parallelize(50));
            assert!(!config.should_parallelize(100));
        }

        assert!(!PolicyConfig::sequential().should_parallelize(10_000));
    }

    #[test]
    fn test_partial_toml() {
        let config: PolicyConfig = toml::from_str("margin_call_threshold = 130\nlot_size = 1\n").unwrap();
        assert_eq!(config.margin_call_threshold, dec!(130));
        assert_eq!(config.lot_size, 1);
        assert_eq!(config.exchange_suffix, ".TW");
    }

    #[test]
    fn test_serde() {
        let config = PolicyConfig::new().with_threshold(75);
        let json = serde_json::to_string(&config).unwrap();
        let parsed: PolicyConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }
}
