//! CLI command implementations.

pub mod analyze;
pub mod config;

// Re-export submodules for convenience
pub use analyze::AnalyzeArgs;
pub use config::ConfigArgs;

use std::path::PathBuf;
use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::cli::OutputFormat;
use crate::error::{CliError, CliResult};
use crate::settings::{config_path, AppConfig};

/// Global options shared by every command.
pub struct Context {
    pub format: OutputFormat,
    pub quiet: bool,
    pub config_path: Option<PathBuf>,
}

impl Context {
    pub fn config_file(&self) -> CliResult<PathBuf> {
        config_path(self.config_path.as_deref())
    }

    pub fn load_config(&self) -> CliResult<AppConfig> {
        AppConfig::load(&self.config_file()?)
    }
}

/// Parses a decimal number.
pub fn parse_decimal(s: &str) -> CliResult<Decimal> {
    Decimal::from_str(s.trim()).map_err(|_| CliError::InvalidNumber(s.to_string()))
}

/// Parses `SYMBOL=VALUE`.
pub fn parse_assignment(s: &str) -> CliResult<(String, Decimal)> {
    let (symbol, value) = s
        .split_once('=')
        .ok_or_else(|| CliError::InvalidAssignment(s.to_string()))?;
    let symbol = symbol.trim();
    if symbol.is_empty() {
        return Err(CliError::InvalidAssignment(s.to_string()));
    }
    Ok((symbol.to_string(), parse_decimal(value)?))
}

/// Validates a percent input against its accepted range.
pub fn validate_range(
    name: &'static str,
    value: Decimal,
    min: Decimal,
    max: Decimal,
) -> CliResult<Decimal> {
    if value < min || value > max {
        return Err(CliError::OutOfRange {
            name,
            value,
            min,
            max,
        });
    }
    Ok(value)
}

/// Validates the loan-to-value percent (10-60).
pub fn validate_ltv(pct: Decimal) -> CliResult<Decimal> {
    validate_range("loan-to-value", pct, dec!(10), dec!(60))
}

/// Validates the dividend yield percent (0-10).
pub fn validate_dividend_yield(pct: Decimal) -> CliResult<Decimal> {
    validate_range("dividend yield", pct, dec!(0), dec!(10))
}

/// Validates the reinvestment growth percent (-20 to 30).
pub fn validate_growth(pct: Decimal) -> CliResult<Decimal> {
    validate_range("growth", pct, dec!(-20), dec!(30))
}

/// Validates the loan rate percent.
pub fn validate_loan_rate(pct: Decimal) -> CliResult<Decimal> {
    validate_range("loan rate", pct, dec!(0), dec!(100))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_assignment() {
        assert_eq!(
            parse_assignment("0050=10").unwrap(),
            ("0050".to_string(), dec!(10))
        );
        assert_eq!(
            parse_assignment(" 0050.TW = 150.5").unwrap(),
            ("0050.TW".to_string(), dec!(150.5))
        );
        assert!(matches!(
            parse_assignment("0050"),
            Err(CliError::InvalidAssignment(_))
        ));
        assert!(matches!(
            parse_assignment("=3"),
            Err(CliError::InvalidAssignment(_))
        ));
        assert!(matches!(
            parse_assignment("0050=ten"),
            Err(CliError::InvalidNumber(_))
        ));
    }

    #[test]
    fn test_ranges() {
        assert!(validate_ltv(dec!(10)).is_ok());
        assert!(validate_ltv(dec!(60)).is_ok());
        assert!(validate_ltv(dec!(61)).is_err());
        assert!(validate_ltv(dec!(5)).is_err());
        assert!(validate_dividend_yield(dec!(10.5)).is_err());
        assert!(validate_growth(dec!(-20)).is_ok());
        assert!(validate_growth(dec!(-21)).is_err());
        assert!(validate_loan_rate(dec!(-1)).is_err());
    }
}
