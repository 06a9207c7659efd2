//! Full strategy analysis.
//!
//! Combines valuation, cash flow, reinvestment and the stress table into a
//! single report, and decides when the input is too thin to report anything.

use super::{
    compute_strategy, project_reinvestment_with_cashflow, resolve_reinvestment_price,
    value_portfolio_with, ReinvestmentProjection, StrategyReport, ValuationReport,
};
use crate::error::{PledgeError, PledgeResult};
use crate::stress::{stress_test_with_threshold, summarize_stress, StressSummary, StressTestRow};
use crate::types::{Holding, PolicyConfig, PriceFeed, PriceQuotes, StrategyParameters};
use serde::{Deserialize, Serialize};

/// Every derived figure for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Per-line and total market value.
    pub valuation: ValuationReport,

    /// Loan and cash flow.
    pub strategy: StrategyReport,

    /// Redeployment of the loan.
    pub reinvestment: ReinvestmentProjection,

    /// Maintenance ratio per price shock.
    pub stress: Vec<StressTestRow>,

    /// Aggregate of the stress table.
    pub stress_summary: StressSummary,
}

impl AnalysisReport {
    /// Calculates the report without any sufficiency checks.
    ///
    /// Holdings are valued as given; use [`analyze`] for the filtered,
    /// validated entry point.
    ///
    /// # Errors
    ///
    /// Returns an error if a figure overflows a `Decimal`.
    pub fn calculate(
        holdings: &[Holding],
        quotes: &PriceQuotes,
        params: &StrategyParameters,
        config: &PolicyConfig,
    ) -> PledgeResult<Self> {
        let valuation = value_portfolio_with(holdings, quotes, config)?;
        let total = valuation.total_market_value;

        let strategy = compute_strategy(total, params)?;

        let price = resolve_reinvestment_price(
            quotes,
            &params.reinvestment_quote_symbol,
            config.reinvestment_fallback_price,
        );
        let reinvestment = project_reinvestment_with_cashflow(
            strategy.loan_amount,
            price,
            params.reinvestment_growth_rate,
            strategy.net_annual_cashflow,
        )?;

        let stress = stress_test_with_threshold(
            total,
            strategy.loan_amount,
            &config.stress_scenarios,
            config.margin_call_threshold,
        )?;
        let stress_summary =
            summarize_stress(&stress, total, strategy.loan_amount, config.margin_call_threshold);

        Ok(Self {
            valuation,
            strategy,
            reinvestment,
            stress,
            stress_summary,
        })
    }
}

/// Result of [`analyze`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AnalysisOutcome {
    /// All reports were produced.
    Complete(Box<AnalysisReport>),
    /// No numeric report can be given.
    InsufficientInput {
        /// Why the input was insufficient.
        reason: String,
    },
}

impl AnalysisOutcome {
    /// Returns the report, if complete.
    #[must_use]
    pub fn report(&self) -> Option<&AnalysisReport> {
        match self {
            Self::Complete(report) => Some(report),
            Self::InsufficientInput { .. } => None,
        }
    }

    /// Converts into the report.
    ///
    /// # Errors
    ///
    /// Returns [`PledgeError::InsufficientInput`] if no report was produced.
    pub fn into_report(self) -> PledgeResult<AnalysisReport> {
        match self {
            Self::Complete(report) => Ok(*report),
            Self::InsufficientInput { reason } => Err(PledgeError::insufficient_input(reason)),
        }
    }

    fn insufficient(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        tracing::debug!(%reason, "analysis skipped");
        Self::InsufficientInput { reason }
    }
}

/// Runs the whole pledge analysis.
///
/// Blank or zero-quantity lines are dropped first. The outcome is
/// [`AnalysisOutcome::InsufficientInput`] when no line remains, when the price
/// feed is unavailable, or when none of the remaining lines has a quote.
///
/// # Errors
///
/// Returns an error if `params` or `config` fail validation, or if the
/// holdings are so large that a derived figure overflows a `Decimal`.
///
/// # Example
///
/// ```
/// use pledge_core::prelude::*;
///
/// let holdings = vec![Holding::new("0050", dec!(10))];
/// let feed = PriceFeed::Resolved(PriceQuotes::try_from_pairs([("0050.TW", dec!(150))])?);
///
/// let outcome = analyze(&holdings, &feed, &StrategyParameters::default(), &PolicyConfig::default())?;
/// let report = outcome.into_report()?;
/// assert_eq!(report.strategy.loan_amount, dec!(750_000));
/// # Ok::<(), PledgeError>(())
/// ```
pub fn analyze(
    holdings: &[Holding],
    feed: &PriceFeed,
    params: &StrategyParameters,
    config: &PolicyConfig,
) -> PledgeResult<AnalysisOutcome> {
    params.validate()?;
    config.validate()?;

    let active: Vec<Holding> = holdings.iter().filter(|h| !h.is_empty()).cloned().collect();
    if active.is_empty() {
        return Ok(AnalysisOutcome::insufficient(
            "no holding has a symbol and a positive quantity",
        ));
    }

    let quotes = match feed {
        PriceFeed::Resolved(quotes) => quotes,
        PriceFeed::Unavailable { reason } => {
            return Ok(AnalysisOutcome::insufficient(format!(
                "price source unavailable: {reason}"
            )));
        }
    };

    if !active.iter().any(|h| quotes.contains(&h.quote_symbol)) {
        return Ok(AnalysisOutcome::insufficient("no price quote for any holding"));
    }

    let report = AnalysisReport::calculate(&active, quotes, params, config)?;

    for symbol in report.valuation.missing_symbols() {
        tracing::warn!(%symbol, "no price quote, valued at zero");
    }
    tracing::debug!(
        holdings = active.len(),
        total_market_value = %report.valuation.total_market_value,
        loan_amount = %report.strategy.loan_amount,
        at_risk = report.stress_summary.at_risk_count,
        "analysis complete"
    );

    Ok(AnalysisOutcome::Complete(Box::new(report)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::{PriceStatus, ReinvestmentPriceSource};
    use crate::stress::MarginStatus;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn feed(pairs: &[(&str, Decimal)]) -> PriceFeed {
        PriceFeed::Resolved(PriceQuotes::try_from_pairs(pairs.iter().copied()).unwrap())
    }

    fn run(holdings: &[Holding], feed: &PriceFeed) -> AnalysisOutcome {
        analyze(holdings, feed, &StrategyParameters::default(), &PolicyConfig::default()).unwrap()
    }

    #[test]
    fn test_reference_portfolio() {
        let outcome = run(&[Holding::new("0050", dec!(10))], &feed(&[("0050.TW", dec!(150))]));
        let report = outcome.report().unwrap();

        assert_eq!(report.valuation.total_market_value, dec!(1_500_000));
        assert_eq!(report.strategy.loan_amount, dec!(750_000));
        assert_eq!(report.strategy.net_annual_cashflow, dec!(70_650));
        assert_eq!(report.reinvestment.reinvestment_price, dec!(150));
        assert_eq!(report.reinvestment.price_source, ReinvestmentPriceSource::Quoted);
        assert_eq!(report.reinvestment.shares_acquirable, Some(dec!(5_000)));
        // 750,000 * 12% + 70,650
        assert_eq!(report.reinvestment.total_expected_net_result, dec!(160_650));
        assert_eq!(report.stress.len(), 6);
        assert_eq!(report.stress[3].status, MarginStatus::AtRisk);
    }

    #[test]
    fn test_reinvestment_fallback() {
        let outcome = run(&[Holding::new("00878", dec!(10))], &feed(&[("00878.TW", dec!(20))]));
        let report = outcome.report().unwrap();

        assert_eq!(report.reinvestment.price_source, ReinvestmentPriceSource::Fallback);
        assert_eq!(report.reinvestment.reinvestment_price, dec!(200));
        // loan = 200,000 * 0.5 = 100,000 -> 500 shares at 200
        assert_eq!(report.reinvestment.shares_acquirable, Some(dec!(500)));
    }

    #[test]
    fn test_filters_empty_lines() {
        let holdings = vec![
            Holding::new("0050", dec!(10)),
            Holding::new("00878", Decimal::ZERO),
            Holding::new("", dec!(3)),
        ];
        let outcome = run(&holdings, &feed(&[("0050.TW", dec!(150))]));
        assert_eq!(outcome.report().unwrap().valuation.line_count(), 1);
    }

    #[test]
    fn test_partial_quotes() {
        let holdings = vec![Holding::new("0050", dec!(10)), Holding::new("9999", dec!(1))];
        let outcome = run(&holdings, &feed(&[("0050.TW", dec!(150))]));
        let report = outcome.report().unwrap();

        assert_eq!(report.valuation.total_market_value, dec!(1_500_000));
        assert_eq!(report.valuation.lines[1].price_status, PriceStatus::Missing);
    }

    #[test]
    fn test_no_holdings() {
        let outcome = run(&[], &feed(&[("0050.TW", dec!(150))]));
        assert!(matches!(outcome, AnalysisOutcome::InsufficientInput { .. }));
    }

    #[test]
    fn test_no_quotes() {
        let outcome = run(&[Holding::new("0050", dec!(10))], &feed(&[]));
        let err = outcome.into_report().unwrap_err();
        assert!(matches!(err, PledgeError::InsufficientInput { .. }));
    }

    #[test]
    fn test_unavailable_feed() {
        let outcome = run(
            &[Holding::new("0050", dec!(10))],
            &PriceFeed::unavailable("connection refused"),
        );
        match outcome {
            AnalysisOutcome::InsufficientInput { reason } => {
                assert!(reason.contains("connection refused"));
            }
            AnalysisOutcome::Complete(_) => panic!("expected insufficient input"),
        }
    }

    #[test]
    fn test_invalid_params_rejected() {
        let mut params = StrategyParameters::default();
        params.loan_to_value = dec!(1.5);
        let result = analyze(
            &[Holding::new("0050", dec!(10))],
            &feed(&[("0050.TW", dec!(150))]),
            &params,
            &PolicyConfig::default(),
        );
        assert!(matches!(result, Err(PledgeError::InvalidParameter { .. })));
    }

    #[test]
    fn test_custom_policy() {
        let config = PolicyConfig::default()
            .with_margin_call_threshold(dec!(130))
            .with_stress_scenarios(vec![dec!(0), dec!(-0.35)]);
        let outcome = analyze(
            &[Holding::new("0050", dec!(10))],
            &feed(&[("0050.TW", dec!(150))]),
            &StrategyParameters::default(),
            &config,
        )
        .unwrap();
        let report = outcome.report().unwrap();

        assert_eq!(report.stress.len(), 2);
        // 200% * 0.65 = 130%: exactly at the line
        assert_eq!(report.stress[1].maintenance_ratio, Some(dec!(130)));
        assert_eq!(report.stress[1].status, MarginStatus::AtRisk);
    }

    #[test]
    fn test_oversized_holding_rejected() {
        let result = analyze(
            &[Holding::new("0050", dec!(10_000_000_000_000_000_000_000_000))],
            &feed(&[("0050.TW", dec!(10_000))]),
            &StrategyParameters::default(),
            &PolicyConfig::default(),
        );
        assert!(matches!(result, Err(PledgeError::InvalidHolding { .. })));
    }
}
