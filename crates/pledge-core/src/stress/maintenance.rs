//! Maintenance-ratio stress calculations.
//!
//! The maintenance ratio is collateral market value over outstanding loan,
//! in percent. Each scenario shocks the collateral value by a fixed fraction
//! while the loan stays constant.

use super::scenarios::{MarginStatus, MARGIN_CALL_THRESHOLD};
use crate::error::{PledgeError, PledgeResult};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One row of the stress table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StressTestRow {
    /// Price shock applied to the whole portfolio (-0.1 for -10%).
    pub price_shock: Decimal,

    /// Collateral value after the shock.
    pub shocked_market_value: Decimal,

    /// Maintenance ratio in percent. `None` when no loan is outstanding.
    pub maintenance_ratio: Option<Decimal>,

    /// Classification against the margin-call threshold.
    pub status: MarginStatus,
}

impl StressTestRow {
    /// Returns true if the row is classified safe.
    #[must_use]
    pub fn is_safe(&self) -> bool {
        self.status == MarginStatus::Safe
    }

    /// Returns true if the row is at risk of a margin call.
    #[must_use]
    pub fn is_at_risk(&self) -> bool {
        self.status == MarginStatus::AtRisk
    }
}

/// Maintenance ratio in percent, or `None` if `loan_amount` is not positive.
#[must_use]
pub fn maintenance_ratio(collateral_value: Decimal, loan_amount: Decimal) -> Option<Decimal> {
    if loan_amount <= Decimal::ZERO {
        return None;
    }
    collateral_value
        .checked_div(loan_amount)
        .and_then(|r| r.checked_mul(Decimal::ONE_HUNDRED))
}

/// Runs the stress table against the standard 140% margin-call line.
///
/// Rows are returned in scenario order. With no loan outstanding every row
/// carries an undefined ratio instead of failing.
///
/// # Errors
///
/// Returns [`PledgeError::Overflow`] if a shocked collateral value does not
/// fit in a `Decimal`.
pub fn stress_test(
    total_market_value: Decimal,
    loan_amount: Decimal,
    scenarios: &[Decimal],
) -> PledgeResult<Vec<StressTestRow>> {
    stress_test_with_threshold(total_market_value, loan_amount, scenarios, MARGIN_CALL_THRESHOLD)
}

/// Runs the stress table against an explicit threshold (percent).
///
/// # Errors
///
/// Same as [`stress_test`].
pub fn stress_test_with_threshold(
    total_market_value: Decimal,
    loan_amount: Decimal,
    scenarios: &[Decimal],
    threshold: Decimal,
) -> PledgeResult<Vec<StressTestRow>> {
    scenarios
        .iter()
        .map(|&price_shock| {
            let shocked_market_value = Decimal::ONE
                .checked_add(price_shock)
                .and_then(|factor| total_market_value.checked_mul(factor))
                .ok_or_else(|| PledgeError::overflow("shocked market value"))?;
            let ratio = maintenance_ratio(shocked_market_value, loan_amount);
            Ok(StressTestRow {
                price_shock,
                shocked_market_value,
                maintenance_ratio: ratio,
                status: MarginStatus::classify(ratio, threshold),
            })
        })
        .collect()
}

/// Aggregate view of a stress table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StressSummary {
    /// Threshold the rows were classified against.
    pub threshold: Decimal,

    /// Number of safe rows.
    pub safe_count: usize,

    /// Number of at-risk rows.
    pub at_risk_count: usize,

    /// Row with the lowest defined maintenance ratio.
    pub worst: Option<StressTestRow>,

    /// Least severe shock in the table that is at risk.
    pub first_at_risk_shock: Option<Decimal>,

    /// Price move at which the ratio reaches the threshold exactly.
    ///
    /// Positive when the position is already at or below the line today.
    pub margin_call_shock: Option<Decimal>,

    /// Collateral value at which the ratio reaches the threshold.
    pub margin_call_value: Option<Decimal>,
}

impl StressSummary {
    /// Returns true if every defined row is safe.
    #[must_use]
    pub fn all_safe(&self) -> bool {
        self.at_risk_count == 0
    }
}

/// Summarizes a stress table.
///
/// The margin-call figures solve `value * (1 + shock) / loan * 100 = threshold`
/// for `shock`; they are `None` when there is no loan, no collateral, or the
/// solution does not fit in a `Decimal`.
#[must_use]
pub fn summarize_stress(
    rows: &[StressTestRow],
    total_market_value: Decimal,
    loan_amount: Decimal,
    threshold: Decimal,
) -> StressSummary {
    let safe_count = rows.iter().filter(|r| r.is_safe()).count();
    let at_risk_count = rows.iter().filter(|r| r.is_at_risk()).count();

    let worst = rows
        .iter()
        .filter(|r| r.maintenance_ratio.is_some())
        .min_by_key(|r| r.maintenance_ratio)
        .cloned();

    let first_at_risk_shock = rows
        .iter()
        .filter(|r| r.is_at_risk())
        .map(|r| r.price_shock)
        .max();

    let margin_call_value = if loan_amount > Decimal::ZERO {
        threshold
            .checked_mul(loan_amount)
            .and_then(|v| v.checked_div(Decimal::ONE_HUNDRED))
    } else {
        None
    };

    let margin_call_shock = match margin_call_value {
        Some(value) if total_market_value > Decimal::ZERO => value
            .checked_div(total_market_value)
            .and_then(|r| r.checked_sub(Decimal::ONE)),
        _ => None,
    };

    StressSummary {
        threshold,
        safe_count,
        at_risk_count,
        worst,
        first_at_risk_shock,
        margin_call_shock,
        margin_call_value,
    }
}
