//! Property-based tests for pledge engine invariants.
//!
//! These tests verify key arithmetic properties that should always hold:
//! - Total market value = sum of line values, independent of order
//! - Zero-quantity lines contribute nothing
//! - loan = value x LTV and base ratio = 100 / LTV
//! - Maintenance ratio falls monotonically with the shock
//! - Classification is strict at the threshold

use pledge_core::prelude::*;
use pledge_core::{maintenance_ratio, stress_test_with_threshold, value_portfolio_with};
use proptest::prelude::*;

// =============================================================================
// TEST DATA GENERATORS
// =============================================================================

/// Generates `n` quoted holdings with deterministic lots and prices.
fn generate_portfolio(n: usize, seed: u64) -> (Vec<Holding>, PriceQuotes) {
    let mut holdings = Vec::with_capacity(n);
    let mut quotes = PriceQuotes::new();

    for i in 0..n {
        let hash = simple_hash(seed, i as u64);
        let symbol = format!("{:04}", 1000 + i);
        let lots = Decimal::from(hash % 50);
        // 10.00 - 509.99
        let price = Decimal::new(1000 + (hash % 50_000) as i64, 2);

        quotes
            .try_insert(format!("{symbol}.TW").as_str(), price)
            .unwrap();
        holdings.push(Holding::new(symbol, lots));
    }

    (holdings, quotes)
}

fn simple_hash(seed: u64, i: u64) -> u64 {
    let mut h = seed.wrapping_mul(6364136223846793005).wrapping_add(i);
    h ^= h >> 33;
    h = h.wrapping_mul(0xff51afd7ed558ccd);
    h ^= h >> 33;
    h
}

fn pct(n: u32) -> Decimal {
    Decimal::new(i64::from(n), 2)
}

// =============================================================================
// VALUATION
// =============================================================================

#[test]
fn property_total_is_sum_of_lines() {
    for seed in 0..20 {
        let (holdings, quotes) = generate_portfolio(25, seed);
        let report = value_portfolio(&holdings, &quotes).unwrap();

        let sum: Decimal = report.lines.iter().map(|l| l.market_value).sum();
        assert_eq!(report.total_market_value, sum, "seed {seed}");
    }
}

#[test]
fn property_total_independent_of_order() {
    for seed in 0..20 {
        let (mut holdings, quotes) = generate_portfolio(15, seed);
        let forward = value_portfolio(&holdings, &quotes).unwrap().total_market_value;

        holdings.reverse();
        let reversed = value_portfolio(&holdings, &quotes).unwrap().total_market_value;

        assert_eq!(forward, reversed, "seed {seed}");
    }
}

#[test]
fn property_zero_quantity_contributes_nothing() {
    for seed in 0..20 {
        let (mut holdings, mut quotes) = generate_portfolio(10, seed);
        let before = value_portfolio(&holdings, &quotes).unwrap().total_market_value;

        quotes.try_insert("9999.TW", dec!(123.45)).unwrap();
        holdings.push(Holding::new("9999", Decimal::ZERO));
        let report = value_portfolio(&holdings, &quotes).unwrap();

        assert_eq!(report.total_market_value, before, "seed {seed}");
        assert_eq!(report.lines.last().unwrap().market_value, Decimal::ZERO);
    }
}

#[test]
fn property_parallel_matches_sequential() {
    let (holdings, quotes) = generate_portfolio(250, 7);
    let parallel =
        value_portfolio_with(&holdings, &quotes, &PolicyConfig::new().with_threshold(10)).unwrap();
    let sequential =
        value_portfolio_with(&holdings, &quotes, &PolicyConfig::sequential()).unwrap();
    assert_eq!(parallel, sequential);
}

// =============================================================================
// STRATEGY
// =============================================================================

proptest! {
    #[test]
    fn property_loan_and_base_ratio(
        value in 0u64..1_000_000_000,
        ltv_pct in 1u32..=100,
        rate_bp in 0u32..1_000,
        yield_bp in 0u32..1_000,
    ) {
        let params = StrategyParameters::builder()
            .loan_to_value(pct(ltv_pct))
            .loan_annual_rate(Decimal::new(i64::from(rate_bp), 4))
            .expected_dividend_yield(Decimal::new(i64::from(yield_bp), 4))
            .build()
            .unwrap();
        let value = Decimal::from(value);
        let s = compute_strategy(value, &params).unwrap();

        prop_assert_eq!(s.loan_amount, value * params.loan_to_value);
        prop_assert_eq!(s.net_annual_cashflow, s.annual_dividend - s.annual_interest);
        prop_assert!(s.loan_amount <= value);

        let base = s.maintenance_ratio_base.unwrap();
        let expected = Decimal::ONE_HUNDRED / params.loan_to_value;
        prop_assert_eq!(base, expected);
    }

    #[test]
    fn property_stress_monotonic(
        value in 1u64..1_000_000_000,
        ltv_pct in 1u32..=100,
    ) {
        let value = Decimal::from(value);
        let loan = value * pct(ltv_pct);
        let rows = stress_test(value, loan, &standard_shocks()).unwrap();

        for pair in rows.windows(2) {
            let a = pair[0].maintenance_ratio.unwrap();
            let b = pair[1].maintenance_ratio.unwrap();
            prop_assert!(b < a);
        }
    }

    #[test]
    fn property_classification_strict(ratio in 0u32..40_000) {
        let ratio = pct(ratio);
        let status = MarginStatus::classify(Some(ratio), MARGIN_CALL_THRESHOLD);
        if ratio > MARGIN_CALL_THRESHOLD {
            prop_assert_eq!(status, MarginStatus::Safe);
        } else {
            prop_assert_eq!(status, MarginStatus::AtRisk);
        }
    }

    #[test]
    fn property_huge_quantities_error_instead_of_panicking(
        exponent in 20u32..28,
        price in 1u32..100_000,
    ) {
        let lots = Decimal::from_i128_with_scale(10i128.pow(exponent), 0);
        let holdings = vec![Holding::new("0050", lots)];
        let quotes = PriceQuotes::try_from_pairs([("0050.TW", Decimal::from(price))]).unwrap();

        let outcome = analyze(
            &holdings,
            &quotes.into(),
            &StrategyParameters::default(),
            &PolicyConfig::default(),
        );
        match outcome {
            Ok(outcome) => prop_assert!(outcome.report().is_some()),
            Err(err) => prop_assert!(matches!(
                err,
                PledgeError::InvalidHolding { .. } | PledgeError::Overflow { .. }
            ), "unexpected error: {:?}", err),
        }
    }

    #[test]
    fn property_no_loan_is_undefined(value in 0u64..1_000_000_000) {
        let rows =
            stress_test(Decimal::from(value), Decimal::ZERO, &standard_shocks()).unwrap();
        prop_assert_eq!(rows.len(), 6);
        for row in rows {
            prop_assert_eq!(row.maintenance_ratio, None);
            prop_assert_eq!(row.status, MarginStatus::Undefined);
        }
    }
}

// =============================================================================
// THRESHOLD
// =============================================================================

#[test]
fn property_threshold_boundary_is_at_risk() {
    // A 50% LTV position hits exactly 140% at a -30% shock.
    for value in [dec!(100_000), dec!(1_500_000), dec!(987_654.32)] {
        let loan = value * dec!(0.5);
        let rows = stress_test_with_threshold(value, loan, &[dec!(-0.3)], dec!(140)).unwrap();
        assert_eq!(rows[0].maintenance_ratio, maintenance_ratio(value * dec!(0.7), loan));
        assert_eq!(rows[0].maintenance_ratio, Some(dec!(140)));
        assert_eq!(rows[0].status, MarginStatus::AtRisk);
    }
}
