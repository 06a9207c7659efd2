//! Analyze command implementation.
//!
//! Values the holdings, sizes the pledge loan, projects reinvestment and
//! prints the maintenance-ratio stress table.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tabled::Tabled;

use pledge_core::{
    analyze, quote_symbols, shock_label, AnalysisOutcome, AnalysisReport, Holding, InputRow,
    PortfolioInput, PriceFeed, PriceQuotes, QuoteSymbol, ReinvestmentPriceSource,
    StrategyParameters,
};
use pledge_ext_file::{create_file_price_source, StaticPriceSource};
use pledge_traits::{fetch_price_feed, PriceSource};

use crate::cli::OutputFormat;
use crate::commands::{
    parse_assignment, parse_decimal, validate_dividend_yield, validate_growth,
    validate_loan_rate, validate_ltv, Context,
};
use crate::error::{CliError, CliResult};
use crate::output::{
    format_money, format_ratio, print_csv, print_header, print_json, print_pairs,
    print_success, print_table, print_warning, KeyValue,
};
use crate::settings::AppConfig;

/// Arguments for the analyze command.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Holding as SYMBOL=LOTS (repeatable, e.g. 0050=10)
    #[arg(long = "holding", value_name = "SYMBOL=LOTS")]
    pub holdings: Vec<String>,

    /// CSV file with symbol,quantity columns
    #[arg(long, conflicts_with = "holdings")]
    pub portfolio: Option<PathBuf>,

    /// Annual loan interest rate in percent (default 2.58)
    #[arg(long)]
    pub loan_rate: Option<Decimal>,

    /// Loan-to-value in percent, 10-60 (default 50)
    #[arg(long)]
    pub ltv: Option<Decimal>,

    /// Expected dividend yield of the collateral in percent, 0-10 (default 6)
    #[arg(long)]
    pub dividend_yield: Option<Decimal>,

    /// Expected annual growth of the reinvestment target in percent, -20 to 30 (default 12)
    #[arg(long, allow_hyphen_values = true)]
    pub growth: Option<Decimal>,

    /// Quote symbol the loan is reinvested into (default 0050.TW)
    #[arg(long)]
    pub reinvest_symbol: Option<String>,

    /// Price as QUOTE_SYMBOL=PRICE (repeatable, e.g. 0050.TW=150)
    #[arg(long = "price", value_name = "SYMBOL=PRICE")]
    pub prices: Vec<String>,

    /// CSV or JSON price file
    #[arg(long = "prices", value_name = "FILE", conflicts_with = "live")]
    pub prices_file: Option<PathBuf>,

    /// Fetch latest close prices from Yahoo Finance
    #[arg(long)]
    pub live: bool,
}

/// Portfolio CSV record.
#[derive(Debug, Deserialize)]
struct PortfolioRecord {
    symbol: String,
    #[serde(alias = "lots")]
    quantity: String,
}

/// Reads `symbol,quantity` rows.
fn read_portfolio(path: &Path) -> CliResult<PortfolioInput> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| CliError::Portfolio(format!("{}: {e}", path.display())))?;

    let mut rows = Vec::new();
    for record in reader.deserialize() {
        let record: PortfolioRecord =
            record.map_err(|e| CliError::Portfolio(format!("{}: {e}", path.display())))?;
        rows.push(InputRow::new(record.symbol, parse_decimal(&record.quantity)?));
    }
    Ok(PortfolioInput::from_rows(rows))
}

fn portfolio_input(args: &AnalyzeArgs) -> CliResult<PortfolioInput> {
    if let Some(path) = &args.portfolio {
        return read_portfolio(path);
    }
    if args.holdings.is_empty() {
        return Ok(PortfolioInput::default());
    }
    let mut input = PortfolioInput::empty();
    for arg in &args.holdings {
        let (symbol, lots) = parse_assignment(arg)?;
        input.push_row(symbol, lots);
    }
    Ok(input)
}

fn strategy_parameters(args: &AnalyzeArgs, config: &AppConfig) -> CliResult<StrategyParameters> {
    let defaults = &config.defaults;
    let loan_rate = validate_loan_rate(args.loan_rate.unwrap_or(defaults.loan_rate_pct))?;
    let ltv = validate_ltv(args.ltv.unwrap_or(defaults.ltv_pct))?;
    let dividend_yield =
        validate_dividend_yield(args.dividend_yield.unwrap_or(defaults.dividend_yield_pct))?;
    let growth = validate_growth(args.growth.unwrap_or(defaults.growth_pct))?;
    let symbol = args
        .reinvest_symbol
        .as_deref()
        .unwrap_or(&defaults.reinvest_symbol);

    Ok(StrategyParameters::builder()
        .loan_annual_rate_pct(loan_rate)
        .loan_to_value_pct(ltv)
        .expected_dividend_yield_pct(dividend_yield)
        .reinvestment_growth_rate_pct(growth)
        .reinvestment_quote_symbol(QuoteSymbol::derive(symbol, &config.policy.exchange_suffix))
        .build()?)
}

/// Prices given with `--price`; bare codes get the exchange suffix.
fn price_overrides(args: &AnalyzeArgs, suffix: &str) -> CliResult<PriceQuotes> {
    let mut quotes = PriceQuotes::new();
    for arg in &args.prices {
        let (symbol, price) = parse_assignment(arg)?;
        quotes.try_insert(QuoteSymbol::derive(&symbol, suffix), price)?;
    }
    Ok(quotes)
}

#[cfg(feature = "yahoo")]
fn live_source(config: &AppConfig) -> CliResult<Box<dyn PriceSource>> {
    use pledge_ext_file::{CachedPriceSource, YahooPriceSource};
    Ok(Box::new(CachedPriceSource::with_ttl(
        YahooPriceSource::new()?,
        config.cache.ttl(),
    )))
}

#[cfg(not(feature = "yahoo"))]
fn live_source(_config: &AppConfig) -> CliResult<Box<dyn PriceSource>> {
    Err(CliError::FeatureDisabled("--live", "yahoo"))
}

/// Source for prices not given on the command line.
fn primary_source(args: &AnalyzeArgs, config: &AppConfig) -> CliResult<Option<Box<dyn PriceSource>>> {
    if args.live {
        return live_source(config).map(Some);
    }
    match &args.prices_file {
        Some(path) => Ok(Some(create_file_price_source(path)?)),
        None => Ok(None),
    }
}

async fn resolve_feed(
    args: &AnalyzeArgs,
    config: &AppConfig,
    holdings: &[Holding],
    params: &StrategyParameters,
) -> CliResult<PriceFeed> {
    let symbols = quote_symbols(holdings, params);
    let overrides = price_overrides(args, &config.policy.exchange_suffix)?;

    let feed = match primary_source(args, config)? {
        Some(source) => {
            let mut feed = fetch_price_feed(&source, &symbols).await;
            if let PriceFeed::Resolved(quotes) = &mut feed {
                quotes.merge(overrides.restricted_to(&symbols));
            }
            feed
        }
        None => fetch_price_feed(&StaticPriceSource::new(overrides), &symbols).await,
    };
    Ok(feed)
}

/// Execute the analyze command.
pub async fn execute(args: AnalyzeArgs, ctx: &Context) -> Result<()> {
    let config = ctx.load_config()?;

    let input = portfolio_input(&args)?;
    let holdings = input.holdings(&config.policy);
    let params = strategy_parameters(&args, &config)?;
    let feed = resolve_feed(&args, &config, &holdings, &params).await?;

    let outcome = analyze(&holdings, &feed, &params, &config.policy)?;

    match outcome {
        AnalysisOutcome::Complete(report) => print_report(&report, &params, &config, ctx),
        AnalysisOutcome::InsufficientInput { reason } => {
            if ctx.format == OutputFormat::Json {
                print_json(&AnalysisOutcome::InsufficientInput {
                    reason: reason.clone(),
                })?;
            }
            print_warning(&format!(
                "Enter holdings with a positive quantity and a resolvable price ({reason})"
            ));
            Ok(())
        }
    }
}

// =============================================================================
// REPORT OUTPUT
// =============================================================================

#[derive(Debug, Serialize, Tabled)]
struct HoldingRow {
    #[tabled(rename = "Symbol")]
    symbol: String,
    #[tabled(rename = "Quote")]
    quote: String,
    #[tabled(rename = "Lots")]
    lots: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Market Value")]
    market_value: String,
    #[tabled(rename = "Weight")]
    weight: String,
}

#[derive(Debug, Serialize, Tabled)]
struct StressRow {
    #[tabled(rename = "Shock")]
    shock: String,
    #[tabled(rename = "Collateral Value")]
    collateral_value: String,
    #[tabled(rename = "Maintenance Ratio")]
    maintenance_ratio: String,
    #[tabled(rename = "Status")]
    status: String,
}

fn holding_rows(report: &AnalysisReport) -> Vec<HoldingRow> {
    let weights = report.valuation.weights();
    report
        .valuation
        .lines
        .iter()
        .zip(weights)
        .map(|(line, weight)| HoldingRow {
            symbol: line.symbol.clone(),
            quote: line.quote_symbol.to_string(),
            lots: line.quantity.normalize().to_string(),
            price: if line.is_missing() {
                "n/a".to_string()
            } else {
                line.price.normalize().to_string()
            },
            market_value: format_money(line.market_value),
            weight: weight
                .map(|w| format!("{:.1}%", w * Decimal::ONE_HUNDRED))
                .unwrap_or_else(|| "-".to_string()),
        })
        .collect()
}

fn stress_rows(report: &AnalysisReport) -> Vec<StressRow> {
    report
        .stress
        .iter()
        .map(|row| StressRow {
            shock: shock_label(row.price_shock),
            collateral_value: format_money(row.shocked_market_value),
            maintenance_ratio: row
                .maintenance_ratio
                .map(format_ratio)
                .unwrap_or_else(|| "N/A".to_string()),
            status: row.status.to_string(),
        })
        .collect()
}

fn strategy_metrics(report: &AnalysisReport, params: &StrategyParameters) -> Vec<KeyValue> {
    let s = &report.strategy;
    vec![
        KeyValue::from_money("Total market value", report.valuation.total_market_value),
        KeyValue::from_percent("Loan-to-value", params.loan_to_value),
        KeyValue::from_money("Loan amount", s.loan_amount),
        KeyValue::from_money("Annual interest", s.annual_interest),
        KeyValue::from_money("Annual dividend", s.annual_dividend),
        KeyValue::from_money("Net annual cash flow", s.net_annual_cashflow),
        KeyValue::from_money("Net monthly cash flow", s.monthly_net_cashflow()),
        KeyValue::new(
            "Initial maintenance ratio",
            s.maintenance_ratio_base
                .map(format_ratio)
                .unwrap_or_else(|| "N/A".to_string()),
        ),
    ]
}

fn reinvestment_metrics(
    report: &AnalysisReport,
    params: &StrategyParameters,
    config: &AppConfig,
) -> Vec<KeyValue> {
    let r = &report.reinvestment;
    let price_note = match r.price_source {
        ReinvestmentPriceSource::Quoted => "quoted",
        ReinvestmentPriceSource::Fallback => "fallback",
    };
    vec![
        KeyValue::new("Reinvestment target", params.reinvestment_quote_symbol.to_string()),
        KeyValue::new(
            "Reinvestment price",
            format!("{} ({price_note})", r.reinvestment_price.normalize()),
        ),
        KeyValue::new(
            "Shares acquirable",
            r.shares_acquirable
                .map(|shares| format!("{:.1}", shares))
                .unwrap_or_else(|| "N/A".to_string()),
        ),
        KeyValue::new(
            "Lots acquirable",
            r.lots_acquirable(config.policy.lot_size)
                .map(|l| format!("{:.2}", l))
                .unwrap_or_else(|| "N/A".to_string()),
        ),
        KeyValue::from_percent("Expected growth", params.reinvestment_growth_rate),
        KeyValue::from_money("Expected reinvestment return", r.expected_reinvestment_return),
        KeyValue::from_money("Total expected net result", r.total_expected_net_result),
    ]
}

fn all_metrics(
    report: &AnalysisReport,
    params: &StrategyParameters,
    config: &AppConfig,
) -> Vec<KeyValue> {
    let mut metrics = strategy_metrics(report, params);
    metrics.extend(reinvestment_metrics(report, params, config));
    for row in &report.stress {
        metrics.push(KeyValue::new(
            format!("Maintenance ratio {}", shock_label(row.price_shock)),
            row.maintenance_ratio
                .map(format_ratio)
                .unwrap_or_else(|| "N/A".to_string()),
        ));
    }
    metrics
}

fn print_report(
    report: &AnalysisReport,
    params: &StrategyParameters,
    config: &AppConfig,
    ctx: &Context,
) -> Result<()> {
    match ctx.format {
        OutputFormat::Json => {
            print_json(&AnalysisOutcome::Complete(Box::new(report.clone())))?;
        }
        OutputFormat::Csv => {
            print_csv(&all_metrics(report, params, config))?;
        }
        OutputFormat::Minimal => {
            print_pairs(&all_metrics(report, params, config));
        }
        OutputFormat::Table => {
            print_header("Holdings");
            print_table(&holding_rows(report))?;

            print_header("Pledge Strategy");
            print_table(&strategy_metrics(report, params))?;

            print_header("Reinvestment");
            print_table(&reinvestment_metrics(report, params, config))?;

            print_header("Maintenance Ratio Stress Test");
            print_table(&stress_rows(report))?;

            if !ctx.quiet {
                print_stress_verdict(report);
            }
        }
    }
    Ok(())
}

fn print_stress_verdict(report: &AnalysisReport) {
    let summary = &report.stress_summary;
    println!();
    if summary.all_safe() {
        print_success(&format!(
            "All scenarios stay above the {}% margin-call line",
            summary.threshold.normalize()
        ));
        return;
    }
    let line = match (summary.first_at_risk_shock, summary.margin_call_shock) {
        (Some(shock), Some(call)) => format!(
            "Margin call risk from a {} drop (ratio reaches {}% at {:.2}%)",
            shock_label(shock),
            summary.threshold.normalize(),
            call * Decimal::ONE_HUNDRED
        ),
        _ => format!(
            "{} scenario(s) at or below the {}% margin-call line",
            summary.at_risk_count,
            summary.threshold.normalize()
        ),
    };
    println!("{} {}", "⚠".red(), line.red());
}

#[cfg(test)]
mod tests {
    use super::*;
    use pledge_core::PolicyConfig;
    use rust_decimal_macros::dec;

    fn args() -> AnalyzeArgs {
        AnalyzeArgs {
            holdings: vec![],
            portfolio: None,
            loan_rate: None,
            ltv: None,
            dividend_yield: None,
            growth: None,
            reinvest_symbol: None,
            prices: vec![],
            prices_file: None,
            live: false,
        }
    }

    fn sample_report() -> AnalysisReport {
        let quotes = PriceQuotes::try_from_pairs([("0050.TW", dec!(150))]).unwrap();
        AnalysisReport::calculate(
            &[Holding::new("0050", dec!(10))],
            &quotes,
            &StrategyParameters::default(),
            &PolicyConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_default_input_rows() {
        let input = portfolio_input(&args()).unwrap();
        assert_eq!(input.len(), 3);
    }

    #[test]
    fn test_holding_flags() {
        let mut a = args();
        a.holdings = vec!["0050=10".into(), "00878=2.5".into()];
        let input = portfolio_input(&a).unwrap();
        assert_eq!(input.rows()[1], InputRow::new("00878", dec!(2.5)));
    }

    #[test]
    fn test_parameters_from_defaults() {
        let params = strategy_parameters(&args(), &AppConfig::default()).unwrap();
        assert_eq!(params, StrategyParameters::default());
    }

    #[test]
    fn test_parameters_out_of_range() {
        let mut a = args();
        a.ltv = Some(dec!(70));
        assert!(matches!(
            strategy_parameters(&a, &AppConfig::default()),
            Err(CliError::OutOfRange { .. })
        ));
    }

    #[cfg(not(feature = "yahoo"))]
    #[test]
    fn test_live_without_feature() {
        let mut a = args();
        a.live = true;
        assert!(matches!(
            primary_source(&a, &AppConfig::default()),
            Err(CliError::FeatureDisabled(..))
        ));
    }

    #[tokio::test]
    async fn test_overrides_only() {
        let mut a = args();
        a.prices = vec!["0050=150".into(), "2330.TW=900".into()];
        let holdings = vec![Holding::new("0050", dec!(1))];
        let feed = resolve_feed(&a, &AppConfig::default(), &holdings, &StrategyParameters::default())
            .await
            .unwrap();
        // 2330.TW was not requested
        assert_eq!(feed.quotes().unwrap().len(), 1);
    }

    #[test]
    fn test_rows() {
        let report = sample_report();

        let holdings = holding_rows(&report);
        assert_eq!(holdings[0].market_value, "1,500,000");
        assert_eq!(holdings[0].weight, "100.0%");

        let stress = stress_rows(&report);
        assert_eq!(stress.len(), 6);
        assert_eq!(stress[0].shock, "0%");
        assert_eq!(stress[0].maintenance_ratio, "200.00%");
        assert_eq!(stress[3].status, "At Risk");
    }

    #[test]
    fn test_metrics() {
        let report = sample_report();
        let metrics = all_metrics(&report, &StrategyParameters::default(), &AppConfig::default());
        let loan = metrics.iter().find(|kv| kv.key == "Loan amount").unwrap();
        assert_eq!(loan.value, "750,000");
        let net = metrics
            .iter()
            .find(|kv| kv.key == "Net annual cash flow")
            .unwrap();
        assert_eq!(net.value, "70,650");
        assert!(metrics.iter().any(|kv| kv.key == "Maintenance ratio -50%"));

        let value = |key: &str| metrics.iter().find(|kv| kv.key == key).unwrap().value.clone();
        assert_eq!(value("Shares acquirable"), "5000.0");
        assert_eq!(value("Lots acquirable"), "5.00");
    }
}
