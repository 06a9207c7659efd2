//! Config command implementation.
//!
//! Shows, locates and initializes the TOML configuration file.

use anyhow::Result;
use clap::{Args, Subcommand};

use pledge_core::shock_label;

use crate::cli::OutputFormat;
use crate::commands::Context;
use crate::output::{
    format_ratio, print_csv, print_header, print_info, print_json, print_pairs, print_success,
    print_table, print_warning, KeyValue,
};
use crate::settings::AppConfig;

/// Arguments for the config command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show effective configuration
    Show,

    /// Show configuration file location
    Path,

    /// Write a configuration file with the defaults
    Init(InitArgs),
}

/// Arguments for init subcommand.
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

/// Execute the config command.
pub fn execute(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => execute_show(ctx),
        ConfigCommand::Path => execute_path(ctx),
        ConfigCommand::Init(init_args) => execute_init(init_args, ctx),
    }
}

fn config_pairs(config: &AppConfig) -> Vec<KeyValue> {
    let d = &config.defaults;
    let p = &config.policy;
    let shocks: Vec<String> = p.stress_scenarios.iter().map(|s| shock_label(*s)).collect();
    vec![
        KeyValue::new("defaults.loan_rate_pct", d.loan_rate_pct.to_string()),
        KeyValue::new("defaults.ltv_pct", d.ltv_pct.to_string()),
        KeyValue::new("defaults.dividend_yield_pct", d.dividend_yield_pct.to_string()),
        KeyValue::new("defaults.growth_pct", d.growth_pct.to_string()),
        KeyValue::new("defaults.reinvest_symbol", d.reinvest_symbol.clone()),
        KeyValue::new("policy.lot_size", p.lot_size.to_string()),
        KeyValue::new("policy.margin_call_threshold", format_ratio(p.margin_call_threshold)),
        KeyValue::new("policy.stress_scenarios", shocks.join(" ")),
        KeyValue::new("policy.exchange_suffix", p.exchange_suffix.clone()),
        KeyValue::new(
            "policy.reinvestment_fallback_price",
            p.reinvestment_fallback_price.to_string(),
        ),
        KeyValue::new("cache.ttl_secs", config.cache.ttl_secs.to_string()),
    ]
}

/// Show effective configuration.
fn execute_show(ctx: &Context) -> Result<()> {
    let config = ctx.load_config()?;

    match ctx.format {
        OutputFormat::Table => {
            print_header("Current Configuration");
            print_table(&config_pairs(&config))?;
        }
        OutputFormat::Json => print_json(&config)?,
        OutputFormat::Csv => print_csv(&config_pairs(&config))?,
        OutputFormat::Minimal => print_pairs(&config_pairs(&config)),
    }

    Ok(())
}

/// Show configuration file path.
fn execute_path(ctx: &Context) -> Result<()> {
    let path = ctx.config_file()?;
    if ctx.format == OutputFormat::Minimal {
        println!("{}", path.display());
        return Ok(());
    }
    print_info(&format!("Config file: {}", path.display()));
    if path.exists() {
        print_info("Status: exists");
    } else {
        print_info("Status: not created yet (using defaults)");
    }
    Ok(())
}

/// Write the default configuration.
fn execute_init(args: InitArgs, ctx: &Context) -> Result<()> {
    let path = ctx.config_file()?;
    if path.exists() && !args.force {
        print_warning(&format!(
            "{} already exists; use --force to overwrite",
            path.display()
        ));
        return Ok(());
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, AppConfig::default().to_toml()?)?;
    tracing::debug!(path = %path.display(), "wrote default config");

    if !ctx.quiet {
        print_success(&format!("Wrote {}", path.display()));
    }
    Ok(())
}
