//! Output formatting utilities.

use colored::Colorize;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

/// Prints data as a formatted table.
pub fn print_table<T: Tabled>(data: &[T]) -> anyhow::Result<()> {
    if data.is_empty() {
        println!("No results.");
        return Ok(());
    }

    let table = Table::new(data)
        .with(Style::rounded())
        .with(Modify::new(Columns::first()).with(Alignment::left()))
        .to_string();

    println!("{}", table);
    Ok(())
}

/// Prints any serializable value as pretty JSON.
pub fn print_json<T: Serialize + ?Sized>(data: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(data)?);
    Ok(())
}

/// Prints rows as CSV with a header line.
pub fn print_csv<T: Serialize>(data: &[T]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(std::io::stdout());
    for item in data {
        wtr.serialize(item)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Prints key-value pairs as `key=value` lines.
pub fn print_pairs(pairs: &[KeyValue]) {
    for kv in pairs {
        println!("{}={}", kv.key, kv.value);
    }
}

/// Formats a currency amount rounded to whole units with thousands separators.
pub fn format_money(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let digits = rounded.abs().trunc().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// Formats a percent value (already scaled to 100) with two decimals.
pub fn format_ratio(value: Decimal) -> String {
    format!("{:.2}%", value)
}

/// Formats a fraction as a percentage string.
pub fn format_percent(value: Decimal) -> String {
    format!("{:.2}%", value * Decimal::ONE_HUNDRED)
}

/// Prints a success message.
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

/// Prints a warning message.
pub fn print_warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow(), message);
}

/// Prints an info message.
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue(), message);
}

/// A key-value pair for display.
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct KeyValue {
    #[tabled(rename = "Metric")]
    pub key: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

impl KeyValue {
    /// Creates a new key-value pair.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Creates a key-value pair from a currency amount.
    pub fn from_money(key: impl Into<String>, value: Decimal) -> Self {
        Self::new(key, format_money(value))
    }

    /// Creates a key-value pair formatted as percentage of a fraction.
    pub fn from_percent(key: impl Into<String>, value: Decimal) -> Self {
        Self::new(key, format_percent(value))
    }
}

/// Prints a header for a section.
pub fn print_header(title: &str) {
    println!("\n{}", title.bold().underline());
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(dec!(1_500_000)), "1,500,000");
        assert_eq!(format_money(dec!(70_650.4)), "70,650");
        assert_eq!(format_money(dec!(999.5)), "1,000");
        assert_eq!(format_money(dec!(-19_350)), "-19,350");
        assert_eq!(format_money(Decimal::ZERO), "0");
        assert_eq!(format_money(dec!(-0.2)), "0");
    }

    #[test]
    fn test_format_ratio() {
        assert_eq!(format_ratio(dec!(200)), "200.00%");
        assert_eq!(format_percent(dec!(0.0258)), "2.58%");
    }
}
