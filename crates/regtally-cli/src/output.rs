//! Output formatting shared by every subcommand.

use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;

use regtally_engine::TitleLogEntry;

/// How results are printed.
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Aligned plain-text tables.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

/// Print `value` as pretty JSON on stdout.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Whole words with thousands separators.
pub fn format_words(count: f64) -> String {
    let whole = count.trunc().max(0.0) as u64;
    let digits = whole.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Print the per-title log, one line per title.
pub fn print_title_log(log: &[TitleLogEntry]) {
    if log.is_empty() {
        return;
    }
    println!();
    println!("Title log:");
    for entry in log {
        let date = entry
            .date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  Title {:<3} {:<10}  {}",
            entry.number.get(),
            date,
            entry.status
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn words_are_grouped_by_thousands() {
        assert_eq!(format_words(0.0), "0");
        assert_eq!(format_words(999.9), "999");
        assert_eq!(format_words(1000.0), "1,000");
        assert_eq!(format_words(1234567.4), "1,234,567");
    }
}
