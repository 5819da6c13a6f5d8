//! Number formatting utilities for human-readable display.
//!
//! Handles f64 values with a fixed fraction-digit cap and comma separators.

/// Strips trailing fractional zeros (and a dangling `.`).
pub fn trim_trailing_zeros(formatted: &str) -> &str {
    if formatted.contains('.') {
        formatted.trim_end_matches('0').trim_end_matches('.')
    } else {
        formatted
    }
}

/// Inserts `,` between groups of three integer digits.
pub fn group_thousands(formatted: &str) -> String {
    let (sign, body) = match formatted.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", formatted),
    };
    let (integer, fraction) = match body.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (body, None),
    };

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, ch) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match fraction {
        Some(f) => format!("{}{}.{}", sign, grouped, f),
        None => format!("{}{}", sign, grouped),
    }
}

/// Fraction digits shown by `display`, matching en-US locale output.
pub const MAX_FRACTION_DIGITS: usize = 3;

/// Format an f64 for display: at most three fraction digits, trailing zeros
/// dropped, thousands grouped.
pub fn display(amount: f64) -> String {
    display_with_decimals(amount, MAX_FRACTION_DIGITS)
}

/// Format an f64 for display with explicit decimal places.
pub fn display_with_decimals(amount: f64, decimals: usize) -> String {
    let formatted = format!("{:.1$}", amount, decimals);
    let out = group_thousands(trim_trailing_zeros(&formatted));
    if out == "-0" {
        "0".to_string()
    } else {
        out
    }
}
