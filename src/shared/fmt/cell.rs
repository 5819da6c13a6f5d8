//! Cell formatters for the market table columns.

use super::num;

/// Direction of a 24h move, used to colour change cells and sparklines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Up,
    Down,
}

impl Trend {
    /// Zero counts as up.
    pub fn from_change(change: f64) -> Self {
        if change >= 0.0 {
            Trend::Up
        } else {
            Trend::Down
        }
    }
}

/// `$64,829`, `$145.2`, `$0.012`.
pub fn format_price(price: f64) -> String {
    format!("${}", num::display(price))
}

/// Market cap and volume column: `$1273.95B`.
pub fn format_billions(value: f64) -> String {
    format!("${:.2}B", value / 1e9)
}

/// 24h change column: `+2.14%`, `-0.47%`.
pub fn format_change(change: f64) -> String {
    match Trend::from_change(change) {
        Trend::Up => format!("+{:.2}%", change.abs()),
        Trend::Down => format!("{:.2}%", change),
    }
}
