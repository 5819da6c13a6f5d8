//! Sparkline model for the 7-day chart column.

use crate::domain::history::PriceHistory;
use crate::shared::fmt::Trend;

/// Bar chart of sample-to-sample moves, coloured by the row's 24h change.
#[derive(Debug, Clone, PartialEq)]
pub struct Sparkline {
    /// One bar per sample. The first bar is always 0.
    pub bars: Vec<f64>,
    pub trend: Trend,
}

impl Sparkline {
    /// `None` until the history has been loaded.
    pub fn from_history(history: &PriceHistory, change_24h: f64) -> Option<Self> {
        if !history.is_loaded() {
            return None;
        }
        let samples = history.samples();
        let bars = std::iter::once(0.0)
            .chain(samples.windows(2).map(|w| w[1] - w[0]))
            .collect();
        Some(Self {
            bars,
            trend: Trend::from_change(change_24h),
        })
    }

    /// Largest absolute bar, for scaling.
    pub fn peak(&self) -> f64 {
        self.bars.iter().fold(0.0, |acc: f64, b| acc.max(b.abs()))
    }
}
