//! History domain — 7-day price series behind the sparklines.

pub mod client;
mod convert;
pub mod wire;

use serde::{Deserialize, Serialize};

/// Chronological price samples for one coin. Empty means not loaded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriceHistory(Vec<f64>);

impl PriceHistory {
    pub fn new(samples: Vec<f64>) -> Self {
        Self(samples)
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_loaded(&self) -> bool {
        !self.0.is_empty()
    }

    pub fn samples(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn first(&self) -> Option<f64> {
        self.0.first().copied()
    }

    pub fn last(&self) -> Option<f64> {
        self.0.last().copied()
    }

    /// Lowest and highest sample.
    pub fn range(&self) -> Option<(f64, f64)> {
        let mut iter = self.0.iter().copied();
        let first = iter.next()?;
        Some(iter.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
    }
}

impl From<Vec<f64>> for PriceHistory {
    fn from(samples: Vec<f64>) -> Self {
        Self(samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_not_loaded() {
        assert!(!PriceHistory::empty().is_loaded());
        assert!(PriceHistory::from(vec![1.0]).is_loaded());
    }

    #[test]
    fn test_range() {
        let h = PriceHistory::from(vec![3180.0, 3250.0, 3200.0]);
        assert_eq!(h.range(), Some((3180.0, 3250.0)));
        assert_eq!(PriceHistory::empty().range(), None);
    }

    #[test]
    fn test_serializes_as_plain_array() {
        let h = PriceHistory::from(vec![1.0, 2.5]);
        assert_eq!(serde_json::to_string(&h).unwrap(), "[1.0,2.5]");
    }
}
