//! Quote domain — current market metrics for the tracked coins.

pub mod client;
mod convert;
pub mod wire;

use crate::shared::CoinId;
use serde::{Deserialize, Serialize};

/// Current market metrics for one coin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// Spot price in USD.
    pub price: f64,
    pub market_cap: f64,
    pub volume_24h: f64,
    /// 24h change in percent.
    pub change_24h: f64,
    /// Unix seconds; 0 when unknown.
    pub last_updated: u64,
}

impl Quote {
    /// All-zero placeholder used when live data is unavailable.
    pub fn zero() -> Self {
        Self::default()
    }
}

/// Where a snapshot set came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataOrigin {
    Live,
    Fallback,
}

/// Quotes for every tracked coin, in tracked order, one entry per id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotSet {
    entries: Vec<(CoinId, Quote)>,
    origin: DataOrigin,
}

impl SnapshotSet {
    /// Zero quote for every id.
    pub fn fallback(ids: &[CoinId]) -> Self {
        Self {
            entries: dedup(ids).into_iter().map(|id| (id, Quote::zero())).collect(),
            origin: DataOrigin::Fallback,
        }
    }

    pub fn origin(&self) -> DataOrigin {
        self.origin
    }

    pub fn is_fallback(&self) -> bool {
        self.origin == DataOrigin::Fallback
    }

    /// True when any coin reports a zero price (placeholder or delisted).
    pub fn has_zero_prices(&self) -> bool {
        self.entries.iter().any(|(_, q)| q.price == 0.0)
    }

    pub fn get(&self, id: &CoinId) -> Option<&Quote> {
        self.entries.iter().find(|(k, _)| k == id).map(|(_, q)| q)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CoinId, &Quote)> {
        self.entries.iter().map(|(id, q)| (id, q))
    }

    pub fn ids(&self) -> Vec<CoinId> {
        self.entries.iter().map(|(id, _)| id.clone()).collect()
    }

    /// Most recent provider timestamp across all quotes (unix seconds).
    pub fn last_updated(&self) -> u64 {
        self.entries
            .iter()
            .map(|(_, q)| q.last_updated)
            .max()
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn dedup(ids: &[CoinId]) -> Vec<CoinId> {
    let mut seen = std::collections::HashSet::new();
    ids.iter().filter(|id| seen.insert(*id)).cloned().collect()
}
