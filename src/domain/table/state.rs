//! Pure row transformations. Each returns a new collection and leaves its
//! input untouched.

use super::MarketSnapshot;
use crate::domain::history::PriceHistory;
use crate::domain::quote::SnapshotSet;
use crate::shared::CoinId;
use std::collections::HashMap;

/// One row per snapshot entry, histories empty.
pub fn rows_from_snapshot(set: &SnapshotSet) -> Vec<MarketSnapshot> {
    set.iter()
        .map(|(id, quote)| MarketSnapshot::from_quote(id.clone(), quote))
        .collect()
}

/// Copy of `rows` with `id`'s history replaced.
pub fn with_history(rows: &[MarketSnapshot], id: &CoinId, history: PriceHistory) -> Vec<MarketSnapshot> {
    rows.iter()
        .map(|row| {
            if &row.id == id {
                MarketSnapshot {
                    history: history.clone(),
                    ..row.clone()
                }
            } else {
                row.clone()
            }
        })
        .collect()
}

/// Give `fresh` rows the loaded histories of matching `previous` rows.
pub fn carry_histories(fresh: Vec<MarketSnapshot>, previous: &[MarketSnapshot]) -> Vec<MarketSnapshot> {
    let loaded: HashMap<&CoinId, &PriceHistory> = previous
        .iter()
        .filter(|r| r.history.is_loaded())
        .map(|r| (&r.id, &r.history))
        .collect();

    fresh
        .into_iter()
        .map(|mut row| {
            if !row.history.is_loaded() {
                if let Some(history) = loaded.get(&row.id) {
                    row.history = (*history).clone();
                }
            }
            row
        })
        .collect()
}
