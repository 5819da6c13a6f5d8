//! Table domain — the dashboard's rows and the operations a grid needs:
//! keyed patches, sorting and filtering.

pub mod chart;
pub mod handle;
pub mod sparkline;
pub mod state;

use crate::domain::history::PriceHistory;
use crate::domain::quote::{Quote, SnapshotSet};
use crate::shared::fmt::{self, Trend};
use crate::shared::CoinId;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

pub use chart::{ChartCell, ChartCells, ChartControl};
pub use handle::{PatchOutcome, RowPatcher, SharedTable, TableHandle};
pub use sparkline::Sparkline;

/// One table row: a coin's quote plus its (possibly unloaded) history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub id: CoinId,
    pub price: f64,
    pub market_cap: f64,
    pub volume_24h: f64,
    pub change_24h: f64,
    pub history: PriceHistory,
}

impl MarketSnapshot {
    pub fn from_quote(id: CoinId, quote: &Quote) -> Self {
        Self {
            id,
            price: quote.price,
            market_cap: quote.market_cap,
            volume_24h: quote.volume_24h,
            change_24h: quote.change_24h,
            history: PriceHistory::empty(),
        }
    }

    pub fn trend(&self) -> Trend {
        Trend::from_change(self.change_24h)
    }

    pub fn price_cell(&self) -> String {
        fmt::format_price(self.price)
    }

    pub fn market_cap_cell(&self) -> String {
        fmt::format_billions(self.market_cap)
    }

    pub fn volume_cell(&self) -> String {
        fmt::format_billions(self.volume_24h)
    }

    pub fn change_cell(&self) -> String {
        fmt::format_change(self.change_24h)
    }

    /// Sparkline bars, once history has arrived.
    pub fn sparkline(&self) -> Option<Sparkline> {
        Sparkline::from_history(&self.history, self.change_24h)
    }

    /// Apply a partial update. Fields left `None` are untouched.
    pub fn apply(&mut self, patch: RowPatch) {
        if let Some(quote) = patch.quote {
            self.price = quote.price;
            self.market_cap = quote.market_cap;
            self.volume_24h = quote.volume_24h;
            self.change_24h = quote.change_24h;
        }
        if let Some(history) = patch.history {
            self.history = history;
        }
    }
}

/// Partial row update addressed by key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowPatch {
    pub quote: Option<Quote>,
    pub history: Option<PriceHistory>,
}

impl RowPatch {
    pub fn history(history: PriceHistory) -> Self {
        Self {
            history: Some(history),
            ..Default::default()
        }
    }

    pub fn quote(quote: Quote) -> Self {
        Self {
            quote: Some(quote),
            ..Default::default()
        }
    }
}

/// Sortable columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Column {
    Coin,
    Price,
    MarketCap,
    Volume24h,
    Change24h,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

/// Filter + sort settings for a table view.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableQuery {
    /// Case-insensitive substring match on the coin id.
    pub filter: Option<String>,
    pub sort: Option<(Column, SortDirection)>,
}

/// Rows in load order with O(1) lookup by coin id.
#[derive(Debug, Clone, Default)]
pub struct MarketTable {
    rows: Vec<MarketSnapshot>,
    index: HashMap<CoinId, usize>,
}

impl MarketTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Initial rows for a snapshot, histories empty.
    pub fn from_snapshot(set: &SnapshotSet) -> Self {
        Self::from_rows(state::rows_from_snapshot(set))
    }

    pub fn from_rows(rows: Vec<MarketSnapshot>) -> Self {
        let mut table = Self::new();
        for row in rows {
            if table.index.contains_key(&row.id) {
                tracing::warn!(coin = %row.id, "Duplicate row id ignored");
                continue;
            }
            table.index.insert(row.id.clone(), table.rows.len());
            table.rows.push(row);
        }
        table
    }

    /// Swap in a new snapshot wholesale. Histories already loaded for
    /// coins that are still present are carried over.
    pub fn replace(&mut self, set: &SnapshotSet) {
        let rows = state::carry_histories(state::rows_from_snapshot(set), &self.rows);
        *self = Self::from_rows(rows);
    }

    /// Patch one row by key. Returns `false` when no such row exists.
    pub fn patch_row(&mut self, key: &CoinId, patch: RowPatch) -> bool {
        match self.index.get(key) {
            Some(&i) => {
                self.rows[i].apply(patch);
                true
            }
            None => false,
        }
    }

    pub fn row(&self, key: &CoinId) -> Option<&MarketSnapshot> {
        self.index.get(key).map(|&i| &self.rows[i])
    }

    pub fn rows(&self) -> &[MarketSnapshot] {
        &self.rows
    }

    pub fn ids(&self) -> Vec<CoinId> {
        self.rows.iter().map(|r| r.id.clone()).collect()
    }

    /// Rows whose history has arrived.
    pub fn loaded_count(&self) -> usize {
        self.rows.iter().filter(|r| r.history.is_loaded()).count()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows as a grid would display them.
    pub fn view(&self, query: &TableQuery) -> Vec<&MarketSnapshot> {
        let needle = query.filter.as_deref().map(str::to_lowercase);
        let mut rows: Vec<&MarketSnapshot> = self
            .rows
            .iter()
            .filter(|r| match &needle {
                Some(n) => r.id.as_str().to_lowercase().contains(n.as_str()),
                None => true,
            })
            .collect();

        if let Some((column, direction)) = query.sort {
            rows.sort_by(|a, b| {
                let ord = compare(a, b, column);
                match direction {
                    SortDirection::Ascending => ord,
                    SortDirection::Descending => ord.reverse(),
                }
            });
        }
        rows
    }
}

fn compare(a: &MarketSnapshot, b: &MarketSnapshot, column: Column) -> Ordering {
    match column {
        Column::Coin => a.id.cmp(&b.id),
        Column::Price => a.price.total_cmp(&b.price),
        Column::MarketCap => a.market_cap.total_cmp(&b.market_cap),
        Column::Volume24h => a.volume_24h.total_cmp(&b.volume_24h),
        Column::Change24h => a.change_24h.total_cmp(&b.change_24h),
    }
}
