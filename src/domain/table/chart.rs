//! On-demand chart cells: per-row load control state.

use super::MarketTable;
use crate::shared::CoinId;
use std::collections::HashMap;

/// Lifecycle of one row's chart control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartCell {
    /// Nothing in flight. `retry` is set after a failed attempt.
    Idle { retry: bool },
    Loading,
    Loaded,
}

impl Default for ChartCell {
    fn default() -> Self {
        ChartCell::Idle { retry: false }
    }
}

/// What the cell should render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartControl {
    LoadButton,
    RetryButton,
    Spinner,
    Sparkline,
}

impl ChartCell {
    /// Move to `Loading` if the control is actionable.
    ///
    /// Returns `false` (and changes nothing) while loading or once loaded.
    pub fn activate(&mut self) -> bool {
        match self {
            ChartCell::Idle { .. } => {
                *self = ChartCell::Loading;
                true
            }
            ChartCell::Loading | ChartCell::Loaded => false,
        }
    }

    pub fn resolve(&mut self, loaded: bool) {
        *self = if loaded {
            ChartCell::Loaded
        } else {
            ChartCell::Idle { retry: true }
        };
    }

    pub fn is_actionable(&self) -> bool {
        matches!(self, ChartCell::Idle { .. })
    }

    pub fn control(&self) -> ChartControl {
        match self {
            ChartCell::Idle { retry: false } => ChartControl::LoadButton,
            ChartCell::Idle { retry: true } => ChartControl::RetryButton,
            ChartCell::Loading => ChartControl::Spinner,
            ChartCell::Loaded => ChartControl::Sparkline,
        }
    }
}

/// Chart cell state for every row of a table.
#[derive(Debug, Clone, Default)]
pub struct ChartCells {
    cells: HashMap<CoinId, ChartCell>,
}

impl ChartCells {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &CoinId) -> ChartCell {
        self.cells.get(id).copied().unwrap_or_default()
    }

    /// Try to start a load for `id`. See [`ChartCell::activate`].
    pub fn begin(&mut self, id: &CoinId) -> bool {
        self.cells.entry(id.clone()).or_default().activate()
    }

    pub fn finish(&mut self, id: &CoinId, loaded: bool) {
        self.cells.entry(id.clone()).or_default().resolve(loaded);
    }

    /// Align with the table after its rows were replaced: rows with history
    /// are `Loaded`, vanished rows are forgotten, in-flight loads are kept.
    pub fn sync(&mut self, table: &MarketTable) {
        self.cells.retain(|id, _| table.row(id).is_some());
        for row in table.rows() {
            let cell = self.cells.entry(row.id.clone()).or_default();
            match (*cell, row.history.is_loaded()) {
                (ChartCell::Loading, _) => {}
                (_, true) => *cell = ChartCell::Loaded,
                (ChartCell::Loaded, false) => *cell = ChartCell::default(),
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::history::PriceHistory;
    use crate::domain::table::{MarketSnapshot, RowPatch};

    #[test]
    fn test_activate_only_from_idle() {
        let mut cell = ChartCell::default();
        assert_eq!(cell.control(), ChartControl::LoadButton);
        assert!(cell.activate());
        assert_eq!(cell.control(), ChartControl::Spinner);
        assert!(!cell.activate());
    }

    #[test]
    fn test_failure_reverts_to_retry() {
        let mut cell = ChartCell::default();
        cell.activate();
        cell.resolve(false);
        assert_eq!(cell, ChartCell::Idle { retry: true });
        assert_eq!(cell.control(), ChartControl::RetryButton);
        assert!(cell.is_actionable());
        assert!(cell.activate());
        cell.resolve(true);
        assert_eq!(cell.control(), ChartControl::Sparkline);
        assert!(!cell.activate());
    }

    #[test]
    fn test_sync_follows_table() {
        let row = |id: &str| MarketSnapshot {
            id: CoinId::from(id),
            price: 1.0,
            market_cap: 0.0,
            volume_24h: 0.0,
            change_24h: 0.0,
            history: PriceHistory::empty(),
        };
        let mut table = MarketTable::from_rows(vec![row("bitcoin"), row("ethereum")]);
        table.patch_row(&CoinId::from("bitcoin"), RowPatch::history(vec![1.0, 2.0].into()));

        let mut cells = ChartCells::new();
        cells.finish(&CoinId::from("cardano"), true);
        assert!(cells.begin(&CoinId::from("ethereum")));
        cells.sync(&table);

        assert_eq!(cells.get(&CoinId::from("bitcoin")), ChartCell::Loaded);
        assert_eq!(cells.get(&CoinId::from("ethereum")), ChartCell::Loading);
        assert_eq!(cells.get(&CoinId::from("cardano")), ChartCell::default());
    }
}
