//! `Dashboard` — one view session over a `CoinboardClient`.
//!
//! Owns the table and chart-cell state for as long as the view is mounted
//! and sequences the loads: quotes first, histories after. Quotes stored by
//! a background revalidation are applied to the mounted table as they land.

use crate::cache::Freshness;
use crate::client::CoinboardClient;
use crate::domain::quote::{DataOrigin, SnapshotSet};
use crate::domain::table::{
    ChartCell, ChartCells, MarketSnapshot, MarketTable, SharedTable, TableHandle, TableQuery,
};
use crate::loader::{fill_histories, load_on_demand, FillReport, HistoryLoadMode, OnDemandOutcome};
use crate::runtime;
use crate::shared::CoinId;

use async_lock::RwLock;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

/// Table, chart cells and data origin for one mounted view.
pub struct Dashboard {
    client: CoinboardClient,
    table: SharedTable,
    cells: Arc<RwLock<ChartCells>>,
    origin: Arc<RwLock<Option<DataOrigin>>>,
    /// Set once the revalidation listener is registered.
    watching: AtomicBool,
}

impl Dashboard {
    pub fn new(client: CoinboardClient) -> Self {
        Self {
            client,
            table: Arc::new(RwLock::new(MarketTable::new())),
            cells: Arc::new(RwLock::new(ChartCells::new())),
            origin: Arc::new(RwLock::new(None)),
            watching: AtomicBool::new(false),
        }
    }

    pub fn client(&self) -> &CoinboardClient {
        &self.client
    }

    /// The owning table reference, for rendering.
    pub fn table(&self) -> SharedTable {
        self.table.clone()
    }

    /// A handle that does not keep the table alive.
    pub fn handle(&self) -> TableHandle {
        TableHandle::new(&self.table)
    }

    // ── Loading ──────────────────────────────────────────────────────────

    /// Load quotes (cached) and populate the table. Histories already
    /// loaded for the same coins are kept.
    pub async fn load(&self) -> SnapshotSet {
        self.watch_revalidation().await;
        let set = self.client.quotes().get().await;
        self.apply_snapshot(&set).await;
        set
    }

    /// Re-fetch quotes regardless of freshness. Histories are untouched.
    pub async fn refresh_main(&self) -> SnapshotSet {
        self.watch_revalidation().await;
        let set = self.client.quotes().refresh().await;
        self.apply_snapshot(&set).await;
        set
    }

    /// `load`, then the progressive fill when the session is configured
    /// for it.
    pub async fn load_all(&self) -> (SnapshotSet, Option<FillReport>) {
        let set = self.load().await;
        let report = match self.client.load_mode() {
            HistoryLoadMode::Progressive => Some(self.fill_histories().await),
            HistoryLoadMode::OnDemand => None,
        };
        (set, report)
    }

    /// Fetch every row's history in table order and patch rows as they
    /// arrive.
    pub async fn fill_histories(&self) -> FillReport {
        let ids = self.table.read().await.ids();
        let histories = self.client.histories();
        let histories = &histories;
        let report = fill_histories(
            &ids,
            self.client.throttle(),
            |id| async move { histories.try_get(&id).await },
            &self.handle(),
        )
        .await;

        let table = self.table.read().await;
        self.cells.write().await.sync(&table);
        report
    }

    /// Load one row's chart on request.
    pub async fn load_chart(&self, id: &CoinId) -> OnDemandOutcome {
        let histories = self.client.histories();
        load_on_demand(id, &self.cells, histories.try_get(id), &self.handle()).await
    }

    async fn apply_snapshot(&self, set: &SnapshotSet) {
        apply_snapshot(&self.table, &self.cells, &self.origin, set).await;
    }

    /// Re-apply quotes whenever a background revalidation stores them, for
    /// as long as this view is mounted.
    async fn watch_revalidation(&self) {
        if self.watching.swap(true, Ordering::SeqCst) {
            return;
        }
        let coins = self.client.coins().to_vec();
        let table = Arc::downgrade(&self.table);
        let cells = Arc::downgrade(&self.cells);
        let origin = Arc::downgrade(&self.origin);

        self.client
            .quote_cache
            .on_revalidate(Arc::new(move |key: &Vec<CoinId>, set: &SnapshotSet| {
                if table.strong_count() == 0 {
                    return false;
                }
                if *key != coins {
                    return true;
                }
                runtime::spawn(apply_revalidated(
                    table.clone(),
                    cells.clone(),
                    origin.clone(),
                    set.clone(),
                ));
                true
            }))
            .await;
    }

    // ── Reading ──────────────────────────────────────────────────────────

    pub async fn rows(&self) -> Vec<MarketSnapshot> {
        self.table.read().await.rows().to_vec()
    }

    pub async fn row(&self, id: &CoinId) -> Option<MarketSnapshot> {
        self.table.read().await.row(id).cloned()
    }

    /// Filtered and sorted rows.
    pub async fn view(&self, query: &TableQuery) -> Vec<MarketSnapshot> {
        self.table
            .read()
            .await
            .view(query)
            .into_iter()
            .cloned()
            .collect()
    }

    pub async fn chart_cell(&self, id: &CoinId) -> ChartCell {
        self.cells.read().await.get(id)
    }

    /// True when the table shows zero-filled placeholder quotes.
    pub async fn is_using_fallback(&self) -> bool {
        *self.origin.read().await == Some(DataOrigin::Fallback)
    }

    /// When the cached quotes were fetched.
    pub async fn data_updated_at(&self) -> Option<DateTime<Utc>> {
        self.client.quotes().cached().await.map(|c| c.fetched_at)
    }

    pub async fn freshness(&self) -> Option<Freshness> {
        self.client.quotes().cached().await.map(|c| c.freshness)
    }
}

async fn apply_snapshot(
    table: &RwLock<MarketTable>,
    cells: &RwLock<ChartCells>,
    origin: &RwLock<Option<DataOrigin>>,
    set: &SnapshotSet,
) {
    if set.is_fallback() {
        tracing::warn!(coins = set.len(), "Showing fallback data");
    } else {
        tracing::debug!(coins = set.len(), "Quotes applied to table");
    }
    let mut table = table.write().await;
    table.replace(set);
    cells.write().await.sync(&table);
    *origin.write().await = Some(set.origin());
}

async fn apply_revalidated(
    table: Weak<RwLock<MarketTable>>,
    cells: Weak<RwLock<ChartCells>>,
    origin: Weak<RwLock<Option<DataOrigin>>>,
    set: SnapshotSet,
) {
    let (Some(table), Some(cells), Some(origin)) =
        (table.upgrade(), cells.upgrade(), origin.upgrade())
    else {
        return;
    };
    tracing::info!(coins = set.len(), "Applying revalidated quotes");
    apply_snapshot(&table, &cells, &origin, &set).await;
}
