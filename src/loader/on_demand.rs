//! On-demand loading: one row's history, fetched when its control is used.

use crate::domain::history::client::log_failure;
use crate::domain::history::PriceHistory;
use crate::domain::table::{ChartCells, PatchOutcome, RowPatch, RowPatcher};
use crate::error::SdkError;
use crate::shared::CoinId;

use async_lock::RwLock;
use std::future::Future;

/// Result of activating a row's chart control.
#[derive(Debug, Clone, PartialEq)]
pub enum OnDemandOutcome {
    Loaded(PriceHistory),
    /// The fetch failed; the control is back in its retry state.
    Failed,
    /// Already loading or loaded; nothing was fetched.
    Busy,
    TableGone,
}

/// Drive `id`'s chart cell through `Loading` and patch the row on success.
///
/// `load` is only awaited if the cell was actionable.
pub async fn load_on_demand<Fut, P>(
    id: &CoinId,
    cells: &RwLock<ChartCells>,
    load: Fut,
    table: &P,
) -> OnDemandOutcome
where
    Fut: Future<Output = Result<PriceHistory, SdkError>>,
    P: RowPatcher + ?Sized,
{
    if !cells.write().await.begin(id) {
        tracing::debug!(coin = %id, "Chart already loading or loaded");
        return OnDemandOutcome::Busy;
    }

    let outcome = match load.await {
        Ok(history) if history.is_loaded() => {
            match table.patch_row(id, RowPatch::history(history.clone())).await {
                PatchOutcome::Applied => OnDemandOutcome::Loaded(history),
                PatchOutcome::UnknownRow => {
                    tracing::warn!(coin = %id, "Chart loaded for a row that no longer exists");
                    OnDemandOutcome::Failed
                }
                PatchOutcome::TableGone => OnDemandOutcome::TableGone,
            }
        }
        Ok(_) => {
            tracing::warn!(coin = %id, "Empty chart data");
            OnDemandOutcome::Failed
        }
        Err(e) => {
            log_failure(id, &e);
            OnDemandOutcome::Failed
        }
    };

    let loaded = matches!(outcome, OnDemandOutcome::Loaded(_));
    cells.write().await.finish(id, loaded);
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::table::{ChartCell, MarketSnapshot, MarketTable, SharedTable, TableHandle};
    use crate::error::HttpError;
    use std::sync::Arc;

    fn setup() -> (SharedTable, TableHandle, RwLock<ChartCells>) {
        let table = Arc::new(RwLock::new(MarketTable::from_rows(vec![MarketSnapshot {
            id: CoinId::from("solana"),
            price: 145.2,
            market_cap: 0.0,
            volume_24h: 0.0,
            change_24h: 5.89,
            history: PriceHistory::empty(),
        }])));
        let handle = TableHandle::new(&table);
        (table, handle, RwLock::new(ChartCells::new()))
    }

    #[tokio::test]
    async fn test_success_patches_row_and_marks_loaded() {
        let (table, handle, cells) = setup();
        let id = CoinId::from("solana");
        let history = PriceHistory::from(vec![138.0, 145.2]);

        let outcome = load_on_demand(&id, &cells, async { Ok(history.clone()) }, &handle).await;

        assert_eq!(outcome, OnDemandOutcome::Loaded(history.clone()));
        assert_eq!(cells.read().await.get(&id), ChartCell::Loaded);
        assert_eq!(table.read().await.row(&id).unwrap().history, history);

        let again = load_on_demand(&id, &cells, async { Ok(PriceHistory::empty()) }, &handle).await;
        assert_eq!(again, OnDemandOutcome::Busy);
    }

    #[tokio::test]
    async fn test_failure_returns_control_to_retry() {
        let (table, handle, cells) = setup();
        let id = CoinId::from("solana");

        let outcome = load_on_demand(
            &id,
            &cells,
            async { Err(SdkError::Http(HttpError::Timeout)) },
            &handle,
        )
        .await;

        assert_eq!(outcome, OnDemandOutcome::Failed);
        assert_eq!(cells.read().await.get(&id), ChartCell::Idle { retry: true });
        assert!(table.read().await.row(&id).unwrap().history.is_empty());
    }

    #[tokio::test]
    async fn test_unmounted_table() {
        let (table, handle, cells) = setup();
        drop(table);
        let id = CoinId::from("solana");
        let outcome = load_on_demand(&id, &cells, async { Ok(PriceHistory::from(vec![1.0])) }, &handle).await;
        assert_eq!(outcome, OnDemandOutcome::TableGone);
    }
}
