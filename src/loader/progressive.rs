//! Progressive fill: populate every row's history after the first render.
//!
//! Rows are walked in table order. Each history is patched in by key as soon
//! as it arrives; a failed row keeps its empty history and the walk goes on.
//! The walk stops early once the table has been dropped.

use super::throttle::Throttle;
use crate::domain::history::client::log_failure;
use crate::domain::history::PriceHistory;
use crate::domain::table::{PatchOutcome, RowPatch, RowPatcher};
use crate::error::SdkError;
use crate::shared::CoinId;

use futures_util::stream::{self, StreamExt};
use futures_util::FutureExt;
use std::future::Future;
use std::panic::AssertUnwindSafe;

/// Summary of one progressive fill.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FillReport {
    /// Rows whose fetch completed (successfully or not).
    pub attempted: usize,
    /// Rows patched with a non-empty history.
    pub loaded: usize,
    /// Rows left empty, in completion order.
    pub failed: Vec<CoinId>,
    /// True when the table went away before the walk finished.
    pub aborted: bool,
}

/// Fetch and patch histories for `ids`, paced by `throttle`.
///
/// `load` is called once per id. Errors, empty results and panics inside a
/// single load are confined to that row.
pub async fn fill_histories<L, Fut, P>(
    ids: &[CoinId],
    throttle: Throttle,
    load: L,
    table: &P,
) -> FillReport
where
    L: Fn(CoinId) -> Fut,
    Fut: Future<Output = Result<PriceHistory, SdkError>>,
    P: RowPatcher + ?Sized,
{
    let mut report = FillReport::default();
    tracing::info!(
        coins = ids.len(),
        max_concurrent = throttle.max_concurrent(),
        delay_ms = throttle.delay().as_millis() as u64,
        "Starting progressive history fill"
    );

    let mut results = stream::iter(ids.iter().cloned().enumerate())
        .map(|(position, id)| {
            let fut = table
                .is_alive()
                .then(|| AssertUnwindSafe(load(id.clone())).catch_unwind());
            async move {
                let Some(fut) = fut else {
                    return (id, None);
                };
                if throttle.must_wait(position) {
                    throttle.pause().await;
                }
                let result = fut.await.unwrap_or_else(|_| {
                    Err(SdkError::Other(format!("History loader panicked for {}", id)))
                });
                (id, Some(result))
            }
        })
        .buffer_unordered(throttle.max_concurrent());

    while let Some((id, result)) = results.next().await {
        let Some(result) = result else {
            report.aborted = true;
            break;
        };
        report.attempted += 1;

        let history = match result {
            Ok(history) if history.is_loaded() => history,
            Ok(_) => {
                tracing::warn!(coin = %id, "Empty chart data");
                report.failed.push(id);
                continue;
            }
            Err(e) => {
                log_failure(&id, &e);
                report.failed.push(id);
                continue;
            }
        };

        match table.patch_row(&id, RowPatch::history(history)).await {
            PatchOutcome::Applied => report.loaded += 1,
            PatchOutcome::UnknownRow => {
                tracing::debug!(coin = %id, "Row no longer present, history dropped");
            }
            PatchOutcome::TableGone => {
                tracing::debug!("Table dropped, stopping progressive fill");
                report.aborted = true;
                break;
            }
        }
    }

    tracing::info!(
        attempted = report.attempted,
        loaded = report.loaded,
        failed = report.failed.len(),
        aborted = report.aborted,
        "Progressive history fill finished"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::table::{MarketSnapshot, MarketTable, TableHandle};
    use crate::error::HttpError;
    use async_lock::RwLock;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    /// Records patches; reports the table gone after `capacity` of them.
    struct Recorder {
        patched: Mutex<Vec<CoinId>>,
        capacity: usize,
    }

    impl Recorder {
        fn new(capacity: usize) -> Self {
            Self {
                patched: Mutex::new(Vec::new()),
                capacity,
            }
        }

        fn patched(&self) -> Vec<CoinId> {
            self.patched.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl RowPatcher for Recorder {
        async fn patch_row(&self, key: &CoinId, _patch: RowPatch) -> PatchOutcome {
            let mut patched = self.patched.lock().unwrap();
            if patched.len() >= self.capacity {
                return PatchOutcome::TableGone;
            }
            patched.push(key.clone());
            PatchOutcome::Applied
        }
    }

    fn ids(names: &[&str]) -> Vec<CoinId> {
        names.iter().map(|n| CoinId::from(*n)).collect()
    }

    fn no_delay() -> Throttle {
        Throttle::sequential(Duration::ZERO)
    }

    #[tokio::test]
    async fn test_sequential_fill_patches_in_table_order() {
        let recorder = Recorder::new(usize::MAX);
        let report = fill_histories(
            &ids(&["bitcoin", "ethereum", "solana"]),
            no_delay(),
            |_| async { Ok(PriceHistory::from(vec![1.0, 2.0])) },
            &recorder,
        )
        .await;

        assert_eq!(report.attempted, 3);
        assert_eq!(report.loaded, 3);
        assert!(report.failed.is_empty());
        assert!(!report.aborted);
        assert_eq!(recorder.patched(), ids(&["bitcoin", "ethereum", "solana"]));
    }

    #[tokio::test]
    async fn test_failures_are_confined_to_their_row() {
        let recorder = Recorder::new(usize::MAX);
        let report = fill_histories(
            &ids(&["bitcoin", "polygon", "ethereum", "near"]),
            no_delay(),
            |id| async move {
                match id.as_str() {
                    "polygon" => Err(SdkError::Http(HttpError::NotFound("polygon".into()))),
                    "near" => Ok(PriceHistory::empty()),
                    _ => Ok(PriceHistory::from(vec![1.0])),
                }
            },
            &recorder,
        )
        .await;

        assert_eq!(report.attempted, 4);
        assert_eq!(report.loaded, 2);
        assert_eq!(report.failed, ids(&["polygon", "near"]));
        assert_eq!(recorder.patched(), ids(&["bitcoin", "ethereum"]));
    }

    #[tokio::test]
    async fn test_panicking_load_is_confined_to_its_row() {
        let recorder = Recorder::new(usize::MAX);
        let report = fill_histories(
            &ids(&["bitcoin", "cosmos", "solana"]),
            no_delay(),
            |id| async move {
                if id.as_str() == "cosmos" {
                    panic!("malformed payload");
                }
                Ok(PriceHistory::from(vec![1.0]))
            },
            &recorder,
        )
        .await;

        assert_eq!(report.loaded, 2);
        assert_eq!(report.failed, ids(&["cosmos"]));
        assert_eq!(recorder.patched(), ids(&["bitcoin", "solana"]));
    }

    #[tokio::test]
    async fn test_stops_once_table_is_gone() {
        let recorder = Recorder::new(1);
        let calls = AtomicUsize::new(0);
        let report = fill_histories(
            &ids(&["bitcoin", "ethereum", "solana"]),
            no_delay(),
            |_| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok(PriceHistory::from(vec![1.0])) }
            },
            &recorder,
        )
        .await;

        assert!(report.aborted);
        assert_eq!(report.loaded, 1);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_dropped_table_fetches_nothing() {
        let table = Arc::new(RwLock::new(MarketTable::new()));
        let handle = TableHandle::new(&table);
        drop(table);

        let calls = AtomicUsize::new(0);
        let report = fill_histories(
            &ids(&["bitcoin"]),
            no_delay(),
            |_| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok(PriceHistory::from(vec![1.0])) }
            },
            &handle,
        )
        .await;

        assert!(report.aborted);
        assert_eq!(report.attempted, 0);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_bounded_fill_patches_real_table() {
        let table = Arc::new(RwLock::new(MarketTable::from_rows(
            ["bitcoin", "ethereum", "solana", "cardano"]
                .iter()
                .map(|id| MarketSnapshot {
                    id: CoinId::from(*id),
                    price: 1.0,
                    market_cap: 0.0,
                    volume_24h: 0.0,
                    change_24h: 0.0,
                    history: PriceHistory::empty(),
                })
                .collect(),
        )));
        let handle = TableHandle::new(&table);
        let in_flight = AtomicUsize::new(0);
        let peak = AtomicUsize::new(0);

        let ids = table.read().await.ids();
        let report = fill_histories(
            &ids,
            Throttle::bounded(2, Duration::from_millis(1)),
            |_| {
                let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                let in_flight = &in_flight;
                async move {
                    tokio::task::yield_now().await;
                    in_flight.fetch_sub(1, Ordering::SeqCst);
                    Ok(PriceHistory::from(vec![1.0, 2.0]))
                }
            },
            &handle,
        )
        .await;

        assert_eq!(report.loaded, 4);
        assert!(peak.load(Ordering::SeqCst) <= 2);
        assert_eq!(table.read().await.loaded_count(), 4);
    }

    #[tokio::test]
    async fn test_sequential_fill_pauses_between_fetches() {
        let delay = Duration::from_millis(40);
        let recorder = Recorder::new(usize::MAX);
        let in_flight = AtomicUsize::new(0);
        let peak = AtomicUsize::new(0);
        let starts = Mutex::new(Vec::new());

        let report = fill_histories(
            &ids(&["bitcoin", "ethereum", "solana"]),
            Throttle::sequential(delay),
            |_| {
                let (in_flight, peak, starts) = (&in_flight, &peak, &starts);
                async move {
                    starts.lock().unwrap().push(std::time::Instant::now());
                    let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(5)).await;
                    in_flight.fetch_sub(1, Ordering::SeqCst);
                    Ok(PriceHistory::from(vec![1.0]))
                }
            },
            &recorder,
        )
        .await;

        assert_eq!(report.loaded, 3);
        assert_eq!(peak.load(Ordering::SeqCst), 1);
        let starts = starts.lock().unwrap();
        assert_eq!(starts.len(), 3);
        for pair in starts.windows(2) {
            assert!(pair[1] - pair[0] >= delay, "gap {:?} < {:?}", pair[1] - pair[0], delay);
        }
    }
}
