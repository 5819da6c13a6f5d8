//! Shared table ownership and the keyed patch interface loaders write through.

use super::{MarketTable, RowPatch};
use crate::runtime::{MaybeSend, MaybeSync};
use crate::shared::CoinId;

use async_lock::RwLock;
use async_trait::async_trait;
use std::sync::{Arc, Weak};

/// The view's table. Dropping the last `SharedTable` is the unmount.
pub type SharedTable = Arc<RwLock<MarketTable>>;

/// Result of a keyed patch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchOutcome {
    Applied,
    /// The table exists but has no row with that key.
    UnknownRow,
    /// The table has been dropped.
    TableGone,
}

/// Anything that accepts incremental row patches keyed by coin id.
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
pub trait RowPatcher: MaybeSend + MaybeSync {
    async fn patch_row(&self, key: &CoinId, patch: RowPatch) -> PatchOutcome;

    /// Whether patches can still land anywhere.
    fn is_alive(&self) -> bool {
        true
    }
}

/// Non-owning handle to a `SharedTable`.
///
/// Long-running loaders hold this instead of the table so they never keep
/// an unmounted view alive.
#[derive(Debug, Clone)]
pub struct TableHandle {
    inner: Weak<RwLock<MarketTable>>,
}

impl TableHandle {
    pub fn new(table: &SharedTable) -> Self {
        Self {
            inner: Arc::downgrade(table),
        }
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl RowPatcher for TableHandle {
    async fn patch_row(&self, key: &CoinId, patch: RowPatch) -> PatchOutcome {
        let Some(table) = self.inner.upgrade() else {
            return PatchOutcome::TableGone;
        };
        let applied = table.write().await.patch_row(key, patch);
        if applied {
            tracing::debug!(coin = %key, "Row patched");
            PatchOutcome::Applied
        } else {
            PatchOutcome::UnknownRow
        }
    }

    fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }
}
