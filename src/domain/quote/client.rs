//! Quotes sub-client — the bulk snapshot fetcher behind the freshness cache.

use super::SnapshotSet;
use crate::cache::Cached;
use crate::client::CoinboardClient;
use crate::error::SdkError;
use crate::shared::CoinId;
use crate::source::MarketDataSource;

/// Fetch the bulk snapshot, surfacing failures.
pub async fn try_fetch_snapshot(
    source: &dyn MarketDataSource,
    ids: &[CoinId],
) -> Result<SnapshotSet, SdkError> {
    let resp = source.simple_price(ids).await?;
    Ok(SnapshotSet::from_response(ids, resp))
}

/// Fetch the bulk snapshot, substituting zero quotes on any failure.
pub async fn fetch_snapshot(source: &dyn MarketDataSource, ids: &[CoinId]) -> SnapshotSet {
    match try_fetch_snapshot(source, ids).await {
        Ok(set) => set,
        Err(e) => fallback(ids, &e),
    }
}

fn fallback(ids: &[CoinId], err: &SdkError) -> SnapshotSet {
    tracing::warn!(error = %err, "Using fallback quotes due to API error");
    SnapshotSet::fallback(ids)
}

/// Sub-client for the tracked coins' current quotes.
pub struct Quotes<'a> {
    pub(crate) client: &'a CoinboardClient,
}

impl<'a> Quotes<'a> {
    /// Current quotes. Served from cache while fresh; a stale entry is
    /// returned as-is and refreshed in the background.
    pub async fn get(&self) -> SnapshotSet {
        let source = self.client.source.clone();
        let ids = self.client.coins.clone();
        let result = self
            .client
            .quote_cache
            .get_or_fetch(ids.clone(), move || async move {
                try_fetch_snapshot(source.as_ref(), &ids).await
            })
            .await;

        result.unwrap_or_else(|e| fallback(&self.client.coins, &e))
    }

    /// Always hit the network. Cached histories are left alone.
    pub async fn refresh(&self) -> SnapshotSet {
        tracing::info!("Refreshing quotes, bypassing cache");
        let source = self.client.source.clone();
        let ids = self.client.coins.clone();
        let result = self
            .client
            .quote_cache
            .refresh(ids.clone(), || async move {
                try_fetch_snapshot(source.as_ref(), &ids).await
            })
            .await;

        result.unwrap_or_else(|e| fallback(&self.client.coins, &e))
    }

    /// The cached snapshot, if any, without fetching.
    pub async fn cached(&self) -> Option<Cached<SnapshotSet>> {
        self.client.quote_cache.peek(&self.client.coins).await
    }

    pub async fn clear_cache(&self) {
        self.client.quote_cache.clear().await;
    }
}
