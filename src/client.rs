//! High-level client — `CoinboardClient` with nested sub-client accessors.
//!
//! Each domain has its own sub-client in `domain/<name>/client.rs`.
//! This module keeps the builder, shared cache state, and accessor methods.

use crate::cache::{Clock, FreshnessCache};
use crate::defaults::FRESHNESS_WINDOW;
use crate::domain::history::client::Histories;
use crate::domain::history::PriceHistory;
use crate::domain::quote::client::Quotes;
use crate::domain::quote::SnapshotSet;
use crate::error::SdkError;
use crate::http::retry::RetryPolicy;
use crate::loader::{HistoryLoadMode, Throttle};
use crate::shared::{tracked_coins, CoinId, HistoryWindow};
use crate::source::MarketDataSource;

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

// Re-export sub-client types for convenience.
pub use crate::domain::history::client::Histories as HistoriesClient;
pub use crate::domain::quote::client::Quotes as QuotesClient;

/// The primary entry point.
///
/// Owns the data source and the session's caches:
/// `client.quotes()`, `client.histories()`.
pub struct CoinboardClient {
    pub(crate) source: Arc<dyn MarketDataSource>,
    /// Tracked coins, in display order.
    pub(crate) coins: Vec<CoinId>,
    /// Bulk quotes, keyed by the coin list they were requested for.
    pub(crate) quote_cache: FreshnessCache<Vec<CoinId>, SnapshotSet>,
    /// Per-coin history, keyed by coin + window.
    pub(crate) history_cache: FreshnessCache<(CoinId, HistoryWindow), PriceHistory>,
    pub(crate) history_window: HistoryWindow,
    pub(crate) throttle: Throttle,
    pub(crate) load_mode: HistoryLoadMode,
}

impl CoinboardClient {
    pub fn builder() -> CoinboardClientBuilder {
        CoinboardClientBuilder::default()
    }

    // ── Sub-client accessors ─────────────────────────────────────────────

    pub fn quotes(&self) -> Quotes<'_> {
        Quotes { client: self }
    }

    pub fn histories(&self) -> Histories<'_> {
        Histories { client: self }
    }

    // ── Settings ─────────────────────────────────────────────────────────

    pub fn coins(&self) -> &[CoinId] {
        &self.coins
    }

    pub fn history_window(&self) -> HistoryWindow {
        self.history_window
    }

    pub fn throttle(&self) -> Throttle {
        self.throttle
    }

    pub fn load_mode(&self) -> HistoryLoadMode {
        self.load_mode
    }

    /// Clear all caches.
    pub async fn clear_all_caches(&self) {
        self.quote_cache.clear().await;
        self.history_cache.clear().await;
    }
}

impl Clone for CoinboardClient {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
            coins: self.coins.clone(),
            quote_cache: self.quote_cache.clone(),
            history_cache: self.history_cache.clone(),
            history_window: self.history_window,
            throttle: self.throttle,
            load_mode: self.load_mode,
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════════
// Builder
// ═════════════════════════════════════════════════════════════════════════════

pub struct CoinboardClientBuilder {
    base_url: String,
    api_key: Option<String>,
    retry: RetryPolicy,
    source: Option<Arc<dyn MarketDataSource>>,
    coins: Vec<CoinId>,
    freshness_window: Duration,
    history_window: HistoryWindow,
    throttle: Throttle,
    load_mode: HistoryLoadMode,
    clock: Option<Clock>,
}

impl Default for CoinboardClientBuilder {
    fn default() -> Self {
        Self {
            base_url: crate::network::DEFAULT_API_URL.to_string(),
            api_key: None,
            retry: RetryPolicy::Idempotent,
            source: None,
            coins: tracked_coins(),
            freshness_window: FRESHNESS_WINDOW,
            history_window: HistoryWindow::default(),
            throttle: Throttle::default(),
            load_mode: HistoryLoadMode::default(),
            clock: None,
        }
    }
}

impl CoinboardClientBuilder {
    pub fn base_url(mut self, url: &str) -> Self {
        self.base_url = url.to_string();
        self
    }

    /// CoinGecko demo API key, sent with every request.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Use a custom data source instead of the HTTP client.
    pub fn source(mut self, source: Arc<dyn MarketDataSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Tracked coins, in display order. Duplicates are dropped.
    pub fn coins<I, C>(mut self, coins: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<CoinId>,
    {
        let mut seen = HashSet::new();
        self.coins = coins
            .into_iter()
            .map(Into::into)
            .filter(|id: &CoinId| seen.insert(id.clone()))
            .collect();
        self
    }

    pub fn freshness_window(mut self, window: Duration) -> Self {
        self.freshness_window = window;
        self
    }

    pub fn history_window(mut self, window: HistoryWindow) -> Self {
        self.history_window = window;
        self
    }

    pub fn throttle(mut self, throttle: Throttle) -> Self {
        self.throttle = throttle;
        self
    }

    pub fn load_mode(mut self, mode: HistoryLoadMode) -> Self {
        self.load_mode = mode;
        self
    }

    /// Time source for cache freshness.
    pub fn clock(mut self, clock: Clock) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn build(self) -> Result<CoinboardClient, SdkError> {
        if self.coins.is_empty() {
            return Err(SdkError::Validation(
                "At least one coin must be tracked".to_string(),
            ));
        }
        if self.history_window.days == 0 {
            return Err(SdkError::Validation(
                "History window must span at least one day".to_string(),
            ));
        }

        let source = match self.source {
            Some(source) => source,
            None => http_source(&self.base_url, self.api_key, self.retry)?,
        };

        let mut quote_cache = FreshnessCache::new(self.freshness_window);
        let mut history_cache = FreshnessCache::new(self.freshness_window);
        if let Some(clock) = self.clock {
            quote_cache = quote_cache.with_clock(clock.clone());
            history_cache = history_cache.with_clock(clock);
        }

        Ok(CoinboardClient {
            source,
            coins: self.coins,
            quote_cache,
            history_cache,
            history_window: self.history_window,
            throttle: self.throttle,
            load_mode: self.load_mode,
        })
    }
}

#[cfg(feature = "http")]
fn http_source(
    base_url: &str,
    api_key: Option<String>,
    retry: RetryPolicy,
) -> Result<Arc<dyn MarketDataSource>, SdkError> {
    let http = crate::http::CoinGeckoHttp::new(base_url)?
        .with_api_key(api_key)
        .with_retry(retry);
    Ok(Arc::new(http))
}

#[cfg(not(feature = "http"))]
fn http_source(
    _base_url: &str,
    _api_key: Option<String>,
    _retry: RetryPolicy,
) -> Result<Arc<dyn MarketDataSource>, SdkError> {
    Err(SdkError::Validation(
        "No market data source: enable the `http` feature or call `source()`".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let client = CoinboardClient::builder().build().unwrap();
        assert_eq!(client.coins().len(), crate::defaults::TRACKED_COINS.len());
        assert_eq!(client.history_window().days, 7);
        assert_eq!(client.throttle(), Throttle::default());
        assert_eq!(client.load_mode(), HistoryLoadMode::Progressive);
    }

    #[test]
    fn test_builder_dedups_coins() {
        let client = CoinboardClient::builder()
            .coins(["bitcoin", "ethereum", "bitcoin"])
            .build()
            .unwrap();
        let ids: Vec<_> = client.coins().iter().map(CoinId::as_str).collect();
        assert_eq!(ids, ["bitcoin", "ethereum"]);
    }

    #[test]
    fn test_builder_rejects_empty_coin_list() {
        let result = CoinboardClient::builder()
            .coins(Vec::<CoinId>::new())
            .build();
        assert!(matches!(result, Err(SdkError::Validation(_))));
    }
}
