//! History sub-client — the per-coin chart fetcher behind the freshness cache.

use super::PriceHistory;
use crate::cache::Cached;
use crate::client::CoinboardClient;
use crate::error::SdkError;
use crate::shared::{CoinId, HistoryWindow};
use crate::source::MarketDataSource;

/// Fetch one coin's series, surfacing failures.
///
/// An empty series is reported as an error so that it is never cached.
pub async fn try_fetch_history(
    source: &dyn MarketDataSource,
    coin: &CoinId,
    window: HistoryWindow,
) -> Result<PriceHistory, SdkError> {
    let resp = source.market_chart(coin, window).await?;
    let history = PriceHistory::from(resp);
    if history.is_empty() {
        return Err(SdkError::Validation(format!("Empty price series for {}", coin)));
    }
    Ok(history)
}

/// Fetch one coin's series, substituting an empty history on failure.
pub async fn fetch_history(
    source: &dyn MarketDataSource,
    coin: &CoinId,
    window: HistoryWindow,
) -> PriceHistory {
    match try_fetch_history(source, coin, window).await {
        Ok(history) => history,
        Err(e) => {
            log_failure(coin, &e);
            PriceHistory::empty()
        }
    }
}

pub(crate) fn log_failure(coin: &CoinId, err: &SdkError) {
    if err.is_not_found() {
        tracing::warn!(coin = %coin, "Coin not listed by provider, no chart data");
    } else {
        tracing::warn!(coin = %coin, error = %err, "Failed to fetch chart data");
    }
}

/// Sub-client for per-coin price history.
pub struct Histories<'a> {
    pub(crate) client: &'a CoinboardClient,
}

impl<'a> Histories<'a> {
    /// Cached history, or an empty one if it cannot be fetched.
    pub async fn get(&self, coin: &CoinId) -> PriceHistory {
        match self.try_get(coin).await {
            Ok(history) => history,
            Err(e) => {
                log_failure(coin, &e);
                PriceHistory::empty()
            }
        }
    }

    /// Cached history, propagating fetch errors.
    pub async fn try_get(&self, coin: &CoinId) -> Result<PriceHistory, SdkError> {
        let source = self.client.source.clone();
        let window = self.client.history_window;
        let key = (coin.clone(), window);
        let coin = coin.clone();
        self.client
            .history_cache
            .get_or_fetch(key, move || async move {
                try_fetch_history(source.as_ref(), &coin, window).await
            })
            .await
    }

    /// Bypass freshness for one coin.
    pub async fn refresh(&self, coin: &CoinId) -> Result<PriceHistory, SdkError> {
        let source = self.client.source.clone();
        let window = self.client.history_window;
        self.client
            .history_cache
            .refresh((coin.clone(), window), || async move {
                try_fetch_history(source.as_ref(), coin, window).await
            })
            .await
    }

    /// The cached history for `coin`, if any, without fetching.
    pub async fn cached(&self, coin: &CoinId) -> Option<Cached<PriceHistory>> {
        let key = (coin.clone(), self.client.history_window);
        self.client.history_cache.peek(&key).await
    }

    pub async fn clear_cache(&self) {
        self.client.history_cache.clear().await;
    }
}
