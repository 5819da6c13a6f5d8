//! The seam between the dashboard logic and the network.
//!
//! Fetchers, the cache and the progressive loader talk to a
//! `MarketDataSource`; `CoinGeckoHttp` is the production implementation.

use crate::domain::history::wire::MarketChartResponse;
use crate::domain::quote::wire::SimplePriceResponse;
use crate::error::SdkError;
use crate::runtime::{MaybeSend, MaybeSync};
use crate::shared::{CoinId, HistoryWindow};

use async_trait::async_trait;

/// Raw market data provider.
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
pub trait MarketDataSource: MaybeSend + MaybeSync {
    /// Bulk quotes for `ids`.
    async fn simple_price(&self, ids: &[CoinId]) -> Result<SimplePriceResponse, SdkError>;

    /// Chart series for one coin.
    async fn market_chart(
        &self,
        coin: &CoinId,
        window: HistoryWindow,
    ) -> Result<MarketChartResponse, SdkError>;
}

#[cfg(feature = "http")]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl MarketDataSource for crate::http::CoinGeckoHttp {
    async fn simple_price(&self, ids: &[CoinId]) -> Result<SimplePriceResponse, SdkError> {
        tracing::info!(coins = ids.len(), "Fetching simple prices");
        Ok(self.get_simple_price(ids).await?)
    }

    async fn market_chart(
        &self,
        coin: &CoinId,
        window: HistoryWindow,
    ) -> Result<MarketChartResponse, SdkError> {
        tracing::info!(coin = %coin, days = window.days, "Fetching market chart");
        Ok(self.get_market_chart(coin, window).await?)
    }
}
