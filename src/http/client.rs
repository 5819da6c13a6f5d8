//! Low-level HTTP client — `CoinGeckoHttp`.
//!
//! One method per provider endpoint. Returns wire types (conversion to domain
//! types happens in the domain sub-clients).

use crate::domain::history::wire::MarketChartResponse;
use crate::domain::quote::wire::SimplePriceResponse;
use crate::error::HttpError;
use crate::http::retry::RetryPolicy;
use crate::network::{API_KEY_HEADER, VS_CURRENCY};
use crate::shared::{join_ids, CoinId, HistoryWindow};

use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Low-level HTTP client for the market data REST API.
#[derive(Clone)]
pub struct CoinGeckoHttp {
    base_url: String,
    client: Client,
    api_key: Option<String>,
    retry: RetryPolicy,
}

impl CoinGeckoHttp {
    pub fn new(base_url: &str) -> Result<Self, HttpError> {
        let mut builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        {
            builder = builder
                .timeout(Duration::from_secs(30))
                .pool_max_idle_per_host(4);
        }

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: builder.build()?,
            api_key: None,
            retry: RetryPolicy::Idempotent,
        })
    }

    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ── Quotes ───────────────────────────────────────────────────────────

    pub fn simple_price_url(&self, ids: &[CoinId]) -> String {
        format!(
            "{}/simple/price?ids={}&vs_currencies={}&include_market_cap=true&include_24hr_vol=true&include_24hr_change=true&include_last_updated_at=true",
            self.base_url,
            urlencoding::encode(&join_ids(ids)),
            VS_CURRENCY
        )
    }

    pub async fn get_simple_price(&self, ids: &[CoinId]) -> Result<SimplePriceResponse, HttpError> {
        let url = self.simple_price_url(ids);
        self.get(&url).await
    }

    // ── Market charts ────────────────────────────────────────────────────

    pub fn market_chart_url(&self, coin: &CoinId, window: HistoryWindow) -> String {
        format!(
            "{}/coins/{}/market_chart?vs_currency={}&days={}&interval={}",
            self.base_url,
            urlencoding::encode(coin.as_str()),
            VS_CURRENCY,
            window.days,
            window.interval.as_str()
        )
    }

    pub async fn get_market_chart(
        &self,
        coin: &CoinId,
        window: HistoryWindow,
    ) -> Result<MarketChartResponse, HttpError> {
        let url = self.market_chart_url(coin, window);
        self.get(&url).await
    }

    // ── Internal HTTP methods ────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T, HttpError> {
        let Some(config) = self.retry.config() else {
            return self.do_get(url).await;
        };

        let mut last_error = None;

        for attempt in 0..=config.max_retries {
            match self.do_get::<T>(url).await {
                Ok(resp) => return Ok(resp),
                Err(e) => {
                    if config.should_retry(&e) && attempt < config.max_retries {
                        let delay = config.delay_after(attempt, &e);
                        tracing::debug!(
                            attempt = attempt + 1,
                            max = config.max_retries,
                            delay_ms = delay.as_millis() as u64,
                            "Retrying request to {}",
                            url
                        );
                        futures_timer::Delay::new(delay).await;
                        last_error = Some(e);
                    } else {
                        return Err(e);
                    }
                }
            }
        }

        Err(HttpError::MaxRetriesExceeded {
            attempts: config.max_retries + 1,
            last_error: last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "unknown".to_string()),
        })
    }

    async fn do_get<T: DeserializeOwned>(&self, url: &str) -> Result<T, HttpError> {
        let mut req = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json");

        if let Some(key) = &self.api_key {
            req = req.header(API_KEY_HEADER, key);
        }

        let resp = req.send().await?;
        let status = resp.status();

        if status.is_success() {
            let parsed = resp.json::<T>().await?;
            return Ok(parsed);
        }

        let retry_after_ms = resp
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map(|secs| secs * 1000);
        let status_code = status.as_u16();
        let body_text = resp.text().await.unwrap_or_default();

        match status_code {
            404 => Err(HttpError::NotFound(body_text)),
            408 => Err(HttpError::Timeout),
            429 => Err(HttpError::RateLimited { retry_after_ms }),
            400..=499 => Err(HttpError::BadRequest(body_text)),
            _ => Err(HttpError::ServerError {
                status: status_code,
                body: body_text,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::Interval;

    fn http() -> CoinGeckoHttp {
        CoinGeckoHttp::new("https://api.example.com/api/v3/").unwrap()
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        assert_eq!(http().base_url(), "https://api.example.com/api/v3");
    }

    #[test]
    fn test_simple_price_url() {
        let ids = vec![CoinId::from("bitcoin"), CoinId::from("bitcoin-cash")];
        assert_eq!(
            http().simple_price_url(&ids),
            "https://api.example.com/api/v3/simple/price?ids=bitcoin%2Cbitcoin-cash&vs_currencies=usd&include_market_cap=true&include_24hr_vol=true&include_24hr_change=true&include_last_updated_at=true"
        );
    }

    #[test]
    fn test_market_chart_url() {
        let window = HistoryWindow {
            days: 7,
            interval: Interval::Daily,
        };
        assert_eq!(
            http().market_chart_url(&CoinId::from("solana"), window),
            "https://api.example.com/api/v3/coins/solana/market_chart?vs_currency=usd&days=7&interval=daily"
        );
    }
}
