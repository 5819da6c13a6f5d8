//! HTTP client layer — `CoinGeckoHttp` with a shared retry policy.

#[cfg(feature = "http")]
pub mod client;
pub mod retry;

#[cfg(feature = "http")]
pub use client::CoinGeckoHttp;
pub use retry::{RetryConfig, RetryPolicy};
