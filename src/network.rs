//! Network URL constants for the market data provider.

/// Default REST API base URL (CoinGecko public API).
pub const DEFAULT_API_URL: &str = "https://api.coingecko.com/api/v3";

/// Header carrying an optional CoinGecko demo API key.
pub const API_KEY_HEADER: &str = "x-cg-demo-api-key";

/// Quote currency requested from every endpoint.
pub const VS_CURRENCY: &str = "usd";
