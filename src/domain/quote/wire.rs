//! Wire types for the bulk simple-price endpoint.

use crate::shared::serde_util::{null_as_epoch, null_as_zero};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One coin's entry in a `/simple/price` response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimplePrice {
    #[serde(default, deserialize_with = "null_as_zero::deserialize")]
    pub usd: f64,
    #[serde(default, deserialize_with = "null_as_zero::deserialize")]
    pub usd_market_cap: f64,
    #[serde(default, deserialize_with = "null_as_zero::deserialize")]
    pub usd_24h_vol: f64,
    #[serde(default, deserialize_with = "null_as_zero::deserialize")]
    pub usd_24h_change: f64,
    #[serde(default, deserialize_with = "null_as_epoch::deserialize")]
    pub last_updated_at: u64,
}

/// `/simple/price` response body, keyed by coin id.
pub type SimplePriceResponse = HashMap<String, SimplePrice>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_simple_price_response() {
        let json = r#"{
            "bitcoin": {
                "usd": 64829,
                "usd_market_cap": 1273948573920,
                "usd_24h_vol": 32498374512,
                "usd_24h_change": 2.14,
                "last_updated_at": 1718000000
            },
            "new-coin": {"usd": 0.5, "usd_24h_change": null}
        }"#;
        let resp: SimplePriceResponse = serde_json::from_str(json).unwrap();
        let btc = &resp["bitcoin"];
        assert_eq!(btc.usd, 64829.0);
        assert_eq!(btc.usd_24h_change, 2.14);
        assert_eq!(btc.last_updated_at, 1_718_000_000);

        let fresh = &resp["new-coin"];
        assert_eq!(fresh.usd, 0.5);
        assert_eq!(fresh.usd_24h_change, 0.0);
        assert_eq!(fresh.usd_market_cap, 0.0);
    }
}
