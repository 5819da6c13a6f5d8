//! Wire → domain conversions for quotes.

use super::wire::{SimplePrice, SimplePriceResponse};
use super::{dedup, DataOrigin, Quote, SnapshotSet};
use crate::shared::CoinId;

impl From<SimplePrice> for Quote {
    fn from(w: SimplePrice) -> Self {
        Self {
            price: w.usd,
            market_cap: w.usd_market_cap,
            volume_24h: w.usd_24h_vol,
            change_24h: w.usd_24h_change,
            last_updated: w.last_updated_at,
        }
    }
}

impl SnapshotSet {
    /// Normalize a live response against the tracked id list.
    ///
    /// Ids the provider did not return get a zero quote, ids nobody asked
    /// for are dropped, order follows `ids`.
    pub fn from_response(ids: &[CoinId], mut resp: SimplePriceResponse) -> Self {
        let entries = dedup(ids)
            .into_iter()
            .map(|id| {
                let quote = match resp.remove(id.as_str()) {
                    Some(w) => Quote::from(w),
                    None => {
                        tracing::warn!(coin = %id, "Provider returned no quote, using zeros");
                        Quote::zero()
                    }
                };
                (id, quote)
            })
            .collect();

        Self {
            entries,
            origin: DataOrigin::Live,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wire(usd: f64) -> SimplePrice {
        SimplePrice {
            usd,
            usd_market_cap: usd * 1000.0,
            usd_24h_vol: usd * 10.0,
            usd_24h_change: 1.5,
            last_updated_at: 1_718_000_000,
        }
    }

    #[test]
    fn test_from_response_keeps_tracked_order_and_fills_gaps() {
        let ids = vec![
            CoinId::from("ethereum"),
            CoinId::from("polygon"),
            CoinId::from("bitcoin"),
        ];
        let mut resp = SimplePriceResponse::new();
        resp.insert("bitcoin".into(), wire(64829.0));
        resp.insert("ethereum".into(), wire(3229.0));
        resp.insert("dogecoin".into(), wire(0.12));

        let set = SnapshotSet::from_response(&ids, resp);
        assert_eq!(set.origin(), DataOrigin::Live);
        assert_eq!(set.ids(), ids);
        assert_eq!(set.get(&CoinId::from("bitcoin")).unwrap().price, 64829.0);
        assert_eq!(set.get(&CoinId::from("polygon")), Some(&Quote::zero()));
        assert!(set.get(&CoinId::from("dogecoin")).is_none());
        assert!(set.has_zero_prices());
    }

    #[test]
    fn test_quote_from_wire() {
        let q = Quote::from(wire(2.0));
        assert_eq!(q.price, 2.0);
        assert_eq!(q.market_cap, 2000.0);
        assert_eq!(q.volume_24h, 20.0);
        assert_eq!(q.change_24h, 1.5);
        assert_eq!(q.last_updated, 1_718_000_000);
    }
}
