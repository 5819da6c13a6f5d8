//! Wire → domain conversions for price history.

use super::wire::MarketChartResponse;
use super::PriceHistory;

impl From<MarketChartResponse> for PriceHistory {
    /// Keeps the price component of each `[timestamp, price]` pair.
    fn from(resp: MarketChartResponse) -> Self {
        Self(resp.prices.into_iter().map(|(_, price)| price).collect())
    }
}
