//! Wire types for the per-coin market chart endpoint.

use serde::{Deserialize, Serialize};

/// `[timestamp_ms, value]` pair as sent by the provider.
pub type ChartPoint = (i64, f64);

/// `/coins/{id}/market_chart` response body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketChartResponse {
    pub prices: Vec<ChartPoint>,
    #[serde(default)]
    pub market_caps: Vec<ChartPoint>,
    #[serde(default)]
    pub total_volumes: Vec<ChartPoint>,
}
