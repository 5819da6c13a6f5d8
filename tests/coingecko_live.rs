//! Live tests against the public CoinGecko API.
//!
//! All tests are `#[ignore]` because they require network access and are
//! subject to the provider's rate limits. A demo key is read from
//! `COINGECKO_API_KEY` (or a `.env` file) when present.
//!
//! Run with:
//! ```bash
//! cargo test --test coingecko_live -- --ignored
//! ```

use std::time::Duration;

use coinboard::prelude::*;

fn live_client(coins: &[&str]) -> CoinboardClient {
    let _ = dotenvy::dotenv();
    let mut builder = CoinboardClient::builder()
        .coins(coins.iter().copied())
        .throttle(Throttle::sequential(Duration::from_millis(500)));
    if let Ok(key) = std::env::var("COINGECKO_API_KEY") {
        builder = builder.api_key(key);
    }
    builder.build().expect("client should build")
}

#[tokio::test]
#[ignore]
async fn live_quotes_for_bitcoin_and_ethereum() {
    let client = live_client(&["bitcoin", "ethereum"]);
    let set = client.quotes().get().await;

    assert_eq!(set.origin(), DataOrigin::Live, "provider unreachable");
    let btc = set.get(&CoinId::from("bitcoin")).unwrap();
    assert!(btc.price > 0.0);
    assert!(btc.market_cap > 0.0);
}

#[tokio::test]
#[ignore]
async fn live_dashboard_fills_sparklines() {
    let dash = Dashboard::new(live_client(&["bitcoin", "ethereum"]));
    let (_, report) = dash.load_all().await;
    let report = report.unwrap();

    assert_eq!(report.loaded, 2, "failed: {:?}", report.failed);
    for row in dash.rows().await {
        assert!(row.history.len() >= 7, "{} has {} samples", row.id, row.history.len());
    }
}
