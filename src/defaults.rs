//! Compile-time defaults for the dashboard session.
//!
//! Every value here can be overridden through `CoinboardClientBuilder`.

use std::time::Duration;

/// Coins tracked by the dashboard, in display order.
pub const TRACKED_COINS: &[&str] = &[
    "bitcoin",
    "ethereum",
    "polkadot",
    "litecoin",
    "polygon",
    "uniswap",
    "stellar",
    "arbitrum",
    "optimism",
    "chainlink",
    "solana",
    "bitcoin-cash",
    "aave",
    "cardano",
    "near",
    "cosmos",
    "algorand",
];

/// How long a cached response counts as fresh.
pub const FRESHNESS_WINDOW: Duration = Duration::from_secs(24 * 60 * 60);

/// Pause between two history fetches in the progressive loop.
pub const PACING_INTERVAL: Duration = Duration::from_millis(100);

/// Size of the sparkline window, in days.
pub const HISTORY_DAYS: u32 = 7;
