//! # Coinboard
//!
//! Data layer for a crypto market dashboard supporting both native and WASM
//! targets: cached bulk quotes, per-coin sparkline history, and progressive
//! or on-demand loading into a keyed table.
//!
//! ## Architecture
//!
//! The crate is organized in layers:
//!
//! 1. **Core** — Types, formatting, domain models (always available, WASM-safe)
//! 2. **HTTP API** — `CoinGeckoHttp` behind the `MarketDataSource` seam
//! 3. **Caching** — `FreshnessCache` with stale-while-revalidate
//! 4. **High-Level Client** — `CoinboardClient` with nested sub-clients
//! 5. **Session** — `Dashboard`: table, chart cells, load sequencing
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use coinboard::prelude::*;
//!
//! let client = CoinboardClient::builder().build()?;
//! let dashboard = Dashboard::new(client);
//!
//! let (quotes, report) = dashboard.load_all().await;
//! for row in dashboard.rows().await {
//!     println!("{} {} {}", row.id, row.price_cell(), row.change_cell());
//! }
//! ```

// ── Layer 1: Core ────────────────────────────────────────────────────────────

/// Shared newtypes and formatting helpers used across all domains.
pub mod shared;

/// Domain modules (vertical slices): types, wire types, conversions, state.
pub mod domain;

/// Unified error types.
pub mod error;

/// Network URL constants.
pub mod network;

/// Session defaults: tracked coins, freshness window, pacing.
pub mod defaults;

/// Platform glue for native and WASM.
pub mod runtime;

// ── Layer 2: HTTP API ────────────────────────────────────────────────────────

/// HTTP client with retry policies.
pub mod http;

/// `MarketDataSource` — the network seam.
pub mod source;

// ── Layer 3: Caching ─────────────────────────────────────────────────────────

/// Freshness-windowed cache.
pub mod cache;

// ── Layer 4: High-Level Client ───────────────────────────────────────────────

/// `CoinboardClient` — the primary entry point.
pub mod client;

/// History loading strategies.
pub mod loader;

// ── Layer 5: Session ─────────────────────────────────────────────────────────

/// `Dashboard` — one mounted view.
pub mod dashboard;

// ── Prelude ──────────────────────────────────────────────────────────────────

pub mod prelude {
    // Shared newtypes
    pub use crate::shared::fmt::{format_billions, format_change, format_price, Trend};
    pub use crate::shared::{CoinId, HistoryWindow, Interval};

    // Domain types — quotes
    pub use crate::domain::quote::{DataOrigin, Quote, SnapshotSet};

    // Domain types — history
    pub use crate::domain::history::PriceHistory;

    // Domain types — table
    pub use crate::domain::table::{
        ChartCell, ChartControl, Column, MarketSnapshot, MarketTable, PatchOutcome, RowPatch,
        RowPatcher, SharedTable, SortDirection, Sparkline, TableHandle, TableQuery,
    };

    // Errors
    pub use crate::error::{HttpError, SdkError};

    // Network
    pub use crate::network::DEFAULT_API_URL;

    // Caching
    pub use crate::cache::{Cached, Clock, Freshness, FreshnessCache, Listener};

    // Data source
    #[cfg(feature = "http")]
    pub use crate::http::CoinGeckoHttp;
    pub use crate::http::retry::{RetryConfig, RetryPolicy};
    pub use crate::source::MarketDataSource;

    // Client + sub-clients
    pub use crate::client::{CoinboardClient, CoinboardClientBuilder, HistoriesClient, QuotesClient};

    // Loading
    pub use crate::loader::{FillReport, HistoryLoadMode, OnDemandOutcome, Throttle};

    // Session
    pub use crate::dashboard::Dashboard;
}
