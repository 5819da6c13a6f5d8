//! History loading strategies: progressive fill and on-demand per row.

pub mod on_demand;
pub mod progressive;
pub mod throttle;

pub use on_demand::{load_on_demand, OnDemandOutcome};
pub use progressive::{fill_histories, FillReport};
pub use throttle::Throttle;

use serde::{Deserialize, Serialize};

/// How a session populates the chart column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HistoryLoadMode {
    /// Fetch every row's history after the initial render, one by one.
    #[default]
    Progressive,
    /// Fetch a row's history only when its chart control is activated.
    OnDemand,
}
