//! Human-readable formatting for table cells.

pub mod cell;
pub mod num;

pub use cell::{format_billions, format_change, format_price, Trend};
