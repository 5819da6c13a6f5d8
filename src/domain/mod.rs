//! Domain modules organized as vertical slices.
//!
//! Each sub-module contains some of:
//! - `mod.rs` — Rich domain types
//! - `wire.rs` — Raw serde structs matching provider responses
//! - `convert.rs` — `From` conversions from wire types
//! - `state.rs` — Pure state transitions
//! - `client.rs` — Sub-client with fetch methods and caching

pub mod history;
pub mod quote;
pub mod table;
