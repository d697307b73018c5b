//! Core data types for the level book
//!
//! ## Types
//!
//! - [`Side`]: Bid or Ask, plus the side-aware price rank
//! - [`PriceLevel`]: Aggregated (price, volume) pair
//! - [`BookOp`]: Add / Modify / Delete as a value
//! - [`BookSnapshot`]: Best-first copy of both sides with a state root
//!
//! ## Integer Arithmetic
//!
//! Prices and volumes are plain `i64` minor units. Nothing in the book
//! touches floating point.

mod op;
mod order;
mod snapshot;

pub use op::BookOp;
pub use order::{OrderId, Price, PriceLevel, Side, Volume};
pub use snapshot::BookSnapshot;
