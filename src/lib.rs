//! # Level Book
//!
//! Aggregated price-level order book with interchangeable level storage.
//!
//! ## Architecture
//!
//! - **Types**: Side, PriceLevel, BookOp, BookSnapshot
//! - **OrderBook**: order registry plus one level store per side
//! - **Level stores**: balanced tree, sorted array (standard and branchless
//!   binary search), linear scan
//! - **Sim**: seeded random order flow and timed replay
//! - **Latency**: scoped timers, percentile statistics, sample export
//!
//! ## Design Principles
//!
//! 1. **Equivalence**: Every store produces identical levels and best prices
//!    for identical input; only latency differs
//! 2. **Total operations**: Unknown ids and duplicate adds are no-ops
//! 3. **Stable handles**: Orders never hold an index into a shifting array
//! 4. **Synchronous Execution**: No locks, no I/O, no async in the book
//!
//! ## Example
//!
//! ```
//! use level_book::{OrderBook, Side, TreeLevels};
//!
//! let mut book: OrderBook<TreeLevels> = OrderBook::new();
//! book.add_order(3, Side::Bid, 100, 20);
//! book.add_order(4, Side::Bid, 100, 30);
//! assert_eq!(book.level_volume(Side::Bid, 100), Some(50));
//!
//! book.delete_order(3);
//! assert_eq!(book.level_volume(Side::Bid, 100), Some(30));
//! ```

// ============================================================================
// Module declarations
// ============================================================================

/// Core data types: Side, PriceLevel, BookOp, BookSnapshot
pub mod types;

/// Order book and level storage strategies
pub mod orderbook;

/// Error types: invariant violations and harness failures
pub mod error;

/// Latency capture and statistics
pub mod latency;

/// Load generation and timed replay
pub mod sim;

// ============================================================================
// Re-exports for convenience
// ============================================================================

pub use error::{BookError, HarnessError};
pub use latency::{LatencyRecorder, LatencyStats, ScopedTimer};
pub use orderbook::{
    LevelStore, LinearLevels, OrderBook, PriceBook, SortedLevels, Strategy, TreeLevels,
};
pub use sim::{LoadGenerator, SimConfig};
pub use types::{BookOp, BookSnapshot, OrderId, Price, PriceLevel, Side, Volume};
