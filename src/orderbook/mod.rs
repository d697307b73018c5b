//! Order book module.
//!
//! ## Architecture
//!
//! The book keeps only aggregated price levels per side:
//!
//! - **Registry**: slab-backed order records, the authority on liveness
//! - **Level stores**: one per side, sorted best-first, swappable
//! - **OrderBook**: add / modify / delete / best prices over any store
//!
//! ## Components
//!
//! - [`OrderRegistry`]: id → order record with level handle
//! - [`LevelStore`]: storage strategy trait
//! - [`TreeLevels`], [`SortedLevels`], [`LinearLevels`]: the strategies
//! - [`OrderBook`]: the book itself
//! - [`PriceBook`] / [`Strategy`]: runtime-selectable interface
//!
//! ## Performance
//!
//! | Store | find_or_create | adjust | remove |
//! |-------|----------------|--------|--------|
//! | Tree | O(log n) | O(1) | O(log n) |
//! | Sorted (std / branchless) | O(log n) + shift | O(log n) | O(log n) + shift |
//! | Linear | O(n) | O(n) | O(n) |
//!
//! ## Example
//!
//! ```
//! use level_book::orderbook::Strategy;
//! use level_book::types::Side;
//!
//! for strategy in Strategy::ALL {
//!     let mut book = strategy.build(1_000);
//!     book.add_order(1, Side::Bid, 100, 50);
//!     book.add_order(2, Side::Bid, 105, 10);
//!     assert_eq!(book.best_prices(), (105, 0));
//! }
//! ```

pub mod book;
pub mod linear;
pub mod registry;
pub mod sorted;
pub mod store;
pub mod strategy;
pub mod tree;

pub use book::OrderBook;
pub use linear::LinearLevels;
pub use registry::{Order, OrderRegistry};
pub use sorted::{BestFirst, BestLast, BranchlessSearch, Layout, LowerBound, SortedLevels, StdSearch};
pub use store::LevelStore;
pub use strategy::{
    BestFirstBook, BinarySearchBook, BranchlessBook, LinearBook, PriceBook, Strategy, TreeBook,
};
pub use tree::TreeLevels;
