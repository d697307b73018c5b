//! Strategy-independent book interface.
//!
//! [`PriceBook`] is the one capability set the load generator, the latency
//! harness and the benchmarks depend on. It is implemented once, generically,
//! for every `OrderBook<S: LevelStore>`; [`Strategy`] names the concrete
//! store types and builds boxed books at runtime.

use std::fmt;

use clap::ValueEnum;

use crate::error::BookError;
use crate::orderbook::{
    BestFirst, BranchlessSearch, LevelStore, LinearLevels, OrderBook, SortedLevels, StdSearch,
    TreeLevels,
};
use crate::types::{BookSnapshot, OrderId, Price, Side, Volume};

/// Book over a balanced tree
pub type TreeBook = OrderBook<TreeLevels>;

/// Book over a sorted array, standard binary search
pub type BinarySearchBook = OrderBook<SortedLevels<StdSearch>>;

/// Book over a sorted array, branchless binary search
pub type BranchlessBook = OrderBook<SortedLevels<BranchlessSearch>>;

/// Book over a sorted array kept best-first
pub type BestFirstBook = OrderBook<SortedLevels<StdSearch, BestFirst>>;

/// Book over a linearly scanned array
pub type LinearBook = OrderBook<LinearLevels>;

/// The four book operations plus read-only inspection.
pub trait PriceBook {
    /// See [`OrderBook::add_order`]
    fn add_order(&mut self, id: OrderId, side: Side, price: Price, volume: Volume);

    /// See [`OrderBook::modify_order`]
    fn modify_order(&mut self, id: OrderId, new_volume: Volume);

    /// See [`OrderBook::delete_order`]
    fn delete_order(&mut self, id: OrderId);

    /// `(best_bid, best_ask)` with 0 for an empty side
    fn best_prices(&self) -> (Price, Price);

    /// Best price on one side
    fn best_price(&self, side: Side) -> Option<Price>;

    /// Best-first copy of both sides
    fn snapshot(&self) -> BookSnapshot;

    /// Number of live orders
    fn live_orders(&self) -> usize;

    /// Audit the order↔level invariants
    fn verify(&self) -> Result<(), BookError>;
}

impl<S: LevelStore> PriceBook for OrderBook<S> {
    #[inline]
    fn add_order(&mut self, id: OrderId, side: Side, price: Price, volume: Volume) {
        OrderBook::add_order(self, id, side, price, volume)
    }

    #[inline]
    fn modify_order(&mut self, id: OrderId, new_volume: Volume) {
        OrderBook::modify_order(self, id, new_volume)
    }

    #[inline]
    fn delete_order(&mut self, id: OrderId) {
        OrderBook::delete_order(self, id)
    }

    #[inline]
    fn best_prices(&self) -> (Price, Price) {
        OrderBook::best_prices(self)
    }

    #[inline]
    fn best_price(&self, side: Side) -> Option<Price> {
        OrderBook::best_price(self, side)
    }

    fn snapshot(&self) -> BookSnapshot {
        OrderBook::snapshot(self)
    }

    fn live_orders(&self) -> usize {
        OrderBook::live_orders(self)
    }

    fn verify(&self) -> Result<(), BookError> {
        OrderBook::verify(self)
    }
}

/// Level storage strategy selectable at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Strategy {
    /// Ordered map keyed by price
    Tree,
    /// Sorted array, standard binary search, best price at the back
    BinarySearch,
    /// Sorted array, branchless binary search
    Branchless,
    /// Sorted array searched front to back
    Linear,
    /// Sorted array, standard binary search, best price at the front
    BinarySearchBestFirst,
}

impl Strategy {
    /// Every strategy, in report order
    pub const ALL: [Strategy; 5] = [
        Strategy::Tree,
        Strategy::BinarySearch,
        Strategy::BinarySearchBestFirst,
        Strategy::Branchless,
        Strategy::Linear,
    ];

    /// Stable name used for file names and log fields
    pub fn label(self) -> &'static str {
        match self {
            Strategy::Tree => "tree",
            Strategy::BinarySearch => "binary_search",
            Strategy::Branchless => "branchless",
            Strategy::Linear => "linear",
            Strategy::BinarySearchBestFirst => "binary_search_best_first",
        }
    }

    /// Report heading
    pub fn title(self) -> &'static str {
        match self {
            Strategy::Tree => "BTreeMap Levels",
            Strategy::BinarySearch => "Sorted Vec, Binary Search",
            Strategy::Branchless => "Sorted Vec, Branchless Binary Search",
            Strategy::Linear => "Sorted Vec, Linear Search",
            Strategy::BinarySearchBestFirst => "Sorted Vec, Binary Search, Best First",
        }
    }

    /// Build an empty book pre-sized for `order_capacity` orders
    pub fn build(self, order_capacity: usize) -> Box<dyn PriceBook> {
        match self {
            Strategy::Tree => Box::new(TreeBook::with_capacity(order_capacity)),
            Strategy::BinarySearch => Box::new(BinarySearchBook::with_capacity(order_capacity)),
            Strategy::Branchless => Box::new(BranchlessBook::with_capacity(order_capacity)),
            Strategy::Linear => Box::new(LinearBook::with_capacity(order_capacity)),
            Strategy::BinarySearchBestFirst => {
                Box::new(BestFirstBook::with_capacity(order_capacity))
            }
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
