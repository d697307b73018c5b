//! Aggregated price-level order book.
//!
//! ## Architecture
//!
//! - **OrderRegistry**: id → (side, price, remaining, level handle)
//! - **Bid store**: levels ordered high-to-low (best bid = highest price)
//! - **Ask store**: levels ordered low-to-high (best ask = lowest price)
//!
//! `OrderBook<S>` is generic over the [`LevelStore`] strategy; all
//! strategies share the bookkeeping below and must agree on every result.
//!
//! ## Order Lifecycle
//!
//! ```text
//! Unregistered --add--> Live --delete / modify(<= 0)--> Removed
//!                        |  ^
//!                        +--+ modify(> 0)
//! ```
//!
//! A removed id may be added again and is treated as a fresh order.
//!
//! ## No-op Contract
//!
//! Unknown ids on modify/delete, duplicate ids on add and non-positive add
//! volumes are ignored. Callers that replay generated sequences rely on this
//! and do not pre-validate ids.
//!
//! ## Example
//!
//! ```
//! use level_book::orderbook::{OrderBook, TreeLevels};
//! use level_book::types::Side;
//!
//! let mut book: OrderBook<TreeLevels> = OrderBook::with_capacity(1_000);
//!
//! book.add_order(1, Side::Bid, 100, 50);
//! assert_eq!(book.best_prices(), (100, 0));
//!
//! book.add_order(2, Side::Ask, 101, 10);
//! assert_eq!(book.best_prices(), (100, 101));
//!
//! book.delete_order(1);
//! assert_eq!(book.best_prices(), (0, 101));
//! ```

use std::collections::HashMap;

use crate::error::BookError;
use crate::orderbook::registry::{Order, OrderRegistry};
use crate::orderbook::LevelStore;
use crate::types::{BookSnapshot, OrderId, Price, Side, Volume};

/// Order book over one level storage strategy.
#[derive(Debug)]
pub struct OrderBook<S: LevelStore> {
    /// Live orders
    orders: OrderRegistry<S::Handle>,

    /// Bid levels
    bids: S,

    /// Ask levels
    asks: S,
}

impl<S: LevelStore> Default for OrderBook<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: LevelStore> OrderBook<S> {
    /// Create an empty book
    pub fn new() -> Self {
        Self {
            orders: OrderRegistry::new(),
            bids: S::new(Side::Bid),
            asks: S::new(Side::Ask),
        }
    }

    /// Create a book with pre-allocated order capacity
    ///
    /// Level stores are sized for a small fraction of the order count;
    /// many orders share a price.
    pub fn with_capacity(order_capacity: usize) -> Self {
        let level_capacity = (order_capacity / 16).max(16);
        Self {
            orders: OrderRegistry::with_capacity(order_capacity),
            bids: S::with_capacity(Side::Bid, level_capacity),
            asks: S::with_capacity(Side::Ask, level_capacity),
        }
    }

    /// Split borrow: one side's store plus the registry
    #[inline]
    fn parts(&mut self, side: Side) -> (&mut S, &mut OrderRegistry<S::Handle>) {
        match side {
            Side::Bid => (&mut self.bids, &mut self.orders),
            Side::Ask => (&mut self.asks, &mut self.orders),
        }
    }

    /// Store for one side
    #[inline]
    pub fn store(&self, side: Side) -> &S {
        match side {
            Side::Bid => &self.bids,
            Side::Ask => &self.asks,
        }
    }

    // ========================================================================
    // Order Management
    // ========================================================================

    /// Add an order and its volume to the level at `price`
    ///
    /// No-op if `id` is already live, `volume` is not positive, or the level
    /// aggregate would overflow.
    pub fn add_order(&mut self, id: OrderId, side: Side, price: Price, volume: Volume) {
        if volume <= 0 {
            tracing::trace!(id, volume, "add with non-positive volume ignored");
            return;
        }
        if self.orders.contains(id) {
            tracing::trace!(id, "add for live id ignored");
            return;
        }

        let (store, orders) = self.parts(side);
        let level = store.find_or_create(price);
        if store.adjust(level, volume).is_none() {
            tracing::warn!(id, ?side, price, volume, "add would overflow level aggregate");
            store.remove_if_empty(level);
            return;
        }
        orders.register(id, side, price, volume, level);
    }

    /// Replace an order's remaining volume
    ///
    /// The difference is applied to the order's level. A new volume of zero
    /// or less cancels the order, removing its level if nothing else rests
    /// there. No-op if `id` is not live or the level aggregate would
    /// overflow.
    pub fn modify_order(&mut self, id: OrderId, new_volume: Volume) {
        let Some(order) = self.orders.lookup(id) else {
            tracing::trace!(id, "modify for unknown id ignored");
            return;
        };
        let (side, level, remaining) = (order.side, order.level, order.remaining);

        if new_volume <= 0 {
            tracing::trace!(id, new_volume, "modify cancels order");
            self.delete_order(id);
            return;
        }

        let delta = new_volume - remaining;
        let (store, orders) = self.parts(side);
        match store.adjust(level, delta) {
            Some(aggregate) if aggregate > 0 => {
                orders.update(id, new_volume);
            }
            Some(_) => {
                store.remove_if_empty(level);
                orders.remove(id);
            }
            None if store.volume(level).is_some() => {
                tracing::warn!(id, new_volume, "modify would overflow level aggregate");
            }
            None => {
                tracing::warn!(id, ?level, "live order without level dropped");
                orders.remove(id);
            }
        }
    }

    /// Cancel an order, removing its level if it becomes empty
    ///
    /// No-op if `id` is not live.
    pub fn delete_order(&mut self, id: OrderId) {
        let Some(order) = self.orders.remove(id) else {
            tracing::trace!(id, "delete for unknown id ignored");
            return;
        };

        let store = match order.side {
            Side::Bid => &mut self.bids,
            Side::Ask => &mut self.asks,
        };
        if store.adjust(order.level, -order.remaining).is_some() {
            store.remove_if_empty(order.level);
        } else {
            tracing::warn!(id, level = ?order.level, "deleted order had no level");
        }
    }

    /// Drop every order and level
    pub fn clear(&mut self) {
        self.orders.clear();
        self.bids.clear();
        self.asks.clear();
    }

    // ========================================================================
    // Best Bid/Ask
    // ========================================================================

    /// Best price on one side
    #[inline]
    pub fn best_price(&self, side: Side) -> Option<Price> {
        self.store(side).best_price()
    }

    /// `(best_bid, best_ask)`, with 0 standing in for an empty side
    ///
    /// A crossed book (bid >= ask) is reported as is.
    #[inline]
    pub fn best_prices(&self) -> (Price, Price) {
        (
            self.bids.best_price().unwrap_or(0),
            self.asks.best_price().unwrap_or(0),
        )
    }

    // ========================================================================
    // Inspection
    // ========================================================================

    /// Look up a live order
    #[inline]
    pub fn order(&self, id: OrderId) -> Option<&Order<S::Handle>> {
        self.orders.lookup(id)
    }

    /// Check if an order is live
    #[inline]
    pub fn contains_order(&self, id: OrderId) -> bool {
        self.orders.contains(id)
    }

    /// Number of live orders
    #[inline]
    pub fn live_orders(&self) -> usize {
        self.orders.len()
    }

    /// Number of bid levels
    #[inline]
    pub fn bid_levels(&self) -> usize {
        self.bids.len()
    }

    /// Number of ask levels
    #[inline]
    pub fn ask_levels(&self) -> usize {
        self.asks.len()
    }

    /// Check if the book holds no orders
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Aggregate at `price` on `side`
    pub fn level_volume(&self, side: Side, price: Price) -> Option<Volume> {
        let store = self.store(side);
        store.locate(price).and_then(|level| store.volume(level))
    }

    /// Best-first copy of both sides
    pub fn snapshot(&self) -> BookSnapshot {
        BookSnapshot::new(self.bids.levels(), self.asks.levels())
    }

    /// SHA-256 over the snapshot
    pub fn state_root(&self) -> [u8; 32] {
        self.snapshot().state_root()
    }

    /// Audit the order↔level invariants
    ///
    /// Checks that every live order resolves to its level, that every
    /// level's aggregate equals the sum of its orders' remaining volume,
    /// that no level is empty or orphaned, and that both sides are strictly
    /// ordered best-first.
    pub fn verify(&self) -> Result<(), BookError> {
        let mut sums: HashMap<(Side, Price), Volume> = HashMap::with_capacity(self.orders.len());
        for order in self.orders.iter() {
            if self.store(order.side).locate(order.price) != Some(order.level) {
                return Err(BookError::MissingLevel {
                    id: order.id,
                    side: order.side,
                    price: order.price,
                });
            }
            *sums.entry((order.side, order.price)).or_insert(0) += order.remaining;
        }

        for side in [Side::Bid, Side::Ask] {
            let levels = self.store(side).levels();
            for pair in levels.windows(2) {
                if !side.is_better(pair[0].price, pair[1].price) {
                    return Err(BookError::Unordered {
                        side,
                        previous: pair[0].price,
                        next: pair[1].price,
                    });
                }
            }

            for level in &levels {
                if level.is_empty() {
                    return Err(BookError::NonPositiveLevel {
                        side,
                        price: level.price,
                        volume: level.volume,
                    });
                }
                let Some(expected) = sums.remove(&(side, level.price)) else {
                    return Err(BookError::OrphanLevel {
                        side,
                        price: level.price,
                    });
                };
                if expected != level.volume {
                    return Err(BookError::VolumeMismatch {
                        side,
                        price: level.price,
                        expected,
                        actual: level.volume,
                    });
                }
            }
        }

        Ok(())
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
