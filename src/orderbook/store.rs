//! Price level storage strategy.
//!
//! A [`LevelStore`] holds one side's aggregated levels, sorted best-first in
//! whatever representation it likes. [`OrderBook`](super::OrderBook) is
//! generic over this trait, so every strategy shares the same order
//! bookkeeping and only the level container changes.
//!
//! ## Handles
//!
//! `find_or_create` and `locate` return a handle the book stores in the
//! order record. A handle must stay valid for as long as its level exists,
//! across unrelated inserts and removals:
//!
//! | Store | Handle | Resolved by |
//! |-------|--------|-------------|
//! | [`TreeLevels`](super::TreeLevels) | slab key | O(1) arena lookup |
//! | [`SortedLevels`](super::SortedLevels) | price | binary search |
//! | [`LinearLevels`](super::LinearLevels) | price | linear scan |
//!
//! Array stores shift elements on insert/remove, so they never hand out
//! indices.

use std::fmt;

use crate::types::{Price, PriceLevel, Side, Volume};

/// One side's sorted price → volume aggregation.
pub trait LevelStore {
    /// Stable reference to a level
    type Handle: Copy + Eq + fmt::Debug;

    /// Create an empty store for a side
    fn new(side: Side) -> Self
    where
        Self: Sized;

    /// Create an empty store sized for roughly `capacity` levels
    fn with_capacity(side: Side, capacity: usize) -> Self
    where
        Self: Sized,
    {
        let _ = capacity;
        Self::new(side)
    }

    /// Side this store orders for
    fn side(&self) -> Side;

    /// Return the level at `price`, creating it at volume 0 in sorted
    /// position if absent
    fn find_or_create(&mut self, price: Price) -> Self::Handle;

    /// Return the level at `price` if it exists
    fn locate(&self, price: Price) -> Option<Self::Handle>;

    /// Current aggregate of a level
    fn volume(&self, handle: Self::Handle) -> Option<Volume>;

    /// Add `delta` to a level's aggregate and return the new aggregate
    ///
    /// # Returns
    ///
    /// `None` if the level does not exist or the aggregate would overflow.
    /// The level is left untouched in both cases.
    fn adjust(&mut self, handle: Self::Handle, delta: Volume) -> Option<Volume>;

    /// Remove the level if its aggregate is no longer positive
    ///
    /// # Returns
    ///
    /// `true` if the level was removed.
    fn remove_if_empty(&mut self, handle: Self::Handle) -> bool;

    /// Best price on this side
    fn best_price(&self) -> Option<Price>;

    /// Number of levels
    fn len(&self) -> usize;

    /// Check if the side has no levels
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of every level, best-first
    fn levels(&self) -> Vec<PriceLevel>;

    /// Drop every level
    fn clear(&mut self);
}

/// Behaviour every [`LevelStore`] must share, run against each strategy
/// from its own test module.
#[cfg(test)]
pub(crate) mod conformance {
    use super::*;

    fn prices<S: LevelStore>(store: &S) -> Vec<Price> {
        store.levels().iter().map(|l| l.price).collect()
    }

    pub fn empty<S: LevelStore>() {
        let store = S::new(Side::Bid);

        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
        assert!(store.best_price().is_none());
        assert!(store.locate(100).is_none());
        assert!(store.levels().is_empty());
    }

    pub fn bid_ordering<S: LevelStore>() {
        let mut store = S::new(Side::Bid);
        for price in [100, 105, 95] {
            store.find_or_create(price);
        }

        assert_eq!(store.side(), Side::Bid);
        assert_eq!(store.best_price(), Some(105));
        assert_eq!(prices(&store), vec![105, 100, 95]);
    }

    pub fn ask_ordering<S: LevelStore>() {
        let mut store = S::new(Side::Ask);
        for price in [100, 105, 95] {
            store.find_or_create(price);
        }

        assert_eq!(store.side(), Side::Ask);
        assert_eq!(store.best_price(), Some(95));
        assert_eq!(prices(&store), vec![95, 100, 105]);
    }

    pub fn find_or_create_is_idempotent<S: LevelStore>() {
        let mut store = S::new(Side::Ask);

        let first = store.find_or_create(150);
        store.adjust(first, 30);
        let second = store.find_or_create(150);

        assert_eq!(first, second);
        assert_eq!(store.len(), 1);
        assert_eq!(store.volume(second), Some(30));
        assert_eq!(store.locate(150), Some(first));
    }

    pub fn adjust_and_remove<S: LevelStore>() {
        let mut store = S::new(Side::Bid);
        let level = store.find_or_create(100);

        assert_eq!(store.adjust(level, 20), Some(20));
        assert_eq!(store.adjust(level, 30), Some(50));
        assert!(!store.remove_if_empty(level));

        assert_eq!(store.adjust(level, -50), Some(0));
        assert!(store.remove_if_empty(level));
        assert!(store.is_empty());
        assert!(store.locate(100).is_none());
        assert!(store.adjust(level, 1).is_none());
        assert!(!store.remove_if_empty(level));
    }

    pub fn adjust_overflow_is_rejected<S: LevelStore>() {
        let mut store = S::new(Side::Bid);
        let level = store.find_or_create(100);

        assert_eq!(store.adjust(level, i64::MAX), Some(i64::MAX));
        assert!(store.adjust(level, 1).is_none());
        assert_eq!(store.volume(level), Some(i64::MAX));

        let fresh = store.find_or_create(90);
        store.adjust(fresh, 1);
        assert!(store.adjust(fresh, i64::MIN).is_some());
        assert!(store.adjust(fresh, -2).is_none());
        assert_eq!(store.volume(fresh), Some(i64::MIN + 1));
    }

    pub fn handles_survive_neighbour_changes<S: LevelStore>() {
        let mut store = S::new(Side::Ask);
        let kept = store.find_or_create(120);
        store.adjust(kept, 10);

        // Grow and shrink around the kept level
        for price in [90, 130, 110, 125, 80] {
            let h = store.find_or_create(price);
            store.adjust(h, 1);
        }
        for price in [90, 110, 80] {
            let h = store.locate(price).unwrap();
            store.adjust(h, -1);
            assert!(store.remove_if_empty(h));
        }

        assert_eq!(store.locate(120), Some(kept));
        assert_eq!(store.adjust(kept, 5), Some(15));
        assert_eq!(prices(&store), vec![120, 125, 130]);
    }

    pub fn extreme_prices<S: LevelStore>() {
        let mut asks = S::new(Side::Ask);
        for price in [0, i64::MAX, i64::MIN, -1] {
            asks.find_or_create(price);
        }
        assert_eq!(asks.best_price(), Some(i64::MIN));
        assert_eq!(prices(&asks), vec![i64::MIN, -1, 0, i64::MAX]);

        let mut bids = S::new(Side::Bid);
        for price in [0, i64::MAX, i64::MIN, -1] {
            bids.find_or_create(price);
        }
        assert_eq!(bids.best_price(), Some(i64::MAX));
    }

    pub fn clear<S: LevelStore>() {
        let mut store = S::with_capacity(Side::Bid, 8);
        store.find_or_create(100);
        store.find_or_create(101);

        store.clear();

        assert!(store.is_empty());
        assert!(store.best_price().is_none());
    }

    /// Expand every conformance check into a `#[test]` for one store type.
    macro_rules! store_conformance {
        ($store:ty) => {
            #[test]
            fn conformance_empty() {
                $crate::orderbook::store::conformance::empty::<$store>();
            }

            #[test]
            fn conformance_bid_ordering() {
                $crate::orderbook::store::conformance::bid_ordering::<$store>();
            }

            #[test]
            fn conformance_ask_ordering() {
                $crate::orderbook::store::conformance::ask_ordering::<$store>();
            }

            #[test]
            fn conformance_find_or_create_is_idempotent() {
                $crate::orderbook::store::conformance::find_or_create_is_idempotent::<$store>();
            }

            #[test]
            fn conformance_adjust_and_remove() {
                $crate::orderbook::store::conformance::adjust_and_remove::<$store>();
            }

            #[test]
            fn conformance_adjust_overflow_is_rejected() {
                $crate::orderbook::store::conformance::adjust_overflow_is_rejected::<$store>();
            }

            #[test]
            fn conformance_handles_survive_neighbour_changes() {
                $crate::orderbook::store::conformance::handles_survive_neighbour_changes::<$store>();
            }

            #[test]
            fn conformance_extreme_prices() {
                $crate::orderbook::store::conformance::extreme_prices::<$store>();
            }

            #[test]
            fn conformance_clear() {
                $crate::orderbook::store::conformance::clear::<$store>();
            }
        };
    }

    pub(crate) use store_conformance;
}
