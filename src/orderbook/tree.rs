//! Balanced-tree level storage.
//!
//! ## Layout
//!
//! - **BTreeMap**: `Reverse(rank)` → slab key, so iteration starts at the
//!   best price on either side
//! - **Slab**: the level records themselves
//!
//! The handle given to orders is the slab key. It stays valid until the
//! level is removed, so modify/delete update the aggregate without walking
//! the tree; only creating or removing a level touches the map.
//!
//! | Operation | Complexity |
//! |-----------|------------|
//! | find_or_create | O(log n) |
//! | locate | O(log n) |
//! | adjust | O(1) |
//! | remove_if_empty | O(log n) |
//! | best_price | O(log n) |

use std::cmp::Reverse;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use slab::Slab;

use crate::orderbook::LevelStore;
use crate::types::{Price, PriceLevel, Side, Volume};

/// Ordered-map store with slab-allocated levels.
#[derive(Debug)]
pub struct TreeLevels {
    side: Side,

    /// Sorted index: best rank first
    index: BTreeMap<Reverse<i64>, usize>,

    /// Level records, addressed by slab key
    levels: Slab<PriceLevel>,
}

impl TreeLevels {
    #[inline]
    fn key(&self, price: Price) -> Reverse<i64> {
        Reverse(self.side.rank(price))
    }
}

impl LevelStore for TreeLevels {
    type Handle = usize;

    fn new(side: Side) -> Self {
        Self {
            side,
            index: BTreeMap::new(),
            levels: Slab::new(),
        }
    }

    fn with_capacity(side: Side, capacity: usize) -> Self {
        Self {
            side,
            index: BTreeMap::new(),
            levels: Slab::with_capacity(capacity),
        }
    }

    #[inline]
    fn side(&self) -> Side {
        self.side
    }

    fn find_or_create(&mut self, price: Price) -> usize {
        let key = self.key(price);
        match self.index.entry(key) {
            Entry::Occupied(entry) => *entry.get(),
            Entry::Vacant(entry) => {
                let slot = self.levels.insert(PriceLevel::empty(price));
                entry.insert(slot);
                tracing::debug!(side = ?self.side, price, "level created");
                slot
            }
        }
    }

    #[inline]
    fn locate(&self, price: Price) -> Option<usize> {
        self.index.get(&self.key(price)).copied()
    }

    #[inline]
    fn volume(&self, handle: usize) -> Option<Volume> {
        self.levels.get(handle).map(|level| level.volume)
    }

    #[inline]
    fn adjust(&mut self, handle: usize, delta: Volume) -> Option<Volume> {
        let level = self.levels.get_mut(handle)?;
        level.volume = level.volume.checked_add(delta)?;
        Some(level.volume)
    }

    fn remove_if_empty(&mut self, handle: usize) -> bool {
        let price = match self.levels.get(handle) {
            Some(level) if level.is_empty() => level.price,
            _ => return false,
        };

        let key = self.key(price);
        self.index.remove(&key);
        self.levels.remove(handle);
        tracing::debug!(side = ?self.side, price, "level removed");
        true
    }

    #[inline]
    fn best_price(&self) -> Option<Price> {
        self.index
            .keys()
            .next()
            .map(|Reverse(rank)| self.side.price_of(*rank))
    }

    #[inline]
    fn len(&self) -> usize {
        self.index.len()
    }

    fn levels(&self) -> Vec<PriceLevel> {
        self.index
            .values()
            .filter_map(|&slot| self.levels.get(slot).copied())
            .collect()
    }

    fn clear(&mut self) {
        self.index.clear();
        self.levels.clear();
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
