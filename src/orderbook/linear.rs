//! Linear-scan level storage.
//!
//! Same array shape as [`SortedLevels`](super::SortedLevels) with the best
//! price at the back, but positions are found by walking the array from the
//! front. Every operation is O(n) in the number of levels. With only a few
//! dozen distinct prices alive at once the whole side fits in a handful of
//! cache lines and the scan is predictable, which is the regime this store
//! targets.

use crate::orderbook::LevelStore;
use crate::types::{Price, PriceLevel, Side, Volume};

/// Array store searched front to back.
#[derive(Debug)]
pub struct LinearLevels {
    side: Side,

    /// Ascending by rank: worst price first, best price last
    levels: Vec<PriceLevel>,
}

impl LinearLevels {
    #[inline]
    fn index_of(&self, price: Price) -> Option<usize> {
        self.levels.iter().position(|level| level.price == price)
    }
}

impl LevelStore for LinearLevels {
    type Handle = Price;

    fn new(side: Side) -> Self {
        Self {
            side,
            levels: Vec::new(),
        }
    }

    fn with_capacity(side: Side, capacity: usize) -> Self {
        Self {
            side,
            levels: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    fn side(&self) -> Side {
        self.side
    }

    fn find_or_create(&mut self, price: Price) -> Price {
        let side = self.side;
        let target = side.rank(price);
        let idx = self
            .levels
            .iter()
            .position(|level| side.rank(level.price) >= target)
            .unwrap_or(self.levels.len());

        let exists = matches!(self.levels.get(idx), Some(level) if level.price == price);
        if !exists {
            self.levels.insert(idx, PriceLevel::empty(price));
            tracing::debug!(side = ?side, price, "level created");
        }
        price
    }

    #[inline]
    fn locate(&self, price: Price) -> Option<Price> {
        self.index_of(price).map(|_| price)
    }

    #[inline]
    fn volume(&self, price: Price) -> Option<Volume> {
        self.index_of(price).map(|idx| self.levels[idx].volume)
    }

    #[inline]
    fn adjust(&mut self, price: Price, delta: Volume) -> Option<Volume> {
        let level = self.levels.iter_mut().find(|level| level.price == price)?;
        level.volume = level.volume.checked_add(delta)?;
        Some(level.volume)
    }

    fn remove_if_empty(&mut self, price: Price) -> bool {
        match self.index_of(price) {
            Some(idx) if self.levels[idx].is_empty() => {
                self.levels.remove(idx);
                tracing::debug!(side = ?self.side, price, "level removed");
                true
            }
            _ => false,
        }
    }

    #[inline]
    fn best_price(&self) -> Option<Price> {
        self.levels.last().map(|level| level.price)
    }

    #[inline]
    fn len(&self) -> usize {
        self.levels.len()
    }

    fn levels(&self) -> Vec<PriceLevel> {
        self.levels.iter().rev().copied().collect()
    }

    fn clear(&mut self) {
        self.levels.clear();
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orderbook::store::conformance::store_conformance;

    store_conformance!(LinearLevels);

    #[test]
    fn test_linear_storage_is_best_last() {
        let mut bids = LinearLevels::new(Side::Bid);
        for price in [100, 105, 95, 105] {
            bids.find_or_create(price);
        }

        let stored: Vec<Price> = bids.levels.iter().map(|l| l.price).collect();
        assert_eq!(stored, vec![95, 100, 105]);

        let mut asks = LinearLevels::new(Side::Ask);
        for price in [100, 105, 95] {
            asks.find_or_create(price);
        }

        let stored: Vec<Price> = asks.levels.iter().map(|l| l.price).collect();
        assert_eq!(stored, vec![105, 100, 95]);
    }
}
