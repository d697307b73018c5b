//! Primitive order book types.
//!
//! ## Units
//!
//! Prices are signed integers in monetary minor units (e.g. cents) and
//! volumes are signed integers. An order is live while its remaining volume
//! is positive; a price level never persists at zero or negative volume.
//!
//! ## Rank
//!
//! Every side maps a price to a *rank* where a higher rank is a better price:
//!
//! | Side | Best price | rank(price) |
//! |------|------------|-------------|
//! | Bid  | highest    | `price`     |
//! | Ask  | lowest     | `!price`    |
//!
//! Bitwise NOT is a strictly decreasing bijection on `i64` (it maps
//! `i64::MIN` to `i64::MAX`), so asks get a total order without any overflow
//! at the extremes. Stores sort by rank and never need a side-specific
//! comparator type.

/// Unique order identifier
pub type OrderId = u64;

/// Price in monetary minor units
pub type Price = i64;

/// Order or level volume
pub type Volume = i64;

// ============================================================================
// Side enum
// ============================================================================

/// Order side: Bid or Ask
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Side {
    /// Buy interest - best price is the highest
    #[default]
    Bid,
    /// Sell interest - best price is the lowest
    Ask,
}

impl Side {
    /// Convert to u8 for hashing
    pub fn to_u8(self) -> u8 {
        match self {
            Side::Bid => 0,
            Side::Ask => 1,
        }
    }

    /// Map a price to its side-aware rank (higher is better)
    ///
    /// # Example
    ///
    /// ```
    /// use level_book::types::Side;
    ///
    /// assert!(Side::Bid.rank(105) > Side::Bid.rank(100));
    /// assert!(Side::Ask.rank(95) > Side::Ask.rank(100));
    /// ```
    #[inline]
    pub fn rank(self, price: Price) -> i64 {
        match self {
            Side::Bid => price,
            Side::Ask => !price,
        }
    }

    /// Inverse of [`Side::rank`]
    #[inline]
    pub fn price_of(self, rank: i64) -> Price {
        match self {
            Side::Bid => rank,
            Side::Ask => !rank,
        }
    }

    /// Returns true if `a` is a strictly better price than `b` on this side
    #[inline]
    pub fn is_better(self, a: Price, b: Price) -> bool {
        self.rank(a) > self.rank(b)
    }
}

// ============================================================================
// PriceLevel struct
// ============================================================================

/// An aggregated (price, total volume) pair on one side of the book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PriceLevel {
    /// Level price (minor units)
    pub price: Price,

    /// Sum of remaining volume over every live order at this price
    pub volume: Volume,
}

impl PriceLevel {
    /// Create a level with the given aggregate
    #[inline]
    pub fn new(price: Price, volume: Volume) -> Self {
        Self { price, volume }
    }

    /// Create an empty level (volume 0)
    #[inline]
    pub fn empty(price: Price) -> Self {
        Self { price, volume: 0 }
    }

    /// A level is empty once its aggregate is no longer positive
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.volume <= 0
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_conversion() {
        assert_eq!(Side::Bid.to_u8(), 0);
        assert_eq!(Side::Ask.to_u8(), 1);
    }

    #[test]
    fn test_rank_orders_best_highest() {
        assert!(Side::Bid.is_better(105, 100));
        assert!(!Side::Bid.is_better(95, 100));
        assert!(Side::Ask.is_better(95, 100));
        assert!(!Side::Ask.is_better(105, 100));
        assert!(!Side::Ask.is_better(100, 100));
    }

    #[test]
    fn test_rank_roundtrip_at_extremes() {
        for price in [i64::MIN, -1, 0, 1, 150, i64::MAX] {
            assert_eq!(Side::Bid.price_of(Side::Bid.rank(price)), price);
            assert_eq!(Side::Ask.price_of(Side::Ask.rank(price)), price);
        }
        // Lowest possible ask price is the best possible ask rank
        assert_eq!(Side::Ask.rank(i64::MIN), i64::MAX);
    }

    #[test]
    fn test_price_level_empty() {
        assert!(PriceLevel::empty(100).is_empty());
        assert!(PriceLevel::new(100, -5).is_empty());
        assert!(!PriceLevel::new(100, 1).is_empty());
    }
}
