//! Point-in-time copy of the aggregated book.
//!
//! A `BookSnapshot` lists every level best-first on each side. Two books
//! holding the same aggregation produce equal snapshots regardless of the
//! storage strategy behind them, which makes snapshots the comparison unit
//! for cross-strategy checks.
//!
//! ## State Root
//!
//! The 32-byte state root is a SHA-256 hash over the snapshot encoding:
//!
//! ```text
//! for side in [bids, asks]:
//!     side tag (1 byte) | level count (u64 LE)
//!     for level in side (best-first):
//!         price (i64 LE) | volume (i64 LE)
//! ```

use sha2::{Digest, Sha256};

use crate::types::{Price, PriceLevel, Side, Volume};

/// Best-first copy of both sides of a book.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BookSnapshot {
    /// Bid levels, highest price first
    pub bids: Vec<PriceLevel>,

    /// Ask levels, lowest price first
    pub asks: Vec<PriceLevel>,
}

impl BookSnapshot {
    /// Create a snapshot from best-first level lists
    pub fn new(bids: Vec<PriceLevel>, asks: Vec<PriceLevel>) -> Self {
        Self { bids, asks }
    }

    /// Levels for one side
    pub fn side(&self, side: Side) -> &[PriceLevel] {
        match side {
            Side::Bid => &self.bids,
            Side::Ask => &self.asks,
        }
    }

    /// Best prices with the 0 sentinel for an empty side
    pub fn best_prices(&self) -> (Price, Price) {
        let bid = self.bids.first().map_or(0, |l| l.price);
        let ask = self.asks.first().map_or(0, |l| l.price);
        (bid, ask)
    }

    /// Aggregate at a price, if that level exists
    pub fn volume_at(&self, side: Side, price: Price) -> Option<Volume> {
        self.side(side)
            .iter()
            .find(|l| l.price == price)
            .map(|l| l.volume)
    }

    /// Total number of levels on both sides
    pub fn level_count(&self) -> usize {
        self.bids.len() + self.asks.len()
    }

    /// Compute the SHA-256 state root of this snapshot
    pub fn state_root(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        for side in [Side::Bid, Side::Ask] {
            let levels = self.side(side);
            hasher.update([side.to_u8()]);
            hasher.update((levels.len() as u64).to_le_bytes());
            for level in levels {
                hasher.update(level.price.to_le_bytes());
                hasher.update(level.volume.to_le_bytes());
            }
        }

        let result = hasher.finalize();
        let mut hash = [0u8; 32];
        hash.copy_from_slice(&result);
        hash
    }

    /// Get the state root as a hex string
    pub fn state_root_hex(&self) -> String {
        hex::encode(self.state_root())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_snapshot() {
        let snapshot = BookSnapshot::default();

        assert_eq!(snapshot.best_prices(), (0, 0));
        assert_eq!(snapshot.level_count(), 0);
        assert_eq!(snapshot.state_root_hex().len(), 64);
    }

    #[test]
    fn test_best_prices_per_side() {
        let snapshot = BookSnapshot::new(vec![PriceLevel::new(100, 50)], vec![]);
        assert_eq!(snapshot.best_prices(), (100, 0));

        let snapshot = BookSnapshot::new(vec![], vec![PriceLevel::new(150, 30)]);
        assert_eq!(snapshot.best_prices(), (0, 150));
    }

    #[test]
    fn test_state_root_distinguishes_sides() {
        let as_bid = BookSnapshot::new(vec![PriceLevel::new(100, 50)], vec![]);
        let as_ask = BookSnapshot::new(vec![], vec![PriceLevel::new(100, 50)]);

        assert_ne!(as_bid.state_root(), as_ask.state_root());
    }

    #[test]
    fn test_state_root_deterministic() {
        let snapshot = BookSnapshot::new(
            vec![PriceLevel::new(105, 10), PriceLevel::new(100, 20)],
            vec![PriceLevel::new(110, 5)],
        );

        assert_eq!(snapshot.state_root(), snapshot.clone().state_root());
        assert_eq!(snapshot.volume_at(Side::Bid, 100), Some(20));
        assert_eq!(snapshot.volume_at(Side::Ask, 100), None);
    }
}
