//! Synthetic order flow and timed replay.
//!
//! ## Generator
//!
//! Each step draws an operation kind uniformly from {add, modify, delete}
//! and a side uniformly from {Bid, Ask}. An add is forced while no id is
//! believed live. Adds take the next sequential id (starting at 1) with a
//! uniform price and volume; modify and delete pick a uniform believed-live
//! id. Delete forgets the id; an id implicitly cancelled by a modify is
//! *not* forgotten, because the generator never looks at the book, so later
//! steps keep hitting the no-op path for it.
//!
//! The RNG is `ChaCha8Rng` seeded from [`SimConfig::seed`]: the same seed
//! yields the same sequence on every platform.
//!
//! ## Replay
//!
//! [`run_timed`] applies a pre-generated sequence to any [`PriceBook`],
//! timing each operation individually. Generation happens up front so the
//! RNG is outside the measured region and every strategy replays the exact
//! same sequence. With `churn` on, a scratch heap buffer of
//! `1024 + (i % 512)` bytes is allocated before each timed operation and
//! freed after it.
//!
//! ## Example
//!
//! ```
//! use level_book::orderbook::Strategy;
//! use level_book::sim::{self, SimConfig};
//!
//! let config = SimConfig { operations: 1_000, ..SimConfig::default() };
//! let ops = sim::generate(&config);
//!
//! let mut book = Strategy::Linear.build(config.operations);
//! let latencies = sim::replay(book.as_mut(), &ops, config.churn);
//!
//! assert_eq!(latencies.len(), 1_000);
//! assert!(book.verify().is_ok());
//! ```

use std::hint::black_box;
use std::ops::RangeInclusive;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::latency::{LatencyRecorder, ScopedTimer};
use crate::orderbook::PriceBook;
use crate::types::{BookOp, OrderId, Price, Side, Volume};

/// Default number of operations per run
pub const DEFAULT_OPERATIONS: usize = 100_000;

/// Default seed
pub const DEFAULT_SEED: u64 = 42;

/// Default price range (minor units)
pub const DEFAULT_PRICES: RangeInclusive<Price> = 10..=200;

/// Default volume range
pub const DEFAULT_VOLUMES: RangeInclusive<Volume> = 10..=100;

/// Load generation settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimConfig {
    /// Number of operations to generate
    pub operations: usize,

    /// RNG seed
    pub seed: u64,

    /// Prices for new orders (inclusive)
    pub price_range: RangeInclusive<Price>,

    /// Volumes for adds and modifies (inclusive)
    pub volume_range: RangeInclusive<Volume>,

    /// Allocate a scratch buffer around each timed operation
    pub churn: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            operations: DEFAULT_OPERATIONS,
            seed: DEFAULT_SEED,
            price_range: DEFAULT_PRICES,
            volume_range: DEFAULT_VOLUMES,
            churn: false,
        }
    }
}

/// Endless stream of random book operations.
#[derive(Debug, Clone)]
pub struct LoadGenerator {
    rng: ChaCha8Rng,
    price_range: RangeInclusive<Price>,
    volume_range: RangeInclusive<Volume>,

    /// Ids the generator believes are live
    active: Vec<OrderId>,

    /// Next id for an add
    next_id: OrderId,
}

impl LoadGenerator {
    /// Create a generator from a config
    ///
    /// # Panics
    ///
    /// Panics if either range in `config` is empty.
    pub fn new(config: &SimConfig) -> Self {
        assert!(!config.price_range.is_empty(), "empty price range");
        assert!(!config.volume_range.is_empty(), "empty volume range");

        Self {
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            price_range: config.price_range.clone(),
            volume_range: config.volume_range.clone(),
            active: Vec::new(),
            next_id: 1,
        }
    }

    /// Number of ids currently believed live
    pub fn believed_live(&self) -> usize {
        self.active.len()
    }

    /// Draw the next operation
    pub fn next_op(&mut self) -> BookOp {
        let kind = self.rng.gen_range(0..3u8);
        let side = if self.rng.gen_bool(0.5) {
            Side::Bid
        } else {
            Side::Ask
        };

        if kind == 0 || self.active.is_empty() {
            let id = self.next_id;
            self.next_id += 1;
            let price = self.rng.gen_range(self.price_range.clone());
            let volume = self.rng.gen_range(self.volume_range.clone());
            self.active.push(id);
            BookOp::Add {
                id,
                side,
                price,
                volume,
            }
        } else if kind == 1 {
            let idx = self.rng.gen_range(0..self.active.len());
            let volume = self.rng.gen_range(self.volume_range.clone());
            BookOp::Modify {
                id: self.active[idx],
                volume,
            }
        } else {
            let idx = self.rng.gen_range(0..self.active.len());
            BookOp::Delete {
                id: self.active.swap_remove(idx),
            }
        }
    }
}

impl Iterator for LoadGenerator {
    type Item = BookOp;

    fn next(&mut self) -> Option<BookOp> {
        Some(self.next_op())
    }
}

/// Generate `config.operations` operations
pub fn generate(config: &SimConfig) -> Vec<BookOp> {
    let mut generator = LoadGenerator::new(config);
    let ops: Vec<BookOp> = generator.by_ref().take(config.operations).collect();
    tracing::debug!(
        operations = ops.len(),
        seed = config.seed,
        believed_live = generator.believed_live(),
        "load generated"
    );
    ops
}

/// Apply `ops` to `book`, recording one latency sample per operation
pub fn run_timed<B: PriceBook + ?Sized>(
    book: &mut B,
    ops: &[BookOp],
    churn: bool,
    recorder: &mut LatencyRecorder,
) {
    for (i, op) in ops.iter().enumerate() {
        let scratch = churn.then(|| black_box(vec![0u8; 1024 + (i % 512)]));
        {
            let _timer = ScopedTimer::new(recorder);
            op.apply(book);
        }
        drop(scratch);
    }
}

/// [`run_timed`] into a fresh recorder
pub fn replay<B: PriceBook + ?Sized>(book: &mut B, ops: &[BookOp], churn: bool) -> LatencyRecorder {
    let mut recorder = LatencyRecorder::with_capacity(ops.len());
    run_timed(book, ops, churn, &mut recorder);
    recorder
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orderbook::Strategy;

    #[test]
    fn test_same_seed_same_sequence() {
        let config = SimConfig {
            operations: 500,
            seed: 7,
            ..SimConfig::default()
        };

        assert_eq!(generate(&config), generate(&config));

        let other = SimConfig { seed: 8, ..config.clone() };
        assert_ne!(generate(&config), generate(&other));
    }

    #[test]
    fn test_first_op_is_add() {
        let mut generator = LoadGenerator::new(&SimConfig::default());

        assert!(matches!(generator.next_op(), BookOp::Add { id: 1, .. }));
        assert_eq!(generator.believed_live(), 1);
    }

    #[test]
    fn test_ops_respect_ranges_and_targets() {
        let config = SimConfig {
            operations: 5_000,
            seed: 99,
            price_range: 50..=60,
            volume_range: 1..=5,
            churn: false,
        };

        let mut issued = 0;
        for op in generate(&config) {
            match op {
                BookOp::Add { id, price, volume, .. } => {
                    issued += 1;
                    assert_eq!(id, issued);
                    assert!(config.price_range.contains(&price));
                    assert!(config.volume_range.contains(&volume));
                }
                BookOp::Modify { id, volume } => {
                    assert!(id <= issued);
                    assert!(config.volume_range.contains(&volume));
                }
                BookOp::Delete { id } => assert!(id <= issued),
            }
        }
        assert!(issued > 0);
    }

    #[test]
    fn test_deleted_ids_are_not_reused() {
        let ops = generate(&SimConfig {
            operations: 2_000,
            ..SimConfig::default()
        });

        let mut deleted = std::collections::HashSet::new();
        for op in ops {
            if let BookOp::Delete { id } = op {
                assert!(deleted.insert(id), "id {id} deleted twice");
            } else {
                assert!(!deleted.contains(&op.order_id()));
            }
        }
    }

    #[test]
    fn test_run_timed_records_every_op() {
        let config = SimConfig {
            operations: 300,
            churn: true,
            ..SimConfig::default()
        };
        let ops = generate(&config);
        let mut book = Strategy::Tree.build(config.operations);

        let mut recorder = LatencyRecorder::new();
        run_timed(book.as_mut(), &ops, config.churn, &mut recorder);

        assert_eq!(recorder.len(), 300);
        assert!(book.verify().is_ok());
    }
}
