//! Stress tests for the level book.
//!
//! These tests verify:
//! 1. Every strategy sustains a generated flow without violating invariants
//! 2. Determinism: same seed produces the same state root on every strategy
//! 3. Throughput stays above a conservative floor
//!
//! ## Running Stress Tests
//!
//! ```bash
//! # Run all stress tests (release mode recommended)
//! cargo test --release --test stress_test -- --nocapture
//! ```

use std::time::Instant;

use level_book::orderbook::Strategy;
use level_book::sim::{self, SimConfig};

// ============================================================================
// TEST CONSTANTS
// ============================================================================

/// Operations per strategy for the throughput run
const STRESS_OP_COUNT: usize = 200_000;

/// Throughput floor (operations per second), low enough for debug builds
const MIN_THROUGHPUT: f64 = 20_000.0;

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

/// Replay a seeded sequence on one strategy and return the final state root.
fn run_deterministic_sequence(strategy: Strategy, seed: u64, count: usize) -> [u8; 32] {
    let config = SimConfig {
        operations: count,
        seed,
        ..SimConfig::default()
    };
    let ops = sim::generate(&config);

    let mut book = strategy.build(count);
    for op in &ops {
        op.apply(book.as_mut());
    }

    book.snapshot().state_root()
}

// ============================================================================
// STRESS TESTS
// ============================================================================

/// Replay a large generated flow on every strategy.
///
/// # Verification
/// - No panics during execution
/// - Invariants hold at the end
/// - Every operation produced a latency sample
/// - Throughput above the floor
#[test]
fn stress_generated_flow_all_strategies() {
    println!("\n=== STRESS TEST: {STRESS_OP_COUNT} operations per strategy ===\n");

    let config = SimConfig {
        operations: STRESS_OP_COUNT,
        seed: 42,
        ..SimConfig::default()
    };
    let ops = sim::generate(&config);

    for strategy in Strategy::ALL {
        let mut book = strategy.build(STRESS_OP_COUNT);

        let start = Instant::now();
        let latencies = sim::replay(book.as_mut(), &ops, false);
        let elapsed = start.elapsed();
        let throughput = STRESS_OP_COUNT as f64 / elapsed.as_secs_f64();

        let stats = latencies.stats().expect("samples recorded");
        println!("  {:<28} {:>10.0} ops/sec  p99 {:>6} ns  live {:>6}",
            strategy.title(),
            throughput,
            stats.p99,
            book.live_orders()
        );

        assert_eq!(stats.count, STRESS_OP_COUNT);
        assert!(book.verify().is_ok(), "{strategy} invariants violated");
        assert!(
            throughput >= MIN_THROUGHPUT,
            "{strategy}: throughput {throughput:.0} ops/sec below floor {MIN_THROUGHPUT:.0}"
        );
    }

    println!("\n=== STRESS TEST PASSED ===\n");
}

/// Same flow with allocator churn around each operation.
#[test]
fn stress_with_allocator_churn() {
    let config = SimConfig {
        operations: 50_000,
        seed: 7,
        churn: true,
        ..SimConfig::default()
    };
    let ops = sim::generate(&config);

    for strategy in Strategy::ALL {
        let mut book = strategy.build(config.operations);
        let latencies = sim::replay(book.as_mut(), &ops, config.churn);

        assert_eq!(latencies.len(), config.operations);
        assert!(book.verify().is_ok(), "{strategy} invariants violated");
    }
}

/// Verify determinism: same sequence produces identical state root,
/// run to run and strategy to strategy.
#[test]
fn verify_determinism() {
    const TEST_COUNT: usize = 10_000;
    const SEED: u64 = 12345;

    let reference = run_deterministic_sequence(Strategy::Tree, SEED, TEST_COUNT);
    assert_eq!(
        reference,
        run_deterministic_sequence(Strategy::Tree, SEED, TEST_COUNT),
        "State roots must match across runs"
    );

    for strategy in Strategy::ALL {
        assert_eq!(
            run_deterministic_sequence(strategy, SEED, TEST_COUNT),
            reference,
            "{strategy} state root differs"
        );
    }

    let different = run_deterministic_sequence(Strategy::Tree, SEED + 1, TEST_COUNT);
    assert_ne!(reference, different, "Different seeds should give different books");

    println!("State root: {}", hex::encode(reference));
}
