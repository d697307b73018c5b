//! Error types.
//!
//! The four book operations never fail: unknown ids and duplicate adds are
//! no-ops. Errors only surface from [`OrderBook::verify`], which audits the
//! order↔level invariants, and from the latency harness when exporting
//! samples.
//!
//! [`OrderBook::verify`]: crate::orderbook::OrderBook::verify

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::types::{OrderId, Price, Side, Volume};

/// Invariant violation found while auditing a book.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookError {
    /// A live order refers to a level that does not exist on its side
    #[error("order {id} refers to missing {side:?} level at {price}")]
    MissingLevel { id: OrderId, side: Side, price: Price },

    /// A level's aggregate differs from the sum of its live orders
    #[error("{side:?} level {price}: aggregate {actual} != order sum {expected}")]
    VolumeMismatch {
        side: Side,
        price: Price,
        expected: Volume,
        actual: Volume,
    },

    /// A level is kept at zero or negative volume
    #[error("{side:?} level {price} persisted at non-positive volume {volume}")]
    NonPositiveLevel { side: Side, price: Price, volume: Volume },

    /// A level has no live order contributing to it
    #[error("{side:?} level {price} has no live orders")]
    OrphanLevel { side: Side, price: Price },

    /// Levels are not strictly ordered best-first
    #[error("{side:?} levels out of order: {previous} before {next}")]
    Unordered { side: Side, previous: Price, next: Price },
}

/// Failure inside the latency harness.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// Writing the per-operation samples failed
    #[error("failed to export samples to {path}: {source}")]
    Export {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
