//! Book operations as values.
//!
//! The load generator produces [`BookOp`]s and the harness replays them
//! against any [`PriceBook`]. Keeping operations as data lets the same
//! sequence be applied to every strategy.

use crate::orderbook::PriceBook;
use crate::types::{OrderId, Price, Side, Volume};

/// A single mutation of the book.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookOp {
    /// Register a new order and add its volume to a level
    Add {
        id: OrderId,
        side: Side,
        price: Price,
        volume: Volume,
    },
    /// Replace an order's remaining volume
    Modify { id: OrderId, volume: Volume },
    /// Cancel an order
    Delete { id: OrderId },
}

impl BookOp {
    /// Apply this operation to a book
    #[inline]
    pub fn apply<B: PriceBook + ?Sized>(&self, book: &mut B) {
        match *self {
            BookOp::Add { id, side, price, volume } => book.add_order(id, side, price, volume),
            BookOp::Modify { id, volume } => book.modify_order(id, volume),
            BookOp::Delete { id } => book.delete_order(id),
        }
    }

    #[cfg(test)]
    pub(crate) fn order_id(&self) -> OrderId {
        match *self {
            BookOp::Add { id, .. } | BookOp::Modify { id, .. } | BookOp::Delete { id } => id,
        }
    }
}
