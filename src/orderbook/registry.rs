//! Per-order bookkeeping.
//!
//! ## Design
//!
//! The registry is the only place that decides whether an order id is live.
//! Order records live in a slab and an id → key map points into it, the
//! same arrangement used for O(1) cancel-by-id.
//!
//! ## Slab Integration
//!
//! Per official slab docs (https://docs.rs/slab/0.4.11):
//! - Keys are `usize` values returned by `slab.insert()`
//! - Keys may be reused after `slab.remove()`
//! - O(1) insert, remove, and lookup
//!
//! Slab keys never leave this module; callers address orders by id.

use std::collections::HashMap;

use slab::Slab;

use crate::types::{OrderId, Price, Side, Volume};

/// A live order.
///
/// `H` is the level handle type of the store holding the order's level.
/// The registry owns the record; the store owns the level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order<H> {
    /// Unique id among live orders
    pub id: OrderId,

    /// Side the order rests on
    pub side: Side,

    /// Price of the level the order contributes to
    pub price: Price,

    /// Volume this order currently contributes to its level
    pub remaining: Volume,

    /// Handle of the level in its side's store
    pub level: H,
}

/// Order id → order record, backed by a slab arena.
#[derive(Debug)]
pub struct OrderRegistry<H> {
    /// Order storage
    orders: Slab<Order<H>>,

    /// Order ID to slab key mapping
    index: HashMap<OrderId, usize>,
}

impl<H> Default for OrderRegistry<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> OrderRegistry<H> {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            orders: Slab::new(),
            index: HashMap::new(),
        }
    }

    /// Create a registry with pre-allocated capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            orders: Slab::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
        }
    }

    /// Register a new order
    ///
    /// # Returns
    ///
    /// `false` without touching anything if `id` is already live.
    pub fn register(
        &mut self,
        id: OrderId,
        side: Side,
        price: Price,
        volume: Volume,
        level: H,
    ) -> bool {
        if self.index.contains_key(&id) {
            return false;
        }

        let key = self.orders.insert(Order {
            id,
            side,
            price,
            remaining: volume,
            level,
        });
        self.index.insert(id, key);
        true
    }

    /// Look up a live order
    #[inline]
    pub fn lookup(&self, id: OrderId) -> Option<&Order<H>> {
        let key = *self.index.get(&id)?;
        self.orders.get(key)
    }

    /// Set a live order's remaining volume
    ///
    /// # Returns
    ///
    /// `false` if the id is not live.
    pub fn update(&mut self, id: OrderId, volume: Volume) -> bool {
        let Some(&key) = self.index.get(&id) else {
            return false;
        };
        match self.orders.get_mut(key) {
            Some(order) => {
                order.remaining = volume;
                true
            }
            None => false,
        }
    }

    /// Remove an order, returning its record
    pub fn remove(&mut self, id: OrderId) -> Option<Order<H>> {
        let key = self.index.remove(&id)?;
        self.orders.try_remove(key)
    }

    /// Check if an id is live
    #[inline]
    pub fn contains(&self, id: OrderId) -> bool {
        self.index.contains_key(&id)
    }

    /// Number of live orders
    #[inline]
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    /// Check if no order is live
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Iterate over live orders in arbitrary order
    pub fn iter(&self) -> impl Iterator<Item = &Order<H>> {
        self.orders.iter().map(|(_, order)| order)
    }

    /// Drop every order
    pub fn clear(&mut self) {
        self.orders.clear();
        self.index.clear();
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_new() {
        let registry: OrderRegistry<usize> = OrderRegistry::with_capacity(16);

        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
        assert!(registry.lookup(1).is_none());
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = OrderRegistry::new();

        assert!(registry.register(7, Side::Ask, 150, 30, 3usize));

        let order = registry.lookup(7).unwrap();
        assert_eq!(order.id, 7);
        assert_eq!(order.side, Side::Ask);
        assert_eq!(order.price, 150);
        assert_eq!(order.remaining, 30);
        assert_eq!(order.level, 3);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_register_duplicate_is_rejected() {
        let mut registry = OrderRegistry::new();

        assert!(registry.register(1, Side::Bid, 100, 50, 0usize));
        assert!(!registry.register(1, Side::Ask, 200, 10, 1usize));

        // Original record untouched
        let order = registry.lookup(1).unwrap();
        assert_eq!(order.side, Side::Bid);
        assert_eq!(order.price, 100);
        assert_eq!(order.remaining, 50);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_update() {
        let mut registry = OrderRegistry::new();
        registry.register(1, Side::Bid, 100, 50, 0usize);

        assert!(registry.update(1, 20));
        assert_eq!(registry.lookup(1).unwrap().remaining, 20);
        assert!(!registry.update(2, 20));
    }

    #[test]
    fn test_remove_and_reuse_id() {
        let mut registry = OrderRegistry::new();
        registry.register(1, Side::Bid, 100, 50, 0usize);

        let removed = registry.remove(1).unwrap();
        assert_eq!(removed.remaining, 50);
        assert!(!registry.contains(1));
        assert!(registry.remove(1).is_none());

        // A removed id registers fresh
        assert!(registry.register(1, Side::Ask, 120, 5, 9usize));
        assert_eq!(registry.lookup(1).unwrap().side, Side::Ask);
    }

    #[test]
    fn test_clear() {
        let mut registry = OrderRegistry::new();
        registry.register(1, Side::Bid, 100, 50, 0usize);
        registry.register(2, Side::Ask, 110, 50, 1usize);

        registry.clear();

        assert!(registry.is_empty());
        assert!(!registry.contains(1));
        assert_eq!(registry.iter().count(), 0);
    }
}
