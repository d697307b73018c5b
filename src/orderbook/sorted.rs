//! Sorted-array level storage with pluggable binary search.
//!
//! ## Design
//!
//! Levels live in one contiguous `Vec<PriceLevel>`. Every operation finds
//! its position with a lower-bound search over the side-aware rank, then
//! inserts or removes by shifting. The handle handed to orders is the price
//! itself, re-searched on each use.
//!
//! Two search strategies share the structure:
//!
//! - [`StdSearch`]: `slice::partition_point`
//! - [`BranchlessSearch`]: the base pointer advances by
//!   `predicate as usize * step`, so the loop body has no data-dependent
//!   branch and runs a fixed number of iterations for a given length
//!
//! ## Layout
//!
//! [`BestLast`] (the default) keeps the best price at the end of the array:
//! most activity happens near the top of book, and inserting or removing
//! near the end shifts few elements. [`BestFirst`] keeps it at the front.
//! `best_price` reads whichever end the layout puts the best level at.

use std::marker::PhantomData;

use crate::orderbook::LevelStore;
use crate::types::{Price, PriceLevel, Side, Volume};

// ============================================================================
// Lower-bound search
// ============================================================================

/// Lower-bound search over levels.
pub trait LowerBound {
    /// Index of the first level for which `before` is false
    ///
    /// `levels` must be partitioned: every level with `before == true`
    /// precedes every level with `before == false`.
    fn lower_bound<F>(levels: &[PriceLevel], before: F) -> usize
    where
        F: Fn(&PriceLevel) -> bool;
}

/// Standard library binary search
#[derive(Debug, Clone, Copy, Default)]
pub struct StdSearch;

impl LowerBound for StdSearch {
    #[inline]
    fn lower_bound<F>(levels: &[PriceLevel], before: F) -> usize
    where
        F: Fn(&PriceLevel) -> bool,
    {
        levels.partition_point(before)
    }
}

/// Branch-free binary search
#[derive(Debug, Clone, Copy, Default)]
pub struct BranchlessSearch;

impl LowerBound for BranchlessSearch {
    #[inline]
    fn lower_bound<F>(levels: &[PriceLevel], before: F) -> usize
    where
        F: Fn(&PriceLevel) -> bool,
    {
        let mut base = 0usize;
        let mut len = levels.len();
        while len > 0 {
            let half = len / 2;
            // base + half < base + len <= levels.len()
            let advance = usize::from(before(&levels[base + half]));
            base += advance * (len - half);
            len = half;
        }
        base
    }
}

// ============================================================================
// Layout
// ============================================================================

/// Which end of the array holds the best price.
pub trait Layout {
    /// `true` if index 0 is the best level
    const BEST_FIRST: bool;
}

/// Best price at the back (array ascending by rank)
#[derive(Debug, Clone, Copy, Default)]
pub struct BestLast;

impl Layout for BestLast {
    const BEST_FIRST: bool = false;
}

/// Best price at the front (array descending by rank)
#[derive(Debug, Clone, Copy, Default)]
pub struct BestFirst;

impl Layout for BestFirst {
    const BEST_FIRST: bool = true;
}

// ============================================================================
// SortedLevels
// ============================================================================

/// Contiguous sorted store.
#[derive(Debug)]
pub struct SortedLevels<S: LowerBound, L: Layout = BestLast> {
    side: Side,
    levels: Vec<PriceLevel>,
    _strategy: PhantomData<(S, L)>,
}

impl<S: LowerBound, L: Layout> SortedLevels<S, L> {
    /// Search for `price`; returns its index if present, else the
    /// insertion point
    #[inline]
    fn position(&self, price: Price) -> Result<usize, usize> {
        let side = self.side;
        let target = side.rank(price);
        let idx = if L::BEST_FIRST {
            S::lower_bound(&self.levels, |level| side.rank(level.price) > target)
        } else {
            S::lower_bound(&self.levels, |level| side.rank(level.price) < target)
        };

        match self.levels.get(idx) {
            Some(level) if level.price == price => Ok(idx),
            _ => Err(idx),
        }
    }

    /// Raw storage order, for layout checks
    pub fn as_slice(&self) -> &[PriceLevel] {
        &self.levels
    }
}

impl<S: LowerBound, L: Layout> LevelStore for SortedLevels<S, L> {
    type Handle = Price;

    fn new(side: Side) -> Self {
        Self {
            side,
            levels: Vec::new(),
            _strategy: PhantomData,
        }
    }

    fn with_capacity(side: Side, capacity: usize) -> Self {
        Self {
            side,
            levels: Vec::with_capacity(capacity),
            _strategy: PhantomData,
        }
    }

    #[inline]
    fn side(&self) -> Side {
        self.side
    }

    fn find_or_create(&mut self, price: Price) -> Price {
        if let Err(idx) = self.position(price) {
            self.levels.insert(idx, PriceLevel::empty(price));
            tracing::debug!(side = ?self.side, price, "level created");
        }
        price
    }

    #[inline]
    fn locate(&self, price: Price) -> Option<Price> {
        self.position(price).ok().map(|_| price)
    }

    #[inline]
    fn volume(&self, price: Price) -> Option<Volume> {
        let idx = self.position(price).ok()?;
        Some(self.levels[idx].volume)
    }

    #[inline]
    fn adjust(&mut self, price: Price, delta: Volume) -> Option<Volume> {
        let idx = self.position(price).ok()?;
        let level = &mut self.levels[idx];
        level.volume = level.volume.checked_add(delta)?;
        Some(level.volume)
    }

    fn remove_if_empty(&mut self, price: Price) -> bool {
        match self.position(price) {
            Ok(idx) if self.levels[idx].is_empty() => {
                self.levels.remove(idx);
                tracing::debug!(side = ?self.side, price, "level removed");
                true
            }
            _ => false,
        }
    }

    #[inline]
    fn best_price(&self) -> Option<Price> {
        let best = if L::BEST_FIRST {
            self.levels.first()
        } else {
            self.levels.last()
        };
        best.map(|level| level.price)
    }

    #[inline]
    fn len(&self) -> usize {
        self.levels.len()
    }

    fn levels(&self) -> Vec<PriceLevel> {
        if L::BEST_FIRST {
            self.levels.clone()
        } else {
            self.levels.iter().rev().copied().collect()
        }
    }

    fn clear(&mut self) {
        self.levels.clear();
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
