pub mod carts;
pub mod items;

use std::sync::atomic::{AtomicU64, Ordering};

use thiserror::Error;

pub use carts::{CartOperations, CartQuery, CartRepository};
pub use items::{ItemOperations, ItemQuery, ItemRepository};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Cart {0} not found.")]
    CartNotFound(u64),
    #[error("Item {0} not found.")]
    ItemNotFound(u64),
}

/// Records that are never physically removed, only flagged.
pub trait SoftDeletable {
    fn is_deleted(&self) -> bool;
}

pub trait Priced {
    fn price(&self) -> f64;
}

/// Monotonic id source starting at 0. Each repository owns its own.
#[derive(Debug, Default)]
pub struct IdGenerator {
    next: AtomicU64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }
}

/// Inclusive price bounds; a missing bound does not constrain.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct PriceRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl PriceRange {
    pub fn new(min: Option<f64>, max: Option<f64>) -> Self {
        Self { min, max }
    }

    pub fn contains<T: Priced>(&self, record: &T) -> bool {
        let price = record.price();
        self.min.map_or(true, |min| price >= min) && self.max.map_or(true, |max| price <= max)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub offset: usize,
    pub limit: usize,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 10,
        }
    }
}

impl Page {
    pub fn new(offset: usize, limit: usize) -> Self {
        Self { offset, limit }
    }

    /// Slices `[offset, offset + limit)`; an offset past the end yields nothing.
    pub fn apply<T>(&self, records: Vec<T>) -> Vec<T> {
        records
            .into_iter()
            .skip(self.offset)
            .take(self.limit)
            .collect()
    }
}
