//! Cumulative recycling statistics.
//!
//! This module provides:
//! - `StatsStore`: read-modify-write access to the single `UserStats` record
//! - `StatsBackend`: one persistence interface with two adapters, a
//!   structured key-value store (primary) and a string local store (fallback)
//! - `compute_impact`: environmental savings derived from the record
//!
//! Persistence failures never surface to callers: the primary backend falls
//! back to the secondary, and if both fail the merged record is still
//! returned, just not saved.

pub mod backend;
pub mod model;
pub mod store;

pub use backend::{
    FileKeyValueStore, FileLocalStorage, KeyValueBackend, KeyValueStore, LocalStorage,
    LocalStorageBackend, MemoryKeyValueStore, MemoryLocalStorage, StatsBackend, StoreError,
};
pub use model::{compute_impact, ImpactMetrics, StatsUpdate, UserStats};
pub use store::{StatsStore, STATS_KEY};
