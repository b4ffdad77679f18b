//! Offline request caching.
//!
//! This module provides the `OfflineCacheManager`, which intercepts requests
//! and answers them from a named cache generation or the network:
//!
//! - Product lookups are network-first, falling back to the cache offline
//! - Same-origin assets are cache-first, refreshed in the background
//! - Everything else passes through untouched
//!
//! Exactly one generation is current; activation deletes the rest.
//! Storage is pluggable through `CacheStorage` (on-disk or in-memory).

pub mod disk;
pub mod entry;
pub mod error;
pub mod manager;
pub mod memory;
pub mod storage;

pub use disk::DiskCacheStorage;
pub use entry::{CachedData, StoredEntry};
pub use error::CacheError;
pub use manager::{
    ActivationReport, CacheSettings, OfflineCacheManager, RefreshOutcome, RefreshResult, Route,
    WorkerState,
};
pub use memory::MemoryCacheStorage;
pub use storage::{CacheStorage, ResponseCache};
