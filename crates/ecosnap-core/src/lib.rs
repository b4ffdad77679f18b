//! EcoSnap offline core.
//!
//! The parts of the recycling helper that must keep working without a
//! network connection:
//!
//! - `cache`: the `OfflineCacheManager`, a dual-strategy request cache over
//!   versioned cache generations
//! - `stats`: the `StatsStore`, durable points and per-material counters with
//!   a fallback backend, plus derived impact metrics
//! - `lookup`: barcode lookup routed through the offline cache
//! - `classification`: materials and recycling guidance
//!
//! Components are constructed explicitly and handed to their callers; there
//! is no global state.

pub mod cache;
pub mod classification;
pub mod config;
pub mod http;
pub mod lookup;
pub mod stats;
pub mod utils;

pub use cache::{CacheSettings, OfflineCacheManager};
pub use classification::{Classification, Material};
pub use config::Config;
pub use lookup::{ProductInfo, ProductLookup};
pub use stats::{compute_impact, ImpactMetrics, StatsStore, StatsUpdate, UserStats};
