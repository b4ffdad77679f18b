use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{debug, error, warn};

use super::backend::{
    FileKeyValueStore, FileLocalStorage, KeyValueBackend, LocalStorageBackend, StatsBackend,
};
use super::{compute_impact, ImpactMetrics, StatsUpdate, UserStats};
use crate::classification::Material;

/// Key the stats record is persisted under in both backends.
pub const STATS_KEY: &str = "ecosnap-stats";

/// Points for a camera classification
const CAMERA_POINTS: u64 = 10;
/// Points for a barcode lookup
const BARCODE_POINTS: u64 = 5;

/// Owner of the `UserStats` record.
///
/// By default updates are plain read-merge-write sequences: two concurrent
/// updates can read the same prior record and the later write wins. Build
/// with `with_serialized_updates` to run them one at a time instead.
pub struct StatsStore {
    primary: Arc<dyn StatsBackend>,
    fallback: Arc<dyn StatsBackend>,
    write_lock: Option<Mutex<()>>,
}

impl StatsStore {
    pub fn new(primary: Arc<dyn StatsBackend>, fallback: Arc<dyn StatsBackend>) -> Self {
        Self {
            primary,
            fallback,
            write_lock: None,
        }
    }

    /// File-backed store: structured documents under `data_dir/kv`, JSON text
    /// under `data_dir/local`.
    pub fn open(data_dir: &Path) -> Self {
        Self::new(
            Arc::new(KeyValueBackend::new(FileKeyValueStore::new(data_dir.join("kv")))),
            Arc::new(LocalStorageBackend::new(FileLocalStorage::new(
                data_dir.join("local"),
            ))),
        )
    }

    pub fn with_serialized_updates(mut self) -> Self {
        self.write_lock = Some(Mutex::new(()));
        self
    }

    pub fn is_serialized(&self) -> bool {
        self.write_lock.is_some()
    }

    /// Current stats. Never fails: falls back to the secondary backend, then
    /// to defaults.
    ///
    /// The primary is authoritative whenever it answers, even with nothing.
    pub async fn get_stats(&self) -> UserStats {
        match self.primary.load(STATS_KEY).await {
            Ok(stats) => return stats.unwrap_or_default(),
            Err(e) => {
                warn!(backend = self.primary.name(), error = %e, "Primary stats read failed, using fallback");
            }
        }
        match self.fallback.load(STATS_KEY).await {
            Ok(stats) => stats.unwrap_or_default(),
            Err(e) => {
                warn!(backend = self.fallback.name(), error = %e, "Fallback stats read failed, using defaults");
                UserStats::default()
            }
        }
    }

    /// Merge `update` over the current stats, stamp the activity time, persist.
    pub async fn apply_update(&self, update: StatsUpdate) -> UserStats {
        let _guard = self.lock().await;
        let current = self.get_stats().await;
        self.write(&current, &update).await
    }

    /// Credit one classified item: 10 points from the camera, 5 from a barcode.
    pub async fn record_classification(
        &self,
        material: Material,
        is_barcode_scan: bool,
    ) -> UserStats {
        let _guard = self.lock().await;
        let current = self.get_stats().await;

        let points = if is_barcode_scan {
            BARCODE_POINTS
        } else {
            CAMERA_POINTS
        };
        let mut update = StatsUpdate {
            total_points: Some(current.total_points.saturating_add(points)),
            items_recycled: Some(current.items_recycled.saturating_add(1)),
            ..StatsUpdate::default()
        }
        .with_material_count(material, current.material_count(material).saturating_add(1));
        if is_barcode_scan {
            update.barcode_scans = Some(current.barcode_scans.saturating_add(1));
        }

        debug!(%material, is_barcode_scan, points, "Recording classification");
        self.write(&current, &update).await
    }

    pub fn compute_impact(&self, stats: &UserStats) -> ImpactMetrics {
        compute_impact(stats)
    }

    async fn lock(&self) -> Option<tokio::sync::MutexGuard<'_, ()>> {
        match &self.write_lock {
            Some(lock) => Some(lock.lock().await),
            None => None,
        }
    }

    async fn write(&self, current: &UserStats, update: &StatsUpdate) -> UserStats {
        let mut stats = current.merged(update);
        stats.last_activity = Utc::now();

        match self.primary.save(STATS_KEY, &stats).await {
            Ok(()) => return stats,
            Err(e) => {
                warn!(backend = self.primary.name(), error = %e, "Primary stats write failed, using fallback");
            }
        }
        if let Err(e) = self.fallback.save(STATS_KEY, &stats).await {
            error!(backend = self.fallback.name(), error = %e, "Stats not persisted: both backends failed");
        }
        stats
    }
}

// ============================================================================
// Tests
// ============================================================================
