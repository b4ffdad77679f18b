use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::classification::Material;
use crate::utils::to_fixed;

/// kg CO2 saved per recycled item
const CO2_KG_PER_ITEM: f64 = 0.23;
/// Liters of water saved per recycled item
const WATER_L_PER_ITEM: f64 = 1.5;
/// kWh saved per recycled item
const ENERGY_KWH_PER_ITEM: f64 = 0.1;
const TREES_PER_ITEM: f64 = 0.01;

/// The user's cumulative statistics. Field names are camelCase on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase", default)]
pub struct UserStats {
    pub total_points: u64,
    pub items_recycled: u64,
    pub plastic_items: u64,
    pub paper_items: u64,
    pub metal_items: u64,
    pub glass_items: u64,
    pub barcode_scans: u64,
    pub last_activity: DateTime<Utc>,
}

impl Default for UserStats {
    fn default() -> Self {
        Self {
            total_points: 0,
            items_recycled: 0,
            plastic_items: 0,
            paper_items: 0,
            metal_items: 0,
            glass_items: 0,
            barcode_scans: 0,
            last_activity: Utc::now(),
        }
    }
}

impl UserStats {
    pub fn material_count(&self, material: Material) -> u64 {
        match material {
            Material::Plastic => self.plastic_items,
            Material::Paper => self.paper_items,
            Material::Metal => self.metal_items,
            Material::Glass => self.glass_items,
        }
    }

    pub fn material_total(&self) -> u64 {
        Material::ALL
            .iter()
            .fold(0u64, |total, m| total.saturating_add(self.material_count(*m)))
    }

    /// Shallow-merge `update` over this record. `last_activity` is left alone.
    pub fn merged(&self, update: &StatsUpdate) -> UserStats {
        UserStats {
            total_points: update.total_points.unwrap_or(self.total_points),
            items_recycled: update.items_recycled.unwrap_or(self.items_recycled),
            plastic_items: update.plastic_items.unwrap_or(self.plastic_items),
            paper_items: update.paper_items.unwrap_or(self.paper_items),
            metal_items: update.metal_items.unwrap_or(self.metal_items),
            glass_items: update.glass_items.unwrap_or(self.glass_items),
            barcode_scans: update.barcode_scans.unwrap_or(self.barcode_scans),
            last_activity: self.last_activity,
        }
    }
}

/// A partial `UserStats`: set fields replace the stored values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatsUpdate {
    pub total_points: Option<u64>,
    pub items_recycled: Option<u64>,
    pub plastic_items: Option<u64>,
    pub paper_items: Option<u64>,
    pub metal_items: Option<u64>,
    pub glass_items: Option<u64>,
    pub barcode_scans: Option<u64>,
}

impl StatsUpdate {
    /// Set the counter for one material.
    pub fn with_material_count(mut self, material: Material, count: u64) -> Self {
        match material {
            Material::Plastic => self.plastic_items = Some(count),
            Material::Paper => self.paper_items = Some(count),
            Material::Metal => self.metal_items = Some(count),
            Material::Glass => self.glass_items = Some(count),
        }
        self
    }
}

/// Environmental savings, as fixed-precision display strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct ImpactMetrics {
    /// kg, one decimal
    pub co2_saved: String,
    /// liters, no decimals
    pub water_saved: String,
    /// kWh, one decimal
    pub energy_saved: String,
    /// two decimals
    pub trees_equivalent: String,
}

pub fn compute_impact(stats: &UserStats) -> ImpactMetrics {
    let items = stats.items_recycled as f64;
    ImpactMetrics {
        co2_saved: to_fixed(items * CO2_KG_PER_ITEM, 1),
        water_saved: to_fixed(items * WATER_L_PER_ITEM, 0),
        energy_saved: to_fixed(items * ENERGY_KWH_PER_ITEM, 1),
        trees_equivalent: to_fixed(items * TREES_PER_ITEM, 2),
    }
}
