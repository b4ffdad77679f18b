//! Materials, classification outcomes, and recycling guidance.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A recyclable material. Each confirmed classification credits exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "lowercase")]
pub enum Material {
    Plastic,
    Paper,
    Metal,
    Glass,
}

impl Material {
    pub const ALL: [Material; 4] = [
        Material::Plastic,
        Material::Paper,
        Material::Metal,
        Material::Glass,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Material::Plastic => "plastic",
            Material::Paper => "paper",
            Material::Metal => "metal",
            Material::Glass => "glass",
        }
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Material {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "plastic" => Ok(Material::Plastic),
            "paper" => Ok(Material::Paper),
            "metal" => Ok(Material::Metal),
            "glass" => Ok(Material::Glass),
            other => Err(format!(
                "unknown material '{}' (expected plastic, paper, metal or glass)",
                other
            )),
        }
    }
}

/// Outcome of classifying an item: a material, or nothing recognizable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    Plastic,
    Paper,
    Metal,
    Glass,
    Unknown,
}

impl Classification {
    /// The material to credit, if any.
    pub fn material(self) -> Option<Material> {
        match self {
            Classification::Plastic => Some(Material::Plastic),
            Classification::Paper => Some(Material::Paper),
            Classification::Metal => Some(Material::Metal),
            Classification::Glass => Some(Material::Glass),
            Classification::Unknown => None,
        }
    }

    pub fn guidance(self) -> &'static str {
        match self {
            Classification::Plastic => {
                "♻️ Rinse container, remove caps and labels. Check for recycling symbol #1-7. Place in plastics bin."
            }
            Classification::Paper => {
                "📄 Keep dry and clean. Remove any plastic windows or coatings. Flatten boxes before recycling."
            }
            Classification::Metal => {
                "🥫 Rinse cans thoroughly. Labels can stay on. Crush if possible to save space."
            }
            Classification::Glass => {
                "🍶 Rinse container. Remove lids and corks. Sort by color if required locally."
            }
            Classification::Unknown => {
                "❓ Unable to classify. Try scanning the barcode for accurate identification."
            }
        }
    }
}

impl From<Material> for Classification {
    fn from(material: Material) -> Self {
        match material {
            Material::Plastic => Classification::Plastic,
            Material::Paper => Classification::Paper,
            Material::Metal => Classification::Metal,
            Material::Glass => Classification::Glass,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_material_parse() {
        assert_eq!("Plastic".parse::<Material>(), Ok(Material::Plastic));
        assert_eq!(" glass ".parse::<Material>(), Ok(Material::Glass));
        assert!("wood".parse::<Material>().is_err());
    }

    #[test]
    fn test_classification_material_round_trip() {
        for material in Material::ALL {
            assert_eq!(Classification::from(material).material(), Some(material));
        }
        assert_eq!(Classification::Unknown.material(), None);
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Material::Metal).unwrap(), "\"metal\"");
        assert_eq!(
            serde_json::from_str::<Classification>("\"unknown\"").unwrap(),
            Classification::Unknown
        );
    }

    #[test]
    fn test_guidance_mentions_action() {
        assert!(Classification::Paper.guidance().contains("Flatten boxes"));
        assert!(Classification::Unknown.guidance().contains("barcode"));
    }
}
