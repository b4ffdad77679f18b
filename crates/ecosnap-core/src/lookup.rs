//! Barcode lookup against the Open Food Facts product API.
//!
//! Requests go through the `OfflineCacheManager`, so a product looked up once
//! stays resolvable offline. Lookups never fail outward; any problem is
//! reported as "not found".

use std::sync::Arc;

use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::cache::OfflineCacheManager;
use crate::classification::Classification;
use crate::http::Request;

/// Base URL of the product API; the barcode is appended as `{barcode}.json`.
pub const DEFAULT_LOOKUP_BASE_URL: &str = "https://world.openfoodfacts.org/api/v0/product/";

/// Name used when the product record has none
const UNKNOWN_PRODUCT_NAME: &str = "Unknown Product";

/// Packaging keywords per material, checked in order.
const MATERIAL_KEYWORDS: &[(Classification, &[&str])] = &[
    (Classification::Plastic, &["plastic", "pet", "hdpe"]),
    (Classification::Paper, &["paper", "cardboard", "carton"]),
    (Classification::Metal, &["metal", "alumin", "steel", "tin"]),
    (Classification::Glass, &["glass"]),
];

#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    status: i64,
    product: Option<ProductPayload>,
}

#[derive(Debug, Deserialize)]
struct ProductPayload {
    product_name: Option<String>,
    packaging: Option<String>,
    packaging_tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct ProductInfo {
    pub found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub material: Option<Classification>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub packaging: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recycling_info: Option<String>,
}

impl ProductInfo {
    pub fn not_found() -> Self {
        Self {
            found: false,
            product_name: None,
            material: None,
            packaging: None,
            recycling_info: None,
        }
    }
}

/// Infer a material from free-form packaging text.
pub fn infer_material(packaging: &str) -> Classification {
    let packaging = packaging.to_lowercase();
    MATERIAL_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| packaging.contains(k)))
        .map(|(classification, _)| *classification)
        .unwrap_or(Classification::Unknown)
}

fn is_valid_barcode(barcode: &str) -> bool {
    !barcode.is_empty() && barcode.chars().all(|c| c.is_ascii_digit())
}

pub struct ProductLookup {
    cache: Arc<OfflineCacheManager>,
    base_url: Url,
}

impl ProductLookup {
    pub fn new(cache: Arc<OfflineCacheManager>, base_url: Url) -> Self {
        Self { cache, base_url }
    }

    pub fn product_url(&self, barcode: &str) -> Option<Url> {
        self.base_url.join(&format!("{}.json", barcode)).ok()
    }

    pub async fn lookup(&self, barcode: &str) -> ProductInfo {
        let barcode = barcode.trim();
        if !is_valid_barcode(barcode) {
            debug!(barcode, "Rejecting malformed barcode");
            return ProductInfo::not_found();
        }
        let Some(url) = self.product_url(barcode) else {
            return ProductInfo::not_found();
        };

        let response = match self.cache.handle(Request::get(url)).await {
            Ok(response) => response,
            Err(e) => {
                warn!(barcode, error = %e, "Barcode lookup failed");
                return ProductInfo::not_found();
            }
        };

        let parsed: LookupResponse = match response.json() {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(barcode, status = response.status, error = %e, "Unreadable lookup response");
                return ProductInfo::not_found();
            }
        };

        match parsed.product {
            Some(product) if parsed.status == 1 => Self::to_info(product),
            _ => {
                debug!(barcode, status = parsed.status, "Product not found");
                ProductInfo::not_found()
            }
        }
    }

    fn to_info(product: ProductPayload) -> ProductInfo {
        let packaging = product
            .packaging
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| product.packaging_tags.unwrap_or_default().join(", "));
        let material = infer_material(&packaging);
        let product_name = product
            .product_name
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| UNKNOWN_PRODUCT_NAME.to_string());

        ProductInfo {
            found: true,
            product_name: Some(product_name),
            material: Some(material),
            packaging: Some(packaging),
            recycling_info: Some(material.guidance().to_string()),
        }
    }
}
