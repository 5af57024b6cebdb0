//! Product read model.
//!
//! Products are owned by the catalog side of the admin server; the order
//! core only reads per-branch variant availability for dashboard stock
//! displays. Nothing here mutates products.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A catalog product with per-branch variant availability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub image: String,
    pub price: f64,
    /// Branch key -> variant list. Every branch carries the full variant
    /// list; only the `available` flags differ per branch.
    #[serde(default)]
    pub branches: BTreeMap<String, Vec<ProductVariant>>,
}

/// One sellable variant of a product at a branch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductVariant {
    pub name: String,
    #[serde(default)]
    pub available: bool,
}

impl Product {
    /// Variants of this product available at `branch`.
    pub fn available_variants(&self, branch: &str) -> Vec<&ProductVariant> {
        self.branches
            .get(branch)
            .map(|variants| variants.iter().filter(|v| v.available).collect())
            .unwrap_or_default()
    }
}

/// Total count of available variants across a product list for one branch.
/// Backs the "N products available" dashboard card.
pub fn available_variant_count(products: &[Product], branch: &str) -> usize {
    products
        .iter()
        .map(|p| p.available_variants(branch).len())
        .sum()
}
