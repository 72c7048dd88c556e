//! Packaging rule records (per-unit and per-carton)

use serde::{Deserialize, Serialize};

/// How a packaging rule consumes its item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PackagingKind {
    /// Consumed in proportion to finished units
    PerUnit,
    /// Consumed per shipping carton
    PerCarton,
}

impl Default for PackagingKind {
    fn default() -> Self {
        PackagingKind::PerUnit
    }
}

impl std::fmt::Display for PackagingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PackagingKind::PerUnit => write!(f, "per_unit"),
            PackagingKind::PerCarton => write!(f, "per_carton"),
        }
    }
}

/// A packaging consumption rule
///
/// On disk the two kinds live in separate lists under `packaging_rules`;
/// the loader stamps `kind` from the list an entry came from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackagingRule {
    /// Packaging item code (catalog key)
    pub item_code: String,

    /// Consumption basis
    #[serde(default)]
    pub kind: PackagingKind,

    /// Price per packaging unit
    #[serde(default)]
    pub unit_cost: f64,

    /// Quantity consumed per finished unit (per-unit rules)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qty_per_unit: Option<f64>,

    /// Quantity consumed per carton (per-carton rules)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qty_per_carton: Option<f64>,

    /// Finished units per carton; falls back to the product's value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units_per_carton: Option<u32>,
}
