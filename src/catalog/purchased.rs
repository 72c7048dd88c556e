//! Purchased (buy) item records

use serde::{Deserialize, Serialize};

/// A bought-in component priced per unit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchasedItem {
    /// Item code (catalog key)
    pub item_code: String,

    /// Display name
    pub name: String,

    /// Price per unit of measure
    #[serde(default)]
    pub unit_cost: f64,

    /// Unit of measure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uom: Option<String>,

    /// Expected handling/assembly waste fraction
    #[serde(default)]
    pub waste_pct: f64,

    /// Minimum order quantity floor, if the supplier enforces one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub moq_qty: Option<f64>,
}
