//! Catalog-level quoting defaults

use serde::{Deserialize, Serialize};

/// Default pricing parameters carried by the catalog
///
/// Every field can be overridden per quote from the command line.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Currency label used in rendered figures
    pub currency: String,

    /// Overhead (management fee) fraction applied to the subtotal
    pub overhead_pct: f64,

    /// Tax fraction applied after overhead
    pub tax_pct: f64,

    /// Profit fraction, interpreted per pricing mode
    pub margin_pct: f64,

    /// Weight-based material waste fraction
    pub scrap_rate: f64,

    /// Flat freight charge per order
    pub shipping_per_order: f64,

    /// Default packaging cost per piece (template flow)
    pub packaging_per_piece: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            currency: "USD".to_string(),
            overhead_pct: 0.05,
            tax_pct: 0.13,
            margin_pct: 0.18,
            scrap_rate: 0.03,
            shipping_per_order: 120.0,
            packaging_per_piece: 0.6,
        }
    }
}
