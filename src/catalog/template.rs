//! Product template records for the template-driven quoting flow
//!
//! Templates describe a single weight-priced product with a default
//! routing, quoted without a bill of materials.

use serde::{Deserialize, Serialize};

/// A default routing entry on a template
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateProcess {
    /// Process code, resolved against the process catalog
    pub process_code: String,

    /// Default runtime minutes per unit
    #[serde(default)]
    pub minutes: f64,
}

/// A template-quoted product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductTemplate {
    /// Template SKU (catalog key)
    pub sku: String,

    /// Display name
    pub name: String,

    /// Material code, resolved against the material catalog
    pub material_code: String,

    /// Finished weight per unit in kilograms
    #[serde(default)]
    pub weight_kg_per_unit: f64,

    /// Default routing, in operation order
    #[serde(default)]
    pub default_processes: Vec<TemplateProcess>,
}
