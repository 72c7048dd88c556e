//! Fabricated part records with blank geometry and routing

use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

fn default_edge_margin() -> f64 {
    10.0
}

fn default_kerf() -> f64 {
    2.0
}

fn default_nest_efficiency() -> f64 {
    0.85
}

/// One routing operation applied to a part
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessStep {
    /// Process code, resolved against the process catalog
    pub process_code: String,

    /// Runtime minutes per unit produced
    #[serde(default)]
    pub minutes_per_unit: f64,

    /// Disabled steps are skipped without pricing
    #[serde(default = "default_true")]
    pub enabled: bool,
}

/// A fabricated (make) part cut from stock material
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    /// Part code (catalog key)
    pub part_code: String,

    /// Display name
    pub name: String,

    /// Material code, resolved against the material catalog
    pub material_code: String,

    /// Finished part thickness in millimeters
    #[serde(default)]
    pub thickness_mm: f64,

    /// Flat blank length in millimeters
    #[serde(default)]
    pub blank_length_mm: f64,

    /// Flat blank width in millimeters
    #[serde(default)]
    pub blank_width_mm: f64,

    /// Whether blanks may be rotated 90 degrees when nesting
    #[serde(default = "default_true")]
    pub allow_rotate: bool,

    /// Unusable margin along each sheet edge, millimeters
    #[serde(default = "default_edge_margin")]
    pub edge_margin_mm: f64,

    /// Cutting-tool kerf added as spacing between blanks, millimeters
    #[serde(default = "default_kerf")]
    pub kerf_mm: f64,

    /// Nesting efficiency factor in (0, 1]
    #[serde(default = "default_nest_efficiency")]
    pub nest_efficiency: f64,

    /// Routing, in operation order
    #[serde(default)]
    pub process_steps: Vec<ProcessStep>,
}
