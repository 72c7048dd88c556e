//! Material records - raw stock priced by weight or by sheet

use serde::{Deserialize, Serialize};

/// How a material's cost is derived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingMode {
    /// Priced per kilogram of part weight
    ByWeight,
    /// Priced per stock sheet, sized via nesting layout
    BySheet,
}

impl Default for PricingMode {
    fn default() -> Self {
        PricingMode::ByWeight
    }
}

impl std::fmt::Display for PricingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PricingMode::ByWeight => write!(f, "by_weight"),
            PricingMode::BySheet => write!(f, "by_sheet"),
        }
    }
}

impl std::str::FromStr for PricingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "by_weight" => Ok(PricingMode::ByWeight),
            "by_sheet" => Ok(PricingMode::BySheet),
            _ => Err(format!(
                "Invalid pricing mode: {}. Use 'by_weight' or 'by_sheet'",
                s
            )),
        }
    }
}

/// A purchasable stock sheet size for a by-sheet material
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetOption {
    /// Sheet length in millimeters
    pub sheet_length_mm: f64,

    /// Sheet width in millimeters
    pub sheet_width_mm: f64,

    /// Sheet thickness in millimeters
    pub thickness_mm: f64,

    /// Price of one full sheet
    pub sheet_price: f64,
}

impl SheetOption {
    /// Stable "LxWxTmm" label used in rankings, overrides, and exports
    pub fn spec(&self) -> String {
        format!(
            "{}x{}x{}mm",
            self.sheet_length_mm, self.sheet_width_mm, self.thickness_mm
        )
    }
}

/// A raw material in the catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Material {
    /// Material code (catalog key)
    pub code: String,

    /// Display name
    pub name: String,

    /// Costing path for parts made from this material
    #[serde(default)]
    pub pricing_mode: PricingMode,

    /// Price per kilogram (by-weight materials)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_per_kg: Option<f64>,

    /// Density in g/cm3
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub density_g_cm3: Option<f64>,

    /// Purchasable sheet sizes, in catalog order (by-sheet materials)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sheet_options: Vec<SheetOption>,

    /// Free-form notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}
