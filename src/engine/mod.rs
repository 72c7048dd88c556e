//! The quote calculation engine
//!
//! Pure functions from (catalog, parameters) to a fully itemized quote.
//! Nothing in this module performs I/O or mutates catalog data; repeated
//! invocation with identical inputs yields identical results, including
//! when re-driven from an interactive override loop.
//!
//! Degraded inputs never abort a quote. Every unresolvable reference or
//! unpriceable configuration contributes zero cost and surfaces a
//! [`QuoteWarning`] so the caller can show why a figure is understated.

pub mod bom;
pub mod layout;
pub mod process_cost;
pub mod rollup;
pub mod sheet;
pub mod tier;

pub use bom::{CostedLine, LineEvaluation, SheetAlternativeRow};
pub use layout::SheetLayout;
pub use process_cost::{ProcessBasis, ProcessCostRow, TemplateProcessInput};
pub use rollup::{
    finalize, quote_product, quote_template, CostBuckets, CostSummary, PricingMode, QuoteParams,
    QuoteResult, TemplateParams,
};
pub use sheet::{SheetOverride, SheetRow, SheetSelection};

use serde::{Deserialize, Serialize};

/// A non-fatal defect surfaced while computing a quote
///
/// Warnings mark contributions that were skipped or zeroed so a quote
/// is never silently understated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QuoteWarning {
    /// A BOM line referenced a part code missing from the catalog
    UnknownPart { code: String },

    /// A BOM line referenced a purchased item missing from the catalog
    UnknownPurchasedItem { code: String },

    /// A BOM line referenced a packaging rule missing from the catalog
    UnknownPackagingRule { code: String },

    /// A part referenced a material missing from the catalog
    UnknownMaterial {
        part_code: String,
        material_code: String,
    },

    /// A routing step referenced a process missing from the catalog
    UnknownProcess {
        part_code: String,
        process_code: String,
    },

    /// A sheet-priced material carries no sheet options
    NoSheetOptions {
        part_code: String,
        material_code: String,
    },

    /// The chosen sheet fits zero blanks; the one-piece floor applies
    ZeroLayoutCapacity {
        part_code: String,
        sheet_spec: String,
    },

    /// A sheet override named a spec outside the candidate ranking
    UnmatchedSheetOverride {
        part_code: String,
        sheet_spec: String,
    },

    /// A weight-priced material on a BOM part; material cost not computed
    WeightPricedPart {
        part_code: String,
        material_code: String,
    },
}

impl std::fmt::Display for QuoteWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuoteWarning::UnknownPart { code } => {
                write!(f, "part '{}' not found; line excluded", code)
            }
            QuoteWarning::UnknownPurchasedItem { code } => {
                write!(f, "purchased item '{}' not found; line excluded", code)
            }
            QuoteWarning::UnknownPackagingRule { code } => {
                write!(f, "packaging rule '{}' not found; line excluded", code)
            }
            QuoteWarning::UnknownMaterial {
                part_code,
                material_code,
            } => write!(
                f,
                "part '{}' references unknown material '{}'; material cost omitted",
                part_code, material_code
            ),
            QuoteWarning::UnknownProcess {
                part_code,
                process_code,
            } => write!(
                f,
                "part '{}' references unknown process '{}'; step skipped",
                part_code, process_code
            ),
            QuoteWarning::NoSheetOptions {
                part_code,
                material_code,
            } => write!(
                f,
                "material '{}' has no sheet options; part '{}' left unpriced",
                material_code, part_code
            ),
            QuoteWarning::ZeroLayoutCapacity {
                part_code,
                sheet_spec,
            } => write!(
                f,
                "part '{}' does not fit sheet {}; priced at one piece per sheet",
                part_code, sheet_spec
            ),
            QuoteWarning::UnmatchedSheetOverride {
                part_code,
                sheet_spec,
            } => write!(
                f,
                "override sheet {} is not a candidate for part '{}'; recommendation kept",
                sheet_spec, part_code
            ),
            QuoteWarning::WeightPricedPart {
                part_code,
                material_code,
            } => write!(
                f,
                "part '{}' uses weight-priced material '{}'; sheet costing not applicable",
                part_code, material_code
            ),
        }
    }
}
