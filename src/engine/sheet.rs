//! Sheet stock selection - rank candidate sheets and pick the cheapest

use serde::{Deserialize, Serialize};

use crate::catalog::{Part, SheetOption};
use crate::engine::layout::{self, SheetLayout};
use crate::engine::QuoteWarning;

/// An explicit engineering override for one part's sheet selection
///
/// Candidates are pinned by their stable spec label, never by a
/// positional index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SheetOverride {
    /// Spec label of the candidate to pin ("LxWxTmm")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sheet_spec: Option<String>,

    /// Pieces per sheet superseding the layout calculation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pieces_per_sheet: Option<u32>,
}

impl SheetOverride {
    /// Whether the override carries any effect
    pub fn is_empty(&self) -> bool {
        self.sheet_spec.is_none() && self.pieces_per_sheet.is_none()
    }
}

/// One costed candidate sheet for a part
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetRow {
    /// Stable candidate label ("LxWxTmm")
    pub sheet_spec: String,

    /// Price of one sheet
    pub sheet_price: f64,

    /// Effective pieces per sheet
    pub pieces_per_sheet: u32,

    /// Sheets required for the quantity
    pub sheets_needed: u32,

    /// sheets_needed * sheet_price
    pub material_cost: f64,

    /// Full layout figures behind the row
    pub layout: SheetLayout,

    /// The candidate stock itself
    pub option: SheetOption,
}

/// Ranked candidates plus the effective choice
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SheetSelection {
    /// Candidates sorted ascending by material cost
    pub rows: Vec<SheetRow>,

    /// The row driving the quote: the cheapest, or the override target
    pub chosen: Option<SheetRow>,
}

fn cost_row(option: &SheetOption, part: &Part, qty: u32, pieces_override: Option<u32>) -> SheetRow {
    let layout = layout::plan(option, part, qty, pieces_override);
    SheetRow {
        sheet_spec: option.spec(),
        sheet_price: option.sheet_price,
        pieces_per_sheet: layout.pieces_per_sheet,
        sheets_needed: layout.sheets_needed,
        material_cost: layout.sheets_needed as f64 * option.sheet_price,
        layout,
        option: option.clone(),
    }
}

/// Rank a material's sheet options for a part and pick the effective row
///
/// Only options tied for the closest thickness match survive; survivors
/// are laid out, costed, and sorted ascending by material cost with the
/// cheapest recommended. An empty option set returns an empty selection -
/// the caller treats that as unpriceable, not an error.
///
/// An override pins a candidate by spec and/or supersedes its pieces per
/// sheet; the pinned row is re-planned and re-costed without re-ranking
/// the other candidates. An override spec matching no candidate is
/// reported and the recommendation is kept.
pub fn select(
    options: &[SheetOption],
    part: &Part,
    qty: u32,
    override_: Option<&SheetOverride>,
    warnings: &mut Vec<QuoteWarning>,
) -> SheetSelection {
    if options.is_empty() {
        return SheetSelection::default();
    }

    let target = part.thickness_mm;
    let diffs: Vec<f64> = options
        .iter()
        .map(|o| (o.thickness_mm - target).abs())
        .collect();
    let min_diff = diffs.iter().cloned().fold(f64::INFINITY, f64::min);

    let mut rows: Vec<SheetRow> = options
        .iter()
        .zip(&diffs)
        .filter(|(_, diff)| **diff == min_diff)
        .map(|(option, _)| cost_row(option, part, qty, None))
        .collect();

    rows.sort_by(|a, b| {
        a.material_cost
            .partial_cmp(&b.material_cost)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut chosen = rows.first().cloned();

    if let Some(ov) = override_.filter(|ov| !ov.is_empty()) {
        let base = match &ov.sheet_spec {
            Some(spec) => match rows.iter().find(|r| &r.sheet_spec == spec) {
                Some(row) => Some(row.clone()),
                None => {
                    warnings.push(QuoteWarning::UnmatchedSheetOverride {
                        part_code: part.part_code.clone(),
                        sheet_spec: spec.clone(),
                    });
                    chosen.clone()
                }
            },
            None => chosen.clone(),
        };

        if let Some(base) = base {
            chosen = Some(cost_row(&base.option, part, qty, ov.pieces_per_sheet));
        }
    }

    if let Some(row) = &chosen {
        if row.layout.raw_count == 0 {
            warnings.push(QuoteWarning::ZeroLayoutCapacity {
                part_code: part.part_code.clone(),
                sheet_spec: row.sheet_spec.clone(),
            });
        }
    }

    SheetSelection { rows, chosen }
}
