//! Sheet layout planning - how many blanks fit a candidate sheet
//!
//! A coarse axis-aligned grid estimate: blanks at pitch (blank + kerf) in
//! two orientations, derated by a nesting efficiency factor. Good enough
//! for first-pass quoting; not a true nesting optimizer.

use serde::{Deserialize, Serialize};

use crate::catalog::{Part, SheetOption};

/// Blank counts and sheet demand for one (sheet, part, qty) combination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetLayout {
    /// Blanks per sheet with the blank aligned to the sheet axes
    pub count_a: u32,

    /// Blanks per sheet with the blank rotated 90 degrees
    pub count_b: u32,

    /// Better of the two orientations, before derating
    pub raw_count: u32,

    /// Calculated pieces per sheet after nesting efficiency, floored at 1
    pub pieces_per_sheet_calc: u32,

    /// Effective pieces per sheet; an override supersedes the calculation
    pub pieces_per_sheet: u32,

    /// Whole sheets required for the quantity
    pub sheets_needed: u32,
}

/// Plan how a part nests on a sheet and how many sheets a quantity needs
///
/// A positive `pieces_override` supersedes the calculated pieces per
/// sheet; the calculated value is preserved for audit. Pieces per sheet
/// is never zero, so the sheet count is always well defined.
pub fn plan(
    sheet: &SheetOption,
    part: &Part,
    qty: u32,
    pieces_override: Option<u32>,
) -> SheetLayout {
    let usable_l = (sheet.sheet_length_mm - 2.0 * part.edge_margin_mm).max(0.0);
    let usable_w = (sheet.sheet_width_mm - 2.0 * part.edge_margin_mm).max(0.0);
    let pitch_l = part.blank_length_mm + part.kerf_mm;
    let pitch_w = part.blank_width_mm + part.kerf_mm;

    let fit = |usable: f64, pitch: f64| -> u32 {
        if pitch > 0.0 {
            (usable / pitch).floor() as u32
        } else {
            0
        }
    };

    let count_a = fit(usable_l, pitch_l) * fit(usable_w, pitch_w);
    let count_b = if part.allow_rotate {
        fit(usable_l, pitch_w) * fit(usable_w, pitch_l)
    } else {
        0
    };

    let raw_count = count_a.max(count_b);
    let pieces_per_sheet_calc = if raw_count > 0 {
        ((raw_count as f64 * part.nest_efficiency).floor() as u32).max(1)
    } else {
        1
    };

    let pieces_per_sheet = match pieces_override {
        Some(p) if p > 0 => p,
        _ => pieces_per_sheet_calc,
    };

    let sheets_needed = qty.div_ceil(pieces_per_sheet);

    SheetLayout {
        count_a,
        count_b,
        raw_count,
        pieces_per_sheet_calc,
        pieces_per_sheet,
        sheets_needed,
    }
}
