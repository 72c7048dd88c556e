//! BOM line evaluation - one costed line per bill-of-materials entry

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::{BomLine, BomLineKind, Catalog, PackagingKind, PricingMode, Product};
use crate::engine::process_cost::{self, ProcessCostRow};
use crate::engine::sheet::{self, SheetOverride};
use crate::engine::QuoteWarning;

/// One priced bill-of-materials line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostedLine {
    /// Line kind
    pub kind: BomLineKind,

    /// Resolved code
    pub code: String,

    /// Display name of the resolved record
    pub name: String,

    /// Total quantity consumed for the quoted order
    pub qty_total: f64,

    /// Unit of measure
    pub uom: String,

    /// Cost per consumed unit
    pub unit_cost: f64,

    /// Total line cost
    pub line_total: f64,

    /// Sheet material component (part lines only)
    pub material_cost: f64,

    /// Routing component (part lines only)
    pub process_cost: f64,

    /// Chosen sheet label for sheet-priced parts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sheet_spec: Option<String>,

    /// Effective pieces per sheet for sheet-priced parts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pieces_per_sheet: Option<u32>,

    /// Sheets purchased for sheet-priced parts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sheets_needed: Option<u32>,

    /// Mirrors the BOM line's optional flag
    pub optional: bool,
}

/// One ranked sheet candidate attributed to its part, for audit/export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetAlternativeRow {
    /// Part the candidate was ranked for
    pub part_code: String,

    /// Candidate label ("LxWxTmm")
    pub sheet_spec: String,

    /// Price of one sheet
    pub sheet_price: f64,

    /// Effective pieces per sheet
    pub pieces_per_sheet: u32,

    /// Sheets required at the quoted quantity
    pub sheets_needed: u32,

    /// Material cost if this candidate were chosen
    pub material_cost: f64,
}

/// A costed line together with its supporting breakdown rows
#[derive(Debug, Clone)]
pub struct LineEvaluation {
    pub line: CostedLine,
    pub process_rows: Vec<ProcessCostRow>,
    pub sheet_rows: Vec<SheetAlternativeRow>,
}

/// Evaluate one BOM line against the catalog
///
/// Returns `None` when the line's code does not resolve; the miss is
/// surfaced as a warning and the quote continues without the line.
pub fn evaluate_line(
    line: &BomLine,
    product: &Product,
    qty: u32,
    catalog: &Catalog,
    overrides: &BTreeMap<String, SheetOverride>,
    warnings: &mut Vec<QuoteWarning>,
) -> Option<LineEvaluation> {
    match line.kind {
        BomLineKind::Part => evaluate_part(line, qty, catalog, overrides, warnings),
        BomLineKind::Purchased => evaluate_purchased(line, qty, catalog, warnings),
        BomLineKind::Packaging => evaluate_packaging(line, product, qty, catalog, warnings),
    }
}

fn evaluate_part(
    line: &BomLine,
    qty: u32,
    catalog: &Catalog,
    overrides: &BTreeMap<String, SheetOverride>,
    warnings: &mut Vec<QuoteWarning>,
) -> Option<LineEvaluation> {
    let Some(part) = catalog.parts.get(&line.code) else {
        warnings.push(QuoteWarning::UnknownPart {
            code: line.code.clone(),
        });
        return None;
    };

    let qty_per_unit = line.qty_per_unit.unwrap_or(1.0);
    let part_qty = (qty as f64 * qty_per_unit).ceil() as u32;

    let mut material_cost = 0.0;
    let mut sheet_spec = None;
    let mut pieces_per_sheet = None;
    let mut sheets_needed = None;
    let mut sheet_rows = Vec::new();

    match catalog.materials.get(&part.material_code) {
        Some(material) if material.pricing_mode == PricingMode::BySheet => {
            if material.sheet_options.is_empty() {
                warnings.push(QuoteWarning::NoSheetOptions {
                    part_code: part.part_code.clone(),
                    material_code: material.code.clone(),
                });
            } else {
                let selection = sheet::select(
                    &material.sheet_options,
                    part,
                    part_qty,
                    overrides.get(&part.part_code),
                    warnings,
                );
                sheet_rows = selection
                    .rows
                    .iter()
                    .map(|r| SheetAlternativeRow {
                        part_code: part.part_code.clone(),
                        sheet_spec: r.sheet_spec.clone(),
                        sheet_price: r.sheet_price,
                        pieces_per_sheet: r.pieces_per_sheet,
                        sheets_needed: r.sheets_needed,
                        material_cost: r.material_cost,
                    })
                    .collect();
                if let Some(chosen) = selection.chosen {
                    material_cost = chosen.material_cost;
                    sheet_spec = Some(chosen.sheet_spec);
                    pieces_per_sheet = Some(chosen.pieces_per_sheet);
                    sheets_needed = Some(chosen.sheets_needed);
                }
            }
        }
        Some(material) => {
            // Weight-priced stock is not costed on BOM parts; the routing
            // still prices and the gap is reported.
            warnings.push(QuoteWarning::WeightPricedPart {
                part_code: part.part_code.clone(),
                material_code: material.code.clone(),
            });
        }
        None => {
            warnings.push(QuoteWarning::UnknownMaterial {
                part_code: part.part_code.clone(),
                material_code: part.material_code.clone(),
            });
        }
    }

    let (process_cost, process_rows) = process_cost::price_steps(
        &part.process_steps,
        &catalog.processes,
        part_qty,
        &part.part_code,
        warnings,
    );

    let line_total = material_cost + process_cost;
    let unit_cost = if part_qty > 0 {
        line_total / part_qty as f64
    } else {
        0.0
    };

    Some(LineEvaluation {
        line: CostedLine {
            kind: BomLineKind::Part,
            code: part.part_code.clone(),
            name: part.name.clone(),
            qty_total: part_qty as f64,
            uom: "pc".to_string(),
            unit_cost,
            line_total,
            material_cost,
            process_cost,
            sheet_spec,
            pieces_per_sheet,
            sheets_needed,
            optional: line.optional,
        },
        process_rows,
        sheet_rows,
    })
}

fn evaluate_purchased(
    line: &BomLine,
    qty: u32,
    catalog: &Catalog,
    warnings: &mut Vec<QuoteWarning>,
) -> Option<LineEvaluation> {
    let Some(item) = catalog.purchased_items.get(&line.code) else {
        warnings.push(QuoteWarning::UnknownPurchasedItem {
            code: line.code.clone(),
        });
        return None;
    };

    let base_qty = qty as f64 * line.qty_per_unit.unwrap_or(1.0);
    let total_qty = match item.moq_qty {
        Some(moq) => base_qty.max(moq),
        None => base_qty,
    };
    let line_total = total_qty * item.unit_cost * (1.0 + item.waste_pct);

    Some(LineEvaluation {
        line: CostedLine {
            kind: BomLineKind::Purchased,
            code: item.item_code.clone(),
            name: item.name.clone(),
            qty_total: total_qty,
            uom: item.uom.clone().unwrap_or_else(|| "ea".to_string()),
            unit_cost: item.unit_cost,
            line_total,
            material_cost: 0.0,
            process_cost: 0.0,
            sheet_spec: None,
            pieces_per_sheet: None,
            sheets_needed: None,
            optional: line.optional,
        },
        process_rows: Vec::new(),
        sheet_rows: Vec::new(),
    })
}

fn evaluate_packaging(
    line: &BomLine,
    product: &Product,
    qty: u32,
    catalog: &Catalog,
    warnings: &mut Vec<QuoteWarning>,
) -> Option<LineEvaluation> {
    let Some(rule) = catalog.packaging_rules.get(&line.code) else {
        warnings.push(QuoteWarning::UnknownPackagingRule {
            code: line.code.clone(),
        });
        return None;
    };

    let (total_qty, line_total) = match rule.kind {
        PackagingKind::PerUnit => {
            let per_unit = line
                .qty_per_unit
                .or(rule.qty_per_unit)
                .unwrap_or(1.0);
            let total_qty = qty as f64 * per_unit;
            (total_qty, total_qty * rule.unit_cost)
        }
        PackagingKind::PerCarton => {
            let units_per_carton = rule.units_per_carton.or(product.units_per_carton);
            let cartons = match units_per_carton {
                Some(upc) if upc > 0 => qty.div_ceil(upc),
                _ => 0,
            };
            let total_qty = cartons as f64 * rule.qty_per_carton.unwrap_or(1.0);
            (total_qty, total_qty * rule.unit_cost)
        }
    };

    Some(LineEvaluation {
        line: CostedLine {
            kind: BomLineKind::Packaging,
            code: rule.item_code.clone(),
            name: rule.item_code.clone(),
            qty_total: total_qty,
            uom: "pack".to_string(),
            unit_cost: rule.unit_cost,
            line_total,
            material_cost: 0.0,
            process_cost: 0.0,
            sheet_spec: None,
            pieces_per_sheet: None,
            sheets_needed: None,
            optional: line.optional,
        },
        process_rows: Vec::new(),
        sheet_rows: Vec::new(),
    })
}
