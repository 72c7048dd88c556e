//! Quote rollup - aggregate line costs into final pricing
//!
//! Both quoting flows (BOM-driven and template-driven) reduce to the same
//! cost buckets and share [`finalize`], so the overhead/tax/margin/tier
//! arithmetic exists exactly once.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, Product, ProductTemplate, QuantityTier, Settings};
use crate::engine::bom::{self, CostedLine, SheetAlternativeRow};
use crate::engine::process_cost::{self, ProcessCostRow, TemplateProcessInput};
use crate::engine::sheet::SheetOverride;
use crate::engine::{tier, QuoteWarning};

/// Price-from-cost convention
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingMode {
    /// Margin as a fraction of price: price = cost / (1 - margin)
    GrossMargin,
    /// Markup as a fraction of cost: price = cost * (1 + margin)
    Markup,
}

impl Default for PricingMode {
    fn default() -> Self {
        PricingMode::GrossMargin
    }
}

impl std::fmt::Display for PricingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PricingMode::GrossMargin => write!(f, "gross_margin"),
            PricingMode::Markup => write!(f, "markup"),
        }
    }
}

impl std::str::FromStr for PricingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gross_margin" | "gross-margin" => Ok(PricingMode::GrossMargin),
            "markup" => Ok(PricingMode::Markup),
            _ => Err(format!(
                "Invalid pricing mode: {}. Use 'gross_margin' or 'markup'",
                s
            )),
        }
    }
}

/// Caller-supplied pricing parameters for one quote
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteParams {
    /// Finished units to quote
    pub quantity: u32,

    /// Overhead fraction applied to the subtotal
    pub overhead_pct: f64,

    /// Tax fraction applied after overhead
    pub tax_pct: f64,

    /// Profit fraction, interpreted per pricing mode
    pub margin_pct: f64,

    /// Price-from-cost convention
    pub pricing_mode: PricingMode,

    /// Weight-based material waste fraction
    pub scrap_rate: f64,

    /// Flat freight charge for the order
    pub shipping_per_order: f64,

    /// Engineering overrides keyed by part code
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub overrides: BTreeMap<String, SheetOverride>,
}

impl QuoteParams {
    /// Seed parameters for a quantity from catalog defaults
    pub fn from_settings(settings: &Settings, quantity: u32) -> Self {
        Self {
            quantity,
            overhead_pct: settings.overhead_pct,
            tax_pct: settings.tax_pct,
            margin_pct: settings.margin_pct,
            pricing_mode: PricingMode::default(),
            scrap_rate: settings.scrap_rate,
            shipping_per_order: settings.shipping_per_order,
            overrides: BTreeMap::new(),
        }
    }
}

/// Additional inputs for the template-driven flow
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemplateParams {
    /// Packaging cost per finished piece
    pub packaging_per_piece: f64,

    /// Per-step adjustments keyed by process code
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub processes: BTreeMap<String, TemplateProcessInput>,
}

/// Source-bucket totals feeding the shared rollup
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CostBuckets {
    pub material: f64,
    pub process: f64,
    pub purchased: f64,
    pub packaging: f64,
}

/// Every intermediate figure from buckets to unit price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostSummary {
    pub material_total: f64,
    pub process_total: f64,
    pub purchased_total: f64,
    pub packaging_total: f64,
    pub shipping_cost: f64,
    pub subtotal: f64,
    pub overhead: f64,
    pub pre_tax: f64,
    pub tax: f64,
    pub total_cost: f64,
    pub final_price_total: f64,
    pub unit_price: f64,
    pub multiplier: f64,
}

/// A fully itemized quote
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteResult {
    /// Quoted product or template SKU
    pub sku: String,

    /// Display name
    pub product_name: String,

    /// Quoted quantity
    pub quantity: u32,

    /// Costed BOM lines (empty for template quotes)
    pub lines: Vec<CostedLine>,

    /// Routing breakdown rows across all lines
    pub process_rows: Vec<ProcessCostRow>,

    /// Ranked sheet candidates across all sheet-priced parts
    pub sheet_alternatives: Vec<SheetAlternativeRow>,

    /// Rolled-up totals and final pricing
    pub summary: CostSummary,

    /// Quantity tier the multiplier came from, if any matched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_tier: Option<QuantityTier>,

    /// Degradations surfaced during computation
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<QuoteWarning>,
}

/// Roll bucket totals up to a final price
///
/// subtotal -> overhead -> tax -> total cost -> pricing-mode branch ->
/// tier multiplier -> unit price. A gross margin at or above 100% clamps
/// to cost instead of dividing by zero; a zero quantity yields a zero
/// unit price.
pub fn finalize(
    buckets: CostBuckets,
    params: &QuoteParams,
    tiers: &[QuantityTier],
) -> (CostSummary, Option<QuantityTier>) {
    let shipping_cost = params.shipping_per_order;
    let subtotal =
        buckets.material + buckets.process + buckets.purchased + buckets.packaging + shipping_cost;
    let overhead = subtotal * params.overhead_pct;
    let pre_tax = subtotal + overhead;
    let tax = pre_tax * params.tax_pct;
    let total_cost = pre_tax + tax;

    let priced = match params.pricing_mode {
        PricingMode::GrossMargin => {
            if params.margin_pct < 1.0 {
                total_cost / (1.0 - params.margin_pct)
            } else {
                total_cost
            }
        }
        PricingMode::Markup => total_cost * (1.0 + params.margin_pct),
    };

    let (multiplier, matched) = tier::resolve(tiers, params.quantity);
    let final_price_total = priced * multiplier;
    let unit_price = if params.quantity > 0 {
        final_price_total / params.quantity as f64
    } else {
        0.0
    };

    let summary = CostSummary {
        material_total: buckets.material,
        process_total: buckets.process,
        purchased_total: buckets.purchased,
        packaging_total: buckets.packaging,
        shipping_cost,
        subtotal,
        overhead,
        pre_tax,
        tax,
        total_cost,
        final_price_total,
        unit_price,
        multiplier,
    };

    (summary, matched.cloned())
}

/// Compute a BOM-driven quote for a product
pub fn quote_product(catalog: &Catalog, product: &Product, params: &QuoteParams) -> QuoteResult {
    let mut warnings = Vec::new();
    let mut lines = Vec::new();
    let mut process_rows = Vec::new();
    let mut sheet_alternatives = Vec::new();
    let mut buckets = CostBuckets::default();

    for bom_line in &product.bom_lines {
        let Some(eval) = bom::evaluate_line(
            bom_line,
            product,
            params.quantity,
            catalog,
            &params.overrides,
            &mut warnings,
        ) else {
            continue;
        };

        match eval.line.kind {
            crate::catalog::BomLineKind::Part => {
                buckets.material += eval.line.material_cost;
                buckets.process += eval.line.process_cost;
            }
            crate::catalog::BomLineKind::Purchased => {
                buckets.purchased += eval.line.line_total;
            }
            crate::catalog::BomLineKind::Packaging => {
                buckets.packaging += eval.line.line_total;
            }
        }

        lines.push(eval.line);
        process_rows.extend(eval.process_rows);
        sheet_alternatives.extend(eval.sheet_rows);
    }

    let (summary, matched_tier) = finalize(buckets, params, &catalog.tiers);

    QuoteResult {
        sku: product.sku.clone(),
        product_name: product.name.clone(),
        quantity: params.quantity,
        lines,
        process_rows,
        sheet_alternatives,
        summary,
        matched_tier,
        warnings,
    }
}

/// Compute a template-driven quote
///
/// Material is priced by weight with a scrap uplift; packaging is a flat
/// per-piece amount. The rollup arithmetic is shared with the BOM flow.
pub fn quote_template(
    catalog: &Catalog,
    template: &ProductTemplate,
    params: &QuoteParams,
    template_params: &TemplateParams,
) -> QuoteResult {
    let mut warnings = Vec::new();

    let price_per_kg = match catalog.materials.get(&template.material_code) {
        Some(material) => material.price_per_kg.unwrap_or(0.0),
        None => {
            warnings.push(QuoteWarning::UnknownMaterial {
                part_code: template.sku.clone(),
                material_code: template.material_code.clone(),
            });
            0.0
        }
    };

    let material = params.quantity as f64
        * template.weight_kg_per_unit
        * price_per_kg
        * (1.0 + params.scrap_rate);

    let (process, process_rows) = process_cost::price_template_steps(
        &template.default_processes,
        &template_params.processes,
        &catalog.processes,
        params.quantity,
        &template.sku,
        &mut warnings,
    );

    let packaging = params.quantity as f64 * template_params.packaging_per_piece;

    let buckets = CostBuckets {
        material,
        process,
        purchased: 0.0,
        packaging,
    };
    let (summary, matched_tier) = finalize(buckets, params, &catalog.tiers);

    QuoteResult {
        sku: template.sku.clone(),
        product_name: template.name.clone(),
        quantity: params.quantity,
        lines: Vec::new(),
        process_rows,
        sheet_alternatives: Vec::new(),
        summary,
        matched_tier,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogFile;

    fn params(quantity: u32) -> QuoteParams {
        QuoteParams {
            quantity,
            overhead_pct: 0.05,
            tax_pct: 0.13,
            margin_pct: 0.18,
            pricing_mode: PricingMode::GrossMargin,
            scrap_rate: 0.03,
            shipping_per_order: 120.0,
            overrides: BTreeMap::new(),
        }
    }

    fn catalog_yaml(extra: &str) -> Catalog {
        let yaml = format!(
            r#"
materials:
  - code: SS-304
    name: Stainless 304
    pricing_mode: by_sheet
    sheet_options:
      - {{ sheet_length_mm: 3000, sheet_width_mm: 1500, thickness_mm: 2, sheet_price: 400 }}
  - code: AL-5052
    name: Aluminum 5052
    price_per_kg: 6.5
processes:
  - code: LASER
    name: Laser Cutting
    unit_rate_per_min: 1.2
    setup_cost: 50
parts:
  - part_code: PNL-07
    name: Side Panel
    material_code: SS-304
    thickness_mm: 2
    blank_length_mm: 500
    blank_width_mm: 200
    nest_efficiency: 1.0
    process_steps:
      - {{ process_code: LASER, minutes_per_unit: 0.5 }}
purchased_items:
  - item_code: HNG-10
    name: Hinge
    unit_cost: 2.0
products:
  - sku: ENC-100
    name: Control Enclosure
    units_per_carton: 12
    bom_lines:
      - {{ type: part, code: PNL-07, qty_per_unit: 1 }}
      - {{ type: purchased, code: HNG-10, qty_per_unit: 2 }}
{}"#,
            extra
        );
        let file: CatalogFile = serde_yml::from_str(&yaml).unwrap();
        Catalog::from_file(file)
    }

    #[test]
    fn test_rollup_round_trip_figures() {
        let buckets = CostBuckets {
            material: 1000.0,
            process: 200.0,
            purchased: 0.0,
            packaging: 50.0,
        };

        let (summary, matched) = finalize(buckets, &params(100), &[]);

        assert!((summary.subtotal - 1370.0).abs() < 1e-9);
        assert!((summary.overhead - 68.5).abs() < 1e-9);
        assert!((summary.pre_tax - 1438.5).abs() < 1e-9);
        assert!((summary.tax - 186.705).abs() < 1e-9);
        assert!((summary.total_cost - 1625.205).abs() < 1e-9);
        assert!((summary.final_price_total - 1625.205 / 0.82).abs() < 1e-6);
        assert!((summary.unit_price - 19.8196).abs() < 1e-4);
        assert_eq!(summary.multiplier, 1.0);
        assert!(matched.is_none());
    }

    #[test]
    fn test_markup_and_gross_margin_diverge() {
        let buckets = CostBuckets {
            material: 1000.0,
            ..Default::default()
        };

        let mut p = params(10);
        p.pricing_mode = PricingMode::Markup;
        let (markup, _) = finalize(buckets, &p, &[]);

        p.pricing_mode = PricingMode::GrossMargin;
        let (gross, _) = finalize(buckets, &p, &[]);

        assert!((markup.final_price_total - markup.total_cost * 1.18).abs() < 1e-9);
        assert!((gross.final_price_total - gross.total_cost / 0.82).abs() < 1e-9);
        assert!(markup.final_price_total < gross.final_price_total);
    }

    #[test]
    fn test_gross_margin_at_unity_clamps_to_cost() {
        let buckets = CostBuckets {
            material: 500.0,
            ..Default::default()
        };
        let mut p = params(10);
        p.margin_pct = 1.0;

        let (summary, _) = finalize(buckets, &p, &[]);
        assert_eq!(summary.final_price_total, summary.total_cost);
    }

    #[test]
    fn test_tier_multiplier_scales_final_price() {
        let buckets = CostBuckets {
            material: 1000.0,
            ..Default::default()
        };
        let tiers = vec![
            QuantityTier {
                min_qty: 1,
                max_qty: Some(49),
                multiplier: 1.0,
                label: "1-49".to_string(),
            },
            QuantityTier {
                min_qty: 50,
                max_qty: None,
                multiplier: 0.9,
                label: "50+".to_string(),
            },
        ];

        let (at_50, matched) = finalize(buckets, &params(50), &tiers);
        assert_eq!(at_50.multiplier, 0.9);
        assert_eq!(matched.unwrap().min_qty, 50);

        let (at_49, _) = finalize(buckets, &params(49), &tiers);
        assert!((at_50.final_price_total / at_49.final_price_total - 0.9).abs() < 1e-9);
    }

    #[test]
    fn test_zero_quantity_guards_unit_price() {
        let buckets = CostBuckets {
            material: 100.0,
            ..Default::default()
        };
        let (summary, _) = finalize(buckets, &params(0), &[]);
        assert_eq!(summary.unit_price, 0.0);
    }

    #[test]
    fn test_quote_product_buckets_by_line_kind() {
        let catalog = catalog_yaml("");
        let product = catalog.products.get("ENC-100").unwrap();

        let result = quote_product(&catalog, product, &params(100));

        assert_eq!(result.lines.len(), 2);
        assert!(result.summary.material_total > 0.0);
        // LASER: 0.5 * 1.2 * 100 + 50.
        assert_eq!(result.summary.process_total, 110.0);
        // Hinges: 200 * 2.0.
        assert_eq!(result.summary.purchased_total, 400.0);
        assert_eq!(result.summary.packaging_total, 0.0);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_unknown_bom_code_excluded_but_quote_completes() {
        let catalog = catalog_yaml("");
        let mut product = catalog.products.get("ENC-100").unwrap().clone();
        product.bom_lines.insert(
            0,
            crate::catalog::BomLine {
                kind: crate::catalog::BomLineKind::Part,
                code: "GHOST-9".to_string(),
                qty_per_unit: None,
                optional: false,
            },
        );

        let baseline = quote_product(&catalog, catalog.products.get("ENC-100").unwrap(), &params(100));
        let degraded = quote_product(&catalog, &product, &params(100));

        assert_eq!(degraded.lines.len(), baseline.lines.len());
        assert_eq!(degraded.summary.total_cost, baseline.summary.total_cost);
        assert_eq!(degraded.warnings.len(), 1);
        assert!(matches!(
            degraded.warnings[0],
            QuoteWarning::UnknownPart { .. }
        ));
    }

    #[test]
    fn test_quote_is_idempotent_with_overrides() {
        let catalog = catalog_yaml("");
        let product = catalog.products.get("ENC-100").unwrap();
        let mut p = params(100);
        p.overrides.insert(
            "PNL-07".to_string(),
            SheetOverride {
                sheet_spec: Some("3000x1500x2mm".to_string()),
                pieces_per_sheet: Some(12),
            },
        );

        let first = quote_product(&catalog, product, &p);
        let second = quote_product(&catalog, product, &p);

        assert_eq!(first.summary, second.summary);
        assert_eq!(first.lines, second.lines);
        assert_eq!(first.warnings, second.warnings);
    }

    #[test]
    fn test_template_quote_weight_material_and_shared_rollup() {
        let catalog = catalog_yaml(
            r#"product_templates:
  - sku: TPL-01
    name: Mounting Plate
    material_code: AL-5052
    weight_kg_per_unit: 0.5
    default_processes:
      - { process_code: LASER, minutes: 1.0 }
"#,
        );
        let template = catalog.templates.get("TPL-01").unwrap();
        let p = params(100);
        let tp = TemplateParams {
            packaging_per_piece: 0.6,
            processes: BTreeMap::new(),
        };

        let result = quote_template(&catalog, template, &p, &tp);

        // 100 * 0.5 kg * 6.5/kg * 1.03 scrap uplift.
        assert!((result.summary.material_total - 334.75).abs() < 1e-9);
        // LASER: 1.0 * 1.2 * 100 + 50.
        assert_eq!(result.summary.process_total, 170.0);
        assert_eq!(result.summary.packaging_total, 60.0);

        // The rollup is the same arithmetic the BOM flow uses.
        let (expected, _) = finalize(
            CostBuckets {
                material: result.summary.material_total,
                process: result.summary.process_total,
                purchased: 0.0,
                packaging: result.summary.packaging_total,
            },
            &p,
            &catalog.tiers,
        );
        assert_eq!(result.summary, expected);
    }

    #[test]
    fn test_template_unknown_material_warns_and_zeroes() {
        let catalog = catalog_yaml(
            r#"product_templates:
  - sku: TPL-02
    name: Ghost Plate
    material_code: TI-GR5
    weight_kg_per_unit: 0.5
"#,
        );
        let template = catalog.templates.get("TPL-02").unwrap();

        let result =
            quote_template(&catalog, template, &params(10), &TemplateParams::default());

        assert_eq!(result.summary.material_total, 0.0);
        assert!(matches!(
            result.warnings[0],
            QuoteWarning::UnknownMaterial { .. }
        ));
    }
}
