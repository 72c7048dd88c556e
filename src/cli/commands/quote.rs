//! `fabquote quote` command - compute BOM-driven and template quotes

use std::collections::BTreeMap;
use std::path::PathBuf;

use clap::{Subcommand, ValueEnum};
use console::style;
use dialoguer::{Confirm, Input, Select};
use miette::{IntoDiagnostic, Result};

use crate::catalog::{BomLineKind, Catalog, PricingMode as MaterialPricing, Settings};
use crate::cli::commands::load_catalog;
use crate::cli::export::{self, QuoteHeader};
use crate::cli::helpers::{format_money, trim_float};
use crate::cli::{table, GlobalOpts, OutputFormat};
use crate::engine::{
    self, sheet, PricingMode, ProcessBasis, QuoteParams, QuoteResult, SheetOverride,
    TemplateParams, TemplateProcessInput,
};

#[derive(Subcommand, Debug)]
pub enum QuoteCommands {
    /// Quote a product from its bill of materials
    Product(ProductArgs),

    /// Quote a product template (weight-priced, no BOM)
    Template(TemplateArgs),
}

/// Pricing mode on the command line
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PricingModeArg {
    GrossMargin,
    Markup,
}

impl From<PricingModeArg> for PricingMode {
    fn from(arg: PricingModeArg) -> Self {
        match arg {
            PricingModeArg::GrossMargin => PricingMode::GrossMargin,
            PricingModeArg::Markup => PricingMode::Markup,
        }
    }
}

/// Order header fields shared by quoting commands
#[derive(clap::Args, Debug, Clone)]
pub struct HeaderOpts {
    /// Quote number for the header
    #[arg(long, default_value = "Q-0001")]
    pub quote_no: String,

    /// Customer name for the header
    #[arg(long, default_value = "-")]
    pub customer: String,

    /// Currency label (default: config, else catalog settings)
    #[arg(long)]
    pub currency: Option<String>,
}

/// Pricing parameters shared by quoting commands
///
/// Unset fractions fall back to the catalog's settings section.
#[derive(clap::Args, Debug, Clone)]
pub struct PricingOpts {
    /// Quantity of finished units
    #[arg(long, short = 'n', default_value_t = 100)]
    pub qty: u32,

    /// Overhead fraction of the subtotal
    #[arg(long)]
    pub overhead: Option<f64>,

    /// Tax fraction applied after overhead
    #[arg(long)]
    pub tax: Option<f64>,

    /// Profit fraction, interpreted per pricing mode
    #[arg(long)]
    pub margin: Option<f64>,

    /// Price-from-cost convention
    #[arg(long, value_enum, default_value = "gross-margin")]
    pub pricing_mode: PricingModeArg,

    /// Weight-based material waste fraction
    #[arg(long)]
    pub scrap: Option<f64>,

    /// Flat freight charge for the order
    #[arg(long)]
    pub shipping: Option<f64>,
}

impl PricingOpts {
    pub fn to_params(&self, settings: &Settings) -> QuoteParams {
        let mut params = QuoteParams::from_settings(settings, self.qty);
        params.pricing_mode = self.pricing_mode.into();
        if let Some(overhead) = self.overhead {
            params.overhead_pct = overhead;
        }
        if let Some(tax) = self.tax {
            params.tax_pct = tax;
        }
        if let Some(margin) = self.margin {
            params.margin_pct = margin;
        }
        if let Some(scrap) = self.scrap {
            params.scrap_rate = scrap;
        }
        if let Some(shipping) = self.shipping {
            params.shipping_per_order = shipping;
        }
        params
    }
}

#[derive(clap::Args, Debug)]
pub struct ProductArgs {
    /// Product SKU to quote
    pub sku: String,

    #[command(flatten)]
    pub header: HeaderOpts,

    #[command(flatten)]
    pub pricing: PricingOpts,

    /// Pin a sheet candidate for a part (PART=LxWxTmm, repeatable)
    #[arg(long = "sheet", value_name = "PART=SPEC")]
    pub sheet_overrides: Vec<String>,

    /// Override pieces per sheet for a part (PART=N, repeatable)
    #[arg(long = "pieces", value_name = "PART=N")]
    pub pieces_overrides: Vec<String>,

    /// Walk sheet-priced parts and pick overrides interactively
    #[arg(long, short = 'i')]
    pub interactive: bool,

    /// Write the CSV workbook into a directory
    #[arg(long, value_name = "DIR")]
    pub export: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct TemplateArgs {
    /// Template SKU to quote
    pub sku: String,

    #[command(flatten)]
    pub header: HeaderOpts,

    #[command(flatten)]
    pub pricing: PricingOpts,

    /// Set the costing basis for a step (CODE=per_hour|per_piece|fixed)
    #[arg(long = "basis", value_name = "CODE=BASIS")]
    pub basis: Vec<String>,

    /// Override runtime minutes for a step (CODE=MINUTES)
    #[arg(long = "minutes", value_name = "CODE=MIN")]
    pub minutes: Vec<String>,

    /// Disable a routing step entirely (repeatable)
    #[arg(long = "disable", value_name = "CODE")]
    pub disable: Vec<String>,

    /// Packaging cost per finished piece
    #[arg(long)]
    pub packaging_per_piece: Option<f64>,

    /// Write the CSV workbook into a directory
    #[arg(long, value_name = "DIR")]
    pub export: Option<PathBuf>,
}

pub fn run(cmd: QuoteCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        QuoteCommands::Product(args) => run_product(args, global),
        QuoteCommands::Template(args) => run_template(args, global),
    }
}

/// Split "KEY=VALUE" arguments, with a readable error on malformed input
pub(crate) fn parse_assignment(input: &str) -> Result<(&str, &str)> {
    input.split_once('=').ok_or_else(|| {
        miette::miette!("Invalid override '{}'. Expected KEY=VALUE", input)
    })
}

/// Fold --sheet/--pieces assignments into override objects per part
pub(crate) fn parse_overrides(
    sheets: &[String],
    pieces: &[String],
) -> Result<BTreeMap<String, SheetOverride>> {
    let mut overrides: BTreeMap<String, SheetOverride> = BTreeMap::new();

    for entry in sheets {
        let (part, spec) = parse_assignment(entry)?;
        overrides.entry(part.to_string()).or_default().sheet_spec = Some(spec.to_string());
    }
    for entry in pieces {
        let (part, count) = parse_assignment(entry)?;
        let count: u32 = count.parse().map_err(|_| {
            miette::miette!("Invalid pieces count '{}' for part '{}'", count, part)
        })?;
        overrides.entry(part.to_string()).or_default().pieces_per_sheet = Some(count);
    }

    Ok(overrides)
}

fn run_product(args: ProductArgs, global: &GlobalOpts) -> Result<()> {
    let (catalog, config) = load_catalog(global)?;
    let product = catalog
        .products
        .get(&args.sku)
        .ok_or_else(|| miette::miette!("No product with SKU '{}'", args.sku))?;

    let mut params = args.pricing.to_params(&catalog.settings);
    params.overrides = parse_overrides(&args.sheet_overrides, &args.pieces_overrides)?;

    if args.interactive {
        let picked = prompt_overrides(&catalog, product, params.quantity)?;
        params.overrides.extend(picked);
    }

    let result = engine::quote_product(&catalog, product, &params);

    let currency = args
        .header
        .currency
        .clone()
        .or_else(|| config.currency.clone())
        .unwrap_or_else(|| catalog.settings.currency.clone());
    let header = QuoteHeader {
        quote_no: args.header.quote_no.clone(),
        customer: args.header.customer.clone(),
        currency,
    };

    if let Some(dir) = &args.export {
        export::export_quote(dir, &header, &result)?;
        println!(
            "{} Exported quote workbook to {}",
            style("✓").green(),
            style(dir.display()).dim()
        );
    }

    render(&result, &header, global)
}

fn run_template(args: TemplateArgs, global: &GlobalOpts) -> Result<()> {
    let (catalog, config) = load_catalog(global)?;
    let template = catalog
        .templates
        .get(&args.sku)
        .ok_or_else(|| miette::miette!("No product template with SKU '{}'", args.sku))?;

    let params = args.pricing.to_params(&catalog.settings);

    let mut inputs: BTreeMap<String, TemplateProcessInput> = BTreeMap::new();
    for entry in &args.basis {
        let (code, basis) = parse_assignment(entry)?;
        let basis: ProcessBasis = basis.parse().map_err(|e| miette::miette!("{}", e))?;
        inputs.entry(code.to_string()).or_default().basis = basis;
    }
    for entry in &args.minutes {
        let (code, minutes) = parse_assignment(entry)?;
        let minutes: f64 = minutes
            .parse()
            .map_err(|_| miette::miette!("Invalid minutes '{}' for '{}'", minutes, code))?;
        inputs.entry(code.to_string()).or_default().minutes = Some(minutes);
    }
    for code in &args.disable {
        inputs.entry(code.clone()).or_default().enabled = false;
    }

    let template_params = TemplateParams {
        packaging_per_piece: args
            .packaging_per_piece
            .unwrap_or(catalog.settings.packaging_per_piece),
        processes: inputs,
    };

    let result = engine::quote_template(&catalog, template, &params, &template_params);

    let currency = args
        .header
        .currency
        .clone()
        .or_else(|| config.currency.clone())
        .unwrap_or_else(|| catalog.settings.currency.clone());
    let header = QuoteHeader {
        quote_no: args.header.quote_no.clone(),
        customer: args.header.customer.clone(),
        currency,
    };

    if let Some(dir) = &args.export {
        export::export_quote(dir, &header, &result)?;
        println!(
            "{} Exported quote workbook to {}",
            style("✓").green(),
            style(dir.display()).dim()
        );
    }

    render(&result, &header, global)
}

/// Walk sheet-priced parts, show candidates, and collect overrides
fn prompt_overrides(
    catalog: &Catalog,
    product: &crate::catalog::Product,
    qty: u32,
) -> Result<BTreeMap<String, SheetOverride>> {
    let mut overrides = BTreeMap::new();

    for line in &product.bom_lines {
        if line.kind != BomLineKind::Part {
            continue;
        }
        let Some(part) = catalog.parts.get(&line.code) else {
            continue;
        };
        let Some(material) = catalog.materials.get(&part.material_code) else {
            continue;
        };
        if material.pricing_mode != MaterialPricing::BySheet || material.sheet_options.is_empty() {
            continue;
        }

        let part_qty = (qty as f64 * line.qty_per_unit.unwrap_or(1.0)).ceil() as u32;
        let mut scratch = Vec::new();
        let selection = sheet::select(&material.sheet_options, part, part_qty, None, &mut scratch);
        if selection.rows.is_empty() {
            continue;
        }

        println!();
        println!(
            "{}",
            style(format!("{} | {}", part.part_code, part.name)).bold()
        );
        print!(
            "{}",
            table::render(
                &["sheet", "price", "pieces/sheet", "sheets", "cost"],
                &alternative_rows(&selection.rows),
                OutputFormat::Tsv,
            )
        );

        let wanted = Confirm::new()
            .with_prompt(format!("Override sheet for {}?", part.part_code))
            .default(false)
            .interact()
            .into_diagnostic()?;
        if !wanted {
            continue;
        }

        let labels: Vec<String> = selection.rows.iter().map(|r| r.sheet_spec.clone()).collect();
        let picked = Select::new()
            .with_prompt("Sheet spec")
            .items(&labels)
            .default(0)
            .interact()
            .into_diagnostic()?;
        let pieces: u32 = Input::new()
            .with_prompt("Pieces per sheet")
            .default(selection.rows[picked].pieces_per_sheet)
            .interact_text()
            .into_diagnostic()?;

        overrides.insert(
            part.part_code.clone(),
            SheetOverride {
                sheet_spec: Some(labels[picked].clone()),
                pieces_per_sheet: Some(pieces),
            },
        );
    }

    Ok(overrides)
}

fn alternative_rows(rows: &[sheet::SheetRow]) -> Vec<Vec<String>> {
    rows.iter()
        .map(|r| {
            vec![
                r.sheet_spec.clone(),
                format!("{:.2}", r.sheet_price),
                r.pieces_per_sheet.to_string(),
                r.sheets_needed.to_string(),
                format!("{:.2}", r.material_cost),
            ]
        })
        .collect()
}

fn bom_rows(result: &QuoteResult) -> Vec<Vec<String>> {
    result
        .lines
        .iter()
        .map(|line| {
            vec![
                line.kind.to_string(),
                line.code.clone(),
                line.name.clone(),
                trim_float(line.qty_total),
                line.uom.clone(),
                format!("{:.2}", line.unit_cost),
                format!("{:.2}", line.line_total),
                line.sheet_spec.clone().unwrap_or_else(|| "-".to_string()),
                line.sheets_needed
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "-".to_string()),
            ]
        })
        .collect()
}

const BOM_HEADERS: [&str; 9] = [
    "type", "code", "name", "qty", "uom", "unit cost", "line total", "sheet", "sheets",
];

fn process_table_rows(result: &QuoteResult) -> Vec<Vec<String>> {
    result
        .process_rows
        .iter()
        .map(|row| {
            vec![
                row.part_code.clone(),
                row.process_code.clone(),
                row.name.clone(),
                trim_float(row.minutes_per_unit),
                trim_float(row.rate_per_min),
                row.qty.to_string(),
                format!("{:.2}", row.runtime_cost),
                format!("{:.2}", row.setup_cost),
                format!("{:.2}", row.total_cost),
            ]
        })
        .collect()
}

const PROCESS_HEADERS: [&str; 9] = [
    "part", "process", "name", "min/unit", "rate/min", "qty", "runtime", "setup", "total",
];

fn sheet_table_rows(result: &QuoteResult) -> Vec<Vec<String>> {
    result
        .sheet_alternatives
        .iter()
        .map(|row| {
            vec![
                row.part_code.clone(),
                row.sheet_spec.clone(),
                format!("{:.2}", row.sheet_price),
                row.pieces_per_sheet.to_string(),
                row.sheets_needed.to_string(),
                format!("{:.2}", row.material_cost),
            ]
        })
        .collect()
}

const SHEET_HEADERS: [&str; 6] = [
    "part", "sheet", "price", "pieces/sheet", "sheets", "cost",
];

/// Render a computed quote in the requested format
fn render(result: &QuoteResult, header: &QuoteHeader, global: &GlobalOpts) -> Result<()> {
    match global.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(result).into_diagnostic()?
            );
            return Ok(());
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(result).into_diagnostic()?);
            return Ok(());
        }
        OutputFormat::Csv => {
            print!(
                "{}",
                table::render(&BOM_HEADERS, &bom_rows(result), OutputFormat::Csv)
            );
            return Ok(());
        }
        OutputFormat::Md => {
            if !result.lines.is_empty() {
                print!(
                    "{}",
                    table::render(&BOM_HEADERS, &bom_rows(result), OutputFormat::Md)
                );
                println!();
            }
            if !result.process_rows.is_empty() {
                print!(
                    "{}",
                    table::render(
                        &PROCESS_HEADERS,
                        &process_table_rows(result),
                        OutputFormat::Md
                    )
                );
                println!();
            }
            if !result.sheet_alternatives.is_empty() {
                print!(
                    "{}",
                    table::render(&SHEET_HEADERS, &sheet_table_rows(result), OutputFormat::Md)
                );
                println!();
            }
            let summary_rows: Vec<Vec<String>> = [
                ("material_total", result.summary.material_total),
                ("process_total", result.summary.process_total),
                ("purchased_total", result.summary.purchased_total),
                ("packaging_total", result.summary.packaging_total),
                ("shipping_cost", result.summary.shipping_cost),
                ("overhead", result.summary.overhead),
                ("tax", result.summary.tax),
                ("total_cost", result.summary.total_cost),
                ("final_price_total", result.summary.final_price_total),
                ("unit_price", result.summary.unit_price),
            ]
            .iter()
            .map(|(item, value)| vec![item.to_string(), format!("{:.2}", value)])
            .collect();
            print!(
                "{}",
                table::render(&["item", "value"], &summary_rows, OutputFormat::Md)
            );
            return Ok(());
        }
        _ => {}
    }

    let currency = header.currency.as_str();
    let summary = &result.summary;

    println!("{}", style("─".repeat(64)).dim());
    println!(
        "{}: {} | {}: {}",
        style("Quote").bold(),
        style(&header.quote_no).cyan(),
        style("Customer").bold(),
        header.customer
    );
    println!(
        "{}: {} | {} | qty {}",
        style("Product").bold(),
        style(&result.sku).cyan(),
        result.product_name,
        style(result.quantity).yellow()
    );
    println!("{}", style("─".repeat(64)).dim());

    if !global.quiet && !result.lines.is_empty() {
        println!();
        println!("{}", style("BOM breakdown").bold());
        print!(
            "{}",
            table::render(&BOM_HEADERS, &bom_rows(result), OutputFormat::Tsv)
        );
    }

    if !global.quiet && !result.sheet_alternatives.is_empty() {
        println!();
        println!("{}", style("Sheet alternatives").bold());
        print!(
            "{}",
            table::render(&SHEET_HEADERS, &sheet_table_rows(result), OutputFormat::Tsv)
        );
    }

    println!();
    println!("{}", style("Cost summary").bold());
    let metrics = [
        ("Material", summary.material_total),
        ("Process", summary.process_total),
        ("Purchased", summary.purchased_total),
        ("Packaging", summary.packaging_total),
        ("Shipping", summary.shipping_cost),
        ("Overhead", summary.overhead),
        ("Tax", summary.tax),
    ];
    for (label, value) in metrics {
        println!("  {:<12} {}", label, format_money(value, currency));
    }
    println!(
        "  {:<12} {}",
        style("Total Cost").bold(),
        style(format_money(summary.total_cost, currency)).bold()
    );
    println!(
        "  {:<12} {}",
        style("Final Price").bold(),
        style(format_money(summary.final_price_total, currency)).green()
    );
    println!(
        "  {:<12} {}",
        style("Unit Price").bold(),
        style(format_money(summary.unit_price, currency)).cyan()
    );

    if let Some(tier) = &result.matched_tier {
        let max = tier
            .max_qty
            .map(|m| m.to_string())
            .unwrap_or_else(|| "open".to_string());
        println!();
        println!(
            "{} Tier {} | multiplier {} (min {}, max {})",
            style("ℹ").cyan(),
            tier.label,
            tier.multiplier,
            tier.min_qty,
            max
        );
    }

    if !global.quiet {
        println!();
        if result.process_rows.is_empty() {
            println!("{} No process costs were incurred", style("!").yellow());
        } else {
            println!("{}", style("Process breakdown").bold());
            print!(
                "{}",
                table::render(
                    &PROCESS_HEADERS,
                    &process_table_rows(result),
                    OutputFormat::Tsv
                )
            );
        }
    }

    if !result.warnings.is_empty() {
        println!();
        for warning in &result.warnings {
            println!("{} {}", style("!").yellow(), warning);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_assignment() {
        assert_eq!(parse_assignment("PNL-07=2440x1220x2mm").unwrap().0, "PNL-07");
        assert!(parse_assignment("PNL-07").is_err());
    }

    #[test]
    fn test_parse_overrides_merges_per_part() {
        let overrides = parse_overrides(
            &["PNL-07=2440x1220x2mm".to_string()],
            &["PNL-07=18".to_string(), "BRK-01=4".to_string()],
        )
        .unwrap();

        let pnl = &overrides["PNL-07"];
        assert_eq!(pnl.sheet_spec.as_deref(), Some("2440x1220x2mm"));
        assert_eq!(pnl.pieces_per_sheet, Some(18));

        let brk = &overrides["BRK-01"];
        assert!(brk.sheet_spec.is_none());
        assert_eq!(brk.pieces_per_sheet, Some(4));
    }

    #[test]
    fn test_parse_overrides_rejects_bad_count() {
        assert!(parse_overrides(&[], &["PNL-07=lots".to_string()]).is_err());
    }
}
