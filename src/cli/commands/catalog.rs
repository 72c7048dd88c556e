//! `fabquote catalog` command - browse master data

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};

use crate::catalog::Catalog;
use crate::cli::commands::load_catalog;
use crate::cli::helpers::{trim_float, truncate_str};
use crate::cli::{table, GlobalOpts, OutputFormat};

#[derive(Subcommand, Debug)]
pub enum CatalogCommands {
    /// List materials with their pricing modes
    Materials,

    /// List manufacturing processes with rates
    Processes,

    /// List fabricated parts with blank geometry
    Parts,

    /// List purchased items
    Purchased,

    /// List packaging rules
    Packaging,

    /// List quantity tiers
    Tiers,

    /// List finished products
    Products,

    /// List product templates
    Templates,
}

pub fn run(cmd: CatalogCommands, global: &GlobalOpts) -> Result<()> {
    let (catalog, _config) = load_catalog(global)?;

    let format = match global.format {
        OutputFormat::Auto => OutputFormat::Tsv,
        f => f,
    };

    match cmd {
        CatalogCommands::Materials => materials(&catalog, format),
        CatalogCommands::Processes => processes(&catalog, format),
        CatalogCommands::Parts => parts(&catalog, format),
        CatalogCommands::Purchased => purchased(&catalog, format),
        CatalogCommands::Packaging => packaging(&catalog, format),
        CatalogCommands::Tiers => tiers(&catalog, format),
        CatalogCommands::Products => products(&catalog, format),
        CatalogCommands::Templates => templates(&catalog, format),
    }
}

fn emit<T: serde::Serialize>(
    records: Vec<&T>,
    headers: &[&str],
    rows: Vec<Vec<String>>,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&records).into_diagnostic()?
            );
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&records).into_diagnostic()?);
        }
        _ => {
            if rows.is_empty() {
                println!("No entries.");
            } else {
                print!("{}", table::render(headers, &rows, format));
                if format == OutputFormat::Tsv {
                    println!();
                    println!("{} entries", style(rows.len()).cyan());
                }
            }
        }
    }
    Ok(())
}

fn materials(catalog: &Catalog, format: OutputFormat) -> Result<()> {
    let rows = catalog
        .materials
        .values()
        .map(|m| {
            vec![
                m.code.clone(),
                truncate_str(&m.name, 24),
                m.pricing_mode.to_string(),
                m.price_per_kg.map(|p| format!("{:.2}", p)).unwrap_or_else(|| "-".to_string()),
                m.sheet_options.len().to_string(),
            ]
        })
        .collect();
    emit(
        catalog.materials.values().collect(),
        &["code", "name", "pricing", "price/kg", "sheets"],
        rows,
        format,
    )
}

fn processes(catalog: &Catalog, format: OutputFormat) -> Result<()> {
    let rows = catalog
        .processes
        .values()
        .map(|p| {
            vec![
                p.code.clone(),
                truncate_str(&p.name, 24),
                format!("{:.2}", p.unit_rate_per_min),
                format!("{:.2}", p.setup_cost),
            ]
        })
        .collect();
    emit(
        catalog.processes.values().collect(),
        &["code", "name", "rate/min", "setup"],
        rows,
        format,
    )
}

fn parts(catalog: &Catalog, format: OutputFormat) -> Result<()> {
    let rows = catalog
        .parts
        .values()
        .map(|p| {
            vec![
                p.part_code.clone(),
                truncate_str(&p.name, 24),
                p.material_code.clone(),
                trim_float(p.thickness_mm),
                format!(
                    "{}x{}",
                    trim_float(p.blank_length_mm),
                    trim_float(p.blank_width_mm)
                ),
                if p.allow_rotate { "yes" } else { "no" }.to_string(),
                trim_float(p.nest_efficiency),
                p.process_steps.len().to_string(),
            ]
        })
        .collect();
    emit(
        catalog.parts.values().collect(),
        &[
            "code", "name", "material", "thk", "blank", "rotate", "nest", "steps",
        ],
        rows,
        format,
    )
}

fn purchased(catalog: &Catalog, format: OutputFormat) -> Result<()> {
    let rows = catalog
        .purchased_items
        .values()
        .map(|i| {
            vec![
                i.item_code.clone(),
                truncate_str(&i.name, 24),
                format!("{:.2}", i.unit_cost),
                i.uom.clone().unwrap_or_else(|| "ea".to_string()),
                trim_float(i.waste_pct),
                i.moq_qty.map(trim_float).unwrap_or_else(|| "-".to_string()),
            ]
        })
        .collect();
    emit(
        catalog.purchased_items.values().collect(),
        &["code", "name", "unit cost", "uom", "waste", "moq"],
        rows,
        format,
    )
}

fn packaging(catalog: &Catalog, format: OutputFormat) -> Result<()> {
    let rows = catalog
        .packaging_rules
        .values()
        .map(|r| {
            vec![
                r.item_code.clone(),
                r.kind.to_string(),
                format!("{:.2}", r.unit_cost),
                r.qty_per_unit.map(trim_float).unwrap_or_else(|| "-".to_string()),
                r.qty_per_carton.map(trim_float).unwrap_or_else(|| "-".to_string()),
                r.units_per_carton
                    .map(|u| u.to_string())
                    .unwrap_or_else(|| "-".to_string()),
            ]
        })
        .collect();
    emit(
        catalog.packaging_rules.values().collect(),
        &["code", "kind", "unit cost", "qty/unit", "qty/carton", "units/carton"],
        rows,
        format,
    )
}

fn tiers(catalog: &Catalog, format: OutputFormat) -> Result<()> {
    let rows = catalog
        .tiers
        .iter()
        .map(|t| {
            vec![
                t.label.clone(),
                t.min_qty.to_string(),
                t.max_qty.map(|m| m.to_string()).unwrap_or_else(|| "open".to_string()),
                t.multiplier.to_string(),
            ]
        })
        .collect();
    emit(
        catalog.tiers.iter().collect(),
        &["label", "min qty", "max qty", "multiplier"],
        rows,
        format,
    )
}

fn products(catalog: &Catalog, format: OutputFormat) -> Result<()> {
    let rows = catalog
        .products
        .values()
        .map(|p| {
            vec![
                p.sku.clone(),
                truncate_str(&p.name, 28),
                p.units_per_carton
                    .map(|u| u.to_string())
                    .unwrap_or_else(|| "-".to_string()),
                p.bom_lines.len().to_string(),
            ]
        })
        .collect();
    emit(
        catalog.products.values().collect(),
        &["sku", "name", "units/carton", "bom lines"],
        rows,
        format,
    )
}

fn templates(catalog: &Catalog, format: OutputFormat) -> Result<()> {
    let rows = catalog
        .templates
        .values()
        .map(|t| {
            vec![
                t.sku.clone(),
                truncate_str(&t.name, 28),
                t.material_code.clone(),
                trim_float(t.weight_kg_per_unit),
                t.default_processes.len().to_string(),
            ]
        })
        .collect();
    emit(
        catalog.templates.values().collect(),
        &["sku", "name", "material", "kg/unit", "processes"],
        rows,
        format,
    )
}
