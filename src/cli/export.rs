//! CSV workbook export
//!
//! Writes a quote (or the cart) as a directory of CSV files mirroring the
//! sections a spreadsheet export would carry. Field names and row order
//! are stable across calls so exports stay diffable.

use std::path::Path;

use miette::{IntoDiagnostic, Result};

use crate::cart::QuoteCart;
use crate::engine::QuoteResult;

/// Order-level header fields for a single-product export
#[derive(Debug, Clone)]
pub struct QuoteHeader {
    pub quote_no: String,
    pub customer: String,
    pub currency: String,
}

fn money(value: f64) -> String {
    format!("{:.2}", value)
}

/// Write the full quote workbook into a directory
///
/// Files: quote_header.csv, cost_summary.csv, bom_breakdown.csv,
/// process_breakdown.csv, and sheet_alternatives.csv when any exist.
pub fn export_quote(dir: &Path, header: &QuoteHeader, result: &QuoteResult) -> Result<()> {
    std::fs::create_dir_all(dir).into_diagnostic()?;

    let mut writer = csv::Writer::from_path(dir.join("quote_header.csv")).into_diagnostic()?;
    writer.write_record(["field", "value"]).into_diagnostic()?;
    for (field, value) in [
        ("quote_no", header.quote_no.clone()),
        ("customer", header.customer.clone()),
        ("currency", header.currency.clone()),
        ("product_sku", result.sku.clone()),
        ("product_name", result.product_name.clone()),
        ("quantity", result.quantity.to_string()),
    ] {
        writer
            .write_record([field, value.as_str()])
            .into_diagnostic()?;
    }
    writer.flush().into_diagnostic()?;

    let summary = &result.summary;
    let mut writer = csv::Writer::from_path(dir.join("cost_summary.csv")).into_diagnostic()?;
    writer.write_record(["item", "value"]).into_diagnostic()?;
    for (item, value) in [
        ("material_total", money(summary.material_total)),
        ("process_total", money(summary.process_total)),
        ("purchased_total", money(summary.purchased_total)),
        ("packaging_total", money(summary.packaging_total)),
        ("shipping_cost", money(summary.shipping_cost)),
        ("subtotal", money(summary.subtotal)),
        ("overhead", money(summary.overhead)),
        ("tax", money(summary.tax)),
        ("total_cost", money(summary.total_cost)),
        ("final_price_total", money(summary.final_price_total)),
        ("unit_price", money(summary.unit_price)),
        ("multiplier", summary.multiplier.to_string()),
    ] {
        writer
            .write_record([item, value.as_str()])
            .into_diagnostic()?;
    }
    writer.flush().into_diagnostic()?;

    let mut writer = csv::Writer::from_path(dir.join("bom_breakdown.csv")).into_diagnostic()?;
    writer
        .write_record([
            "line_type",
            "code",
            "name",
            "qty_total",
            "uom",
            "unit_cost",
            "line_total",
            "material_cost",
            "process_cost",
            "sheet_spec",
            "pieces_per_sheet",
            "sheets_needed",
            "optional",
        ])
        .into_diagnostic()?;
    for line in &result.lines {
        writer
            .write_record([
                line.kind.to_string(),
                line.code.clone(),
                line.name.clone(),
                line.qty_total.to_string(),
                line.uom.clone(),
                money(line.unit_cost),
                money(line.line_total),
                money(line.material_cost),
                money(line.process_cost),
                line.sheet_spec.clone().unwrap_or_default(),
                line.pieces_per_sheet
                    .map(|p| p.to_string())
                    .unwrap_or_default(),
                line.sheets_needed
                    .map(|s| s.to_string())
                    .unwrap_or_default(),
                line.optional.to_string(),
            ])
            .into_diagnostic()?;
    }
    writer.flush().into_diagnostic()?;

    let mut writer =
        csv::Writer::from_path(dir.join("process_breakdown.csv")).into_diagnostic()?;
    writer
        .write_record([
            "part_code",
            "process_code",
            "name",
            "basis",
            "minutes_per_unit",
            "rate_per_min",
            "qty",
            "runtime_cost",
            "setup_cost",
            "total_cost",
        ])
        .into_diagnostic()?;
    for row in &result.process_rows {
        writer
            .write_record([
                row.part_code.clone(),
                row.process_code.clone(),
                row.name.clone(),
                row.basis.map(|b| b.to_string()).unwrap_or_default(),
                row.minutes_per_unit.to_string(),
                row.rate_per_min.to_string(),
                row.qty.to_string(),
                money(row.runtime_cost),
                money(row.setup_cost),
                money(row.total_cost),
            ])
            .into_diagnostic()?;
    }
    writer.flush().into_diagnostic()?;

    if !result.sheet_alternatives.is_empty() {
        let mut writer =
            csv::Writer::from_path(dir.join("sheet_alternatives.csv")).into_diagnostic()?;
        writer
            .write_record([
                "part_code",
                "sheet_spec",
                "sheet_price",
                "pieces_per_sheet",
                "sheets_needed",
                "material_cost",
            ])
            .into_diagnostic()?;
        for row in &result.sheet_alternatives {
            writer
                .write_record([
                    row.part_code.clone(),
                    row.sheet_spec.clone(),
                    money(row.sheet_price),
                    row.pieces_per_sheet.to_string(),
                    row.sheets_needed.to_string(),
                    money(row.material_cost),
                ])
                .into_diagnostic()?;
        }
        writer.flush().into_diagnostic()?;
    }

    Ok(())
}

/// Write the cart as order_header.csv + order_lines.csv
pub fn export_cart(dir: &Path, cart: &QuoteCart) -> Result<()> {
    std::fs::create_dir_all(dir).into_diagnostic()?;

    let mut writer = csv::Writer::from_path(dir.join("order_header.csv")).into_diagnostic()?;
    writer
        .write_record([
            "quote_no",
            "customer",
            "currency",
            "order_shipping",
            "lines_subtotal",
            "final_total",
        ])
        .into_diagnostic()?;
    writer
        .write_record([
            cart.header.quote_no.clone(),
            cart.header.customer.clone(),
            cart.header.currency.clone(),
            money(cart.header.shipping_per_order),
            money(cart.lines_subtotal()),
            money(cart.order_total()),
        ])
        .into_diagnostic()?;
    writer.flush().into_diagnostic()?;

    let mut writer = csv::Writer::from_path(dir.join("order_lines.csv")).into_diagnostic()?;
    writer
        .write_record([
            "line_id",
            "sku",
            "product_name",
            "qty",
            "unit_price",
            "line_total",
            "material_cost",
            "process_cost",
            "packaging_cost",
            "cost_total",
            "pricing_mode",
            "margin_pct",
            "added",
        ])
        .into_diagnostic()?;
    for line in &cart.lines {
        writer
            .write_record([
                line.line_id.to_string(),
                line.sku.clone(),
                line.product_name.clone(),
                line.qty.to_string(),
                money(line.unit_price),
                money(line.line_total),
                money(line.material_cost),
                money(line.process_cost),
                money(line.packaging_cost),
                money(line.cost_total),
                line.pricing_mode.to_string(),
                line.margin_pct.to_string(),
                line.added.format("%Y-%m-%d %H:%M").to_string(),
            ])
            .into_diagnostic()?;
    }
    writer.flush().into_diagnostic()?;

    Ok(())
}
