//! Integration tests for the fabquote CLI
//!
//! These tests exercise the CLI commands end-to-end using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Helper to get a fabquote command
fn fabquote() -> Command {
    Command::cargo_bin("fabquote").unwrap()
}

const CATALOG: &str = r#"
settings:
  currency: USD
  overhead_pct: 0.05
  tax_pct: 0.13
  margin_pct: 0.18
  scrap_rate: 0.03
  shipping_per_order: 120
materials:
  - code: SS-304
    name: Stainless 304
    pricing_mode: by_sheet
    sheet_options:
      - { sheet_length_mm: 3000, sheet_width_mm: 1500, thickness_mm: 2, sheet_price: 400 }
      - { sheet_length_mm: 2440, sheet_width_mm: 1220, thickness_mm: 2, sheet_price: 280 }
  - code: AL-5052
    name: Aluminum 5052
    pricing_mode: by_weight
    price_per_kg: 6.5
processes:
  - code: LASER
    name: Laser Cutting
    unit_rate_per_min: 1.2
    setup_cost: 50
  - code: BEND
    name: Press Brake
    unit_rate_per_min: 0.9
    setup_cost: 30
quantity_tiers:
  - { min_qty: 1, max_qty: 49, multiplier: 1.0, label: "1-49" }
  - { min_qty: 50, max_qty: null, multiplier: 0.9, label: "50+" }
parts:
  - part_code: PNL-07
    name: Side Panel
    material_code: SS-304
    thickness_mm: 2
    blank_length_mm: 500
    blank_width_mm: 200
    nest_efficiency: 1.0
    process_steps:
      - { process_code: LASER, minutes_per_unit: 0.5 }
      - { process_code: BEND, minutes_per_unit: 0.2 }
purchased_items:
  - item_code: HNG-10
    name: Hinge
    unit_cost: 2.0
packaging_rules:
  per_unit:
    - { item_code: BAG-S, unit_cost: 0.1, qty_per_unit: 1 }
products:
  - sku: ENC-100
    name: Control Enclosure
    units_per_carton: 12
    bom_lines:
      - { type: part, code: PNL-07, qty_per_unit: 1 }
      - { type: purchased, code: HNG-10, qty_per_unit: 2 }
      - { type: packaging, code: BAG-S }
  - sku: HW-KIT
    name: Hardware Kit
    bom_lines:
      - { type: purchased, code: HNG-10, qty_per_unit: 2 }
      - { type: packaging, code: BAG-S }
  - sku: BAD-1
    name: Broken Product
    bom_lines:
      - { type: part, code: GHOST-9 }
      - { type: purchased, code: HNG-10, qty_per_unit: 1 }
product_templates:
  - sku: TPL-01
    name: Mounting Plate
    material_code: AL-5052
    weight_kg_per_unit: 0.5
    default_processes:
      - { process_code: LASER, minutes: 1.0 }
"#;

/// Write the fixture catalog and return its path
fn setup_catalog(tmp: &TempDir) -> PathBuf {
    let path = tmp.path().join("catalog.yaml");
    fs::write(&path, CATALOG).unwrap();
    path
}

// ============================================================================
// CLI Basic Tests
// ============================================================================

#[test]
fn test_help_displays() {
    fabquote()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("quoting"));
}

#[test]
fn test_version_displays() {
    fabquote()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("fabquote"));
}

#[test]
fn test_unknown_command_fails() {
    fabquote()
        .arg("definitely-not-a-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_missing_catalog_fails() {
    let tmp = TempDir::new().unwrap();
    fabquote()
        .current_dir(tmp.path())
        .args(["catalog", "materials"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("catalog"));
}

// ============================================================================
// Catalog Browsing
// ============================================================================

#[test]
fn test_catalog_materials_lists_codes() {
    let tmp = TempDir::new().unwrap();
    let catalog = setup_catalog(&tmp);

    fabquote()
        .args(["--catalog", catalog.to_str().unwrap(), "catalog", "materials"])
        .assert()
        .success()
        .stdout(predicate::str::contains("SS-304"))
        .stdout(predicate::str::contains("by_sheet"))
        .stdout(predicate::str::contains("AL-5052"));
}

#[test]
fn test_catalog_parts_csv() {
    let tmp = TempDir::new().unwrap();
    let catalog = setup_catalog(&tmp);

    fabquote()
        .args([
            "--catalog",
            catalog.to_str().unwrap(),
            "-f",
            "csv",
            "catalog",
            "parts",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("PNL-07"))
        .stdout(predicate::str::starts_with("code,name,material"));
}

#[test]
fn test_catalog_products_json() {
    let tmp = TempDir::new().unwrap();
    let catalog = setup_catalog(&tmp);

    fabquote()
        .args([
            "--catalog",
            catalog.to_str().unwrap(),
            "-f",
            "json",
            "catalog",
            "products",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"sku\": \"ENC-100\""));
}

// ============================================================================
// Quote Product
// ============================================================================

#[test]
fn test_quote_product_flat_parameters() {
    let tmp = TempDir::new().unwrap();
    let catalog = setup_catalog(&tmp);

    // 10 kits: hinges 10*2*2.00 = 40.00, bags 10*0.10 = 1.00; no
    // overhead/tax/margin/shipping leaves a 41.00 total at tier 1.0.
    fabquote()
        .args([
            "--catalog",
            catalog.to_str().unwrap(),
            "quote",
            "product",
            "HW-KIT",
            "-n",
            "10",
            "--overhead",
            "0",
            "--tax",
            "0",
            "--margin",
            "0",
            "--shipping",
            "0",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("USD 41.00"))
        .stdout(predicate::str::contains("USD 4.10"));
}

#[test]
fn test_quote_product_applies_tier_multiplier() {
    let tmp = TempDir::new().unwrap();
    let catalog = setup_catalog(&tmp);

    // 50 kits: 50*2*2.00 + 50*0.10 = 205.00, then the 0.9 tier.
    fabquote()
        .args([
            "--catalog",
            catalog.to_str().unwrap(),
            "quote",
            "product",
            "HW-KIT",
            "-n",
            "50",
            "--overhead",
            "0",
            "--tax",
            "0",
            "--margin",
            "0",
            "--shipping",
            "0",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("USD 184.50"))
        .stdout(predicate::str::contains("multiplier 0.9"));
}

#[test]
fn test_quote_product_sheet_breakdown() {
    let tmp = TempDir::new().unwrap();
    let catalog = setup_catalog(&tmp);

    fabquote()
        .args([
            "--catalog",
            catalog.to_str().unwrap(),
            "quote",
            "product",
            "ENC-100",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("PNL-07"))
        .stdout(predicate::str::contains("Sheet alternatives"))
        .stdout(predicate::str::contains("Process breakdown"))
        .stdout(predicate::str::contains("LASER"));
}

#[test]
fn test_quote_product_unknown_sku_fails() {
    let tmp = TempDir::new().unwrap();
    let catalog = setup_catalog(&tmp);

    fabquote()
        .args([
            "--catalog",
            catalog.to_str().unwrap(),
            "quote",
            "product",
            "NOPE-1",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No product"));
}

#[test]
fn test_quote_product_fail_soft_warning() {
    let tmp = TempDir::new().unwrap();
    let catalog = setup_catalog(&tmp);

    // BAD-1 has a dangling part code; the quote still completes and the
    // remaining purchased line is priced.
    fabquote()
        .args([
            "--catalog",
            catalog.to_str().unwrap(),
            "quote",
            "product",
            "BAD-1",
            "-n",
            "10",
            "--overhead",
            "0",
            "--tax",
            "0",
            "--margin",
            "0",
            "--shipping",
            "0",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("GHOST-9"))
        .stdout(predicate::str::contains("not found"))
        .stdout(predicate::str::contains("USD 20.00"));
}

#[test]
fn test_quote_product_pieces_override() {
    let tmp = TempDir::new().unwrap();
    let catalog = setup_catalog(&tmp);

    // Forcing 1 piece per sheet makes sheets = quantity on the chosen
    // candidate (the cheaper 2440x1220 sheet at 280.00 each).
    fabquote()
        .args([
            "--catalog",
            catalog.to_str().unwrap(),
            "quote",
            "product",
            "ENC-100",
            "-n",
            "10",
            "--pieces",
            "PNL-07=1",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("USD 2,800.00"));
}

#[test]
fn test_quote_product_json_output() {
    let tmp = TempDir::new().unwrap();
    let catalog = setup_catalog(&tmp);

    fabquote()
        .args([
            "--catalog",
            catalog.to_str().unwrap(),
            "-f",
            "json",
            "quote",
            "product",
            "ENC-100",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"final_price_total\""))
        .stdout(predicate::str::contains("\"sheet_alternatives\""));
}

#[test]
fn test_quote_product_export_workbook() {
    let tmp = TempDir::new().unwrap();
    let catalog = setup_catalog(&tmp);
    let export_dir = tmp.path().join("export");

    fabquote()
        .args([
            "--catalog",
            catalog.to_str().unwrap(),
            "quote",
            "product",
            "ENC-100",
            "--export",
            export_dir.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported"));

    assert!(export_dir.join("quote_header.csv").exists());
    assert!(export_dir.join("cost_summary.csv").exists());
    assert!(export_dir.join("bom_breakdown.csv").exists());
    assert!(export_dir.join("process_breakdown.csv").exists());
    assert!(export_dir.join("sheet_alternatives.csv").exists());

    let bom = fs::read_to_string(export_dir.join("bom_breakdown.csv")).unwrap();
    assert!(bom.contains("PNL-07"));
    assert!(bom.contains("HNG-10"));
}

// ============================================================================
// Quote Template
// ============================================================================

#[test]
fn test_quote_template_flat_parameters() {
    let tmp = TempDir::new().unwrap();
    let catalog = setup_catalog(&tmp);

    // Material 10*0.5kg*6.50 = 32.50; LASER 1.0*1.2*10+50 = 62.00.
    fabquote()
        .args([
            "--catalog",
            catalog.to_str().unwrap(),
            "quote",
            "template",
            "TPL-01",
            "-n",
            "10",
            "--overhead",
            "0",
            "--tax",
            "0",
            "--margin",
            "0",
            "--scrap",
            "0",
            "--shipping",
            "0",
            "--packaging-per-piece",
            "0",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("USD 94.50"))
        .stdout(predicate::str::contains("USD 9.45"));
}

#[test]
fn test_quote_template_fixed_basis_drops_runtime() {
    let tmp = TempDir::new().unwrap();
    let catalog = setup_catalog(&tmp);

    // Fixed basis keeps only the 50.00 setup; material stays 32.50.
    fabquote()
        .args([
            "--catalog",
            catalog.to_str().unwrap(),
            "quote",
            "template",
            "TPL-01",
            "-n",
            "10",
            "--overhead",
            "0",
            "--tax",
            "0",
            "--margin",
            "0",
            "--scrap",
            "0",
            "--shipping",
            "0",
            "--packaging-per-piece",
            "0",
            "--basis",
            "LASER=fixed",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("USD 82.50"));
}

#[test]
fn test_quote_template_unknown_sku_fails() {
    let tmp = TempDir::new().unwrap();
    let catalog = setup_catalog(&tmp);

    fabquote()
        .args([
            "--catalog",
            catalog.to_str().unwrap(),
            "quote",
            "template",
            "TPL-99",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("template"));
}

// ============================================================================
// Cart
// ============================================================================

#[test]
fn test_cart_add_list_remove() {
    let tmp = TempDir::new().unwrap();
    let catalog = setup_catalog(&tmp);
    let cart = tmp.path().join("cart.yaml");

    fabquote()
        .args([
            "--catalog",
            catalog.to_str().unwrap(),
            "--cart",
            cart.to_str().unwrap(),
            "cart",
            "add",
            "ENC-100",
            "-n",
            "25",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added line 1"));

    fabquote()
        .args([
            "--catalog",
            catalog.to_str().unwrap(),
            "--cart",
            cart.to_str().unwrap(),
            "cart",
            "add",
            "HW-KIT",
            "-n",
            "100",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added line 2"));

    fabquote()
        .args([
            "--catalog",
            catalog.to_str().unwrap(),
            "--cart",
            cart.to_str().unwrap(),
            "cart",
            "list",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("ENC-100"))
        .stdout(predicate::str::contains("HW-KIT"))
        .stdout(predicate::str::contains("Order total"));

    fabquote()
        .args([
            "--catalog",
            catalog.to_str().unwrap(),
            "--cart",
            cart.to_str().unwrap(),
            "cart",
            "remove",
            "1",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed line 1"));

    fabquote()
        .args([
            "--catalog",
            catalog.to_str().unwrap(),
            "--cart",
            cart.to_str().unwrap(),
            "cart",
            "list",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("ENC-100").not())
        .stdout(predicate::str::contains("HW-KIT"));
}

#[test]
fn test_cart_remove_unknown_line_fails() {
    let tmp = TempDir::new().unwrap();
    let catalog = setup_catalog(&tmp);
    let cart = tmp.path().join("cart.yaml");

    fabquote()
        .args([
            "--catalog",
            catalog.to_str().unwrap(),
            "--cart",
            cart.to_str().unwrap(),
            "cart",
            "remove",
            "42",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("42"));
}

#[test]
fn test_cart_export_writes_order_files() {
    let tmp = TempDir::new().unwrap();
    let catalog = setup_catalog(&tmp);
    let cart = tmp.path().join("cart.yaml");
    let export_dir = tmp.path().join("order");

    fabquote()
        .args([
            "--catalog",
            catalog.to_str().unwrap(),
            "--cart",
            cart.to_str().unwrap(),
            "cart",
            "add",
            "HW-KIT",
            "-n",
            "10",
        ])
        .assert()
        .success();

    fabquote()
        .args([
            "--catalog",
            catalog.to_str().unwrap(),
            "--cart",
            cart.to_str().unwrap(),
            "cart",
            "export",
            export_dir.to_str().unwrap(),
        ])
        .assert()
        .success();

    assert!(export_dir.join("order_header.csv").exists());
    let lines = fs::read_to_string(export_dir.join("order_lines.csv")).unwrap();
    assert!(lines.contains("HW-KIT"));
}

#[test]
fn test_cart_clear() {
    let tmp = TempDir::new().unwrap();
    let catalog = setup_catalog(&tmp);
    let cart = tmp.path().join("cart.yaml");

    fabquote()
        .args([
            "--catalog",
            catalog.to_str().unwrap(),
            "--cart",
            cart.to_str().unwrap(),
            "cart",
            "add",
            "HW-KIT",
        ])
        .assert()
        .success();

    fabquote()
        .args([
            "--catalog",
            catalog.to_str().unwrap(),
            "--cart",
            cart.to_str().unwrap(),
            "cart",
            "clear",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cleared cart (1 line)"));

    fabquote()
        .args([
            "--catalog",
            catalog.to_str().unwrap(),
            "--cart",
            cart.to_str().unwrap(),
            "cart",
            "list",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cart is empty."));
}

// ============================================================================
// Validate
// ============================================================================

#[test]
fn test_validate_reports_dangling_bom_code() {
    let tmp = TempDir::new().unwrap();
    let catalog = setup_catalog(&tmp);

    // The fixture ships with BAD-1's dangling GHOST-9 reference.
    fabquote()
        .args(["--catalog", catalog.to_str().unwrap(), "validate"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("GHOST-9"));
}

#[test]
fn test_validate_clean_catalog() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("clean.yaml");
    fs::write(
        &path,
        r#"
materials:
  - code: AL-5052
    name: Aluminum
    price_per_kg: 6.5
processes:
  - code: LASER
    name: Laser
parts: []
products: []
"#,
    )
    .unwrap();

    fabquote()
        .args(["--catalog", path.to_str().unwrap(), "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Catalog OK"));
}

#[test]
fn test_validate_no_fail_flag() {
    let tmp = TempDir::new().unwrap();
    let catalog = setup_catalog(&tmp);

    fabquote()
        .args(["--catalog", catalog.to_str().unwrap(), "validate", "--no-fail"])
        .assert()
        .success()
        .stdout(predicate::str::contains("GHOST-9"));
}

// ============================================================================
// Completions
// ============================================================================

#[test]
fn test_completions_bash() {
    fabquote()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("fabquote"));
}
