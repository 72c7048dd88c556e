//! `fabquote validate` command - cross-check catalog references

use console::style;
use miette::Result;

use crate::catalog::{BomLineKind, Catalog, PricingMode};
use crate::cli::commands::load_catalog;
use crate::cli::GlobalOpts;

#[derive(clap::Args, Debug)]
pub struct ValidateArgs {
    /// Only report; exit zero even when issues are found
    #[arg(long)]
    pub no_fail: bool,
}

/// Collect dangling references and unpriceable configurations
///
/// These are the degradations the engine would later surface as
/// warnings; validating up front catches them before quoting.
pub fn collect_issues(catalog: &Catalog) -> Vec<String> {
    let mut issues = Vec::new();

    for part in catalog.parts.values() {
        match catalog.materials.get(&part.material_code) {
            None => issues.push(format!(
                "part '{}' references unknown material '{}'",
                part.part_code, part.material_code
            )),
            Some(material)
                if material.pricing_mode == PricingMode::BySheet
                    && material.sheet_options.is_empty() =>
            {
                issues.push(format!(
                    "part '{}' uses sheet-priced material '{}' which has no sheet options",
                    part.part_code, material.code
                ));
            }
            _ => {}
        }

        for step in &part.process_steps {
            if !catalog.processes.contains_key(&step.process_code) {
                issues.push(format!(
                    "part '{}' routing references unknown process '{}'",
                    part.part_code, step.process_code
                ));
            }
        }
    }

    for product in catalog.products.values() {
        for line in &product.bom_lines {
            let known = match line.kind {
                BomLineKind::Part => catalog.parts.contains_key(&line.code),
                BomLineKind::Purchased => catalog.purchased_items.contains_key(&line.code),
                BomLineKind::Packaging => catalog.packaging_rules.contains_key(&line.code),
            };
            if !known {
                issues.push(format!(
                    "product '{}' BOM references unknown {} '{}'",
                    product.sku, line.kind, line.code
                ));
            }
        }
    }

    for template in catalog.templates.values() {
        if !catalog.materials.contains_key(&template.material_code) {
            issues.push(format!(
                "template '{}' references unknown material '{}'",
                template.sku, template.material_code
            ));
        }
        for step in &template.default_processes {
            if !catalog.processes.contains_key(&step.process_code) {
                issues.push(format!(
                    "template '{}' references unknown process '{}'",
                    template.sku, step.process_code
                ));
            }
        }
    }

    for tier in &catalog.tiers {
        if tier.multiplier <= 0.0 {
            issues.push(format!(
                "tier '{}' has non-positive multiplier {}",
                tier.label, tier.multiplier
            ));
        }
        if tier.max_qty.is_some_and(|max| max < tier.min_qty) {
            issues.push(format!(
                "tier '{}' has max_qty below min_qty",
                tier.label
            ));
        }
    }

    issues
}

pub fn run(args: ValidateArgs, global: &GlobalOpts) -> Result<()> {
    let (catalog, _config) = load_catalog(global)?;
    let issues = collect_issues(&catalog);

    if issues.is_empty() {
        println!(
            "{} Catalog OK: {} materials, {} processes, {} parts, {} products",
            style("✓").green(),
            catalog.materials.len(),
            catalog.processes.len(),
            catalog.parts.len(),
            catalog.products.len()
        );
        return Ok(());
    }

    for issue in &issues {
        println!("{} {}", style("!").yellow(), issue);
    }

    if args.no_fail {
        println!(
            "{} issue(s) found (ignored with --no-fail)",
            style(issues.len()).yellow()
        );
        Ok(())
    } else {
        Err(miette::miette!("{} catalog issue(s) found", issues.len()))
    }
}
