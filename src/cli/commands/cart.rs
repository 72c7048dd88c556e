//! `fabquote cart` command - manage accepted quote lines

use std::path::PathBuf;

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cart::{CartLine, QuoteCart};
use crate::cli::commands::quote::{parse_overrides, HeaderOpts, PricingOpts};
use crate::cli::commands::{cart_path, load_catalog};
use crate::cli::export;
use crate::cli::helpers::format_money;
use crate::cli::{table, GlobalOpts, OutputFormat};
use crate::engine;

#[derive(Subcommand, Debug)]
pub enum CartCommands {
    /// Quote a product and append the accepted line
    Add(AddArgs),

    /// List cart lines with order totals
    List,

    /// Remove a line by its id
    Remove(RemoveArgs),

    /// Drop every line and reset the header
    Clear,

    /// Export the cart as CSV files into a directory
    Export(ExportArgs),
}

#[derive(clap::Args, Debug)]
pub struct AddArgs {
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
}

#[derive(clap::Args, Debug)]
pub struct RemoveArgs {
    /// Line id to remove
    pub line_id: u32,
}

#[derive(clap::Args, Debug)]
pub struct ExportArgs {
    /// Directory to write order_header.csv and order_lines.csv into
    pub dir: PathBuf,
}

pub fn run(cmd: CartCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        CartCommands::Add(args) => run_add(args, global),
        CartCommands::List => run_list(global),
        CartCommands::Remove(args) => run_remove(args, global),
        CartCommands::Clear => run_clear(global),
        CartCommands::Export(args) => run_export(args, global),
    }
}

fn run_add(args: AddArgs, global: &GlobalOpts) -> Result<()> {
    let (catalog, config) = load_catalog(global)?;
    let product = catalog
        .products
        .get(&args.sku)
        .ok_or_else(|| miette::miette!("No product with SKU '{}'", args.sku))?;

    let mut params = args.pricing.to_params(&catalog.settings);
    params.overrides = parse_overrides(&args.sheet_overrides, &args.pieces_overrides)?;

    let result = engine::quote_product(&catalog, product, &params);

    let path = cart_path(global, &config);
    let mut cart = QuoteCart::load(&path).map_err(|e| miette::miette!("{}", e))?;

    cart.header.quote_no = args.header.quote_no.clone();
    cart.header.customer = args.header.customer.clone();
    cart.header.currency = args
        .header
        .currency
        .clone()
        .or_else(|| config.currency.clone())
        .unwrap_or_else(|| catalog.settings.currency.clone());
    cart.header.shipping_per_order = params.shipping_per_order;

    let line_id = cart.add_line(CartLine::from_quote(&result, &params));
    cart.save(&path).map_err(|e| miette::miette!("{}", e))?;

    println!(
        "{} Added line {} | {} x{} @ {}",
        style("✓").green(),
        style(line_id).cyan(),
        result.sku,
        result.quantity,
        format_money(result.summary.unit_price, &cart.header.currency)
    );
    println!("   {}", style(path.display()).dim());

    for warning in &result.warnings {
        println!("{} {}", style("!").yellow(), warning);
    }

    Ok(())
}

fn run_list(global: &GlobalOpts) -> Result<()> {
    let config = crate::config::Config::load();
    let path = cart_path(global, &config);
    let cart = QuoteCart::load(&path).map_err(|e| miette::miette!("{}", e))?;

    if cart.lines.is_empty() {
        println!("Cart is empty.");
        return Ok(());
    }

    match global.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&cart).into_diagnostic()?
            );
            return Ok(());
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&cart).into_diagnostic()?);
            return Ok(());
        }
        _ => {}
    }

    let format = match global.format {
        OutputFormat::Auto => OutputFormat::Tsv,
        f => f,
    };

    let rows: Vec<Vec<String>> = cart
        .lines
        .iter()
        .map(|line| {
            vec![
                line.line_id.to_string(),
                line.sku.clone(),
                line.product_name.clone(),
                line.qty.to_string(),
                format!("{:.2}", line.unit_price),
                format!("{:.2}", line.line_total),
                line.added.format("%Y-%m-%d").to_string(),
            ]
        })
        .collect();
    print!(
        "{}",
        table::render(
            &["id", "sku", "product", "qty", "unit price", "line total", "added"],
            &rows,
            format,
        )
    );

    if format == OutputFormat::Tsv {
        let currency = &cart.header.currency;
        println!();
        println!(
            "{}: {} | {}: {} | {}: {}",
            style("Lines subtotal").bold(),
            format_money(cart.lines_subtotal(), currency),
            style("Shipping").bold(),
            format_money(cart.header.shipping_per_order, currency),
            style("Order total").bold(),
            style(format_money(cart.order_total(), currency)).green()
        );
    }

    Ok(())
}

fn run_remove(args: RemoveArgs, global: &GlobalOpts) -> Result<()> {
    let config = crate::config::Config::load();
    let path = cart_path(global, &config);
    let mut cart = QuoteCart::load(&path).map_err(|e| miette::miette!("{}", e))?;

    if !cart.remove_line(args.line_id) {
        return Err(miette::miette!("No cart line with id {}", args.line_id));
    }
    cart.save(&path).map_err(|e| miette::miette!("{}", e))?;

    println!("{} Removed line {}", style("✓").green(), args.line_id);
    Ok(())
}

fn run_clear(global: &GlobalOpts) -> Result<()> {
    let config = crate::config::Config::load();
    let path = cart_path(global, &config);
    let mut cart = QuoteCart::load(&path).map_err(|e| miette::miette!("{}", e))?;

    let dropped = cart.lines.len();
    cart.clear();
    cart.save(&path).map_err(|e| miette::miette!("{}", e))?;

    println!(
        "{} Cleared cart ({} line{})",
        style("✓").green(),
        dropped,
        if dropped == 1 { "" } else { "s" }
    );
    Ok(())
}

fn run_export(args: ExportArgs, global: &GlobalOpts) -> Result<()> {
    let config = crate::config::Config::load();
    let path = cart_path(global, &config);
    let cart = QuoteCart::load(&path).map_err(|e| miette::miette!("{}", e))?;

    if cart.lines.is_empty() {
        return Err(miette::miette!("Cart is empty; nothing to export"));
    }

    export::export_cart(&args.dir, &cart)?;
    println!(
        "{} Exported cart to {}",
        style("✓").green(),
        style(args.dir.display()).dim()
    );
    Ok(())
}
