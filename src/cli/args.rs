//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    cart::CartCommands, catalog::CatalogCommands, completions::CompletionsArgs,
    quote::QuoteCommands, validate::ValidateArgs,
};

#[derive(Parser)]
#[command(name = "fabquote")]
#[command(author, version, about = "BOM-driven quoting for custom fabrication")]
#[command(
    long_about = "Computes manufacturing quotations for finished products built from fabricated sheet-metal parts, purchased components, and packaging, driven by a plain-text catalog."
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress breakdown tables, keep the figures
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Catalog bundle path (default: from config, else catalog.yaml)
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,

    /// Quote cart path (default: from config, else cart.yaml)
    #[arg(long, global = true)]
    pub cart: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Browse catalog master data
    #[command(subcommand)]
    Catalog(CatalogCommands),

    /// Compute quotes (BOM-driven or template-driven)
    #[command(subcommand)]
    Quote(QuoteCommands),

    /// Manage the quote cart
    #[command(subcommand)]
    Cart(CartCommands),

    /// Cross-check catalog references
    Validate(ValidateArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Automatically detect based on context
    #[default]
    Auto,
    /// Padded columns for the terminal
    Tsv,
    /// JSON (for programming)
    Json,
    /// YAML (full fidelity)
    Yaml,
    /// CSV (for spreadsheets)
    Csv,
    /// Markdown tables
    Md,
}
