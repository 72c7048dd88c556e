//! Fabquote: BOM-driven quoting for custom fabrication
//!
//! Computes manufacturing quotations for finished products assembled from
//! fabricated sheet-metal parts, purchased components, and packaging,
//! driven by a plain-text catalog. The calculation engine is pure: the
//! same catalog and parameters always produce the same quote.

pub mod cart;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod engine;
