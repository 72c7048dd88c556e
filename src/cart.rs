//! Quote cart - accepted quote lines persisted between invocations
//!
//! The cart is a plain YAML file of accepted lines keyed by an
//! incrementing line id. The engine only produces the line to append;
//! everything about cart lifecycle lives here.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::engine::{PricingMode, QuoteParams, QuoteResult};

/// One accepted quote line with its parameter snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLine {
    /// Incrementing id within the cart
    pub line_id: u32,

    /// Quoted product SKU
    pub sku: String,

    /// Product display name
    pub product_name: String,

    /// Quoted quantity
    pub qty: u32,

    /// Final unit price
    pub unit_price: f64,

    /// Final line total
    pub line_total: f64,

    /// Total cost before margin
    pub cost_total: f64,

    /// Cost components at acceptance time
    pub material_cost: f64,
    pub process_cost: f64,
    pub packaging_cost: f64,

    /// Parameter snapshot at acceptance time
    pub margin_pct: f64,
    pub tax_pct: f64,
    pub overhead_pct: f64,
    pub scrap_rate: f64,
    pub pricing_mode: PricingMode,

    /// When the line was accepted
    pub added: DateTime<Utc>,
}

impl CartLine {
    /// Build a cart line from a computed quote (line_id assigned on add)
    pub fn from_quote(result: &QuoteResult, params: &QuoteParams) -> Self {
        Self {
            line_id: 0,
            sku: result.sku.clone(),
            product_name: result.product_name.clone(),
            qty: result.quantity,
            unit_price: result.summary.unit_price,
            line_total: result.summary.final_price_total,
            cost_total: result.summary.total_cost,
            material_cost: result.summary.material_total,
            process_cost: result.summary.process_total,
            packaging_cost: result.summary.packaging_total,
            margin_pct: params.margin_pct,
            tax_pct: params.tax_pct,
            overhead_pct: params.overhead_pct,
            scrap_rate: params.scrap_rate,
            pricing_mode: params.pricing_mode,
            added: Utc::now(),
        }
    }
}

/// Order-level header fields, refreshed on each add
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CartHeader {
    pub quote_no: String,
    pub customer: String,
    pub currency: String,
    pub shipping_per_order: f64,
}

/// The persistent cart store
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct QuoteCart {
    pub header: CartHeader,
    pub lines: Vec<CartLine>,
}

/// Errors from cart persistence
#[derive(Debug, Error)]
pub enum CartError {
    #[error("failed to read cart {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write cart {path:?}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse cart {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
}

impl QuoteCart {
    /// Load the cart, treating a missing file as an empty cart
    pub fn load(path: &Path) -> Result<Self, CartError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path).map_err(|source| CartError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yml::from_str(&contents).map_err(|e| CartError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Persist the cart
    pub fn save(&self, path: &Path) -> Result<(), CartError> {
        let yaml = serde_yml::to_string(self).map_err(|e| CartError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        std::fs::write(path, yaml).map_err(|source| CartError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Append a line, assigning the next id
    pub fn add_line(&mut self, mut line: CartLine) -> u32 {
        let next_id = self.lines.iter().map(|l| l.line_id).max().unwrap_or(0) + 1;
        line.line_id = next_id;
        self.lines.push(line);
        next_id
    }

    /// Remove a line by id; false if no such line exists
    pub fn remove_line(&mut self, line_id: u32) -> bool {
        let before = self.lines.len();
        self.lines.retain(|l| l.line_id != line_id);
        self.lines.len() != before
    }

    /// Drop every line and reset the header
    pub fn clear(&mut self) {
        self.lines.clear();
        self.header = CartHeader::default();
    }

    /// Sum of final line totals
    pub fn lines_subtotal(&self) -> f64 {
        self.lines.iter().map(|l| l.line_total).sum()
    }

    /// Lines subtotal plus order shipping
    pub fn order_total(&self) -> f64 {
        self.lines_subtotal() + self.header.shipping_per_order
    }
}
