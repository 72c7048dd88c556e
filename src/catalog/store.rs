//! Catalog loading - one bundle file into keyed in-memory maps
//!
//! The catalog ships as a single YAML or JSON bundle. Loading is the only
//! fatal path in the crate: an unreadable file or a bundle missing a
//! required section refuses to produce a catalog. Everything downstream
//! degrades softly instead.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::catalog::material::Material;
use crate::catalog::packaging::{PackagingKind, PackagingRule};
use crate::catalog::part::Part;
use crate::catalog::process::ProcessDefinition;
use crate::catalog::product::Product;
use crate::catalog::purchased::PurchasedItem;
use crate::catalog::settings::Settings;
use crate::catalog::template::ProductTemplate;
use crate::catalog::tier::QuantityTier;

/// The `packaging_rules` section as it appears on disk
#[derive(Debug, Default, Deserialize)]
pub struct PackagingSection {
    #[serde(default)]
    pub per_unit: Vec<PackagingRule>,

    #[serde(default)]
    pub per_carton: Vec<PackagingRule>,
}

/// On-disk catalog bundle
///
/// `materials`, `processes`, `parts`, and `products` are required
/// top-level sections; the rest default to empty.
#[derive(Debug, Deserialize)]
pub struct CatalogFile {
    #[serde(default)]
    pub settings: Settings,

    pub materials: Vec<Material>,

    pub processes: Vec<ProcessDefinition>,

    #[serde(default)]
    pub quantity_tiers: Vec<QuantityTier>,

    pub parts: Vec<Part>,

    #[serde(default)]
    pub purchased_items: Vec<PurchasedItem>,

    #[serde(default)]
    pub packaging_rules: PackagingSection,

    pub products: Vec<Product>,

    #[serde(default)]
    pub product_templates: Vec<ProductTemplate>,
}

/// Validated in-memory catalog, keyed by code/SKU
///
/// BTreeMap keys give stable iteration order, which keeps listings and
/// exports diffable across runs.
#[derive(Debug)]
pub struct Catalog {
    pub settings: Settings,
    pub materials: BTreeMap<String, Material>,
    pub processes: BTreeMap<String, ProcessDefinition>,
    pub parts: BTreeMap<String, Part>,
    pub purchased_items: BTreeMap<String, PurchasedItem>,
    pub packaging_rules: BTreeMap<String, PackagingRule>,
    pub tiers: Vec<QuantityTier>,
    pub products: BTreeMap<String, Product>,
    pub templates: BTreeMap<String, ProductTemplate>,
}

/// Errors that can occur while loading a catalog bundle
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog file not found: {0:?}")]
    NotFound(PathBuf),

    #[error("failed to read catalog {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse catalog {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
}

impl Catalog {
    /// Load a catalog bundle from a YAML or JSON file
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        if !path.exists() {
            return Err(CatalogError::NotFound(path.to_path_buf()));
        }

        let contents = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let is_json = path.extension().is_some_and(|e| e == "json");
        let file: CatalogFile = if is_json {
            serde_json::from_str(&contents).map_err(|e| CatalogError::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?
        } else {
            serde_yml::from_str(&contents).map_err(|e| CatalogError::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?
        };

        Ok(Self::from_file(file))
    }

    /// Build the keyed maps from a parsed bundle
    pub fn from_file(file: CatalogFile) -> Self {
        let materials = file
            .materials
            .into_iter()
            .map(|m| (m.code.clone(), m))
            .collect();
        let processes = file
            .processes
            .into_iter()
            .map(|p| (p.code.clone(), p))
            .collect();
        let parts = file
            .parts
            .into_iter()
            .map(|p| (p.part_code.clone(), p))
            .collect();
        let purchased_items = file
            .purchased_items
            .into_iter()
            .map(|i| (i.item_code.clone(), i))
            .collect();

        // Per-carton rules win when the same code appears in both lists.
        let mut packaging_rules: BTreeMap<String, PackagingRule> = BTreeMap::new();
        for mut rule in file.packaging_rules.per_unit {
            rule.kind = PackagingKind::PerUnit;
            packaging_rules.insert(rule.item_code.clone(), rule);
        }
        for mut rule in file.packaging_rules.per_carton {
            rule.kind = PackagingKind::PerCarton;
            packaging_rules.insert(rule.item_code.clone(), rule);
        }

        let products = file
            .products
            .into_iter()
            .map(|p| (p.sku.clone(), p))
            .collect();
        let templates = file
            .product_templates
            .into_iter()
            .map(|t| (t.sku.clone(), t))
            .collect();

        Self {
            settings: file.settings,
            materials,
            processes,
            parts,
            purchased_items,
            packaging_rules,
            tiers: file.quantity_tiers,
            products,
            templates,
        }
    }
}
