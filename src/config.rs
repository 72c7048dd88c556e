//! Configuration management with layered hierarchy

use serde::Deserialize;
use std::path::PathBuf;

/// Tool configuration with layered hierarchy
///
/// Sources merge in priority order: built-in defaults, then the global
/// user config, then a `fabquote.yaml` next to the working directory,
/// then environment variables.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path to the catalog bundle
    pub catalog: Option<PathBuf>,

    /// Path to the quote cart store
    pub cart: Option<PathBuf>,

    /// Currency label overriding the catalog's
    pub currency: Option<String>,

    /// Default output format
    pub default_format: Option<String>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load() -> Self {
        let mut config = Config::default();

        // 1. Built-in defaults (already in Default impl)

        // 2. Global user config (~/.config/fabquote/config.yaml)
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                if let Ok(contents) = std::fs::read_to_string(&global_path) {
                    if let Ok(global) = serde_yml::from_str::<Config>(&contents) {
                        config.merge(global);
                    }
                }
            }
        }

        // 3. Working-directory config (./fabquote.yaml)
        let local_path = PathBuf::from("fabquote.yaml");
        if local_path.exists() {
            if let Ok(contents) = std::fs::read_to_string(&local_path) {
                if let Ok(local) = serde_yml::from_str::<Config>(&contents) {
                    config.merge(local);
                }
            }
        }

        // 4. Environment variables
        if let Ok(catalog) = std::env::var("FABQUOTE_CATALOG") {
            config.catalog = Some(PathBuf::from(catalog));
        }
        if let Ok(cart) = std::env::var("FABQUOTE_CART") {
            config.cart = Some(PathBuf::from(cart));
        }
        if let Ok(currency) = std::env::var("FABQUOTE_CURRENCY") {
            config.currency = Some(currency);
        }

        config
    }

    /// Get the path to the global config file
    fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "fabquote")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        if other.catalog.is_some() {
            self.catalog = other.catalog;
        }
        if other.cart.is_some() {
            self.cart = other.cart;
        }
        if other.currency.is_some() {
            self.currency = other.currency;
        }
        if other.default_format.is_some() {
            self.default_format = other.default_format;
        }
    }

    /// Effective catalog path (default: ./catalog.yaml)
    pub fn catalog_path(&self) -> PathBuf {
        self.catalog
            .clone()
            .unwrap_or_else(|| PathBuf::from("catalog.yaml"))
    }

    /// Effective cart path (default: ./cart.yaml)
    pub fn cart_path(&self) -> PathBuf {
        self.cart.clone().unwrap_or_else(|| PathBuf::from("cart.yaml"))
    }
}
