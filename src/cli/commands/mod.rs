//! CLI command implementations

pub mod cart;
pub mod catalog;
pub mod completions;
pub mod quote;
pub mod validate;

use std::path::PathBuf;

use miette::Result;

use crate::catalog::Catalog;
use crate::cli::GlobalOpts;
use crate::config::Config;

/// Load the catalog honoring the --catalog flag and layered config
pub(crate) fn load_catalog(global: &GlobalOpts) -> Result<(Catalog, Config)> {
    let config = Config::load();
    let path = global
        .catalog
        .clone()
        .unwrap_or_else(|| config.catalog_path());
    let catalog = Catalog::load(&path).map_err(|e| miette::miette!("{}", e))?;
    Ok((catalog, config))
}

/// Effective cart path honoring the --cart flag and layered config
pub(crate) fn cart_path(global: &GlobalOpts, config: &Config) -> PathBuf {
    global.cart.clone().unwrap_or_else(|| config.cart_path())
}
