//! Manufacturing process definitions (rates and setup fees)

use serde::{Deserialize, Serialize};

/// A priced manufacturing operation in the catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessDefinition {
    /// Process code (catalog key)
    pub code: String,

    /// Display name
    pub name: String,

    /// Machine/labor rate per minute of runtime
    #[serde(default)]
    pub unit_rate_per_min: f64,

    /// One-time setup fee per quoted run
    #[serde(default)]
    pub setup_cost: f64,

    /// Free-form description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
