//! Process cost calculation for part routings and template routings

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::{ProcessDefinition, ProcessStep, TemplateProcess};
use crate::engine::QuoteWarning;

/// Costing basis for a template routing step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessBasis {
    /// Runtime priced from minutes at the process rate
    PerHour,
    /// Runtime priced from minutes at the process rate, tracked per piece
    PerPiece,
    /// Setup fee only; no runtime component
    Fixed,
}

impl Default for ProcessBasis {
    fn default() -> Self {
        ProcessBasis::PerHour
    }
}

impl std::fmt::Display for ProcessBasis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProcessBasis::PerHour => write!(f, "per_hour"),
            ProcessBasis::PerPiece => write!(f, "per_piece"),
            ProcessBasis::Fixed => write!(f, "fixed"),
        }
    }
}

impl std::str::FromStr for ProcessBasis {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "per_hour" => Ok(ProcessBasis::PerHour),
            "per_piece" => Ok(ProcessBasis::PerPiece),
            "fixed" => Ok(ProcessBasis::Fixed),
            _ => Err(format!(
                "Invalid basis: {}. Use per_hour, per_piece, or fixed",
                s
            )),
        }
    }
}

/// One priced routing step, carrying its inputs and both cost components
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessCostRow {
    /// Part code (or template SKU) the step belongs to
    pub part_code: String,

    /// Process code
    pub process_code: String,

    /// Process display name
    pub name: String,

    /// Costing basis; absent for BOM-part routings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub basis: Option<ProcessBasis>,

    /// Runtime minutes per unit
    pub minutes_per_unit: f64,

    /// Rate per runtime minute
    pub rate_per_min: f64,

    /// Quantity the runtime was priced over (0 for fixed basis)
    pub qty: u32,

    /// minutes * rate * qty
    pub runtime_cost: f64,

    /// One-time setup fee
    pub setup_cost: f64,

    /// runtime_cost + setup_cost
    pub total_cost: f64,
}

/// Per-run caller adjustment for one template routing step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateProcessInput {
    /// Whether the step participates at all
    pub enabled: bool,

    /// Costing basis for the step
    #[serde(default)]
    pub basis: ProcessBasis,

    /// Runtime minutes, superseding the template default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minutes: Option<f64>,
}

impl Default for TemplateProcessInput {
    fn default() -> Self {
        Self {
            enabled: true,
            basis: ProcessBasis::default(),
            minutes: None,
        }
    }
}

/// Price a part's routing over a quantity
///
/// Disabled steps are skipped without a row. Steps whose process code is
/// missing from the catalog are skipped too, contributing zero, but the
/// skip is surfaced as a warning so the understated cost is visible.
/// Rows follow step order.
pub fn price_steps(
    steps: &[ProcessStep],
    processes: &BTreeMap<String, ProcessDefinition>,
    qty: u32,
    part_code: &str,
    warnings: &mut Vec<QuoteWarning>,
) -> (f64, Vec<ProcessCostRow>) {
    let mut total = 0.0;
    let mut rows = Vec::new();

    for step in steps {
        if !step.enabled {
            continue;
        }
        let Some(process) = processes.get(&step.process_code) else {
            warnings.push(QuoteWarning::UnknownProcess {
                part_code: part_code.to_string(),
                process_code: step.process_code.clone(),
            });
            continue;
        };

        let runtime_cost = step.minutes_per_unit * process.unit_rate_per_min * qty as f64;
        let step_total = runtime_cost + process.setup_cost;
        total += step_total;

        rows.push(ProcessCostRow {
            part_code: part_code.to_string(),
            process_code: process.code.clone(),
            name: process.name.clone(),
            basis: None,
            minutes_per_unit: step.minutes_per_unit,
            rate_per_min: process.unit_rate_per_min,
            qty,
            runtime_cost,
            setup_cost: process.setup_cost,
            total_cost: step_total,
        });
    }

    (total, rows)
}

/// Price a template's routing over a quantity, honoring per-run adjustments
///
/// Each step may be disabled, re-based, or given different minutes by the
/// caller. A fixed basis zeroes the runtime component and reports qty 0 in
/// its row; the per-hour and per-piece bases price identically.
pub fn price_template_steps(
    steps: &[TemplateProcess],
    adjustments: &BTreeMap<String, TemplateProcessInput>,
    processes: &BTreeMap<String, ProcessDefinition>,
    qty: u32,
    sku: &str,
    warnings: &mut Vec<QuoteWarning>,
) -> (f64, Vec<ProcessCostRow>) {
    let default_input = TemplateProcessInput::default();
    let mut total = 0.0;
    let mut rows = Vec::new();

    for step in steps {
        let Some(process) = processes.get(&step.process_code) else {
            warnings.push(QuoteWarning::UnknownProcess {
                part_code: sku.to_string(),
                process_code: step.process_code.clone(),
            });
            continue;
        };

        let input = adjustments.get(&step.process_code).unwrap_or(&default_input);
        if !input.enabled {
            continue;
        }

        let minutes = input.minutes.unwrap_or(step.minutes);
        let runtime_cost = match input.basis {
            ProcessBasis::Fixed => 0.0,
            ProcessBasis::PerHour | ProcessBasis::PerPiece => {
                minutes * process.unit_rate_per_min * qty as f64
            }
        };
        let step_total = runtime_cost + process.setup_cost;
        total += step_total;

        rows.push(ProcessCostRow {
            part_code: sku.to_string(),
            process_code: process.code.clone(),
            name: process.name.clone(),
            basis: Some(input.basis),
            minutes_per_unit: minutes,
            rate_per_min: process.unit_rate_per_min,
            qty: if input.basis == ProcessBasis::Fixed {
                0
            } else {
                qty
            },
            runtime_cost,
            setup_cost: process.setup_cost,
            total_cost: step_total,
        });
    }

    (total, rows)
}
