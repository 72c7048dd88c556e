//! Finished product records with their bills of materials

use serde::{Deserialize, Serialize};

/// What a BOM line refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BomLineKind {
    /// A fabricated part from the part catalog
    Part,
    /// A bought-in item from the purchased catalog
    Purchased,
    /// A packaging rule from the packaging catalog
    Packaging,
}

impl std::fmt::Display for BomLineKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BomLineKind::Part => write!(f, "part"),
            BomLineKind::Purchased => write!(f, "purchased"),
            BomLineKind::Packaging => write!(f, "packaging"),
        }
    }
}

/// One line of a product's bill of materials
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BomLine {
    /// Line kind, selecting the catalog the code resolves against
    #[serde(rename = "type")]
    pub kind: BomLineKind,

    /// Code of the referenced part, item, or rule
    pub code: String,

    /// Consumption per finished unit; defaults to 1 (per-unit packaging
    /// rules fall back to the rule's own qty_per_unit first)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qty_per_unit: Option<f64>,

    /// Marked optional for presentation; still priced
    #[serde(default)]
    pub optional: bool,
}

/// A sellable finished product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Product SKU (catalog key)
    pub sku: String,

    /// Display name
    pub name: String,

    /// Finished units packed per shipping carton
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units_per_carton: Option<u32>,

    /// Bill of materials, in line order
    #[serde(default)]
    pub bom_lines: Vec<BomLine>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bom_line_type_field() {
        let yaml = "type: purchased\ncode: HNG-10\nqty_per_unit: 2\n";
        let line: BomLine = serde_yml::from_str(yaml).unwrap();
        assert_eq!(line.kind, BomLineKind::Purchased);
        assert_eq!(line.qty_per_unit, Some(2.0));
        assert!(!line.optional);
    }

    #[test]
    fn test_product_roundtrip() {
        let product = Product {
            sku: "ENC-100".to_string(),
            name: "Control Enclosure".to_string(),
            units_per_carton: Some(12),
            bom_lines: vec![BomLine {
                kind: BomLineKind::Part,
                code: "PNL-07".to_string(),
                qty_per_unit: Some(2.0),
                optional: false,
            }],
        };

        let yaml = serde_yml::to_string(&product).unwrap();
        assert!(yaml.contains("type: part"));
        let parsed: Product = serde_yml::from_str(&yaml).unwrap();
        assert_eq!(parsed.bom_lines.len(), 1);
        assert_eq!(parsed.units_per_carton, Some(12));
    }
}
