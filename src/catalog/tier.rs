//! Quantity-break pricing tiers

use serde::{Deserialize, Serialize};

/// A quantity band with a final-price multiplier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantityTier {
    /// Inclusive lower bound of the band
    pub min_qty: u32,

    /// Inclusive upper bound; open-ended when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_qty: Option<u32>,

    /// Multiplier applied to the final price
    pub multiplier: f64,

    /// Display label for the band
    #[serde(default)]
    pub label: String,
}

impl QuantityTier {
    /// Whether a quantity falls inside this band
    pub fn contains(&self, qty: u32) -> bool {
        qty >= self.min_qty && self.max_qty.map_or(true, |max| qty <= max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_bounded() {
        let tier = QuantityTier {
            min_qty: 50,
            max_qty: Some(199),
            multiplier: 0.92,
            label: "50-199".to_string(),
        };
        assert!(!tier.contains(49));
        assert!(tier.contains(50));
        assert!(tier.contains(199));
        assert!(!tier.contains(200));
    }

    #[test]
    fn test_contains_open_ended() {
        let tier = QuantityTier {
            min_qty: 200,
            max_qty: None,
            multiplier: 0.85,
            label: "200+".to_string(),
        };
        assert!(tier.contains(200));
        assert!(tier.contains(1_000_000));
        assert!(!tier.contains(199));
    }
}
