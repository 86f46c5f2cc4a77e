//! Weighted categorical tables shared by every generator.
//!
//! Product categories and payment methods are drawn from fixed weighted
//! distributions. Both live here so that every entry point samples from the
//! same table.

use crate::error::GenError;
use rand::Rng;

/// Product categories with their selection weights
pub const PRODUCT_CATEGORIES: &[(&str, f64)] = &[
    ("Cimento e Argamassa", 0.2),
    ("Tijolos e Blocos", 0.15),
    ("Telhas e Coberturas", 0.1),
    ("Madeiras", 0.1),
    ("Hidráulica", 0.15),
    ("Elétrica", 0.1),
    ("Ferramentas", 0.1),
    ("Tintas", 0.1),
];

/// Payment methods with their selection weights
pub const PAYMENT_METHODS: &[(&str, f64)] = &[
    ("Dinheiro", 0.1),
    ("Cartão de Crédito", 0.6),
    ("Cartão de Débito", 0.2),
    ("Boleto", 0.1),
];

/// Allowed distance of a weight sum from 1.0
pub const WEIGHT_TOLERANCE: f64 = 1e-6;

/// Labels with selection weights that sum to 1.0
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedTable {
    entries: Vec<(String, f64)>,
}

impl WeightedTable {
    /// Build a table, rejecting empty tables, negative or non-finite weights,
    /// and weights that do not sum to 1.0.
    pub fn new(name: &str, entries: Vec<(String, f64)>) -> Result<Self, GenError> {
        let invalid = |reason: String| GenError::InvalidWeights {
            table: name.to_string(),
            reason,
        };

        if entries.is_empty() {
            return Err(invalid("no entries".to_string()));
        }
        if let Some((label, weight)) = entries.iter().find(|(_, w)| !w.is_finite() || *w < 0.0) {
            return Err(invalid(format!("weight {} for {:?}", weight, label)));
        }
        let total: f64 = entries.iter().map(|(_, w)| w).sum();
        if (total - 1.0).abs() > WEIGHT_TOLERANCE {
            return Err(invalid(format!("weights sum to {:.6}, expected 1.0", total)));
        }

        Ok(Self { entries })
    }

    fn from_static(entries: &[(&str, f64)]) -> Self {
        Self {
            entries: entries
                .iter()
                .map(|(label, weight)| (label.to_string(), *weight))
                .collect(),
        }
    }

    /// Pick a label with probability proportional to its weight
    pub fn choose<R: Rng>(&self, rng: &mut R) -> &str {
        let mut target = rng.random::<f64>();
        for (label, weight) in &self.entries {
            if target < *weight {
                return label;
            }
            target -= weight;
        }
        // Rounding in the running subtraction can leave a sliver past the last entry
        &self.entries[self.entries.len() - 1].0
    }

    pub fn entries(&self) -> &[(String, f64)] {
        &self.entries
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(label, _)| label.as_str())
    }

    pub fn weight(&self, label: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, w)| *w)
    }
}

/// Every weighted table the generators draw from
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    pub product_categories: WeightedTable,
    pub payment_methods: WeightedTable,
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            product_categories: WeightedTable::from_static(PRODUCT_CATEGORIES),
            payment_methods: WeightedTable::from_static(PAYMENT_METHODS),
        }
    }
}
