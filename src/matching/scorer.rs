// src/matching/scorer.rs
use serde::{Deserialize, Serialize};

use crate::error::DedupError;
use crate::matching::distance::token_distance;
use crate::matching::phone::phone_distance;
use crate::models::NormalizedRecord;

/// Per-field multipliers for the weighted record distance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldWeights {
    pub site_name: f64,
    pub address: f64,
    pub phone: f64,
}

impl Default for FieldWeights {
    fn default() -> Self {
        Self {
            site_name: 0.5,
            address: 0.75,
            phone: 0.25,
        }
    }
}

impl FieldWeights {
    pub fn validate(&self) -> Result<(), DedupError> {
        for (name, weight) in [
            ("site_name", self.site_name),
            ("address", self.address),
            ("phone", self.phone),
        ] {
            if !weight.is_finite() || weight < 0.0 {
                return Err(DedupError::Configuration(format!(
                    "weight for {} must be a finite non-negative number, got {}",
                    name, weight
                )));
            }
        }
        Ok(())
    }
}

/// Unweighted field distances between two records.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FieldDistances {
    pub site_name: f64,
    pub address: f64,
    pub phone: f64,
}

impl FieldDistances {
    pub fn weighted(&self, weights: &FieldWeights) -> f64 {
        weights.site_name * self.site_name
            + weights.address * self.address
            + weights.phone * self.phone
    }
}

/// Combines field distances into one scalar. Longer fields are not
/// normalized, so records with many tokens tend to score further apart.
#[derive(Debug, Clone, Default)]
pub struct RecordScorer {
    weights: FieldWeights,
}

impl RecordScorer {
    pub fn new(weights: FieldWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &FieldWeights {
        &self.weights
    }

    pub fn field_distances(&self, a: &NormalizedRecord, b: &NormalizedRecord) -> FieldDistances {
        FieldDistances {
            site_name: token_distance(&a.site_name_tokens, &b.site_name_tokens),
            address: token_distance(&a.address_tokens, &b.address_tokens),
            phone: phone_distance(&a.phone_parts, &b.phone_parts),
        }
    }

    pub fn record_distance(&self, a: &NormalizedRecord, b: &NormalizedRecord) -> f64 {
        self.field_distances(a, b).weighted(&self.weights)
    }
}
