// src/utils/dedup_config.rs
use anyhow::{Context, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::str::FromStr;

use crate::clustering::block_clustering::BlockClusterParams;
use crate::error::DedupError;
use crate::matching::{AddressDictionary, FieldWeights};
use crate::models::BlockingField;

pub const DEFAULT_THRESHOLD: f64 = 1.5;
pub const DEFAULT_BLOCK_SIZE_WARNING: usize = 5_000;
pub const DEFAULT_PARALLEL_MATRIX_MIN_BLOCK: usize = 64;

/// Static configuration of a deduplication run. Weights and threshold are
/// supplied, never learned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DedupConfig {
    /// Fields whose exact normalized value forms blocks. Records missing a
    /// field's value are excluded from that field's blocks.
    pub blocking_fields: Vec<BlockingField>,
    /// Pairs at or below this weighted distance are linked.
    pub threshold: f64,
    pub weights: FieldWeights,
    pub address_dictionary: AddressDictionary,
    /// Blocks above this size are reported as a warning (O(n²) work).
    pub block_size_warning: usize,
    pub parallel_matrix_min_block: usize,
    pub max_concurrent_blocks: usize,
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self {
            blocking_fields: vec![BlockingField::ZipCode],
            threshold: DEFAULT_THRESHOLD,
            weights: FieldWeights::default(),
            address_dictionary: AddressDictionary::default(),
            block_size_warning: DEFAULT_BLOCK_SIZE_WARNING,
            parallel_matrix_min_block: DEFAULT_PARALLEL_MATRIX_MIN_BLOCK,
            max_concurrent_blocks: num_cpus::get(),
        }
    }
}

fn env_override<T: FromStr>(name: &str, current: &mut T) {
    if let Ok(raw) = env::var(name) {
        match raw.trim().parse::<T>() {
            Ok(value) => *current = value,
            Err(_) => warn!("Ignoring {}={:?}: not a valid value", name, raw),
        }
    }
}

impl DedupConfig {
    /// Loads a JSON configuration file. Missing keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Applies `DEDUP_*` environment variables on top of the current values.
    pub fn with_env_overrides(mut self) -> Self {
        env_override("DEDUP_THRESHOLD", &mut self.threshold);
        env_override("DEDUP_WEIGHT_SITE_NAME", &mut self.weights.site_name);
        env_override("DEDUP_WEIGHT_ADDRESS", &mut self.weights.address);
        env_override("DEDUP_WEIGHT_PHONE", &mut self.weights.phone);
        env_override("DEDUP_MAX_CONCURRENT_BLOCKS", &mut self.max_concurrent_blocks);
        env_override("DEDUP_BLOCK_SIZE_WARNING", &mut self.block_size_warning);

        if let Ok(raw) = env::var("DEDUP_BLOCKING_FIELDS") {
            let parsed: Result<Vec<BlockingField>, String> = raw
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::parse)
                .collect();
            match parsed {
                Ok(fields) => self.blocking_fields = fields,
                Err(e) => warn!("Ignoring DEDUP_BLOCKING_FIELDS={:?}: {}", raw, e),
            }
        }
        self
    }

    pub fn validate(&self) -> Result<(), DedupError> {
        if !self.threshold.is_finite() || self.threshold < 0.0 {
            return Err(DedupError::Configuration(format!(
                "threshold must be a finite non-negative number, got {}",
                self.threshold
            )));
        }
        self.weights.validate()?;
        if self.blocking_fields.is_empty() {
            return Err(DedupError::Configuration(
                "at least one blocking field is required".to_string(),
            ));
        }
        if self.max_concurrent_blocks == 0 {
            return Err(DedupError::Configuration(
                "max_concurrent_blocks must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn block_cluster_params(&self) -> BlockClusterParams {
        BlockClusterParams {
            threshold: self.threshold,
            parallel_matrix_min_block: self.parallel_matrix_min_block,
        }
    }

    pub fn blocking_fields_label(&self) -> String {
        self.blocking_fields
            .iter()
            .map(BlockingField::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }

    pub fn log_config(&self) {
        info!("⚙️  Dedup configuration:");
        info!("   • blocking fields: {}", self.blocking_fields_label());
        info!("   • threshold: {}", self.threshold);
        info!(
            "   • weights: site_name={}, address={}, phone={}",
            self.weights.site_name, self.weights.address, self.weights.phone
        );
        info!(
            "   • address dictionary: {} street types, {} directionals",
            self.address_dictionary.street_types.len(),
            self.address_dictionary.directionals.len()
        );
        info!(
            "   • {} max concurrent blocks, parallel matrix from {} records, warn above {}",
            self.max_concurrent_blocks, self.parallel_matrix_min_block, self.block_size_warning
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = DedupConfig::default();
        assert_eq!(config.blocking_fields, vec![BlockingField::ZipCode]);
        assert_eq!(config.threshold, 1.5);
        assert_eq!(config.weights, FieldWeights { site_name: 0.5, address: 0.75, phone: 0.25 });
        assert!(config.max_concurrent_blocks >= 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"threshold": 2.0, "weights": {{"phone": 0.0}}, "blocking_fields": ["zip_code", "phone"]}}"#
        )
        .unwrap();

        let config = DedupConfig::from_file(file.path()).unwrap();
        assert_eq!(config.threshold, 2.0);
        assert_eq!(config.weights.phone, 0.0);
        assert_eq!(config.weights.site_name, 0.5);
        assert_eq!(
            config.blocking_fields,
            vec![BlockingField::ZipCode, BlockingField::Phone]
        );
        assert_eq!(config.address_dictionary, AddressDictionary::default());
    }

    #[test]
    fn test_env_overrides() {
        env::set_var("DEDUP_THRESHOLD", "0.75");
        env::set_var("DEDUP_WEIGHT_ADDRESS", "oops");
        env::set_var("DEDUP_BLOCKING_FIELDS", "zip, site_name");

        let config = DedupConfig::default().with_env_overrides();
        assert_eq!(config.threshold, 0.75);
        assert_eq!(config.weights.address, 0.75);
        assert_eq!(
            config.blocking_fields,
            vec![BlockingField::ZipCode, BlockingField::SiteName]
        );

        env::remove_var("DEDUP_THRESHOLD");
        env::remove_var("DEDUP_WEIGHT_ADDRESS");
        env::remove_var("DEDUP_BLOCKING_FIELDS");
    }

    #[test]
    fn test_validation_failures() {
        let bad_threshold = DedupConfig { threshold: -1.0, ..Default::default() };
        assert!(matches!(bad_threshold.validate(), Err(DedupError::Configuration(_))));

        let no_fields = DedupConfig { blocking_fields: vec![], ..Default::default() };
        assert!(no_fields.validate().is_err());

        let no_workers = DedupConfig { max_concurrent_blocks: 0, ..Default::default() };
        assert!(no_workers.validate().is_err());
    }
}
