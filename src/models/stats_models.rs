// src/models/stats_models.rs
use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::models::graph::BlockingField;

/// Counters produced by the blocking stage for one blocking field.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BlockingStats {
    pub blocks: usize,
    pub comparable_blocks: usize,
    pub keyless_records: usize,
    pub largest_block: usize,
    pub oversized_blocks: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct PipelineStats {
    pub run_id: String,
    pub run_timestamp: NaiveDateTime,
    pub total_records: usize,
    pub unrecognized_phones: usize,
    pub blocking: BTreeMap<BlockingField, BlockingStats>,
    pub total_blocks: usize,
    pub total_comparisons: usize,
    pub total_edges: usize,
    pub total_block_clusters: usize,
    pub total_clusters: usize,
    pub clustered_records: usize,
    pub singletons: usize,
    pub largest_cluster: usize,
    pub max_diameter: f64,
    pub partition_signature: String,
    pub normalization_time: f64,
    pub blocking_time: f64,
    pub block_clustering_time: f64,
    pub merge_time: f64,
    pub total_processing_time: f64,
}

impl PipelineStats {
    pub fn new(run_id: &str, run_timestamp: NaiveDateTime) -> Self {
        Self {
            run_id: run_id.to_string(),
            run_timestamp,
            total_records: 0,
            unrecognized_phones: 0,
            blocking: BTreeMap::new(),
            total_blocks: 0,
            total_comparisons: 0,
            total_edges: 0,
            total_block_clusters: 0,
            total_clusters: 0,
            clustered_records: 0,
            singletons: 0,
            largest_cluster: 0,
            max_diameter: 0.0,
            partition_signature: String::new(),
            normalization_time: 0.0,
            blocking_time: 0.0,
            block_clustering_time: 0.0,
            merge_time: 0.0,
            total_processing_time: 0.0,
        }
    }

    /// Records that never entered a block of any configured field.
    pub fn keyless_records(&self, field: BlockingField) -> usize {
        self.blocking
            .get(&field)
            .map(|s| s.keyless_records)
            .unwrap_or(0)
    }
}
