// src/utils/progress_bars/logging.rs - Logging helpers for pipeline stages
use log::{debug, info, warn};
use std::time::{Duration, Instant};

use crate::models::PipelineStats;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Normalization,
    Blocking,
    BlockClustering,
    GlobalMerge,
}

impl PipelineStage {
    fn label(&self) -> (&'static str, &'static str) {
        match self {
            PipelineStage::Normalization => ("NORMALIZE", "🧹"),
            PipelineStage::Blocking => ("BLOCKING", "🧱"),
            PipelineStage::BlockClustering => ("CLUSTER", "🔗"),
            PipelineStage::GlobalMerge => ("MERGE", "🌐"),
        }
    }
}

#[derive(Clone)]
pub struct StageLogger {
    stage_name: &'static str,
    stage_emoji: &'static str,
    start_time: Instant,
}

impl StageLogger {
    pub fn new(stage: PipelineStage) -> Self {
        let (stage_name, stage_emoji) = stage.label();
        Self {
            stage_name,
            stage_emoji,
            start_time: Instant::now(),
        }
    }

    pub fn log_start(&self, details: &str) {
        info!(
            "[{}] {} 🚀 Starting {} ({})",
            self.stage_name,
            self.stage_emoji,
            self.stage_name.to_lowercase(),
            details
        );
    }

    pub fn log_phase(&self, phase: &str, details: Option<&str>) {
        let elapsed = self.start_time.elapsed().as_secs_f32();
        match details {
            Some(details) => info!(
                "[{}] {} 🔄 Phase: {} - {} [+{:.1}s]",
                self.stage_name, self.stage_emoji, phase, details, elapsed
            ),
            None => info!(
                "[{}] {} 🔄 Phase: {} [+{:.1}s]",
                self.stage_name, self.stage_emoji, phase, elapsed
            ),
        }
    }

    pub fn log_data_quality_issue(&self, issue_type: &str, count: usize) {
        if count > 0 {
            warn!(
                "[{}] {} ⚠️  Data quality: {} {}",
                self.stage_name, self.stage_emoji, count, issue_type
            );
        }
    }

    pub fn log_debug(&self, message: &str) {
        debug!("[{}] {} {}", self.stage_name, self.stage_emoji, message);
    }

    pub fn log_completion(&self, summary: &str) -> Duration {
        let duration = self.start_time.elapsed();
        info!(
            "[{}] {} ✅ COMPLETED in {:.2?}: {}",
            self.stage_name, self.stage_emoji, duration, summary
        );
        duration
    }
}

pub fn log_pipeline_start(run_id: &str, record_count: usize, blocking_fields: &str, threshold: f64) {
    info!("🚀 DEDUP PIPELINE STARTING");
    info!("   Run ID: {}", run_id);
    info!("   Records: {}", record_count);
    info!("   Blocking fields: {}", blocking_fields);
    info!("   Threshold: {}", threshold);
}

pub fn log_pipeline_completion(stats: &PipelineStats) {
    info!("=== Pipeline Summary ===");
    info!("Run ID: {}", stats.run_id);
    info!("Total records: {}", stats.total_records);
    info!("Unrecognized phones: {}", stats.unrecognized_phones);
    for (field, blocking) in &stats.blocking {
        info!(
            "Blocking {}: {} blocks, {} keyless records, largest block {}",
            field, blocking.blocks, blocking.keyless_records, blocking.largest_block
        );
    }
    info!("Pairwise comparisons: {}", stats.total_comparisons);
    info!("Edges: {}", stats.total_edges);
    info!(
        "Golden records: {} clusters covering {} records, {} singletons",
        stats.total_clusters, stats.clustered_records, stats.singletons
    );
    info!(
        "Largest cluster: {}, max block diameter: {:.3}",
        stats.largest_cluster, stats.max_diameter
    );
    info!("Partition signature: {}", stats.partition_signature);
    info!("=== Timing Breakdown ===");
    info!("Normalization: {:.3}s", stats.normalization_time);
    info!("Blocking: {:.3}s", stats.blocking_time);
    info!("Block clustering: {:.3}s", stats.block_clustering_time);
    info!("Global merge: {:.3}s", stats.merge_time);
    info!("Total: {:.3}s", stats.total_processing_time);
}
