// src/pipeline.rs - Normalize, block, cluster per block, merge globally
use chrono::Utc;
use indicatif::MultiProgress;
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

use crate::blocking::build_blocks;
use crate::clustering::{merge_edges, run_block_clustering, GoldenIdMap};
use crate::error::DedupError;
use crate::matching::{normalize_all, RecordScorer};
use crate::models::{BlockCluster, Edge, NormalizedRecord, PipelineStats, Record, RecordId};
use crate::utils::dedup_config::DedupConfig;
use crate::utils::progress_bars::logging::{
    log_pipeline_completion, log_pipeline_start, PipelineStage, StageLogger,
};

/// Everything a run produces. `golden_ids` is the terminal artifact; the rest
/// is kept for reporting and export.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub golden_ids: GoldenIdMap,
    pub normalized: Vec<NormalizedRecord>,
    pub edges: Vec<Edge>,
    pub block_clusters: Vec<BlockCluster>,
    pub stats: PipelineStats,
}

impl PipelineOutput {
    /// `(source_id, golden_id)` pairs, one per input record, in input order.
    pub fn record_key(&self) -> Vec<(RecordId, usize)> {
        self.golden_ids
            .pairs()
            .map(|(id, golden)| (id.clone(), golden.0))
            .collect()
    }
}

/// Runs the full deduplication over `records`.
///
/// Fails only on invalid configuration, duplicate record ids or zip codes that
/// cannot be parsed; every failing record is reported at once.
pub async fn run_dedup_pipeline(
    records: &[Record],
    config: &DedupConfig,
    multi_progress: Option<&MultiProgress>,
) -> Result<PipelineOutput, DedupError> {
    config.validate()?;
    let pipeline_start = Instant::now();
    let run_id = Uuid::new_v4().to_string();
    let mut stats = PipelineStats::new(&run_id, Utc::now().naive_utc());
    stats.total_records = records.len();
    log_pipeline_start(
        &run_id,
        records.len(),
        &config.blocking_fields_label(),
        config.threshold,
    );

    // Normalization
    let logger = StageLogger::new(PipelineStage::Normalization);
    logger.log_start(&format!("{} records", records.len()));
    let normalized = normalize_all(records, &config.address_dictionary)?;
    stats.unrecognized_phones = records
        .iter()
        .zip(&normalized)
        .filter(|(raw, n)| {
            raw.phone.as_deref().map_or(false, |p| !p.trim().is_empty())
                && n.phone_parts.is_absent()
        })
        .count();
    logger.log_data_quality_issue(
        "phone values not recognized, treated as absent",
        stats.unrecognized_phones,
    );
    stats.normalization_time = logger
        .log_completion(&format!("{} records normalized", normalized.len()))
        .as_secs_f64();

    // Blocking
    let logger = StageLogger::new(PipelineStage::Blocking);
    logger.log_start(&config.blocking_fields_label());
    let mut blocks = Vec::new();
    for &field in &config.blocking_fields {
        let (field_blocks, field_stats) =
            build_blocks(&normalized, field, config.block_size_warning);
        logger.log_phase(
            field.as_str(),
            Some(&format!("{} blocks, {} keyless", field_stats.blocks, field_stats.keyless_records)),
        );
        blocks.extend(field_blocks);
        stats.blocking.insert(field, field_stats);
    }
    stats.total_blocks = blocks.len();
    stats.blocking_time = logger
        .log_completion(&format!("{} blocks", blocks.len()))
        .as_secs_f64();

    // Block clustering
    let clustering_start = Instant::now();
    let records_arc = Arc::new(normalized);
    let clustering = run_block_clustering(
        blocks,
        Arc::clone(&records_arc),
        Arc::new(RecordScorer::new(config.weights)),
        config.block_cluster_params(),
        config.max_concurrent_blocks,
        multi_progress,
    )
    .await?;
    stats.block_clustering_time = clustering_start.elapsed().as_secs_f64();
    stats.total_comparisons = clustering.comparisons;
    stats.total_edges = clustering.edges.len();
    stats.total_block_clusters = clustering.clusters.len();
    stats.max_diameter = clustering
        .clusters
        .iter()
        .map(|c| c.diameter)
        .fold(0.0, f64::max);
    let normalized = Arc::try_unwrap(records_arc).unwrap_or_else(|shared| (*shared).clone());

    // Global merge
    let logger = StageLogger::new(PipelineStage::GlobalMerge);
    logger.log_start(&format!(
        "{} edges over {} records",
        clustering.edges.len(),
        records.len()
    ));
    let record_ids: Vec<RecordId> = records.iter().map(|r| r.id.clone()).collect();
    let golden_ids = merge_edges(&record_ids, &clustering.edges);
    let clusters = golden_ids.clusters();
    stats.total_clusters = golden_ids.cluster_count();
    stats.clustered_records = clusters.iter().map(Vec::len).sum();
    stats.largest_cluster = clusters.iter().map(Vec::len).max().unwrap_or(0);
    stats.singletons = golden_ids.singleton_count();
    stats.partition_signature = golden_ids.partition_signature();
    stats.merge_time = logger
        .log_completion(&format!(
            "{} golden clusters, {} singletons",
            stats.total_clusters, stats.singletons
        ))
        .as_secs_f64();

    stats.total_processing_time = pipeline_start.elapsed().as_secs_f64();
    log_pipeline_completion(&stats);

    Ok(PipelineOutput {
        golden_ids,
        normalized,
        edges: clustering.edges,
        block_clusters: clustering.clusters,
        stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BlockingField;

    fn site(id: &str, name: &str, address: &str, zip: Option<&str>, phone: &str) -> Record {
        let mut record = Record::new(id)
            .with_site_name(name)
            .with_address(address)
            .with_phone(phone);
        record.zip = zip.map(str::to_string);
        record
    }

    #[tokio::test]
    async fn test_duplicates_share_golden_id() {
        let records = vec![
            site("1", "Corner Store", "123 North Main St.", Some("2134"), "(555) 123-4567"),
            site("2", "The Corner Store", "123 N Main Street", Some("02134"), "555.123.4567"),
            site("3", "Harbor Clinic", "9 Dock Rd", Some("2134"), "555-999-0000"),
        ];
        let output = run_dedup_pipeline(&records, &DedupConfig::default(), None)
            .await
            .unwrap();

        let golden = &output.golden_ids;
        assert_eq!(golden.golden_id(0), golden.golden_id(1));
        assert_ne!(golden.golden_id(0), golden.golden_id(2));
        assert_eq!(output.stats.total_clusters, 1);
        assert_eq!(output.stats.singletons, 1);
        assert_eq!(output.stats.total_comparisons, 3);
        assert_eq!(output.edges.len(), 1);
        assert_eq!(output.normalized.len(), 3);
    }

    #[tokio::test]
    async fn test_unrecognized_phones_counted() {
        let records = vec![
            site("1", "a", "b", Some("1"), "call us"),
            site("2", "a", "b", Some("1"), ""),
            site("3", "a", "b", Some("1"), "5551234"),
        ];
        let output = run_dedup_pipeline(&records, &DedupConfig::default(), None)
            .await
            .unwrap();
        assert_eq!(output.stats.unrecognized_phones, 1);
    }

    #[tokio::test]
    async fn test_invalid_zip_fails_the_run() {
        let records = vec![
            site("1", "a", "b", Some("02134"), ""),
            site("2", "a", "b", Some("021 34"), ""),
        ];
        let err = run_dedup_pipeline(&records, &DedupConfig::default(), None)
            .await
            .unwrap_err();
        match err {
            DedupError::Normalization { errors } => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].record_id, RecordId::from("2"));
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_invalid_config_rejected_before_work() {
        let config = DedupConfig {
            threshold: f64::NAN,
            ..Default::default()
        };
        let err = run_dedup_pipeline(&[], &config, None).await.unwrap_err();
        assert!(matches!(err, DedupError::Configuration(_)));
    }

    #[tokio::test]
    async fn test_second_blocking_field_links_keyless_records() {
        let records = vec![
            site("1", "Corner Store", "1 Main St", Some("02134"), "555-123-4567"),
            site("2", "Corner Store", "1 Main St", None, "555-123-4567"),
        ];

        let zip_only = run_dedup_pipeline(&records, &DedupConfig::default(), None)
            .await
            .unwrap();
        assert_ne!(zip_only.golden_ids.golden_id(0), zip_only.golden_ids.golden_id(1));
        assert_eq!(zip_only.stats.keyless_records(BlockingField::ZipCode), 1);

        let config = DedupConfig {
            blocking_fields: vec![BlockingField::ZipCode, BlockingField::Phone],
            ..Default::default()
        };
        let both = run_dedup_pipeline(&records, &config, None).await.unwrap();
        assert_eq!(both.golden_ids.golden_id(0), both.golden_ids.golden_id(1));
        assert_eq!(both.edges[0].block_type, BlockingField::Phone);
    }

    #[tokio::test]
    async fn test_record_key_covers_every_record() {
        let records = vec![
            site("a", "x", "y", Some("1"), ""),
            site("b", "x", "y", None, ""),
            site("c", "x", "y", Some("1"), ""),
        ];
        let output = run_dedup_pipeline(&records, &DedupConfig::default(), None)
            .await
            .unwrap();
        let key = output.record_key();
        let ids: Vec<_> = key.iter().map(|(id, _)| id.0.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(key[0].1, key[2].1);
        assert_ne!(key[0].1, key[1].1);
    }
}
