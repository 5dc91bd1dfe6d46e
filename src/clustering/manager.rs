// src/clustering/manager.rs - Fans block clustering out over the blocking runtime
use futures::future::join_all;
use indicatif::MultiProgress;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;

use crate::clustering::block_clustering::{cluster_block, BlockClusterOutput, BlockClusterParams};
use crate::error::DedupError;
use crate::matching::RecordScorer;
use crate::models::{Block, BlockCluster, Edge, NormalizedRecord};
use crate::utils::progress_bars::logging::{PipelineStage, StageLogger};
use crate::utils::progress_bars::progress_config::stage_bar;

/// Concatenated output of every block, in block order.
#[derive(Debug, Clone, Default)]
pub struct BlockClusteringResult {
    pub edges: Vec<Edge>,
    pub clusters: Vec<BlockCluster>,
    pub comparisons: usize,
    pub blocks_clustered: usize,
}

/// Clusters every block with two or more records as an independent task.
///
/// At most `max_concurrent_blocks` blocks are scored at once. Records and
/// scorer are shared read-only. Nothing is returned until every block has
/// finished, since the global merge needs the complete edge set.
pub async fn run_block_clustering(
    blocks: Vec<Block>,
    records: Arc<Vec<NormalizedRecord>>,
    scorer: Arc<RecordScorer>,
    params: BlockClusterParams,
    max_concurrent_blocks: usize,
    multi_progress: Option<&MultiProgress>,
) -> Result<BlockClusteringResult, DedupError> {
    let logger = StageLogger::new(PipelineStage::BlockClustering);

    let comparable: Vec<Block> = blocks.into_iter().filter(|b| b.len() > 1).collect();
    let total_pairs: usize = comparable.iter().map(Block::pair_count).sum();
    logger.log_start(&format!(
        "{} blocks, {} pairwise comparisons, threshold {}",
        comparable.len(),
        total_pairs,
        params.threshold
    ));

    let pb = stage_bar(multi_progress, comparable.len() as u64, "Clustering blocks...");
    let semaphore = Arc::new(Semaphore::new(max_concurrent_blocks.max(1)));
    let mut tasks: Vec<JoinHandle<BlockClusterOutput>> = Vec::with_capacity(comparable.len());

    for block in comparable {
        logger.log_debug(&format!(
            "Queueing block {}={} ({} records)",
            block.block_type,
            block.block_value,
            block.len()
        ));
        let permit = Arc::clone(&semaphore)
            .acquire_owned()
            .await
            .map_err(|e| DedupError::BlockTask(e.to_string()))?;
        let records = Arc::clone(&records);
        let scorer = Arc::clone(&scorer);
        let pb = pb.clone();

        tasks.push(tokio::task::spawn_blocking(move || {
            let output = cluster_block(&block, &records, &scorer, params);
            drop(permit);
            if let Some(pb) = &pb {
                pb.inc(1);
            }
            output
        }));
    }

    let mut result = BlockClusteringResult::default();
    for joined in join_all(tasks).await {
        let output = joined.map_err(|e| DedupError::BlockTask(e.to_string()))?;
        result.comparisons += output.comparisons;
        result.edges.extend(output.edges);
        result.clusters.extend(output.clusters);
        result.blocks_clustered += 1;
    }

    if let Some(pb) = &pb {
        pb.finish_with_message(format!(
            "Clustered {} blocks: {} edges",
            result.blocks_clustered,
            result.edges.len()
        ));
    }
    logger.log_completion(&format!(
        "{} block clusters, {} edges from {} comparisons",
        result.clusters.len(),
        result.edges.len(),
        result.comparisons
    ));
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BlockingField;

    fn named(name: &str) -> NormalizedRecord {
        NormalizedRecord {
            site_name_tokens: vec![name.to_string()],
            ..Default::default()
        }
    }

    fn block(value: &str, members: Vec<usize>) -> Block {
        Block {
            block_type: BlockingField::ZipCode,
            block_value: value.to_string(),
            members,
        }
    }

    #[tokio::test]
    async fn test_edges_concatenated_in_block_order() {
        let records = Arc::new(vec![
            named("same"),
            named("same"),
            named("other"),
            named("other"),
            named("alone"),
        ]);
        let blocks = vec![
            block("00001", vec![0, 1]),
            block("00002", vec![4]),
            block("00003", vec![2, 3]),
        ];
        let params = BlockClusterParams {
            threshold: 1.5,
            parallel_matrix_min_block: 64,
        };

        let result = run_block_clustering(
            blocks,
            records,
            Arc::new(RecordScorer::default()),
            params,
            1,
            None,
        )
        .await
        .unwrap();

        assert_eq!(result.blocks_clustered, 2);
        assert_eq!(result.comparisons, 2);
        let values: Vec<_> = result.edges.iter().map(|e| e.block_value.as_str()).collect();
        assert_eq!(values, vec!["00001", "00003"]);
    }
}
