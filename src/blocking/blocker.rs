// src/blocking/blocker.rs
use log::{info, warn};
use std::collections::BTreeMap;

use crate::models::{Block, BlockingField, BlockingStats, NormalizedRecord, RecordIdx};

/// Groups records by the exact value of one blocking field.
///
/// KEYLESS POLICY: a record whose key is absent is left out of every block of
/// this field. It is never compared with anything through this field and ends
/// up a singleton unless another blocking field links it. Keyless records are
/// counted in the returned stats, never silently re-homed.
///
/// Blocks come back ordered by key and keep members in input order.
pub fn build_blocks(
    records: &[NormalizedRecord],
    field: BlockingField,
    block_size_warning: usize,
) -> (Vec<Block>, BlockingStats) {
    let mut grouped: BTreeMap<String, Vec<RecordIdx>> = BTreeMap::new();
    let mut keyless_records = 0;

    for (idx, record) in records.iter().enumerate() {
        match field.key_of(record) {
            Some(key) => grouped.entry(key).or_default().push(idx),
            None => keyless_records += 1,
        }
    }

    let blocks: Vec<Block> = grouped
        .into_iter()
        .map(|(block_value, members)| Block {
            block_type: field,
            block_value,
            members,
        })
        .collect();

    let mut stats = BlockingStats {
        blocks: blocks.len(),
        keyless_records,
        ..Default::default()
    };
    for block in &blocks {
        stats.largest_block = stats.largest_block.max(block.len());
        if block.len() > 1 {
            stats.comparable_blocks += 1;
        }
        if block.len() > block_size_warning {
            stats.oversized_blocks += 1;
            warn!(
                "🧱 Block {}={} has {} records ({} pairwise comparisons)",
                field,
                block.block_value,
                block.len(),
                block.pair_count()
            );
        }
    }

    if keyless_records > 0 {
        warn!(
            "🧱 {} of {} records have no {} and are excluded from {} blocking",
            keyless_records,
            records.len(),
            field,
            field
        );
    }
    info!(
        "🧱 Blocking on {}: {} blocks ({} with 2+ records), largest block {}",
        field, stats.blocks, stats.comparable_blocks, stats.largest_block
    );

    (blocks, stats)
}
