// src/clustering/global_merge.rs - Union of all block edges into golden record ids

use log::debug;
use petgraph::unionfind::UnionFind;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

use crate::models::{Edge, RecordId, RecordIdx};
use crate::signature::partition_signature;

/// Identifier of a golden record. Only equality is meaningful to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct GoldenId(pub usize);

impl fmt::Display for GoldenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Total mapping from every input record to its golden record.
///
/// Golden ids `0..cluster_count` belong to multi-record clusters ordered by
/// their first record in input order; the remaining ids are singletons in
/// input order.
#[derive(Debug, Clone)]
pub struct GoldenIdMap {
    record_ids: Vec<RecordId>,
    golden_ids: Vec<GoldenId>,
    index: HashMap<RecordId, RecordIdx>,
    cluster_count: usize,
}

impl GoldenIdMap {
    pub fn len(&self) -> usize {
        self.record_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.record_ids.is_empty()
    }

    pub fn golden_id(&self, idx: RecordIdx) -> GoldenId {
        self.golden_ids[idx]
    }

    pub fn golden_id_of(&self, id: &RecordId) -> Option<GoldenId> {
        self.index.get(id).map(|&idx| self.golden_ids[idx])
    }

    /// `(source_id, golden_id)` for every record, in input order.
    pub fn pairs(&self) -> impl Iterator<Item = (&RecordId, GoldenId)> + '_ {
        self.record_ids.iter().zip(self.golden_ids.iter().copied())
    }

    /// Record indices per golden id, indexed by `GoldenId.0`.
    pub fn groups(&self) -> Vec<Vec<RecordIdx>> {
        let mut groups = vec![Vec::new(); self.group_count()];
        for (idx, golden) in self.golden_ids.iter().enumerate() {
            groups[golden.0].push(idx);
        }
        groups
    }

    /// Groups with two or more records.
    pub fn clusters(&self) -> Vec<Vec<RecordIdx>> {
        let mut groups = self.groups();
        groups.truncate(self.cluster_count);
        groups
    }

    pub fn cluster_count(&self) -> usize {
        self.cluster_count
    }

    pub fn group_count(&self) -> usize {
        self.golden_ids
            .iter()
            .map(|g| g.0 + 1)
            .max()
            .unwrap_or(0)
    }

    pub fn singleton_count(&self) -> usize {
        self.group_count() - self.cluster_count
    }

    pub fn partition_signature(&self) -> String {
        partition_signature(
            self.groups()
                .into_iter()
                .map(|group| group.into_iter().map(|idx| &self.record_ids[idx]).collect()),
        )
    }
}

/// Merges every block's edges over the whole record universe.
///
/// A single union-find spans all records, so records untouched by any edge,
/// including records excluded from blocking, come out as singletons.
pub fn merge_edges(record_ids: &[RecordId], edges: &[Edge]) -> GoldenIdMap {
    let n = record_ids.len();
    let mut components: UnionFind<usize> = UnionFind::new(n);
    let mut effective_unions = 0;
    for edge in edges {
        if components.union(edge.row, edge.column) {
            effective_unions += 1;
        }
    }
    debug!(
        "Global merge: {} edges, {} effective unions over {} records",
        edges.len(),
        effective_unions,
        n
    );

    // group records by root, in order of their first member
    let mut group_of_root: HashMap<usize, usize> = HashMap::new();
    let mut groups: Vec<Vec<RecordIdx>> = Vec::new();
    for idx in 0..n {
        let root = components.find_mut(idx);
        let group = *group_of_root.entry(root).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[group].push(idx);
    }

    let mut golden_ids = vec![GoldenId(0); n];
    let mut next_id = 0;
    for group in groups.iter().filter(|g| g.len() > 1) {
        for &idx in group {
            golden_ids[idx] = GoldenId(next_id);
        }
        next_id += 1;
    }
    let cluster_count = next_id;
    for group in groups.iter().filter(|g| g.len() == 1) {
        golden_ids[group[0]] = GoldenId(next_id);
        next_id += 1;
    }

    let index = record_ids
        .iter()
        .enumerate()
        .map(|(idx, id)| (id.clone(), idx))
        .collect();

    GoldenIdMap {
        record_ids: record_ids.to_vec(),
        golden_ids,
        index,
        cluster_count,
    }
}
