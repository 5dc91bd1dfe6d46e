// src/clustering/block_clustering.rs - Distance matrix, thresholding and components inside one block

use ndarray::Array2;
use petgraph::graph::{NodeIndex, UnGraph};
use rayon::prelude::*;

use crate::matching::RecordScorer;
use crate::models::{Block, BlockCluster, Edge, NormalizedRecord, RecordIdx};

/// Everything one block contributes to the global merge.
#[derive(Debug, Clone, Default)]
pub struct BlockClusterOutput {
    pub edges: Vec<Edge>,
    pub clusters: Vec<BlockCluster>,
    pub comparisons: usize,
}

/// Tuning knobs shared by every block of a run.
#[derive(Debug, Clone, Copy)]
pub struct BlockClusterParams {
    pub threshold: f64,
    /// Blocks at least this large score matrix rows in parallel.
    pub parallel_matrix_min_block: usize,
}

/// Full symmetric distance matrix over the members of `block`.
///
/// Only the upper triangle is scored; every worker owns whole rows of it, so
/// parallel scoring never touches the same cell twice. The diagonal stays 0.
pub fn distance_matrix(
    block: &Block,
    records: &[NormalizedRecord],
    scorer: &RecordScorer,
    parallel_min_block: usize,
) -> Array2<f64> {
    let n = block.len();
    let upper_row = |i: usize| -> Vec<f64> {
        let a = &records[block.members[i]];
        ((i + 1)..n)
            .map(|j| scorer.record_distance(a, &records[block.members[j]]))
            .collect()
    };

    let upper: Vec<Vec<f64>> = if n >= parallel_min_block {
        (0..n).into_par_iter().map(upper_row).collect()
    } else {
        (0..n).map(upper_row).collect()
    };

    let mut matrix = Array2::zeros((n, n));
    for (i, row) in upper.into_iter().enumerate() {
        for (offset, distance) in row.into_iter().enumerate() {
            let j = i + 1 + offset;
            matrix[[i, j]] = distance;
            matrix[[j, i]] = distance;
        }
    }
    matrix
}

/// Connected components of the graph linking every pair within `threshold`.
///
/// Components hold block positions in ascending order and are returned in
/// order of their lowest position. Singletons are included.
pub fn connected_components(matrix: &Array2<f64>, threshold: f64) -> Vec<Vec<usize>> {
    let n = matrix.nrows();
    let mut graph: UnGraph<usize, f64> = UnGraph::with_capacity(n, 0);
    let nodes: Vec<NodeIndex> = (0..n).map(|i| graph.add_node(i)).collect();
    for i in 0..n {
        for j in (i + 1)..n {
            if matrix[[i, j]] <= threshold {
                graph.add_edge(nodes[i], nodes[j], matrix[[i, j]]);
            }
        }
    }

    let mut visited = vec![false; n];
    let mut components = Vec::new();
    for start in graph.node_indices() {
        if visited[start.index()] {
            continue;
        }
        let mut component = Vec::new();
        let mut stack = vec![start];
        while let Some(current) = stack.pop() {
            if visited[current.index()] {
                continue;
            }
            visited[current.index()] = true;
            component.push(graph[current]);
            for neighbor in graph.neighbors(current) {
                if !visited[neighbor.index()] {
                    stack.push(neighbor);
                }
            }
        }
        component.sort_unstable();
        components.push(component);
    }
    components
}

/// Largest pairwise distance among `component`, read from the existing matrix.
pub fn component_diameter(matrix: &Array2<f64>, component: &[usize]) -> f64 {
    let mut diameter = 0.0_f64;
    for (k, &i) in component.iter().enumerate() {
        for &j in &component[k + 1..] {
            diameter = diameter.max(matrix[[i, j]]);
        }
    }
    diameter
}

/// Clusters one block and emits a spanning path of edges per component.
///
/// Only connectivity survives: the path links consecutive members of each
/// component, not every same-component pair. Blocks with fewer than two
/// records produce nothing.
pub fn cluster_block(
    block: &Block,
    records: &[NormalizedRecord],
    scorer: &RecordScorer,
    params: BlockClusterParams,
) -> BlockClusterOutput {
    if block.len() < 2 {
        return BlockClusterOutput::default();
    }

    let matrix = distance_matrix(block, records, scorer, params.parallel_matrix_min_block);
    let mut output = BlockClusterOutput {
        comparisons: block.pair_count(),
        ..Default::default()
    };

    for component in connected_components(&matrix, params.threshold) {
        if component.len() < 2 {
            continue;
        }
        let diameter = component_diameter(&matrix, &component);
        let members: Vec<RecordIdx> = component.iter().map(|&p| block.members[p]).collect();

        output.edges.extend(members.windows(2).map(|pair| Edge {
            row: pair[0],
            column: pair[1],
            block_type: block.block_type,
            block_value: block.block_value.clone(),
            diameter,
        }));
        output.clusters.push(BlockCluster {
            block_type: block.block_type,
            block_value: block.block_value.clone(),
            members,
            diameter,
        });
    }
    output
}
