pub mod block_clustering;
pub mod global_merge;
pub mod manager;

pub use block_clustering::{cluster_block, BlockClusterOutput, BlockClusterParams};
pub use global_merge::{merge_edges, GoldenId, GoldenIdMap};
pub use manager::{run_block_clustering, BlockClusteringResult};
