pub mod graph;
pub mod record;
pub mod stats_models;

pub use graph::{Block, BlockCluster, BlockingField, Edge};
pub use record::{NormalizedRecord, PhoneParts, Record, RecordId, RecordIdx};
pub use stats_models::{BlockingStats, PipelineStats};
