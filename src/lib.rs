// src/lib.rs
pub mod blocking;
pub mod clustering;
pub mod error;
pub mod io;
pub mod matching;
pub mod models;
pub mod pipeline;
pub mod signature;
pub mod utils;

pub use clustering::{GoldenId, GoldenIdMap};
pub use error::{DedupError, ParseError, PhoneUnrecognized, RecordError};
pub use models::{BlockingField, NormalizedRecord, PhoneParts, Record, RecordId};
pub use pipeline::{run_dedup_pipeline, PipelineOutput};
pub use utils::dedup_config::DedupConfig;
