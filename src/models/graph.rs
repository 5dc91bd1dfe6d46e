// src/models/graph.rs
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::record::{NormalizedRecord, RecordIdx};

/// Field whose exact normalized value groups records into blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockingField {
    ZipCode,
    Phone,
    SiteName,
}

impl BlockingField {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockingField::ZipCode => "zip_code",
            BlockingField::Phone => "phone",
            BlockingField::SiteName => "site_name",
        }
    }

    /// Blocking key of a record for this field, `None` when the record is keyless.
    pub fn key_of(&self, record: &NormalizedRecord) -> Option<String> {
        match self {
            BlockingField::ZipCode => record.zip_code.clone(),
            BlockingField::Phone => {
                let parts = &record.phone_parts;
                // area may legitimately be missing for 7 digit numbers
                if parts.exchange.is_some() && parts.subscriber.is_some() {
                    Some(parts.display_form())
                } else {
                    None
                }
            }
            BlockingField::SiteName => {
                if record.site_name_tokens.is_empty() {
                    None
                } else {
                    Some(record.site_name())
                }
            }
        }
    }
}

impl fmt::Display for BlockingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlockingField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "zip_code" | "zip" => Ok(BlockingField::ZipCode),
            "phone" => Ok(BlockingField::Phone),
            "site_name" | "name" => Ok(BlockingField::SiteName),
            other => Err(format!("unknown blocking field '{}'", other)),
        }
    }
}

/// Records sharing one exact blocking key. Members are kept in input order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Block {
    pub block_type: BlockingField,
    pub block_value: String,
    pub members: Vec<RecordIdx>,
}

impl Block {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Number of unordered pairs the block clusterer scores.
    pub fn pair_count(&self) -> usize {
        let n = self.members.len();
        n * n.saturating_sub(1) / 2
    }
}

/// Undirected link between two records found inside one block.
///
/// Edges of one component form a path, not a clique: they only guarantee the
/// component stays connected in the global graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Edge {
    pub row: RecordIdx,
    pub column: RecordIdx,
    pub block_type: BlockingField,
    pub block_value: String,
    pub diameter: f64,
}

/// A connected component of size > 1 inside one block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockCluster {
    pub block_type: BlockingField,
    pub block_value: String,
    pub members: Vec<RecordIdx>,
    pub diameter: f64,
}
