// src/signature.rs

use sha2::{Digest, Sha256};

use crate::models::RecordId;

/// Hash of a partition of record ids that ignores group numbering and order.
///
/// Two runs that group the same records together produce the same signature
/// even when their golden ids differ numerically.
pub fn partition_signature<'a, G>(groups: G) -> String
where
    G: IntoIterator<Item = Vec<&'a RecordId>>,
{
    let mut canonical: Vec<Vec<&RecordId>> = groups
        .into_iter()
        .map(|mut group| {
            group.sort();
            group
        })
        .collect();
    canonical.sort();

    let mut hasher = Sha256::new();
    for group in canonical {
        for id in group {
            // length prefix keeps ids containing separators unambiguous
            hasher.update(format!("{}:{};", id.0.len(), id.0).as_bytes());
        }
        hasher.update(b"|");
    }
    hex::encode(hasher.finalize())
}
