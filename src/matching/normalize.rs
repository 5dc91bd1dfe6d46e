// src/matching/normalize.rs
use std::collections::HashSet;

use crate::error::{DedupError, RecordError};
use crate::matching::address::{normalize_address, AddressDictionary};
use crate::matching::name::{normalize_site_name, tokenize};
use crate::matching::phone::normalize_phone;
use crate::matching::zip::normalize_zip;
use crate::models::{NormalizedRecord, Record};

/// Builds the comparable view of one record. Only the zip code can fail.
pub fn normalize_record(
    record: &Record,
    dictionary: &AddressDictionary,
) -> Result<NormalizedRecord, RecordError> {
    let zip_code = normalize_zip(record.zip.as_deref()).map_err(|source| RecordError {
        record_id: record.id.clone(),
        source,
    })?;

    Ok(NormalizedRecord {
        site_name_tokens: record
            .site_name
            .as_deref()
            .map(|name| tokenize(&normalize_site_name(name)))
            .unwrap_or_default(),
        address_tokens: record
            .address
            .as_deref()
            .map(|address| tokenize(&normalize_address(address, dictionary)))
            .unwrap_or_default(),
        zip_code,
        phone_parts: normalize_phone(record.phone.as_deref()),
    })
}

/// Normalizes every record, rejecting duplicate ids and collecting every zip
/// failure before reporting them together.
pub fn normalize_all(
    records: &[Record],
    dictionary: &AddressDictionary,
) -> Result<Vec<NormalizedRecord>, DedupError> {
    let mut seen = HashSet::with_capacity(records.len());
    for record in records {
        if !seen.insert(&record.id) {
            return Err(DedupError::DuplicateRecordId(record.id.clone()));
        }
    }

    let mut normalized = Vec::with_capacity(records.len());
    let mut errors = Vec::new();
    for record in records {
        match normalize_record(record, dictionary) {
            Ok(n) => normalized.push(n),
            Err(e) => errors.push(e),
        }
    }

    if errors.is_empty() {
        Ok(normalized)
    } else {
        Err(DedupError::Normalization { errors })
    }
}
