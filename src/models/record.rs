// src/models/record.rs
use serde::{Deserialize, Serialize};
use std::fmt;

/// Position of a record in the input sequence. All pipeline stages address
/// records by index; the caller-facing [`RecordId`] only appears at the edges.
pub type RecordIdx = usize;

/// Caller supplied record identifier. Integer ids are carried in their decimal form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordId(pub String);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        RecordId(value.to_string())
    }
}

impl From<String> for RecordId {
    fn from(value: String) -> Self {
        RecordId(value)
    }
}

impl From<u64> for RecordId {
    fn from(value: u64) -> Self {
        RecordId(value.to_string())
    }
}

/// One raw input row. Owned by the caller and never mutated by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    pub site_name: Option<String>,
    pub address: Option<String>,
    pub zip: Option<String>,
    pub phone: Option<String>,
}

impl Record {
    pub fn new(id: impl Into<RecordId>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn with_site_name(mut self, value: &str) -> Self {
        self.site_name = Some(value.to_string());
        self
    }

    pub fn with_address(mut self, value: &str) -> Self {
        self.address = Some(value.to_string());
        self
    }

    pub fn with_zip(mut self, value: &str) -> Self {
        self.zip = Some(value.to_string());
        self
    }

    pub fn with_phone(mut self, value: &str) -> Self {
        self.phone = Some(value.to_string());
        self
    }
}

/// Positional phone number groups. Any part may be missing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PhoneParts {
    pub area: Option<String>,
    pub exchange: Option<String>,
    pub subscriber: Option<String>,
}

impl PhoneParts {
    /// The designed fallback for anything that is not a recognizable phone number.
    pub fn absent() -> Self {
        Self::default()
    }

    pub fn new(area: Option<&str>, exchange: &str, subscriber: &str) -> Self {
        Self {
            area: area.map(str::to_string),
            exchange: Some(exchange.to_string()),
            subscriber: Some(subscriber.to_string()),
        }
    }

    pub fn is_absent(&self) -> bool {
        self.area.is_none() && self.exchange.is_none() && self.subscriber.is_none()
    }

    /// Present parts joined with `-`, e.g. `555-123-4567` or `123-4567`.
    pub fn display_form(&self) -> String {
        [&self.area, &self.exchange, &self.subscriber]
            .iter()
            .filter_map(|part| part.as_deref())
            .collect::<Vec<_>>()
            .join("-")
    }
}

/// Comparable view of a [`Record`], built once at pipeline start.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NormalizedRecord {
    pub site_name_tokens: Vec<String>,
    pub address_tokens: Vec<String>,
    pub zip_code: Option<String>,
    pub phone_parts: PhoneParts,
}

impl NormalizedRecord {
    pub fn site_name(&self) -> String {
        self.site_name_tokens.join(" ")
    }

    pub fn address(&self) -> String {
        self.address_tokens.join(" ")
    }
}
