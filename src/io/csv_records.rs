// src/io/csv_records.rs - CSV boundary: record input, key output, annotated export
use anyhow::{anyhow, Context, Result};
use log::info;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::clustering::GoldenIdMap;
use crate::models::{BlockingField, Edge, NormalizedRecord, Record, RecordId};

/// Header names of the input columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvColumns {
    pub id: String,
    pub site_name: String,
    pub address: String,
    pub zip: String,
    pub phone: String,
}

impl Default for CsvColumns {
    fn default() -> Self {
        Self {
            id: "Id".to_string(),
            site_name: "Site name".to_string(),
            address: "Address".to_string(),
            zip: "Zip".to_string(),
            phone: "Phone".to_string(),
        }
    }
}

struct ColumnPositions {
    id: usize,
    site_name: usize,
    address: usize,
    zip: usize,
    phone: usize,
}

impl ColumnPositions {
    fn resolve(headers: &csv::StringRecord, columns: &CsvColumns) -> Result<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| anyhow!("Column {:?} not found in input header", name))
        };
        Ok(Self {
            id: find(&columns.id)?,
            site_name: find(&columns.site_name)?,
            address: find(&columns.address)?,
            zip: find(&columns.zip)?,
            phone: find(&columns.phone)?,
        })
    }
}

fn cell(row: &csv::StringRecord, position: usize) -> Option<String> {
    row.get(position)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Reads records from a headed CSV file. Blank cells are treated as absent.
pub fn read_records(path: &Path, columns: &CsvColumns) -> Result<Vec<Record>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to open input {}", path.display()))?;
    let headers = reader
        .headers()
        .with_context(|| format!("Failed to read header of {}", path.display()))?
        .clone();
    let positions = ColumnPositions::resolve(&headers, columns)?;

    let mut records = Vec::new();
    for (row_idx, row) in reader.records().enumerate() {
        let row = row.with_context(|| format!("CSV parse error at row {}", row_idx + 2))?;
        let id = cell(&row, positions.id)
            .ok_or_else(|| anyhow!("Row {} has an empty {:?} value", row_idx + 2, columns.id))?;
        records.push(Record {
            id: RecordId(id),
            site_name: cell(&row, positions.site_name),
            address: cell(&row, positions.address),
            zip: cell(&row, positions.zip),
            phone: cell(&row, positions.phone),
        });
    }
    info!("📄 Read {} records from {}", records.len(), path.display());
    Ok(records)
}

/// Writes the `src_id,gld_id` record key, one row per input record.
pub fn write_record_key(path: &Path, golden_ids: &GoldenIdMap) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    writer.write_record(["src_id", "gld_id"])?;
    for (id, golden) in golden_ids.pairs() {
        writer.write_record([id.0.as_str(), golden.to_string().as_str()])?;
    }
    writer
        .flush()
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!("💾 Wrote record key for {} records to {}", golden_ids.len(), path.display());
    Ok(())
}

#[derive(Serialize)]
struct AnnotatedRow<'a> {
    src_id: &'a str,
    site_name: Option<&'a str>,
    address: Option<&'a str>,
    zip: Option<&'a str>,
    phone: Option<&'a str>,
    site_name_normalized: String,
    address_normalized: String,
    zip_normalized: Option<&'a str>,
    phone_normalized: String,
    gld_id: usize,
}

/// Writes the input rows alongside their normalized fields and golden id.
pub fn write_annotated(
    path: &Path,
    records: &[Record],
    normalized: &[NormalizedRecord],
    golden_ids: &GoldenIdMap,
) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    for (idx, (record, norm)) in records.iter().zip(normalized).enumerate() {
        writer.serialize(AnnotatedRow {
            src_id: &record.id.0,
            site_name: record.site_name.as_deref(),
            address: record.address.as_deref(),
            zip: record.zip.as_deref(),
            phone: record.phone.as_deref(),
            site_name_normalized: norm.site_name(),
            address_normalized: norm.address(),
            zip_normalized: norm.zip_code.as_deref(),
            phone_normalized: norm.phone_parts.display_form(),
            gld_id: golden_ids.golden_id(idx).0,
        })?;
    }
    writer
        .flush()
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

#[derive(Serialize)]
struct EdgeRecord<'a> {
    source: &'a RecordId,
    target: &'a RecordId,
    block_type: BlockingField,
    block_value: &'a str,
    diameter: f64,
}

/// Writes the dedup edge list as JSON with record ids in place of indices.
pub fn write_edges_json(path: &Path, edges: &[Edge], record_ids: &[RecordId]) -> Result<()> {
    let rows: Vec<EdgeRecord> = edges
        .iter()
        .map(|e| EdgeRecord {
            source: &record_ids[e.row],
            target: &record_ids[e.column],
            block_type: e.block_type,
            block_value: &e.block_value,
            diameter: e.diameter,
        })
        .collect();
    let file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), &rows)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!("💾 Wrote {} edges to {}", rows.len(), path.display());
    Ok(())
}
