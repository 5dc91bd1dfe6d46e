pub mod csv_records;

pub use csv_records::{read_records, write_annotated, write_edges_json, write_record_key, CsvColumns};
