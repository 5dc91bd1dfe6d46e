// src/matching/zip.rs
use crate::error::ParseError;

const ZIP_WIDTH: usize = 5;

/// Parses a zip code as an integer and left pads it to five digits.
///
/// Blank input is treated as absent. Spreadsheet exports often carry numeric
/// zips as integral decimals (`2134.0`), which are accepted. Anything else that
/// is not a non-negative integer is a [`ParseError`].
pub fn normalize_zip(zip: Option<&str>) -> Result<Option<String>, ParseError> {
    let raw = match zip.map(str::trim) {
        None | Some("") => return Ok(None),
        Some(raw) => raw,
    };

    let value = parse_integral(raw).ok_or_else(|| ParseError {
        value: raw.to_string(),
    })?;
    Ok(Some(format!("{:0width$}", value, width = ZIP_WIDTH)))
}

fn parse_integral(raw: &str) -> Option<u64> {
    if let Ok(value) = raw.parse::<u64>() {
        return Some(value);
    }
    let (whole, fraction) = raw.split_once('.')?;
    if whole.is_empty() || !fraction.chars().all(|c| c == '0') {
        return None;
    }
    whole.parse::<u64>().ok()
}
