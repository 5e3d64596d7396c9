//! Loading raw records from JSON datasets.

use std::fs;
use std::path::Path;

use tracing::info;

use fincot_core::RawRecord;

use crate::error::DatasetResult;

/// Load records from a JSON dataset file.
///
/// The file must contain a single JSON array of record objects, as in the
/// FinQA and ConvFinQA training files.
///
/// # Errors
///
/// Returns [`DatasetError::Io`](crate::DatasetError::Io) if the file cannot
/// be read and [`DatasetError::Json`](crate::DatasetError::Json) if its
/// contents do not parse.
pub fn load_records(path: impl AsRef<Path>) -> DatasetResult<Vec<RawRecord>> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    let records = records_from_str(&contents)?;
    info!("Loaded {} records from {}", records.len(), path.display());
    Ok(records)
}

/// Parse records from an in-memory JSON string.
pub fn records_from_str(json: &str) -> DatasetResult<Vec<RawRecord>> {
    Ok(serde_json::from_str(json)?)
}
