//! CSV reading for the games dataset.

use std::path::Path;

use csv::{ReaderBuilder, Trim};
use tracing::{debug, instrument};

use crate::errors::IngestError;
use crate::processor::RawGameRow;
use games_indexer_shared::GameRecord;

/// Read all rows of the dataset CSV, keeping only the indexed columns.
///
/// Extra columns are ignored. Header names are trimmed; empty fields read as `None`.
///
/// # Errors
///
/// * `IngestError::DatasetError` - If the header lacks one of the indexed columns
/// * `IngestError::ParseError` - If the file is not valid CSV
#[instrument(skip_all, fields(path = %path.display()))]
pub fn read_rows(path: &Path) -> Result<Vec<RawGameRow>, IngestError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::Headers)
        .from_path(path)?;

    let headers = reader.headers()?.clone();
    let missing: Vec<&str> = GameRecord::FIELDS
        .iter()
        .copied()
        .filter(|column| !headers.iter().any(|header| header == *column))
        .collect();
    if !missing.is_empty() {
        return Err(IngestError::dataset(format!(
            "{} is missing required columns: {}",
            path.display(),
            missing.join(", ")
        )));
    }

    let rows = reader
        .deserialize::<RawGameRow>()
        .collect::<Result<Vec<_>, _>>()?;

    debug!(row_count = rows.len(), "Read dataset rows");
    Ok(rows)
}
