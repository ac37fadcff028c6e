//! Record cleaner implementation.
//!
//! Turns raw dataset rows into `GameRecord` documents that only carry meaningful values.

use serde::Deserialize;
use tracing::{debug, instrument, warn};

use super::cell::CellValue;
use super::list_parser::parse_list_field;
use crate::errors::IngestError;
use games_indexer_shared::GameRecord;

/// One dataset row restricted to the indexed columns.
///
/// Every field is kept as raw text; interpretation happens in [`clean_row`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawGameRow {
    pub developer: Option<String>,
    pub publisher: Option<String>,
    pub genres: Option<String>,
    pub release_date: Option<String>,
    pub title: Option<String>,
    pub supported_operating_systems: Option<String>,
    pub amount: Option<String>,
}

/// Clean a single row.
///
/// - `releaseDate` is omitted when missing, otherwise truncated to an integer
/// - list columns are parsed and omitted when empty
/// - `amount` is omitted when missing or not a finite number
/// - other columns are omitted when missing, otherwise kept unchanged
///
/// A document without `amount` is rejected by the collection on import, so a bad
/// `amount` cell only loses its own row.
///
/// `row_number` is 1-based and only used in log and error messages.
///
/// # Errors
///
/// Returns `IngestError::ParseError` when `releaseDate` holds text that is not a number.
pub fn clean_row(row: RawGameRow, row_number: usize) -> Result<GameRecord, IngestError> {
    Ok(GameRecord {
        developer: clean_scalar(row.developer),
        publisher: clean_scalar(row.publisher),
        genres: parse_list_field(row.genres.into()),
        release_date: clean_release_date(row.release_date, row_number)?,
        title: clean_scalar(row.title),
        supported_operating_systems: parse_list_field(row.supported_operating_systems.into()),
        amount: clean_amount(row.amount, row_number),
    })
}

fn clean_scalar(field: Option<String>) -> Option<String> {
    match CellValue::from(field) {
        CellValue::Text(value) => Some(value),
        _ => None,
    }
}

fn parse_number(
    field: Option<String>,
    column: &str,
    row_number: usize,
) -> Result<Option<f64>, IngestError> {
    let raw = match CellValue::from(field) {
        CellValue::Text(raw) => raw,
        _ => return Ok(None),
    };

    let value = raw.trim().parse::<f64>().map_err(|_| {
        IngestError::parse(format!(
            "Row {}: column '{}' is not a number: {:?}",
            row_number, column, raw
        ))
    })?;

    if value.is_nan() {
        return Ok(None);
    }
    if value.is_infinite() {
        return Err(IngestError::parse(format!(
            "Row {}: column '{}' is not finite: {:?}",
            row_number, column, raw
        )));
    }
    Ok(Some(value))
}

fn clean_release_date(
    field: Option<String>,
    row_number: usize,
) -> Result<Option<i64>, IngestError> {
    // Integer text is parsed directly so large epochs keep full precision.
    if let Some(exact) = field.as_deref().and_then(|raw| raw.trim().parse::<i64>().ok()) {
        return Ok(Some(exact));
    }

    match parse_number(field, "releaseDate", row_number)? {
        None => Ok(None),
        Some(value) => {
            let truncated = value.trunc();
            if truncated < i64::MIN as f64 || truncated >= i64::MAX as f64 {
                return Err(IngestError::parse(format!(
                    "Row {}: column 'releaseDate' is out of range: {}",
                    row_number, value
                )));
            }
            Ok(Some(truncated as i64))
        }
    }
}

fn clean_amount(field: Option<String>, row_number: usize) -> Option<f64> {
    match parse_number(field, "amount", row_number) {
        Ok(amount) => amount,
        Err(e) => {
            warn!(row = row_number, error = %e, "Dropping unusable amount");
            None
        }
    }
}

/// Processor that transforms raw dataset rows into game records.
///
/// The processor is responsible for:
/// - Cleaning every row with [`clean_row`]
/// - Failing the whole batch on the first row whose `releaseDate` cannot be cleaned
#[derive(Debug, Default)]
pub struct RecordProcessor {}

impl RecordProcessor {
    /// Create a new record processor.
    pub fn new() -> Self {
        Self {}
    }

    /// Process all rows of the dataset.
    ///
    /// # Arguments
    ///
    /// * `rows` - Raw rows, in dataset order
    ///
    /// # Returns
    ///
    /// Cleaned records in the same order, one per row.
    #[instrument(skip(self, rows), fields(row_count = rows.len()))]
    pub fn process_batch(&self, rows: Vec<RawGameRow>) -> Result<Vec<GameRecord>, IngestError> {
        let records = rows
            .into_iter()
            .enumerate()
            .map(|(i, row)| clean_row(row, i + 1))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(record_count = records.len(), "Processed dataset rows");
        Ok(records)
    }
}
