//! Utility functions for the games indexer repository.

use serde::Serialize;

use crate::errors::SearchIndexError;
use crate::types::ImportResult;

/// Encode documents as JSON lines, the body format of the import endpoint.
pub fn to_jsonl<T: Serialize>(documents: &[T]) -> Result<String, SearchIndexError> {
    let mut body = String::new();
    for (i, document) in documents.iter().enumerate() {
        if i > 0 {
            body.push('\n');
        }
        body.push_str(&serde_json::to_string(document)?);
    }
    Ok(body)
}

/// Parse the JSON lines returned by the import endpoint.
///
/// Blank lines are skipped. Every other line must decode to an [`ImportResult`].
///
/// # Example
///
/// ```
/// use games_indexer_repository::parse_import_response;
///
/// let results = parse_import_response("{\"success\":true}\n{\"success\":true}").unwrap();
/// assert_eq!(results.len(), 2);
/// ```
pub fn parse_import_response(body: &str) -> Result<Vec<ImportResult>, SearchIndexError> {
    body.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .enumerate()
        .map(|(i, line)| {
            serde_json::from_str::<ImportResult>(line).map_err(|e| {
                SearchIndexError::parse(format!("Invalid import result on line {}: {}", i + 1, e))
            })
        })
        .collect()
}
