//! Raw cell values as read from the dataset.

/// Tokens the tabular reader treats as a missing value.
const NULL_TOKENS: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Returns true when a raw field reads as a missing value.
pub fn is_null_token(raw: &str) -> bool {
    NULL_TOKENS.contains(&raw)
}

/// A single cell of a dataset row.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Absent, empty or a null token.
    Missing,
    /// Already decoded into a list.
    List(Vec<String>),
    /// Raw text still to be interpreted.
    Text(String),
}

/// Maps empty fields and null tokens to `Missing`.
impl From<Option<String>> for CellValue {
    fn from(field: Option<String>) -> Self {
        match field {
            Some(raw) if !is_null_token(&raw) => Self::Text(raw),
            _ => Self::Missing,
        }
    }
}
