//! Game record types for the search collection.
//!
//! This module defines the document structure that is imported into the search engine.

use serde::{Deserialize, Serialize};

/// Document representation for the games collection.
///
/// One record is built per dataset row by the record cleaner. A record only carries
/// meaningful values: absent scalars and empty lists are never serialized, so the wire
/// document has no `null`, no `""` and no `[]` fields.
///
/// # Fields
///
/// - `developer`: Studio that developed the game
/// - `publisher`: Company that published the game
/// - `genres`: Ordered genre labels (faceted)
/// - `release_date`: Release year or epoch-like integer, serialized as `releaseDate`
/// - `title`: Game title
/// - `supported_operating_systems`: Ordered OS labels (faceted), serialized as
///   `supportedOperatingSystems`
/// - `amount`: Price
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GameRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub developer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub genres: Vec<String>,
    /// Always an integer; float inputs are truncated by the cleaner.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub supported_operating_systems: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
}

impl GameRecord {
    /// Names of the dataset columns a record is built from, in collection order.
    pub const FIELDS: [&'static str; 7] = [
        "developer",
        "publisher",
        "genres",
        "releaseDate",
        "title",
        "supportedOperatingSystems",
        "amount",
    ];
}
