//! Typesense collection configuration and schema.
//!
//! This module defines the field schema and the synonym groups for the games collection.

use crate::types::{CollectionSchema, FieldSpec, FieldType, SynonymGroup};

/// The default name of the games collection.
pub const DEFAULT_COLLECTION_NAME: &str = "gog_games";

/// Configuration for the games collection.
#[derive(Debug, Clone)]
pub struct CollectionConfig {
    /// The collection name (used for all operations).
    pub name: String,
}

impl CollectionConfig {
    /// Create a new collection configuration.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Schema for this collection.
    pub fn schema(&self) -> CollectionSchema {
        collection_schema(&self.name)
    }
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self::new(DEFAULT_COLLECTION_NAME)
    }
}

/// Get the schema for the games collection.
///
/// The configuration includes:
/// - **Plain fields**: `developer`, `publisher`, `title` (string) and `amount` (float)
/// - **Facets**: `genres` and `supportedOperatingSystems` (string arrays)
/// - **Optional**: `releaseDate` (int64), the only field a document may omit
///
/// Every field has infix search enabled.
///
/// # Arguments
///
/// * `name` - The collection name
pub fn collection_schema(name: &str) -> CollectionSchema {
    CollectionSchema {
        name: name.to_string(),
        fields: vec![
            FieldSpec::new("developer", FieldType::String).infix(),
            FieldSpec::new("publisher", FieldType::String).infix(),
            FieldSpec::new("genres", FieldType::StringArray).facet().infix(),
            FieldSpec::new("releaseDate", FieldType::Int64)
                .optional()
                .infix(),
            FieldSpec::new("title", FieldType::String).infix(),
            FieldSpec::new("supportedOperatingSystems", FieldType::StringArray)
                .facet()
                .infix(),
            FieldSpec::new("amount", FieldType::Float).infix(),
        ],
    }
}

/// Get the synonym groups applied to the games collection.
///
/// Terms are kept exactly as curated. The `one-synonyms` group lists `"ine"`, not
/// `"one"`; it is a suspected typo but changing it would change search behavior.
pub fn synonym_groups() -> Vec<SynonymGroup> {
    vec![
        SynonymGroup::new("and-synonyms", &["and", "&", "+"]),
        SynonymGroup::new("versus-synonyms", &["versus", "vs"]),
        SynonymGroup::new("one-synonyms", &["ine", "1", "I"]),
        SynonymGroup::new("two-synonyms", &["two", "2", "II"]),
        SynonymGroup::new("three-synonyms", &["three", "3", "III"]),
    ]
}
