//! # Games Indexer Repository
//!
//! This crate provides traits and implementations for interacting with the
//! search service. It includes definitions for errors, interfaces, and a
//! concrete implementation for Typesense.

pub mod config;
pub mod errors;
pub mod interfaces;
pub mod types;
pub mod typesense;
pub mod utils;

pub use config::{Node, TypesenseConfig};
pub use errors::SearchIndexError;
pub use interfaces::SearchCollectionProvider;
pub use types::{
    CollectionInfo, CollectionSchema, FieldSpec, FieldType, ImportResult,
    ImportSummary, SynonymGroup,
};
pub use typesense::{CollectionConfig, TypesenseProvider};
pub use utils::parse_import_response;
