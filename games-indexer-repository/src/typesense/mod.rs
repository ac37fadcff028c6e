//! Typesense implementation of the search collection provider.
//!
//! This module provides a concrete implementation of `SearchCollectionProvider`
//! over the Typesense HTTP API.

mod collection_config;
mod provider;

pub use collection_config::{
    collection_schema, synonym_groups, CollectionConfig, DEFAULT_COLLECTION_NAME,
};
pub use provider::TypesenseProvider;
