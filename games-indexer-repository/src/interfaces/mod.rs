//! Interface definitions for the search collection provider.
//!
//! This module defines the abstract `SearchCollectionProvider` trait that allows
//! for dependency injection and swappable search backend implementations.

mod search_collection_provider;

pub use search_collection_provider::SearchCollectionProvider;
