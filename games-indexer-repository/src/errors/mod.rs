//! Error types for the games indexer repository.
//!
//! This module provides a unified error type for all search service operations.

mod search_index_error;

pub use search_index_error::SearchIndexError;
