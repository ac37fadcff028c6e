//! Search collection provider trait definition.
//!
//! This module defines the abstract interface for search service operations,
//! allowing for different backend implementations and test doubles.

use async_trait::async_trait;
use games_indexer_shared::GameRecord;

use crate::errors::SearchIndexError;
use crate::types::{CollectionInfo, CollectionSchema, ImportSummary, SynonymGroup};

/// Abstracts the underlying search service (Typesense or a mock).
///
/// Implementations are shared between the provisioner and the loader behind an `Arc`.
/// All methods return `Result<T, SearchIndexError>`; HTTP failures are already
/// classified so callers can match on `NotFound`, `AlreadyExists` and `Unauthorized`.
#[async_trait]
pub trait SearchCollectionProvider: Send + Sync {
    /// Check whether the service reports itself healthy.
    async fn health_check(&self) -> Result<bool, SearchIndexError>;

    /// Retrieve a collection by name.
    ///
    /// # Returns
    ///
    /// * `Ok(CollectionInfo)` - If the collection exists
    /// * `Err(SearchIndexError::NotFound)` - If it does not
    /// * `Err(SearchIndexError)` - For any other failure
    async fn retrieve_collection(&self, name: &str) -> Result<CollectionInfo, SearchIndexError>;

    /// Delete a collection and all of its documents.
    async fn delete_collection(&self, name: &str) -> Result<(), SearchIndexError>;

    /// Create a collection from a schema.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the collection was created
    /// * `Err(SearchIndexError::AlreadyExists)` - If a collection with that name exists
    /// * `Err(SearchIndexError::Unauthorized)` - If the API key may not create collections
    async fn create_collection(&self, schema: &CollectionSchema) -> Result<(), SearchIndexError>;

    /// Create or replace a synonym group on a collection.
    async fn upsert_synonym(
        &self,
        collection: &str,
        synonym: &SynonymGroup,
    ) -> Result<(), SearchIndexError>;

    /// Import a batch of new documents and return a summary of per-document results.
    ///
    /// Documents are created, never replaced. The whole response is read before returning, so the batch has completed on the
    /// service side once this resolves.
    ///
    /// # Returns
    ///
    /// * `Ok(ImportSummary)` - Contains aggregate statistics and individual results
    /// * `Err(SearchIndexError)` - If the batch as a whole was rejected
    async fn import_documents(
        &self,
        collection: &str,
        documents: &[GameRecord],
    ) -> Result<ImportSummary, SearchIndexError>;
}
