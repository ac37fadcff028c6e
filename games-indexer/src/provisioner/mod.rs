//! Provisioner module for the games indexer pipeline.
//!
//! Recreates the games collection from scratch and installs its synonym groups.

use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

use crate::errors::IngestError;
use games_indexer_repository::typesense::synonym_groups;
use games_indexer_repository::{CollectionConfig, SearchCollectionProvider, SynonymGroup};

/// State of the collection before provisioning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriorState {
    /// The collection did not exist.
    Absent,
    /// The collection existed and was deleted.
    Present,
    /// The lookup failed; creation was attempted anyway.
    Unknown,
}

/// Outcome of a provisioning run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionReport {
    pub prior_state: PriorState,
    /// False when the service reported the collection as already existing.
    pub created: bool,
    /// Number of synonym groups the service accepted.
    pub synonyms_applied: usize,
}

/// Drops and recreates the games collection.
///
/// Any documents from a previous run are discarded, so the collection only ever holds
/// the current dataset.
pub struct CollectionProvisioner {
    provider: Arc<dyn SearchCollectionProvider>,
    collection: CollectionConfig,
    synonyms: Vec<SynonymGroup>,
    key_hint: String,
}

impl CollectionProvisioner {
    /// Create a provisioner for `collection`.
    ///
    /// `key_hint` is the redacted API key shown when the key is rejected.
    pub fn new(
        provider: Arc<dyn SearchCollectionProvider>,
        collection: CollectionConfig,
        key_hint: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            collection,
            synonyms: synonym_groups(),
            key_hint: key_hint.into(),
        }
    }

    /// Name of the managed collection.
    pub fn collection_name(&self) -> &str {
        &self.collection.name
    }

    /// Delete any existing collection, create it again and upsert the synonym groups.
    ///
    /// # Errors
    ///
    /// * `IngestError::Unauthorized` - If the API key may not create collections
    /// * `IngestError::ProvisionError` - If creation fails for any other reason
    #[instrument(skip(self), fields(collection = %self.collection.name))]
    pub async fn provision(&self) -> Result<ProvisionReport, IngestError> {
        let name = self.collection.name.as_str();

        let prior_state = match self.provider.retrieve_collection(name).await {
            Ok(existing) => {
                info!(
                    num_documents = existing.num_documents,
                    "Deleting existing collection"
                );
                if let Err(e) = self.provider.delete_collection(name).await {
                    warn!(error = %e, "Failed to delete existing collection");
                }
                PriorState::Present
            }
            Err(e) if e.is_not_found() => {
                debug!("Collection does not exist yet");
                PriorState::Absent
            }
            Err(e) => {
                warn!(error = %e, "Could not check for an existing collection");
                PriorState::Unknown
            }
        };

        let created = match self.provider.create_collection(&self.collection.schema()).await {
            Ok(()) => {
                info!("Collection created");
                true
            }
            Err(e) if e.is_already_exists() => {
                info!("Collection already exists");
                false
            }
            Err(e) if e.is_unauthorized() => {
                error!(
                    api_key = %self.key_hint,
                    error = %e,
                    "API key is not allowed to create collections"
                );
                return Err(IngestError::Unauthorized {
                    key_hint: self.key_hint.clone(),
                    source: e,
                });
            }
            Err(e) => {
                error!(error = %e, "Failed to create collection");
                return Err(IngestError::ProvisionError(e));
            }
        };

        let mut synonyms_applied = 0;
        for synonym in &self.synonyms {
            match self.provider.upsert_synonym(name, synonym).await {
                Ok(()) => synonyms_applied += 1,
                Err(e) => debug!(synonym = %synonym.id, error = %e, "Ignoring synonym failure"),
            }
        }

        Ok(ProvisionReport {
            prior_state,
            created,
            synonyms_applied,
        })
    }
}
