//! Loader module for the games indexer pipeline.
//!
//! Imports cleaned records into the search collection in fixed-size batches.

use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

use crate::errors::IngestError;
use games_indexer_repository::{ImportSummary, SearchCollectionProvider};
use games_indexer_shared::GameRecord;

/// Configuration for the batch loader.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Number of documents sent per import request.
    pub batch_size: usize,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self { batch_size: 100 }
    }
}

/// Totals over all batches of a load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadSummary {
    /// Number of import requests sent.
    pub batches: usize,
    /// Number of documents submitted.
    pub submitted: usize,
    /// Number of documents the service accepted.
    pub succeeded: usize,
    /// Number of documents the service rejected.
    pub failed: usize,
}

impl LoadSummary {
    fn record(&mut self, batch_len: usize, summary: &ImportSummary) {
        self.batches += 1;
        self.submitted += batch_len;
        self.succeeded += summary.succeeded;
        self.failed += summary.failed;
    }
}

/// Loader that imports documents into the search collection.
///
/// Batches are sent one after another; each import response is fully parsed before
/// the next batch starts.
pub struct BatchLoader {
    provider: Arc<dyn SearchCollectionProvider>,
    config: LoaderConfig,
}

impl BatchLoader {
    /// Create a new loader with the default batch size.
    pub fn new(provider: Arc<dyn SearchCollectionProvider>) -> Self {
        Self::with_config(provider, LoaderConfig::default())
    }

    /// Create a new loader with custom configuration.
    ///
    /// A batch size of zero is treated as one.
    pub fn with_config(provider: Arc<dyn SearchCollectionProvider>, config: LoaderConfig) -> Self {
        let config = LoaderConfig {
            batch_size: config.batch_size.max(1),
        };
        Self { provider, config }
    }

    /// Import `records` into `collection`.
    ///
    /// Documents rejected individually are logged and counted; they do not stop the load.
    ///
    /// # Errors
    ///
    /// Returns `IngestError::BatchFailed` with the index of the first record of the batch
    /// when an import request fails as a whole. Earlier batches stay imported.
    #[instrument(skip(self, records), fields(record_count = records.len()))]
    pub async fn load(
        &self,
        collection: &str,
        records: &[GameRecord],
    ) -> Result<LoadSummary, IngestError> {
        let mut totals = LoadSummary::default();

        for (index, batch) in records.chunks(self.config.batch_size).enumerate() {
            let batch_start = index * self.config.batch_size;

            let summary = match self.provider.import_documents(collection, batch).await {
                Ok(summary) => summary,
                Err(e) => {
                    error!(
                        batch_start = batch_start,
                        count = batch.len(),
                        error = %e,
                        "Failed to import batch"
                    );
                    return Err(IngestError::BatchFailed {
                        offset: batch_start,
                        source: e,
                    });
                }
            };

            if summary.failed > 0 {
                warn!(
                    batch_start = batch_start,
                    succeeded = summary.succeeded,
                    failed = summary.failed,
                    "Batch imported with some failures"
                );
                for result in summary.results.iter().filter(|r| !r.success) {
                    debug!(
                        error = result.error.as_deref().unwrap_or("unknown"),
                        document = result.document.as_deref().unwrap_or(""),
                        "Document rejected"
                    );
                }
            }

            totals.record(batch.len(), &summary);
            info!(
                batch_start = batch_start,
                count = batch.len(),
                imported = totals.submitted,
                total = records.len(),
                "Imported batch"
            );
        }

        Ok(totals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use games_indexer_repository::{
        CollectionInfo, CollectionSchema, ImportResult, SearchIndexError, SynonymGroup,
    };
    use std::sync::Mutex;

    /// Mock provider that records batch sizes and can fail a given batch.
    struct MockProvider {
        batch_sizes: Mutex<Vec<usize>>,
        fail_on_batch: Option<usize>,
        reject_titles: Vec<String>,
    }

    impl MockProvider {
        fn new() -> Self {
            Self {
                batch_sizes: Mutex::new(Vec::new()),
                fail_on_batch: None,
                reject_titles: Vec::new(),
            }
        }

        fn batch_sizes(&self) -> Vec<usize> {
            self.batch_sizes.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl SearchCollectionProvider for MockProvider {
        async fn health_check(&self) -> Result<bool, SearchIndexError> {
            Ok(true)
        }

        async fn retrieve_collection(&self, name: &str) -> Result<CollectionInfo, SearchIndexError> {
            Err(SearchIndexError::NotFound(name.to_string()))
        }

        async fn delete_collection(&self, _name: &str) -> Result<(), SearchIndexError> {
            Ok(())
        }

        async fn create_collection(&self, _schema: &CollectionSchema) -> Result<(), SearchIndexError> {
            Ok(())
        }

        async fn upsert_synonym(
            &self,
            _collection: &str,
            _synonym: &SynonymGroup,
        ) -> Result<(), SearchIndexError> {
            Ok(())
        }

        async fn import_documents(
            &self,
            _collection: &str,
            documents: &[GameRecord],
        ) -> Result<ImportSummary, SearchIndexError> {
            let mut sizes = self.batch_sizes.lock().unwrap();
            if self.fail_on_batch == Some(sizes.len()) {
                return Err(SearchIndexError::connection("all nodes unreachable"));
            }
            sizes.push(documents.len());

            let results = documents
                .iter()
                .map(|doc| {
                    let rejected = doc
                        .title
                        .as_ref()
                        .is_some_and(|t| self.reject_titles.contains(t));
                    ImportResult {
                        success: !rejected,
                        error: rejected.then(|| "Bad document".to_string()),
                        document: None,
                    }
                })
                .collect();
            Ok(ImportSummary::from_results(results))
        }
    }

    fn records(count: usize) -> Vec<GameRecord> {
        (0..count)
            .map(|i| GameRecord {
                title: Some(format!("Game {}", i)),
                ..Default::default()
            })
            .collect()
    }

    #[tokio::test]
    async fn test_load_partitions_into_batches() {
        let provider = Arc::new(MockProvider::new());
        let loader = BatchLoader::new(provider.clone());

        let summary = loader.load("gog_games", &records(250)).await.unwrap();

        assert_eq!(provider.batch_sizes(), vec![100, 100, 50]);
        assert_eq!(
            summary,
            LoadSummary {
                batches: 3,
                submitted: 250,
                succeeded: 250,
                failed: 0,
            }
        );
    }

    #[tokio::test]
    async fn test_load_exact_multiple_of_batch_size() {
        let provider = Arc::new(MockProvider::new());
        let loader = BatchLoader::new(provider.clone());

        let summary = loader.load("gog_games", &records(200)).await.unwrap();

        assert_eq!(provider.batch_sizes(), vec![100, 100]);
        assert_eq!(summary.batches, 2);
    }

    #[tokio::test]
    async fn test_load_nothing_sends_nothing() {
        let provider = Arc::new(MockProvider::new());
        let loader = BatchLoader::new(provider.clone());

        let summary = loader.load("gog_games", &[]).await.unwrap();

        assert!(provider.batch_sizes().is_empty());
        assert_eq!(summary, LoadSummary::default());
    }

    #[tokio::test]
    async fn test_load_custom_batch_size() {
        let provider = Arc::new(MockProvider::new());
        let loader = BatchLoader::with_config(provider.clone(), LoaderConfig { batch_size: 3 });

        loader.load("gog_games", &records(7)).await.unwrap();

        assert_eq!(provider.batch_sizes(), vec![3, 3, 1]);
    }

    #[tokio::test]
    async fn test_load_counts_rejected_documents() {
        let mut mock = MockProvider::new();
        mock.reject_titles = vec!["Game 3".to_string(), "Game 120".to_string()];
        let provider = Arc::new(mock);
        let loader = BatchLoader::new(provider.clone());

        let summary = loader.load("gog_games", &records(150)).await.unwrap();

        assert_eq!(summary.batches, 2);
        assert_eq!(summary.succeeded, 148);
        assert_eq!(summary.failed, 2);
    }

    #[tokio::test]
    async fn test_load_batch_failure_reports_offset() {
        let mut mock = MockProvider::new();
        mock.fail_on_batch = Some(1);
        let provider = Arc::new(mock);
        let loader = BatchLoader::new(provider.clone());

        let err = loader.load("gog_games", &records(250)).await.unwrap_err();

        match err {
            IngestError::BatchFailed { offset, .. } => assert_eq!(offset, 100),
            other => panic!("unexpected error: {}", other),
        }
        assert_eq!(provider.batch_sizes(), vec![100]);
    }
}
