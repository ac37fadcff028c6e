//! Orchestrator module for the games indexer pipeline.
//!
//! Runs the stages of one indexing pass in order: fetch, read, clean, provision,
//! load and verify.

use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::dataset::{read_rows, DatasetFetcher};
use crate::errors::IngestError;
use crate::loader::{BatchLoader, LoadSummary};
use crate::processor::RecordProcessor;
use crate::provisioner::{CollectionProvisioner, ProvisionReport};
use games_indexer_repository::SearchCollectionProvider;

/// Outcome of a full indexing run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// The CSV file that was indexed.
    pub csv_path: PathBuf,
    /// Number of rows read from the dataset.
    pub rows_read: usize,
    pub provision: ProvisionReport,
    pub load: LoadSummary,
    /// Document count reported by the service after loading, if it could be retrieved.
    pub indexed_documents: Option<u64>,
}

/// Orchestrator that coordinates the pipeline components.
///
/// Every stage finishes before the next begins. The first failing stage aborts the run;
/// no stage is retried.
pub struct Orchestrator {
    fetcher: Box<dyn DatasetFetcher>,
    processor: RecordProcessor,
    provisioner: CollectionProvisioner,
    loader: BatchLoader,
    provider: Arc<dyn SearchCollectionProvider>,
}

impl Orchestrator {
    /// Create a new orchestrator with the given components.
    pub fn new(
        fetcher: Box<dyn DatasetFetcher>,
        processor: RecordProcessor,
        provisioner: CollectionProvisioner,
        loader: BatchLoader,
        provider: Arc<dyn SearchCollectionProvider>,
    ) -> Self {
        Self {
            fetcher,
            processor,
            provisioner,
            loader,
            provider,
        }
    }

    /// Run one indexing pass.
    ///
    /// The collection is dropped and recreated, so running twice over the same dataset
    /// leaves the same documents in the index.
    #[instrument(skip(self), fields(collection = %self.provisioner.collection_name()))]
    pub async fn run(&self) -> Result<RunSummary, IngestError> {
        info!("Starting games indexer run");

        let location = self.fetcher.fetch().await?;
        info!(csv = %location.csv_path.display(), "Dataset ready");

        let rows = read_rows(&location.csv_path)?;
        let rows_read = rows.len();
        info!(row_count = rows_read, "Dataset loaded");

        let records = self.processor.process_batch(rows)?;

        let provision = self.provisioner.provision().await?;

        let collection = self.provisioner.collection_name();
        let load = self.loader.load(collection, &records).await?;
        drop(records);

        let indexed_documents = match self.provider.retrieve_collection(collection).await {
            Ok(info) => {
                info!(
                    num_documents = info.num_documents,
                    submitted = load.submitted,
                    failed = load.failed,
                    "Indexing complete"
                );
                Some(info.num_documents)
            }
            Err(e) => {
                warn!(error = %e, "Could not verify the document count");
                None
            }
        };

        Ok(RunSummary {
            csv_path: location.csv_path,
            rows_read,
            provision,
            load,
            indexed_documents,
        })
    }
}
