//! Dependency initialization and wiring for the games indexer.

use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use crate::dataset::{DatasetHandle, DatasetSource, KaggleCredentials};
use crate::loader::BatchLoader;
use crate::orchestrator::Orchestrator;
use crate::processor::RecordProcessor;
use crate::provisioner::CollectionProvisioner;
use crate::IndexingError;
use games_indexer_repository::typesense::DEFAULT_COLLECTION_NAME;
use games_indexer_repository::{
    CollectionConfig, SearchCollectionProvider, TypesenseConfig, TypesenseProvider,
};

/// Default Kaggle dataset handle.
const DEFAULT_DATASET_HANDLE: &str = "lunthu/gog-com-video-games-dataset";

/// Cache directory below `$HOME` when `KAGGLEHUB_CACHE` is not set.
const DEFAULT_CACHE_SUBDIR: &str = ".cache/kagglehub";

/// Pipeline settings that are not connection settings.
#[derive(Debug, Clone)]
pub struct IndexerSettings {
    /// Target collection.
    pub collection: CollectionConfig,
    /// Where the dataset comes from.
    pub dataset: DatasetSource,
}

impl IndexerSettings {
    /// Build the settings from an arbitrary variable lookup.
    ///
    /// Values are trimmed; a value that is empty after trimming counts as unset.
    ///
    /// # Environment Variables
    ///
    /// - `TYPESENSE_COLLECTION`: Collection name (default: gog_games)
    /// - `DATASET_DIR`: Read an already extracted dataset from this directory
    /// - `DATASET_HANDLE`: Kaggle `owner/slug` (default: lunthu/gog-com-video-games-dataset)
    /// - `KAGGLEHUB_CACHE`: Download cache root (default: $HOME/.cache/kagglehub)
    /// - `KAGGLE_USERNAME`, `KAGGLE_KEY`: Kaggle API credentials (optional)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, IndexingError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let collection = CollectionConfig::new(
            get("TYPESENSE_COLLECTION").unwrap_or_else(|| DEFAULT_COLLECTION_NAME.to_string()),
        );

        let dataset = match get("DATASET_DIR") {
            Some(dir) => DatasetSource::local(dir),
            None => {
                let handle = get("DATASET_HANDLE")
                    .unwrap_or_else(|| DEFAULT_DATASET_HANDLE.to_string())
                    .parse::<DatasetHandle>()
                    .map_err(|e| IndexingError::config(e.to_string()))?;
                let cache_root = get("KAGGLEHUB_CACHE")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| {
                        get("HOME")
                            .map(PathBuf::from)
                            .unwrap_or_default()
                            .join(DEFAULT_CACHE_SUBDIR)
                    });
                let credentials = match (get("KAGGLE_USERNAME"), get("KAGGLE_KEY")) {
                    (Some(username), Some(key)) => Some(KaggleCredentials { username, key }),
                    (None, None) => None,
                    _ => {
                        warn!("Only one of KAGGLE_USERNAME and KAGGLE_KEY is set, downloading anonymously");
                        None
                    }
                };
                DatasetSource::kaggle(handle, cache_root, credentials)
            }
        };

        Ok(Self {
            collection,
            dataset,
        })
    }
}

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The configured orchestrator ready to run.
    pub orchestrator: Orchestrator,
}

impl Dependencies {
    /// Initialize all dependencies from environment variables.
    ///
    /// The environment is read once here; see [`TypesenseConfig::from_env`] and
    /// [`IndexerSettings::from_lookup`] for the variables. An unhealthy search service
    /// is only reported, the run itself decides whether it can proceed.
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(IndexingError)` - If the settings are invalid or the provider cannot be built
    pub async fn new() -> Result<Self, IndexingError> {
        let typesense = TypesenseConfig::from_env();
        let settings = IndexerSettings::from_lookup(|key| env::var(key).ok())?;

        let node_urls: Vec<String> = typesense
            .nodes
            .iter()
            .map(|n| format!("{}://{}:{}", n.protocol, n.host, n.port))
            .collect();
        info!(
            nodes = ?node_urls,
            api_key = %typesense.redacted_api_key(),
            collection = %settings.collection.name,
            dataset = ?settings.dataset,
            "Initializing dependencies"
        );

        let provider: Arc<dyn SearchCollectionProvider> = Arc::new(
            TypesenseProvider::new(&typesense).map_err(|e| {
                IndexingError::config(format!("Failed to create Typesense provider: {}", e))
            })?,
        );

        match provider.health_check().await {
            Ok(true) => info!("Typesense is healthy"),
            Ok(false) => warn!("Typesense reports itself unhealthy"),
            Err(e) => warn!(error = %e, "Typesense health check failed"),
        }

        let provisioner = CollectionProvisioner::new(
            provider.clone(),
            settings.collection,
            typesense.redacted_api_key(),
        );
        let loader = BatchLoader::new(provider.clone());
        let orchestrator = Orchestrator::new(
            settings.dataset.into_fetcher(),
            RecordProcessor::new(),
            provisioner,
            loader,
            provider,
        );

        Ok(Self { orchestrator })
    }
}
