//! Dataset module for the games indexer pipeline.
//!
//! This module provides:
//! - [`DatasetSource`] config enum for choosing between a local directory and a Kaggle download
//! - [`DatasetFetcher`] trait for abstracting dataset acquisition
//! - [`KaggleDatasetFetcher`] production fetcher with a local cache
//! - [`LocalDatasetFetcher`] fetcher for an already extracted dataset
//! - [`read_rows`] CSV reader restricted to the indexed columns
//!
//! ## Usage
//!
//! ```ignore
//! use games_indexer::dataset::{DatasetHandle, DatasetSource};
//!
//! let handle: DatasetHandle = "lunthu/gog-com-video-games-dataset".parse()?;
//! let fetcher = DatasetSource::kaggle(handle, cache_root, None).into_fetcher();
//! let location = fetcher.fetch().await?;
//! let rows = read_rows(&location.csv_path)?;
//! ```

mod kaggle;
mod reader;

pub use kaggle::{DatasetHandle, KaggleCredentials, KaggleDatasetFetcher, DEFAULT_KAGGLE_API_URL};
pub use reader::read_rows;

use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{info, warn};

use crate::errors::IngestError;

/// Where a fetched dataset lives on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetLocation {
    /// Directory holding the extracted dataset.
    pub dir: PathBuf,
    /// The CSV file inside `dir`.
    pub csv_path: PathBuf,
}

/// Trait for obtaining a local copy of the dataset.
///
/// Production code uses [`KaggleDatasetFetcher`]; tests point a
/// [`LocalDatasetFetcher`] at a temporary directory.
#[async_trait]
pub trait DatasetFetcher: Send + Sync {
    /// Make the dataset available locally and locate its CSV file.
    async fn fetch(&self) -> Result<DatasetLocation, IngestError>;
}

/// Fetcher for a dataset that is already extracted on disk.
pub struct LocalDatasetFetcher {
    dir: PathBuf,
}

impl LocalDatasetFetcher {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl DatasetFetcher for LocalDatasetFetcher {
    async fn fetch(&self) -> Result<DatasetLocation, IngestError> {
        let csv_path = find_csv(&self.dir)?;
        info!(dir = %self.dir.display(), csv = %csv_path.display(), "Using local dataset");
        Ok(DatasetLocation {
            dir: self.dir.clone(),
            csv_path,
        })
    }
}

/// Configuration for the dataset source.
#[derive(Debug, Clone)]
pub enum DatasetSource {
    /// Read an already extracted dataset from a directory.
    Local(PathBuf),

    /// Download from Kaggle into a cache directory.
    Kaggle {
        /// `owner/slug` of the dataset.
        handle: DatasetHandle,
        /// Root of the download cache.
        cache_root: PathBuf,
        /// Optional API credentials.
        credentials: Option<KaggleCredentials>,
    },
}

impl DatasetSource {
    /// Create a local source.
    pub fn local(dir: impl Into<PathBuf>) -> Self {
        Self::Local(dir.into())
    }

    /// Create a Kaggle source.
    pub fn kaggle(
        handle: DatasetHandle,
        cache_root: impl Into<PathBuf>,
        credentials: Option<KaggleCredentials>,
    ) -> Self {
        Self::Kaggle {
            handle,
            cache_root: cache_root.into(),
            credentials,
        }
    }

    /// Create the appropriate DatasetFetcher implementation.
    pub fn into_fetcher(self) -> Box<dyn DatasetFetcher> {
        match self {
            Self::Local(dir) => Box::new(LocalDatasetFetcher::new(dir)),
            Self::Kaggle {
                handle,
                cache_root,
                credentials,
            } => Box::new(KaggleDatasetFetcher::new(handle, cache_root, credentials)),
        }
    }
}

/// Locate the CSV file of an extracted dataset.
///
/// Only the top level of `dir` is searched. With several candidates the
/// lexicographically first one is used.
///
/// # Errors
///
/// Returns `IngestError::DatasetError` when `dir` holds no `.csv` file.
pub fn find_csv(dir: &Path) -> Result<PathBuf, IngestError> {
    let mut candidates = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_csv = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        if is_csv && path.is_file() {
            candidates.push(path);
        }
    }
    candidates.sort();

    if candidates.len() > 1 {
        warn!(
            dir = %dir.display(),
            count = candidates.len(),
            "Dataset contains several CSV files, using the first"
        );
    }

    candidates
        .into_iter()
        .next()
        .ok_or_else(|| IngestError::dataset(format!("No CSV file found in {}", dir.display())))
}
