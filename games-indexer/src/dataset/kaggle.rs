//! Kaggle dataset download with a local cache.

use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info};
use zip::ZipArchive;

use super::{find_csv, DatasetFetcher, DatasetLocation};
use crate::errors::IngestError;

/// Base URL of the Kaggle public API.
pub const DEFAULT_KAGGLE_API_URL: &str = "https://www.kaggle.com/api/v1";

/// Name of the archive while it is being extracted.
const ARCHIVE_FILE_NAME: &str = "archive.zip";

/// A Kaggle dataset identifier, `owner/slug`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetHandle {
    pub owner: String,
    pub slug: String,
}

impl FromStr for DatasetHandle {
    type Err = IngestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.trim().split('/');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(owner), Some(slug), None) if !owner.is_empty() && !slug.is_empty() => {
                Ok(Self {
                    owner: owner.to_string(),
                    slug: slug.to_string(),
                })
            }
            _ => Err(IngestError::dataset(format!(
                "Invalid dataset handle '{}', expected 'owner/slug'",
                s
            ))),
        }
    }
}

impl fmt::Display for DatasetHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.slug)
    }
}

/// Kaggle API credentials.
#[derive(Clone)]
pub struct KaggleCredentials {
    pub username: String,
    pub key: String,
}

impl fmt::Debug for KaggleCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KaggleCredentials")
            .field("username", &self.username)
            .field("key", &"<redacted>")
            .finish()
    }
}

/// Production dataset fetcher backed by the Kaggle API.
///
/// The dataset is extracted into `{cache_root}/datasets/{owner}/{slug}`. A cache
/// directory that already holds a CSV file is reused without any network access.
pub struct KaggleDatasetFetcher {
    handle: DatasetHandle,
    cache_root: PathBuf,
    credentials: Option<KaggleCredentials>,
    api_url: String,
    client: Client,
}

impl KaggleDatasetFetcher {
    pub fn new(
        handle: DatasetHandle,
        cache_root: impl Into<PathBuf>,
        credentials: Option<KaggleCredentials>,
    ) -> Self {
        Self {
            handle,
            cache_root: cache_root.into(),
            credentials,
            api_url: DEFAULT_KAGGLE_API_URL.to_string(),
            client: Client::new(),
        }
    }

    #[cfg(test)]
    fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Directory the dataset is extracted into.
    pub fn dataset_dir(&self) -> PathBuf {
        self.cache_root
            .join("datasets")
            .join(&self.handle.owner)
            .join(&self.handle.slug)
    }

    fn download_url(&self) -> String {
        format!(
            "{}/datasets/download/{}/{}",
            self.api_url.trim_end_matches('/'),
            self.handle.owner,
            self.handle.slug
        )
    }

    async fn download_archive(&self, archive_path: &Path) -> Result<(), IngestError> {
        let url = self.download_url();
        info!(dataset = %self.handle, url = %url, "Downloading dataset");

        let mut request = self.client.get(&url);
        if let Some(credentials) = &self.credentials {
            request = request.basic_auth(&credentials.username, Some(&credentials.key));
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(IngestError::dataset(format!(
                "Download of {} failed with status {}",
                self.handle, status
            )));
        }

        let bytes = response.bytes().await?;
        tokio::fs::write(archive_path, &bytes).await?;
        debug!(bytes = bytes.len(), path = %archive_path.display(), "Dataset archive written");
        Ok(())
    }
}

/// Extract a zip archive into `dir`.
pub(crate) fn extract_archive(archive_path: &Path, dir: &Path) -> Result<(), IngestError> {
    let file = File::open(archive_path)?;
    let mut archive = ZipArchive::new(file)?;
    archive.extract(dir)?;
    Ok(())
}

#[async_trait]
impl DatasetFetcher for KaggleDatasetFetcher {
    async fn fetch(&self) -> Result<DatasetLocation, IngestError> {
        let dir = self.dataset_dir();

        if dir.is_dir() {
            if let Ok(csv_path) = find_csv(&dir) {
                info!(dataset = %self.handle, dir = %dir.display(), "Using cached dataset");
                return Ok(DatasetLocation { dir, csv_path });
            }
        }

        tokio::fs::create_dir_all(&dir).await?;
        let archive_path = dir.join(ARCHIVE_FILE_NAME);
        self.download_archive(&archive_path).await?;
        extract_archive(&archive_path, &dir)?;
        tokio::fs::remove_file(&archive_path).await?;

        let csv_path = find_csv(&dir)?;
        info!(dataset = %self.handle, csv = %csv_path.display(), "Dataset downloaded");
        Ok(DatasetLocation { dir, csv_path })
    }
}
