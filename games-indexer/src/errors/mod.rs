//! Error types for the games indexer pipeline.

use games_indexer_repository::SearchIndexError;
use thiserror::Error;

/// Errors that can occur in the games indexer pipeline.
#[derive(Error, Debug)]
pub enum IngestError {
    /// The dataset could not be downloaded, extracted or located.
    #[error("Dataset error: {0}")]
    DatasetError(String),

    /// Error parsing or decoding data.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// The collection could not be provisioned.
    #[error("Provision error: {0}")]
    ProvisionError(#[source] SearchIndexError),

    /// The API key may not create collections.
    #[error("API key {key_hint} is not allowed to create collections: {source}")]
    Unauthorized {
        key_hint: String,
        #[source]
        source: SearchIndexError,
    },

    /// A document batch was rejected as a whole.
    #[error("Batch starting at index {offset} failed: {source}")]
    BatchFailed {
        offset: usize,
        #[source]
        source: SearchIndexError,
    },

    /// Local file system error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl IngestError {
    /// Create a dataset error.
    pub fn dataset(msg: impl Into<String>) -> Self {
        Self::DatasetError(msg.into())
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }
}

impl From<csv::Error> for IngestError {
    fn from(err: csv::Error) -> Self {
        Self::ParseError(err.to_string())
    }
}

impl From<zip::result::ZipError> for IngestError {
    fn from(err: zip::result::ZipError) -> Self {
        Self::DatasetError(format!("Failed to extract archive: {}", err))
    }
}

impl From<reqwest::Error> for IngestError {
    fn from(err: reqwest::Error) -> Self {
        Self::DatasetError(format!("Download failed: {}", err))
    }
}
