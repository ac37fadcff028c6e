//! # Games Indexer
//!
//! Loads the GOG.com games dataset into a Typesense collection.
//!
//! ## Architecture
//!
//! One run is a strict sequence of stages:
//!
//! 1. **Dataset**: Downloads (or reuses) the dataset and reads its CSV file
//! 2. **Processor**: Cleans raw rows into search documents
//! 3. **Provisioner**: Recreates the collection and its synonym groups
//! 4. **Loader**: Imports documents in batches
//! 5. **Orchestrator**: Runs the stages and verifies the final document count
//!
//! ## Modules
//!
//! - [`config`]: Configuration and dependency initialization
//! - [`dataset`]: Dataset acquisition and CSV reading
//! - [`processor`]: Row cleaning and list-field parsing
//! - [`provisioner`]: Collection provisioning
//! - [`loader`]: Batched document import
//! - [`orchestrator`]: Coordinates the pipeline
//! - [`errors`]: Error types for the pipeline

pub mod config;
pub mod dataset;
pub mod errors;
pub mod loader;
pub mod orchestrator;
pub mod processor;
pub mod provisioner;

pub use config::Dependencies;
pub use errors::IngestError;

use thiserror::Error;

/// Errors that can occur during indexer initialization or execution.
#[derive(Error, Debug)]
pub enum IndexingError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Ingest error.
    #[error("Ingest error: {0}")]
    IngestError(#[from] IngestError),
}

impl IndexingError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
