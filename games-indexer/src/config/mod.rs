//! Configuration and dependency initialization for the games indexer.

mod dependencies;

pub use dependencies::{Dependencies, IndexerSettings};
