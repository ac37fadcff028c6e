//! # Games Indexer Shared
//!
//! This crate defines shared data structures used across the games indexer.
//! It includes the document definition imported into the search collection.

pub mod types;

pub use types::game_record::GameRecord;
