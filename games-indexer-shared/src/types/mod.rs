//! This module defines the core data structures shared across the games indexer.
//! It re-exports specific types like `GameRecord`.

pub mod game_record;

pub use game_record::GameRecord;
