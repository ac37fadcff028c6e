//! Processor module for the games indexer pipeline.
//!
//! Transforms raw dataset rows into search documents.

mod cell;
mod list_parser;
mod record_cleaner;

pub use cell::{is_null_token, CellValue};
pub use list_parser::{detect_encoding, parse_list_field, ListEncoding};
pub use record_cleaner::{clean_row, RawGameRow, RecordProcessor};
