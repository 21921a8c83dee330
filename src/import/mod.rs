//! Import and export adapters
//!
//! Converts external representations into roster operations and back:
//! CSV tables for full replace and export, extracted name lists for adding
//! new participants.

pub mod csv;
pub mod names;

pub use self::csv::{export_csv, read_rows, RosterRow, EXPORT_FILE_NAME};
pub use names::extract_names;
