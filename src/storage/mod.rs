//! Storage is organized through [log_store::CsvLogStore].
//! The basic idea is:
//!  - A database is a directory holding a metadata file and a tree of
//!    per-day log files.
//!  - Each calendar day maps to exactly one log file whose path is a
//!    pure function of the date, so no index is ever needed.
//!  - Log files are append-only CSV, one completed session per row.

pub mod date_log;
pub mod entities;
pub mod error;
pub mod log_store;
pub mod metadata;
