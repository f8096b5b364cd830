// src/import/mod.rs
//! Spreadsheet bulk import: fuzzy column resolution, row normalization, and
//! reconciliation against the candidate store

pub mod columns;
pub mod reconcile;
pub mod rows;
pub mod store;

pub use columns::{resolve_columns, CanonicalField, ColumnMap};
pub use reconcile::{reconcile_rows, ImportSummary};
pub use rows::{sheet_to_rows, CandidateRow};
pub use store::{CandidateStore, SqliteCandidateStore};
