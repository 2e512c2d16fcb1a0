//! Reconciliation of uploaded rosters against the master file
//!
//! Uploaded sheets are renamed onto the canonical schema, normalized, and
//! compared agency by agency using full-row equality over the comparison
//! fields both sides carry.

mod core;
mod export;
mod models;

pub use self::core::reconcile;
pub use export::{write_result_csv, write_result_workbook};
pub use models::{CanonicalRow, ComparisonField, ComparisonResult};
