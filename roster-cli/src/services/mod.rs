//! Roster services: the structure and compare operations
//!
//! Each operation wires the reader, transforms and reconciler to a blob
//! store. Front ends call these and only format the outcome.

pub mod compare;
pub mod structure;

pub use compare::compare_file;
pub use structure::{explode_upload, structure_file};
