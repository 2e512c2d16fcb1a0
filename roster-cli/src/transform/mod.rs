//! Row-level transforms applied between reading and reconciling
//!
//! Both transforms take a table by reference and return a new one.

mod explode;
mod normalize;

pub use explode::{DEFAULT_EXPLODE_COLUMN, explode};
pub use normalize::normalize_table;
