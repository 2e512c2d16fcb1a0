//! Error taxonomy for the roster pipeline
//!
//! Every failure the reader, transforms, reconciler and services can produce
//! ends up as one [`RosterError`] carrying a human-readable cause. Nothing in
//! here retries; callers decide what to do with the message.

use thiserror::Error;

use crate::table::FileKind;

#[derive(Debug, Error)]
pub enum RosterError {
    /// Input bytes could not be parsed as the declared file kind
    #[error("Failed to decode {kind} input: {reason}")]
    Decode { kind: FileKind, reason: String },

    /// A column the operation depends on is absent
    #[error("Missing required column '{column}' in {table}")]
    MissingColumn { column: String, table: String },

    /// The master file could not be fetched or read back
    #[error("Master file unavailable: {0}")]
    MasterUnavailable(String),

    /// The structured file could not be written to blob storage
    #[error("Failed to store structured file: {0}")]
    StorageWrite(String),

    /// A table or comparison result could not be serialized
    #[error("Failed to encode output: {0}")]
    Encode(String),
}

impl RosterError {
    pub(crate) fn decode(kind: FileKind, reason: impl std::fmt::Display) -> Self {
        RosterError::Decode {
            kind,
            reason: reason.to_string(),
        }
    }

    pub(crate) fn missing_column(column: &str, table: impl Into<String>) -> Self {
        RosterError::MissingColumn {
            column: column.to_string(),
            table: table.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RosterError>;
