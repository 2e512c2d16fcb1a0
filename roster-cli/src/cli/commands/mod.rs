//! Command handlers

pub mod compare;
pub mod explode;
pub mod structure;

use std::path::Path;

use anyhow::{Context, Result};

pub use compare::handle_compare_command;
pub use explode::handle_explode_command;
pub use structure::handle_structure_command;

/// Read an input file, rejecting empty ones early
pub(crate) fn read_input(path: &Path) -> Result<Vec<u8>> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read input file: {}", path.display()))?;

    if bytes.is_empty() {
        anyhow::bail!("Input file is empty: {}", path.display());
    }

    log::debug!("Read {} bytes from {}", bytes.len(), path.display());
    Ok(bytes)
}

/// Write bytes to a local file
pub(crate) fn write_output(path: &Path, bytes: &[u8]) -> Result<()> {
    std::fs::write(path, bytes)
        .with_context(|| format!("Failed to write file: {}", path.display()))?;

    log::info!("Wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}
