//! `roster structure`: explode an upload and store it as the master file

use anyhow::{Context, Result};
use colored::*;

use super::{read_input, write_output};
use crate::cli::{StructureArgs, resolve_kind};
use crate::config::Config;
use crate::services::structure_file;

pub async fn handle_structure_command(args: StructureArgs, config: &Config) -> Result<()> {
    let bytes = read_input(&args.file)?;
    let kind = resolve_kind(args.kind, &args.file);

    let store = config
        .storage
        .build_store()
        .context("Failed to set up blob storage")?;

    let outcome = structure_file(store.as_ref(), &bytes, kind, &args.column).await?;

    if let Some(path) = &args.save {
        write_output(path, &outcome.workbook)?;
        println!(
            "Saved a local copy to {}",
            path.display().to_string().cyan()
        );
    }

    for skipped in &outcome.sheet.skipped_sheets {
        println!(
            "{} sheet '{}' was not structured",
            "Skipped:".yellow(),
            skipped
        );
    }

    println!(
        "{} sheet '{}': {} rows -> {} rows",
        "Structured".green().bold(),
        outcome.sheet.sheet_name,
        outcome.sheet.input_rows,
        outcome.sheet.table.row_count()
    );
    println!("File uploaded successfully: {}", outcome.url.bright_blue());

    Ok(())
}
