//! `roster explode`: the structure transform, written to a local workbook

use anyhow::Result;
use colored::*;

use super::{read_input, write_output};
use crate::cli::{ExplodeArgs, resolve_kind};
use crate::services::explode_upload;
use crate::table::write_sheet;

pub fn handle_explode_command(args: ExplodeArgs) -> Result<()> {
    let bytes = read_input(&args.file)?;
    let kind = resolve_kind(args.kind, &args.file);

    let sheet = explode_upload(&bytes, kind, &args.column)?;
    let workbook = write_sheet(&sheet.table, &sheet.sheet_name)?;
    write_output(&args.output, &workbook)?;

    println!(
        "{} '{}' on '{}': {} rows -> {} rows, written to {}",
        "Exploded".green().bold(),
        sheet.sheet_name,
        args.column,
        sheet.input_rows,
        sheet.table.row_count(),
        args.output.display().to_string().cyan()
    );

    Ok(())
}
