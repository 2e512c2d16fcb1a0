//! `roster compare`: reconcile a file against the master and report differences

use std::path::Path;

use anyhow::{Context, Result, bail};
use colored::*;
use serde_json::json;
use unicode_width::UnicodeWidthStr;

use super::{read_input, write_output};
use crate::cli::{CompareArgs, OutputFormat, resolve_kind};
use crate::config::Config;
use crate::reconcile::{
    CanonicalRow, ComparisonField, ComparisonResult, write_result_csv, write_result_workbook,
};
use crate::services::compare_file;

pub async fn handle_compare_command(args: CompareArgs, config: &Config) -> Result<()> {
    let bytes = read_input(&args.file)?;
    let kind = resolve_kind(args.kind, &args.file);

    let store = config
        .storage
        .build_store()
        .context("Failed to set up blob storage")?;

    let result = compare_file(store.as_ref(), &bytes, kind).await?;

    match args.format {
        OutputFormat::Json => {
            let document = json!({
                "status": "completed",
                "differences": result,
            });
            println!("{}", serde_json::to_string_pretty(&document)?);
        }
        OutputFormat::Table => print_result(&result),
    }

    if let Some(path) = &args.export {
        export_result(&result, path)?;
        if args.format == OutputFormat::Table {
            println!(
                "Differences exported to {}",
                path.display().to_string().cyan()
            );
        }
    }

    Ok(())
}

fn export_result(result: &ComparisonResult, path: &Path) -> Result<()> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    let bytes = match ext.as_str() {
        "csv" => write_result_csv(result)?,
        "xlsx" => write_result_workbook(result)?,
        _ => bail!(
            "Unsupported export format for {} (use .csv or .xlsx)",
            path.display()
        ),
    };

    write_output(path, &bytes)
}

fn print_result(result: &ComparisonResult) {
    println!("{}", "Comparison completed".green().bold());
    println!();

    for summary in &result.agencies {
        let status = if summary.unmatched_in_master == 0 && summary.unmatched_in_uploaded == 0 {
            "ok".green()
        } else {
            "differs".yellow()
        };
        println!(
            "  [{}] {} ({}): {} master-only, {} upload-only",
            summary.sheet,
            display_agency(&summary.agency),
            status,
            summary.unmatched_in_master,
            summary.unmatched_in_uploaded
        );
    }
    if !result.agencies.is_empty() {
        println!();
    }

    if result.is_clean() {
        println!("{}", "Uploaded file matches the master file".green());
        return;
    }

    let fields = result.fields();

    println!("{}", "Unmatched rows in master file".bold());
    if result.unmatched_in_master.is_empty() {
        println!("  {}", "No unmatched data in master file".dimmed());
    } else {
        print!("{}", render_rows(&result.unmatched_in_master, &fields));
    }
    println!();

    println!("{}", "Unmatched rows in uploaded file".bold());
    if result.unmatched_in_uploaded.is_empty() {
        println!("  {}", "No unmatched data in uploaded file".dimmed());
    } else {
        print!("{}", render_rows(&result.unmatched_in_uploaded, &fields));
    }
}

fn display_agency(agency: &str) -> &str {
    if agency.is_empty() {
        "(no agency)"
    } else {
        agency
    }
}

/// Render rows as an aligned text table, one line per row
fn render_rows(rows: &[CanonicalRow], fields: &[ComparisonField]) -> String {
    let mut widths: Vec<usize> = fields.iter().map(|f| f.column_name().width()).collect();
    for row in rows {
        for (idx, field) in fields.iter().enumerate() {
            let value = row.get(*field).unwrap_or_default();
            widths[idx] = widths[idx].max(value.width());
        }
    }

    let line = |cells: Vec<&str>| -> String {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{}{}", cell, " ".repeat(width - cell.width())))
            .collect();
        format!("  {}\n", padded.join("  ").trim_end())
    };

    let mut out = line(fields.iter().map(|f| f.column_name()).collect());
    for row in rows {
        out.push_str(&line(
            fields
                .iter()
                .map(|f| row.get(*f).unwrap_or_default())
                .collect(),
        ));
    }
    out
}
