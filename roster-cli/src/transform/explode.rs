//! Split a comma-delimited column into one row per value

use crate::error::{Result, RosterError};
use crate::table::{Column, Table};

/// Column exploded when the caller does not name one
pub const DEFAULT_EXPLODE_COLUMN: &str = "States";

/// Replace each row by one row per comma-separated value of `column`.
///
/// Values are trimmed after splitting. An empty cell still yields one row, so
/// the row count never decreases. Row order and value order are preserved and
/// every other column is copied unchanged into each produced row.
pub fn explode(table: &Table, column: &str) -> Result<Table> {
    let target = table.column_index(column).ok_or_else(|| {
        RosterError::missing_column(column, format!("table to explode on '{}'", column))
    })?;

    // Source row index for every output row, plus the value it carries
    let mut sources: Vec<usize> = Vec::with_capacity(table.row_count());
    let mut parts: Vec<String> = Vec::with_capacity(table.row_count());

    for (row, cell) in table.columns()[target].values.iter().enumerate() {
        for part in cell.split(',') {
            sources.push(row);
            parts.push(part.trim().to_string());
        }
    }

    let mut parts = Some(parts);
    let columns: Vec<Column> = table
        .columns()
        .iter()
        .enumerate()
        .map(|(idx, col)| {
            let values = if idx == target {
                parts.take().unwrap_or_default()
            } else {
                sources.iter().map(|&row| col.values[row].clone()).collect()
            };

            Column {
                name: col.name.clone(),
                values,
            }
        })
        .collect();

    Table::from_columns(columns).ok_or_else(|| {
        RosterError::Encode(format!("exploding '{}' produced a ragged table", column))
    })
}
