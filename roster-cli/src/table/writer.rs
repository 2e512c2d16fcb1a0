//! Serialize a [`Table`] into an in-memory workbook

use rust_xlsxwriter::{Workbook, Worksheet, XlsxError};

use super::Table;
use crate::error::{Result, RosterError};

impl From<XlsxError> for RosterError {
    fn from(e: XlsxError) -> Self {
        RosterError::Encode(e.to_string())
    }
}

/// Write a table as the only sheet of a new workbook and return its bytes
pub fn write_sheet(table: &Table, sheet_name: &str) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    worksheet.set_name(sheet_name)?;
    write_table(worksheet, table)?;

    Ok(workbook.save_to_buffer()?)
}

/// Write header + cells starting at A1. Every cell is written as a string so
/// identifiers survive the round trip without picking up a float format.
///
/// Empty cells are left blank, so rows that are entirely empty at the end of
/// the table are not part of the sheet's used range and do not read back.
pub(crate) fn write_table(worksheet: &mut Worksheet, table: &Table) -> Result<()> {
    let column_count = table.column_count();
    for (col_idx, column) in table.columns().iter().enumerate() {
        let col = u16::try_from(col_idx)
            .map_err(|_| RosterError::Encode(format!("too many columns ({})", column_count)))?;

        worksheet.write_string(0, col, &column.name)?;

        for (row_idx, value) in column.values.iter().enumerate() {
            // Leave empty cells blank
            if value.is_empty() {
                continue;
            }
            worksheet.write_string((row_idx + 1) as u32, col, value)?;
        }
    }

    Ok(())
}
