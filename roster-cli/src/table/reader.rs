//! Decode uploaded bytes into a [`Dataset`]
//!
//! CSV input becomes a single sheet named `Sheet1`. Workbooks keep every
//! sheet in workbook order; the first row of each sheet is the header.

use std::io::Cursor;

use calamine::{Data, Range, Reader, open_workbook_auto_from_rs};

use super::{Dataset, FileKind, Table};
use crate::error::{Result, RosterError};

/// Sheet name given to CSV input
pub const CSV_SHEET_NAME: &str = "Sheet1";

/// Read raw bytes as the declared file kind
pub fn read_dataset(bytes: &[u8], kind: FileKind) -> Result<Dataset> {
    match kind {
        FileKind::Csv => {
            let table = read_csv(bytes)?;
            Ok(Dataset::single(CSV_SHEET_NAME, table))
        }
        FileKind::Spreadsheet => read_spreadsheet(bytes),
    }
}

fn read_csv(bytes: &[u8]) -> Result<Table> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    // Flexible so short rows reach `Table::from_rows`, which pads them
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| RosterError::decode(FileKind::Csv, e))?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        // +2: one for the header, one for 1-based line numbers
        let line = idx + 2;
        let record = record
            .map_err(|e| RosterError::decode(FileKind::Csv, format!("row {}: {}", line, e)))?;
        if record.len() > headers.len() {
            return Err(RosterError::decode(
                FileKind::Csv,
                format!(
                    "row {}: expected {} fields, saw {}",
                    line,
                    headers.len(),
                    record.len()
                ),
            ));
        }
        rows.push(record.iter().map(|c| c.to_string()).collect::<Vec<_>>());
    }

    Ok(Table::from_rows(headers, rows))
}

fn read_spreadsheet(bytes: &[u8]) -> Result<Dataset> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|e| RosterError::decode(FileKind::Spreadsheet, e))?;

    let sheet_names: Vec<String> = workbook.sheet_names().to_vec();
    let mut dataset = Dataset::new();

    for sheet_name in sheet_names {
        let range = workbook.worksheet_range(&sheet_name).map_err(|e| {
            RosterError::decode(
                FileKind::Spreadsheet,
                format!("sheet '{}': {}", sheet_name, e),
            )
        })?;

        dataset.insert(sheet_name, range_to_table(&range));
    }

    Ok(dataset)
}

fn range_to_table(range: &Range<Data>) -> Table {
    let mut rows = range.rows();

    let header = match rows.next() {
        Some(header) => header,
        None => return Table::default(),
    };

    let headers: Vec<String> = header.iter().map(cell_to_string).collect();
    let data: Vec<Vec<String>> = rows
        .map(|row| row.iter().map(cell_to_string).collect())
        .collect();

    Table::from_rows(headers, data)
}

/// String form of a workbook cell; empty and error cells become ""
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            if f.fract() == 0.0 && f.abs() < 1e15 {
                (*f as i64).to_string()
            } else {
                f.to_string()
            }
        }
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => format!("{}", dt),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
    }
}
