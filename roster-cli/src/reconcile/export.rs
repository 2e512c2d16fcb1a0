//! CSV and Excel export of comparison results

use csv::Writer;
use rust_xlsxwriter::Workbook;

use super::models::{CanonicalRow, ComparisonField, ComparisonResult};
use crate::error::{Result, RosterError};
use crate::table::{Table, write_table};

pub const MASTER_SHEET: &str = "Unmatched Master";
pub const UPLOADED_SHEET: &str = "Unmatched Uploaded";

/// Both lists in one CSV, told apart by a leading `Source` column
/// (`master` or `uploaded`)
pub fn write_result_csv(result: &ComparisonResult) -> Result<Vec<u8>> {
    let fields = result.fields();
    let mut wtr = Writer::from_writer(Vec::new());

    let mut header = vec!["Source"];
    header.extend(fields.iter().map(|f| f.column_name()));
    wtr.write_record(&header).map_err(csv_error)?;

    let sides = [
        ("master", &result.unmatched_in_master),
        ("uploaded", &result.unmatched_in_uploaded),
    ];
    for (source, rows) in sides {
        for row in rows.iter() {
            let mut record = vec![source];
            record.extend(fields.iter().map(|f| row.get(*f).unwrap_or_default()));
            wtr.write_record(&record).map_err(csv_error)?;
        }
    }

    wtr.into_inner()
        .map_err(|e| RosterError::Encode(format!("Failed to flush CSV writer: {}", e)))
}

/// One sheet per side
pub fn write_result_workbook(result: &ComparisonResult) -> Result<Vec<u8>> {
    let fields = result.fields();
    let mut workbook = Workbook::new();

    let sheets = [
        (MASTER_SHEET, &result.unmatched_in_master),
        (UPLOADED_SHEET, &result.unmatched_in_uploaded),
    ];
    for (name, rows) in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(name)?;
        write_table(worksheet, &rows_to_table(rows, &fields))?;
    }

    Ok(workbook.save_to_buffer()?)
}

fn rows_to_table(rows: &[CanonicalRow], fields: &[ComparisonField]) -> Table {
    Table::from_rows(
        fields.iter().map(|f| f.column_name()),
        rows.iter().map(|row| {
            fields
                .iter()
                .map(|f| row.get(*f).unwrap_or_default().to_string())
                .collect::<Vec<_>>()
        }),
    )
}

fn csv_error(e: csv::Error) -> RosterError {
    RosterError::Encode(format!("Failed to write CSV record: {}", e))
}
