//! Structure operation: explode the upload and store it as the master file

use crate::error::{Result, RosterError};
use crate::storage::BlobStore;
use crate::table::{FileKind, Table, read_dataset, write_sheet};
use crate::transform::{explode, normalize_table};

/// The exploded first sheet of an upload
#[derive(Debug, Clone)]
pub struct StructuredSheet {
    pub sheet_name: String,
    pub input_rows: usize,
    pub table: Table,
    /// Sheets after the first, which are not structured
    pub skipped_sheets: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct StructureOutcome {
    /// URL returned by the blob store
    pub url: String,
    pub sheet: StructuredSheet,
    /// The workbook bytes that were stored
    pub workbook: Vec<u8>,
}

/// Read an upload, normalize its first sheet and explode `column`
pub fn explode_upload(bytes: &[u8], kind: FileKind, column: &str) -> Result<StructuredSheet> {
    let dataset = read_dataset(bytes, kind)?;
    let mut sheets = dataset.into_iter();

    let first = sheets
        .next()
        .ok_or_else(|| RosterError::decode(kind, "input contains no sheets"))?;
    let skipped_sheets: Vec<String> = sheets.map(|s| s.name).collect();

    if !skipped_sheets.is_empty() {
        log::warn!(
            "Only the first sheet '{}' is structured; ignoring {}",
            first.name,
            skipped_sheets.join(", ")
        );
    }

    let normalized = normalize_table(&first.table);
    let table = explode(&normalized, column).map_err(|e| match e {
        RosterError::MissingColumn { column, .. } => {
            RosterError::missing_column(&column, format!("sheet '{}'", first.name))
        }
        other => other,
    })?;

    log::info!(
        "Exploded sheet '{}' on '{}': {} rows -> {} rows",
        first.name,
        column,
        first.table.row_count(),
        table.row_count()
    );

    Ok(StructuredSheet {
        sheet_name: first.name,
        input_rows: first.table.row_count(),
        table,
        skipped_sheets,
    })
}

/// Explode the upload and overwrite the master file with the result
pub async fn structure_file(
    store: &dyn BlobStore,
    bytes: &[u8],
    kind: FileKind,
    column: &str,
) -> Result<StructureOutcome> {
    let sheet = explode_upload(bytes, kind, column)?;
    let workbook = write_sheet(&sheet.table, &sheet.sheet_name)?;

    log::info!(
        "Storing structured sheet '{}' as '{}'",
        sheet.sheet_name,
        store.blob_name()
    );
    let url = store
        .put(workbook.clone())
        .await
        .map_err(|e| RosterError::StorageWrite(e.to_string()))?;

    Ok(StructureOutcome {
        url,
        sheet,
        workbook,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::memory::MemoryBlobStore;
    use crate::transform::DEFAULT_EXPLODE_COLUMN;
    use rust_xlsxwriter::Workbook;

    #[tokio::test]
    async fn test_structure_csv_stores_exploded_sheet() {
        let store = MemoryBlobStore::new();
        let csv = b"Agent,AgentNPN,States\nAlice,111.0,\"CA, NY\"\nBob,222,\n";

        let outcome = structure_file(&store, csv, FileKind::Csv, DEFAULT_EXPLODE_COLUMN)
            .await
            .unwrap();

        assert_eq!(outcome.url, "memory://uploaded_file.xlsx");
        assert_eq!(outcome.sheet.input_rows, 2);
        assert_eq!(outcome.sheet.table.row_count(), 3);

        let stored = store.contents().unwrap();
        assert_eq!(stored, outcome.workbook);

        let dataset = read_dataset(&stored, FileKind::Spreadsheet).unwrap();
        let table = dataset.get("Sheet1").unwrap();
        assert_eq!(table.row(0), vec!["Alice", "111", "CA"]);
        assert_eq!(table.row(1), vec!["Alice", "111", "NY"]);
        assert_eq!(table.row(2), vec!["Bob", "222", ""]);
    }

    #[tokio::test]
    async fn test_missing_explode_column_stores_nothing() {
        let store = MemoryBlobStore::new();
        let csv = b"Agent\nAlice\n";

        let err = structure_file(&store, csv, FileKind::Csv, "States")
            .await
            .unwrap_err();

        match err {
            RosterError::MissingColumn { column, table } => {
                assert_eq!(column, "States");
                assert_eq!(table, "sheet 'Sheet1'");
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(store.contents().is_none());
    }

    #[tokio::test]
    async fn test_put_failure_is_storage_write_error() {
        let store = MemoryBlobStore::failing_writes();
        let csv = b"States\nCA\n";

        let err = structure_file(&store, csv, FileKind::Csv, "States")
            .await
            .unwrap_err();
        assert!(matches!(err, RosterError::StorageWrite(_)));
    }

    #[test]
    fn test_only_first_sheet_is_structured() {
        let mut workbook = Workbook::new();
        let first = workbook.add_worksheet();
        first.set_name("Roster").unwrap();
        first.write_string(0, 0, "States").unwrap();
        first.write_string(1, 0, "CA,TX").unwrap();
        let second = workbook.add_worksheet();
        second.set_name("Notes").unwrap();
        second.write_string(0, 0, "Text").unwrap();
        let bytes = workbook.save_to_buffer().unwrap();

        let sheet = explode_upload(&bytes, FileKind::Spreadsheet, "States").unwrap();

        assert_eq!(sheet.sheet_name, "Roster");
        assert_eq!(sheet.table.row_count(), 2);
        assert_eq!(sheet.skipped_sheets, vec!["Notes".to_string()]);
    }
}
