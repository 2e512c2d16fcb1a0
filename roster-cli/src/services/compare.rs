//! Compare operation: reconcile an upload against the stored master file

use crate::error::{Result, RosterError};
use crate::reconcile::{ComparisonResult, reconcile};
use crate::storage::BlobStore;
use crate::table::{FileKind, Table, read_dataset};

/// Download the master file and return its first sheet.
///
/// Any failure (missing blob, transport error, unreadable workbook) is a
/// `MasterUnavailable` error.
pub async fn fetch_master(store: &dyn BlobStore) -> Result<Table> {
    log::info!("Downloading master file '{}'", store.blob_name());

    let bytes = store
        .get()
        .await
        .map_err(|e| RosterError::MasterUnavailable(e.to_string()))?;
    if bytes.is_empty() {
        return Err(RosterError::MasterUnavailable(format!(
            "blob '{}' is empty",
            store.blob_name()
        )));
    }

    let dataset = read_dataset(&bytes, FileKind::Spreadsheet)
        .map_err(|e| RosterError::MasterUnavailable(format!("stored file is unreadable: {}", e)))?;

    let sheet = dataset.into_iter().next().ok_or_else(|| {
        RosterError::MasterUnavailable(format!("blob '{}' has no sheets", store.blob_name()))
    })?;

    log::info!(
        "Master sheet '{}' has {} rows",
        sheet.name,
        sheet.table.row_count()
    );
    Ok(sheet.table)
}

/// Reconcile every sheet of the upload against the master file
pub async fn compare_file(
    store: &dyn BlobStore,
    bytes: &[u8],
    kind: FileKind,
) -> Result<ComparisonResult> {
    let uploaded = read_dataset(bytes, kind)?;
    if uploaded.is_empty() {
        return Err(RosterError::decode(kind, "input contains no sheets"));
    }
    log::info!(
        "Read {} sheet(s) from upload: {}",
        uploaded.len(),
        uploaded.sheet_names().collect::<Vec<_>>().join(", ")
    );
    for sheet in uploaded.iter() {
        log::debug!(
            "Sheet '{}' columns: {}",
            sheet.name,
            sheet.table.column_names().collect::<Vec<_>>().join(", ")
        );
        if sheet.table.is_empty() {
            log::warn!("Uploaded sheet '{}' has no data rows", sheet.name);
        }
    }

    let master = fetch_master(store).await?;
    let result = reconcile(&uploaded, &master)?;

    for summary in &result.agencies {
        log::debug!(
            "[{}] {}: {} uploaded, {} master, {} unmatched in master, {} unmatched in upload",
            summary.sheet,
            summary.agency,
            summary.uploaded_rows,
            summary.master_rows,
            summary.unmatched_in_master,
            summary.unmatched_in_uploaded
        );
    }

    log::info!(
        "Comparison completed across {} agencies: {} unmatched in master, {} unmatched in upload",
        result.agencies.len(),
        result.unmatched_in_master.len(),
        result.unmatched_in_uploaded.len()
    );

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile::ComparisonField;
    use crate::services::structure_file;
    use crate::storage::memory::MemoryBlobStore;

    const MASTER_CSV: &[u8] = b"UplineAgency,Agent,AgentNPN,LineOfBusiness,Carrier,States\n\
Acme,Bob,111,Health,Aetna,\"CA,NY\"\n\
Acme,Carol,222.0,Health,Aetna,TX\n\
Other,Dan,333,Life,MetLife,WA\n";

    async fn store_with_master() -> MemoryBlobStore {
        let store = MemoryBlobStore::new();
        structure_file(&store, MASTER_CSV, FileKind::Csv, "States")
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn test_compare_against_structured_master() {
        let store = store_with_master().await;
        let upload = b"AgencyName,AgentName,NPN,LOBName,CarrierName,State\n\
Acme,Bob,111,Health,Aetna,CA\n\
Acme,Carol,222,Health,Aetna,TX\n\
Acme,Eve,555,Health,Aetna,CA\n";

        let result = compare_file(&store, upload, FileKind::Csv).await.unwrap();

        // Bob/NY is in master only; "Other" is never compared
        assert_eq!(result.unmatched_in_master.len(), 1);
        let missing = &result.unmatched_in_master[0];
        assert_eq!(missing.get(ComparisonField::Agent), Some("Bob"));
        assert_eq!(missing.get(ComparisonField::States), Some("NY"));

        assert_eq!(result.unmatched_in_uploaded.len(), 1);
        assert_eq!(
            result.unmatched_in_uploaded[0].get(ComparisonField::Agent),
            Some("Eve")
        );
    }

    #[tokio::test]
    async fn test_upload_sheet_without_rows_is_clean() {
        let store = store_with_master().await;
        let upload = b"AgencyName,AgentName,NPN\n";

        let result = compare_file(&store, upload, FileKind::Csv).await.unwrap();

        assert!(result.is_clean());
        assert!(result.agencies.is_empty());
    }

    #[tokio::test]
    async fn test_missing_master_is_an_error() {
        let store = MemoryBlobStore::new();
        let upload = b"UplineAgency\nAcme\n";

        let err = compare_file(&store, upload, FileKind::Csv)
            .await
            .unwrap_err();
        match err {
            RosterError::MasterUnavailable(reason) => assert!(reason.contains("not found")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_failed_fetch_is_an_error() {
        let store = MemoryBlobStore::failing_reads();
        let upload = b"UplineAgency\nAcme\n";

        let err = compare_file(&store, upload, FileKind::Csv)
            .await
            .unwrap_err();
        assert!(matches!(err, RosterError::MasterUnavailable(_)));
    }

    #[tokio::test]
    async fn test_unreadable_master_is_an_error() {
        let store = MemoryBlobStore::with_blob(b"not a workbook".to_vec());

        let err = fetch_master(&store).await.unwrap_err();
        assert!(matches!(err, RosterError::MasterUnavailable(_)));
    }

    #[tokio::test]
    async fn test_bad_upload_fails_before_fetch() {
        let store = MemoryBlobStore::failing_reads();
        let upload = b"A,B\n1,2,3\n";

        let err = compare_file(&store, upload, FileKind::Csv)
            .await
            .unwrap_err();
        assert!(matches!(err, RosterError::Decode { .. }));
    }
}
