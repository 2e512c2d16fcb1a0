//! Two-way set difference between an upload and the master file, scoped per agency

use std::collections::{HashMap, HashSet};

use super::models::{
    AgencySummary, CanonicalRow, ComparisonField, ComparisonResult, UPLOAD_COLUMN_MAPPING,
};
use crate::error::{Result, RosterError};
use crate::table::{Dataset, Table};
use crate::transform::normalize_table;

/// Compare every sheet of an upload against the master table.
///
/// Agencies are taken from the upload only: master rows for agencies the
/// upload never mentions are not compared. Results are accumulated sheet by
/// sheet, then agency by agency in first-seen order.
pub fn reconcile(uploaded: &Dataset, master: &Table) -> Result<ComparisonResult> {
    let master = normalize_table(master);
    let agency_column = ComparisonField::UplineAgency.column_name();
    if !master.has_column(agency_column) {
        return Err(RosterError::missing_column(agency_column, "master file"));
    }

    let mut result = ComparisonResult::default();
    for sheet in uploaded.iter() {
        reconcile_sheet(&sheet.name, &sheet.table, &master, &mut result)?;
    }

    Ok(result)
}

/// Rename uploaded columns to their canonical names
pub fn canonicalize_columns(table: &Table) -> Table {
    table.rename_columns(&UPLOAD_COLUMN_MAPPING)
}

fn reconcile_sheet(
    sheet_name: &str,
    uploaded: &Table,
    master: &Table,
    result: &mut ComparisonResult,
) -> Result<()> {
    let uploaded = normalize_table(&canonicalize_columns(uploaded));

    let agency_column = ComparisonField::UplineAgency.column_name();
    if !uploaded.has_column(agency_column) {
        return Err(RosterError::missing_column(
            agency_column,
            format!("uploaded sheet '{}'", sheet_name),
        ));
    }

    let fields: Vec<ComparisonField> = ComparisonField::ALL
        .into_iter()
        .filter(|f| uploaded.has_column(f.column_name()) && master.has_column(f.column_name()))
        .collect();
    let names: Vec<&str> = fields.iter().map(|f| f.column_name()).collect();

    let uploaded_rows = canonical_rows(&uploaded.select(&names), &fields);
    let master_rows = canonical_rows(&master.select(&names), &fields);

    let mut master_by_agency: HashMap<&str, Vec<&CanonicalRow>> = HashMap::new();
    for row in &master_rows {
        master_by_agency.entry(row.agency()).or_default().push(row);
    }

    let mut uploaded_by_agency: HashMap<&str, Vec<&CanonicalRow>> = HashMap::new();
    let mut agencies: Vec<&str> = Vec::new();
    for row in &uploaded_rows {
        let agency = row.agency();
        if !uploaded_by_agency.contains_key(agency) {
            agencies.push(agency);
        }
        uploaded_by_agency.entry(agency).or_default().push(row);
    }

    for agency in agencies {
        let uploaded_subset = distinct(uploaded_by_agency.get(agency));
        let master_subset = distinct(master_by_agency.get(agency));

        let unmatched_master = difference(&master_subset, &uploaded_subset);
        let unmatched_uploaded = difference(&uploaded_subset, &master_subset);

        result.agencies.push(AgencySummary {
            sheet: sheet_name.to_string(),
            agency: agency.to_string(),
            uploaded_rows: uploaded_subset.len(),
            master_rows: master_subset.len(),
            unmatched_in_master: unmatched_master.len(),
            unmatched_in_uploaded: unmatched_uploaded.len(),
        });

        result.unmatched_in_master.extend(unmatched_master);
        result.unmatched_in_uploaded.extend(unmatched_uploaded);
    }

    Ok(())
}

/// Pair each row's cells with `fields`; the table must hold exactly those
/// columns in that order (see [`Table::select`])
fn canonical_rows(table: &Table, fields: &[ComparisonField]) -> Vec<CanonicalRow> {
    (0..table.row_count())
        .map(|row| {
            CanonicalRow::new(
                fields
                    .iter()
                    .copied()
                    .zip(table.row(row))
                    .map(|(field, value)| (field, value.to_string()))
                    .collect(),
            )
        })
        .collect()
}

/// Drop exact duplicates, keeping first occurrences in order
fn distinct<'a>(rows: Option<&Vec<&'a CanonicalRow>>) -> Vec<&'a CanonicalRow> {
    let mut seen = HashSet::new();
    rows.map(|rows| {
        rows.iter()
            .copied()
            .filter(|row| seen.insert(*row))
            .collect()
    })
    .unwrap_or_default()
}

/// Rows of `left` with no exact match in `right`
fn difference(left: &[&CanonicalRow], right: &[&CanonicalRow]) -> Vec<CanonicalRow> {
    let right: HashSet<&CanonicalRow> = right.iter().copied().collect();
    left.iter()
        .filter(|row| !right.contains(*row))
        .map(|row| (*row).clone())
        .collect()
}
