//! In-memory tabular model shared by every stage of the pipeline
//!
//! A [`Table`] is column-major: each column owns a vector of string cells and
//! all columns have the same length. A [`Dataset`] maps sheet names to tables
//! in workbook order.

mod reader;
mod writer;

pub use reader::read_dataset;
pub use writer::write_sheet;
pub(crate) use writer::write_table;

use std::collections::HashSet;
use std::path::Path;

/// Declared kind of an input file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Csv,
    Spreadsheet,
}

impl FileKind {
    /// Guess the kind from a file extension; anything that is not a workbook is CSV
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "xlsx" | "xlsm" | "xls" | "ods" => FileKind::Spreadsheet,
            _ => FileKind::Csv,
        }
    }
}

impl std::fmt::Display for FileKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileKind::Csv => write!(f, "csv"),
            FileKind::Spreadsheet => write!(f, "spreadsheet"),
        }
    }
}

/// A named column of string cells
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub values: Vec<String>,
}

/// Ordered set of uniquely named, equal-length columns
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Table {
    columns: Vec<Column>,
    row_count: usize,
}

impl Table {
    /// Build a table from a header row and data rows.
    ///
    /// Empty headers become `Unnamed: <index>` and repeated headers get a
    /// `.1`, `.2`, ... suffix. Short rows are padded with empty cells; cells
    /// beyond the header width are dropped.
    pub fn from_rows<H, R, C>(headers: H, rows: R) -> Self
    where
        H: IntoIterator,
        H::Item: Into<String>,
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        let names = unique_headers(headers.into_iter().map(Into::into).collect());
        let mut columns: Vec<Column> = names
            .into_iter()
            .map(|name| Column {
                name,
                values: Vec::new(),
            })
            .collect();

        let mut row_count = 0;
        for row in rows {
            let mut cells = row.into_iter().map(Into::into);
            for column in columns.iter_mut() {
                column.values.push(cells.next().unwrap_or_default());
            }
            row_count += 1;
        }

        Self { columns, row_count }
    }

    /// Build a table from columns that already satisfy the table invariants.
    /// Returns `None` when lengths differ or names repeat.
    pub fn from_columns(columns: Vec<Column>) -> Option<Self> {
        let row_count = columns.first().map(|c| c.values.len()).unwrap_or(0);
        if columns.iter().any(|c| c.values.len() != row_count) {
            return None;
        }

        let mut seen = HashSet::new();
        if !columns.iter().all(|c| seen.insert(c.name.as_str())) {
            return None;
        }

        Some(Self { columns, row_count })
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Cell at `(row, column name)`, if both exist
    #[cfg(test)]
    pub fn cell(&self, row: usize, name: &str) -> Option<&str> {
        self.column(name)
            .and_then(|c| c.values.get(row))
            .map(|s| s.as_str())
    }

    /// Cells of a single row in column order
    pub fn row(&self, row: usize) -> Vec<&str> {
        self.columns
            .iter()
            .filter_map(|c| c.values.get(row).map(|s| s.as_str()))
            .collect()
    }

    /// Return a copy with columns renamed through `mapping` (`from -> to`).
    ///
    /// Names not in the mapping are kept. If a rename produces a name that an
    /// earlier column already holds, the earlier column wins and the later
    /// one is dropped.
    pub fn rename_columns(&self, mapping: &[(&str, &str)]) -> Table {
        let mut seen = HashSet::new();
        let columns = self
            .columns
            .iter()
            .filter_map(|column| {
                let name = mapping
                    .iter()
                    .find(|(from, _)| *from == column.name)
                    .map(|(_, to)| to.to_string())
                    .unwrap_or_else(|| column.name.clone());

                if !seen.insert(name.clone()) {
                    return None;
                }

                Some(Column {
                    name,
                    values: column.values.clone(),
                })
            })
            .collect();

        Table {
            columns,
            row_count: self.row_count,
        }
    }

    /// Return a copy holding only the named columns, in the order given.
    /// Names that are not present are skipped.
    pub fn select(&self, names: &[&str]) -> Table {
        let columns = names
            .iter()
            .filter_map(|name| self.column(name).cloned())
            .collect();

        Table {
            columns,
            row_count: self.row_count,
        }
    }

    /// Return a copy with every cell passed through `f(column_name, cell)`
    pub fn map_cells<F>(&self, mut f: F) -> Table
    where
        F: FnMut(&str, &str) -> String,
    {
        let columns = self
            .columns
            .iter()
            .map(|column| Column {
                name: column.name.clone(),
                values: column
                    .values
                    .iter()
                    .map(|value| f(&column.name, value))
                    .collect(),
            })
            .collect();

        Table {
            columns,
            row_count: self.row_count,
        }
    }
}

/// Enforce unique, non-empty column names the way dataframe readers do
fn unique_headers(raw: Vec<String>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut names = Vec::with_capacity(raw.len());

    for (idx, header) in raw.into_iter().enumerate() {
        let base = if header.trim().is_empty() {
            format!("Unnamed: {}", idx)
        } else {
            header
        };

        let mut name = base.clone();
        let mut suffix = 1;
        while seen.contains(&name) {
            name = format!("{}.{}", base, suffix);
            suffix += 1;
        }

        seen.insert(name.clone());
        names.push(name);
    }

    names
}

/// A named table within a dataset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sheet {
    pub name: String,
    pub table: Table,
}

/// Sheet name -> table, in workbook order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Dataset {
    sheets: Vec<Sheet>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dataset holding exactly one sheet
    pub fn single(name: impl Into<String>, table: Table) -> Self {
        let mut dataset = Self::new();
        dataset.insert(name, table);
        dataset
    }

    /// Add a sheet; a sheet with the same name is replaced in place
    pub fn insert(&mut self, name: impl Into<String>, table: Table) {
        let name = name.into();
        match self.sheets.iter_mut().find(|s| s.name == name) {
            Some(existing) => existing.table = table,
            None => self.sheets.push(Sheet { name, table }),
        }
    }

    #[cfg(test)]
    pub fn get(&self, name: &str) -> Option<&Table> {
        self.sheets
            .iter()
            .find(|s| s.name == name)
            .map(|s| &s.table)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sheet> {
        self.sheets.iter()
    }

    pub fn sheet_names(&self) -> impl Iterator<Item = &str> {
        self.sheets.iter().map(|s| s.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }
}

impl IntoIterator for Dataset {
    type Item = Sheet;
    type IntoIter = std::vec::IntoIter<Sheet>;

    fn into_iter(self) -> Self::IntoIter {
        self.sheets.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::from_rows(
            ["Agent", "NPN", "State"],
            vec![vec!["Alice", "1", "CA"], vec!["Bob", "2", "NY"]],
        )
    }

    #[test]
    fn test_from_rows_pads_and_truncates() {
        let table = Table::from_rows(["A", "B"], vec![vec!["1"], vec!["2", "3", "4"]]);

        assert_eq!(table.row_count(), 2);
        assert_eq!(table.row(0), vec!["1", ""]);
        assert_eq!(table.row(1), vec!["2", "3"]);
    }

    #[test]
    fn test_headers_made_unique() {
        let table = Table::from_rows(["Name", "", "Name", "Name"], Vec::<Vec<String>>::new());
        let names: Vec<&str> = table.column_names().collect();
        assert_eq!(names, vec!["Name", "Unnamed: 1", "Name.1", "Name.2"]);
    }

    #[test]
    fn test_from_columns_rejects_ragged() {
        let ragged = vec![
            Column {
                name: "A".into(),
                values: vec!["1".into()],
            },
            Column {
                name: "B".into(),
                values: vec![],
            },
        ];
        assert!(Table::from_columns(ragged).is_none());

        let duplicate = vec![
            Column {
                name: "A".into(),
                values: vec![],
            },
            Column {
                name: "A".into(),
                values: vec![],
            },
        ];
        assert!(Table::from_columns(duplicate).is_none());
    }

    #[test]
    fn test_rename_first_occurrence_wins() {
        let table = Table::from_rows(["State", "States"], vec![vec!["CA", "NY"]]);
        let renamed = table.rename_columns(&[("State", "States")]);

        assert_eq!(renamed.column_count(), 1);
        assert_eq!(renamed.cell(0, "States"), Some("CA"));
    }

    #[test]
    fn test_rename_leaves_unmapped_columns() {
        let renamed = sample().rename_columns(&[("NPN", "AgentNPN"), ("Missing", "X")]);
        let names: Vec<&str> = renamed.column_names().collect();
        assert_eq!(names, vec!["Agent", "AgentNPN", "State"]);
        assert_eq!(renamed.row_count(), 2);
    }

    #[test]
    fn test_select_skips_absent() {
        let selected = sample().select(&["State", "Carrier", "Agent"]);
        let names: Vec<&str> = selected.column_names().collect();
        assert_eq!(names, vec!["State", "Agent"]);
        assert_eq!(selected.row(1), vec!["NY", "Bob"]);
    }

    #[test]
    fn test_dataset_insert_replaces_in_place() {
        let mut dataset = Dataset::new();
        dataset.insert("First", Table::default());
        dataset.insert("Second", Table::default());
        dataset.insert("First", sample());

        let names: Vec<&str> = dataset.sheet_names().collect();
        assert_eq!(names, vec!["First", "Second"]);
        assert_eq!(dataset.get("First").map(|t| t.row_count()), Some(2));
    }

    #[test]
    fn test_file_kind_from_path() {
        assert_eq!(
            FileKind::from_path(Path::new("roster.XLSX")),
            FileKind::Spreadsheet
        );
        assert_eq!(FileKind::from_path(Path::new("roster.csv")), FileKind::Csv);
        assert_eq!(FileKind::from_path(Path::new("roster")), FileKind::Csv);
    }
}
