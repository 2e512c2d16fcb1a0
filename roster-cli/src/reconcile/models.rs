use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};

/// Fields used for row equality when reconciling against the master file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ComparisonField {
    UplineAgency,
    Agent,
    AgentNpn,
    LineOfBusiness,
    Carrier,
    States,
}

impl ComparisonField {
    /// All fields in canonical order
    pub const ALL: [ComparisonField; 6] = [
        ComparisonField::UplineAgency,
        ComparisonField::Agent,
        ComparisonField::AgentNpn,
        ComparisonField::LineOfBusiness,
        ComparisonField::Carrier,
        ComparisonField::States,
    ];

    /// Column name in canonical tables
    pub fn column_name(&self) -> &'static str {
        match self {
            ComparisonField::UplineAgency => "UplineAgency",
            ComparisonField::Agent => "Agent",
            ComparisonField::AgentNpn => "AgentNPN",
            ComparisonField::LineOfBusiness => "LineOfBusiness",
            ComparisonField::Carrier => "Carrier",
            ComparisonField::States => "States",
        }
    }
}

impl std::fmt::Display for ComparisonField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.column_name())
    }
}

/// Uploaded column name -> canonical column name
pub const UPLOAD_COLUMN_MAPPING: [(&str, &str); 6] = [
    ("AgentName", "Agent"),
    ("NPN", "AgentNPN"),
    ("AgencyName", "UplineAgency"),
    ("CarrierName", "Carrier"),
    ("LOBName", "LineOfBusiness"),
    ("State", "States"),
];

/// A row restricted to the comparison fields present on both sides
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalRow {
    values: Vec<(ComparisonField, String)>,
}

impl CanonicalRow {
    pub fn new(values: Vec<(ComparisonField, String)>) -> Self {
        Self { values }
    }

    pub fn get(&self, field: ComparisonField) -> Option<&str> {
        self.values
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, v)| v.as_str())
    }

    pub fn fields(&self) -> impl Iterator<Item = ComparisonField> + '_ {
        self.values.iter().map(|(f, _)| *f)
    }

    pub fn values(&self) -> impl Iterator<Item = (ComparisonField, &str)> {
        self.values.iter().map(|(f, v)| (*f, v.as_str()))
    }

    pub(crate) fn agency(&self) -> &str {
        self.get(ComparisonField::UplineAgency).unwrap_or_default()
    }
}

// Serialized as {"UplineAgency": "...", "Agent": "...", ...} in canonical order
impl Serialize for CanonicalRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (field, value) in self.values() {
            map.serialize_entry(field.column_name(), value)?;
        }
        map.end()
    }
}

/// Counts for one agency partition of one uploaded sheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgencySummary {
    pub sheet: String,
    pub agency: String,
    /// Distinct uploaded rows for this agency
    pub uploaded_rows: usize,
    /// Distinct master rows for this agency
    pub master_rows: usize,
    pub unmatched_in_master: usize,
    pub unmatched_in_uploaded: usize,
}

/// Rows present on one side only, accumulated over sheets and agencies
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ComparisonResult {
    /// Master rows with no exact match in the upload
    #[serde(rename = "unmatched_master")]
    pub unmatched_in_master: Vec<CanonicalRow>,
    /// Uploaded rows with no exact match in the master
    #[serde(rename = "unmatched_uploaded")]
    pub unmatched_in_uploaded: Vec<CanonicalRow>,
    #[serde(skip)]
    pub agencies: Vec<AgencySummary>,
}

impl ComparisonResult {
    pub fn is_clean(&self) -> bool {
        self.unmatched_in_master.is_empty() && self.unmatched_in_uploaded.is_empty()
    }

    /// Comparison fields seen in any unmatched row, in canonical order
    pub fn fields(&self) -> Vec<ComparisonField> {
        ComparisonField::ALL
            .into_iter()
            .filter(|field| {
                self.unmatched_in_master
                    .iter()
                    .chain(self.unmatched_in_uploaded.iter())
                    .any(|row| row.fields().any(|f| f == *field))
            })
            .collect()
    }
}
