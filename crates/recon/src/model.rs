use std::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// A scalar cell value as read from a sheet. Absent cells are simply not
/// present in the [`Row`].
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Bool(bool),
}

impl CellValue {
    /// Text form of the value, the way a spreadsheet user would read it.
    /// Integral numbers print without a fractional part.
    pub fn to_text(&self) -> String {
        self.to_string()
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Text(s) if s.is_empty())
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => write!(f, "{s}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

/// One data row of a sheet: raw column name -> value, in sheet column order.
///
/// Column names are kept exactly as they appeared in the header row; lookups
/// by canonical field go through [`crate::fields::resolve`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    cells: Vec<(String, CellValue)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<CellValue>,
    {
        let mut row = Self::new();
        for (k, v) in pairs {
            row.insert(k, v);
        }
        row
    }

    /// Insert a cell. A column with the exact same name is overwritten in place.
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<CellValue>) {
        let column = column.into();
        let value = value.into();
        match self.cells.iter_mut().find(|(c, _)| *c == column) {
            Some(slot) => slot.1 = value,
            None => self.cells.push((column, value)),
        }
    }

    /// Exact (raw) column lookup.
    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.cells.iter().find(|(c, _)| c == column).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.cells.iter().map(|(c, v)| (c.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (column, value) in &self.cells {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

/// Pre-loaded rows for one invocation.
#[derive(Debug, Clone, Default)]
pub struct ReconInput {
    /// Book-of-business rows (first sheet only).
    pub bob_rows: Vec<Row>,
    /// Commission report rows, all sheets concatenated in sheet order.
    pub commission_rows: Vec<Row>,
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentCategory {
    Commission,
    Override,
}

impl fmt::Display for PaymentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Commission => write!(f, "commission"),
            Self::Override => write!(f, "override"),
        }
    }
}

/// Payment amounts collected for one policy number, in encounter order.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct PaymentBucket {
    pub commissions: Vec<f64>,
    pub overrides: Vec<f64>,
}

impl PaymentBucket {
    pub fn push(&mut self, category: PaymentCategory, amount: f64) {
        match category {
            PaymentCategory::Commission => self.commissions.push(amount),
            PaymentCategory::Override => self.overrides.push(amount),
        }
    }

    pub fn commission_total(&self) -> f64 {
        self.commissions.iter().sum()
    }

    pub fn override_total(&self) -> f64 {
        self.overrides.iter().sum()
    }

    pub fn net_total(&self) -> f64 {
        self.commission_total() + self.override_total()
    }
}

/// Aggregation entry for one policy number. The variant is fixed by whether
/// the policy is in the active index when the entry is first created.
#[derive(Debug, Clone, PartialEq)]
pub enum BucketEntry {
    Matched(PaymentBucket),
    Unmatched {
        payments: PaymentBucket,
        insured_name: String,
        company_name: String,
    },
}

impl BucketEntry {
    pub fn payments(&self) -> &PaymentBucket {
        match self {
            Self::Matched(payments) | Self::Unmatched { payments, .. } => payments,
        }
    }

    pub fn payments_mut(&mut self) -> &mut PaymentBucket {
        match self {
            Self::Matched(payments) | Self::Unmatched { payments, .. } => payments,
        }
    }

    pub fn is_matched(&self) -> bool {
        matches!(self, Self::Matched(_))
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// One active book-of-business policy, with whatever payments matched it.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ReconciledRecord {
    pub policy_number: String,
    pub original_bob: Row,
    pub commission_payments: Vec<f64>,
    pub override_payments: Vec<f64>,
    pub commission_total: f64,
    pub override_total: f64,
    pub net_total: f64,
}

/// A policy number that received payments but has no active BoB entry.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct UnmatchedRecord {
    pub policy_number: String,
    pub insured_name: String,
    pub company: String,
    pub commission_payments: Vec<f64>,
    pub override_payments: Vec<f64>,
    pub commission_total: f64,
    pub override_total: f64,
    pub net_total: f64,
}

/// Row-level counters collected during one run. Informational only.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct RunStats {
    pub bob_rows: usize,
    pub bob_active_rows: usize,
    pub bob_rows_without_policy: usize,
    pub bob_duplicate_policies: usize,
    pub commission_rows: usize,
    pub skipped_no_policy: usize,
    pub skipped_by_status: usize,
    pub unrecognized_payment_type: usize,
    pub matched_rows: usize,
    pub unmatched_rows: usize,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct AnalysisResult {
    pub records: Vec<ReconciledRecord>,
    pub unmatched_records: Vec<UnmatchedRecord>,
    pub grand_total_commission: f64,
    pub grand_total_override: f64,
    pub grand_total_net: f64,
    pub unmatched_total_net: f64,
    pub active_policies_count: usize,
    pub stats: RunStats,
}

impl AnalysisResult {
    /// Everything paid out across both files: reconciled net plus unmatched net.
    pub fn total_in_files(&self) -> f64 {
        self.grand_total_net + self.unmatched_total_net
    }
}
