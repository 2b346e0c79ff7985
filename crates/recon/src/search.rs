//! Free-text filtering of result records and subtotals over the filtered view.

use serde::Serialize;

use crate::model::{ReconciledRecord, UnmatchedRecord};

/// Reconciled records whose policy number or any BoB cell contains `term`
/// (case-insensitive). A blank term keeps everything.
pub fn filter_reconciled<'r>(records: &'r [ReconciledRecord], term: &str) -> Vec<&'r ReconciledRecord> {
    let needle = term.to_lowercase();
    if needle.is_empty() {
        return records.iter().collect();
    }
    records
        .iter()
        .filter(|r| {
            r.policy_number.to_lowercase().contains(&needle)
                || r.original_bob.iter().any(|(_, v)| v.to_text().to_lowercase().contains(&needle))
        })
        .collect()
}

/// Unmatched records whose policy number, insured name or company contains `term`.
pub fn filter_unmatched<'r>(records: &'r [UnmatchedRecord], term: &str) -> Vec<&'r UnmatchedRecord> {
    let needle = term.to_lowercase();
    if needle.is_empty() {
        return records.iter().collect();
    }
    records
        .iter()
        .filter(|r| {
            r.policy_number.to_lowercase().contains(&needle)
                || r.insured_name.to_lowercase().contains(&needle)
                || r.company.to_lowercase().contains(&needle)
        })
        .collect()
}

/// Anything with the three per-record totals.
pub trait RecordTotals {
    fn commission_total(&self) -> f64;
    fn override_total(&self) -> f64;
    fn net_total(&self) -> f64;
}

impl RecordTotals for ReconciledRecord {
    fn commission_total(&self) -> f64 {
        self.commission_total
    }
    fn override_total(&self) -> f64 {
        self.override_total
    }
    fn net_total(&self) -> f64 {
        self.net_total
    }
}

impl RecordTotals for UnmatchedRecord {
    fn commission_total(&self) -> f64 {
        self.commission_total
    }
    fn override_total(&self) -> f64 {
        self.override_total
    }
    fn net_total(&self) -> f64 {
        self.net_total
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Subtotals {
    pub records: usize,
    pub commissions: f64,
    pub overrides: f64,
    pub net: f64,
}

impl Subtotals {
    pub fn of<R: RecordTotals>(records: &[&R]) -> Self {
        Self {
            records: records.len(),
            commissions: records.iter().map(|r| r.commission_total()).sum(),
            overrides: records.iter().map(|r| r.override_total()).sum(),
            net: records.iter().map(|r| r.net_total()).sum(),
        }
    }
}
