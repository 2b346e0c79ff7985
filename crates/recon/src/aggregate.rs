use std::collections::HashMap;

use log::debug;

use crate::classify::{classify_row, RowClass};
use crate::config::FieldProfile;
use crate::fields;
use crate::index::PolicyIndex;
use crate::model::{BucketEntry, PaymentBucket, Row, RunStats};

/// Payment buckets keyed by policy number, kept in first-encounter order.
#[derive(Debug, Default)]
pub struct PaymentLedger {
    entries: Vec<(String, BucketEntry)>,
    positions: HashMap<String, usize>,
}

impl PaymentLedger {
    /// Get the entry for `policy_number`, creating it with `make` on first use.
    fn entry_or_insert_with(&mut self, policy_number: &str, make: impl FnOnce() -> BucketEntry) -> &mut BucketEntry {
        let idx = match self.positions.get(policy_number) {
            Some(&idx) => idx,
            None => {
                self.entries.push((policy_number.to_string(), make()));
                let idx = self.entries.len() - 1;
                self.positions.insert(policy_number.to_string(), idx);
                idx
            }
        };
        &mut self.entries[idx].1
    }

    pub fn get(&self, policy_number: &str) -> Option<&BucketEntry> {
        self.positions.get(policy_number).map(|&idx| &self.entries[idx].1)
    }

    /// Payments matched to an active policy, if any.
    pub fn matched(&self, policy_number: &str) -> Option<&PaymentBucket> {
        match self.get(policy_number)? {
            BucketEntry::Matched(bucket) => Some(bucket),
            BucketEntry::Unmatched { .. } => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BucketEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn unmatched(&self) -> impl Iterator<Item = (&str, &BucketEntry)> {
        self.iter().filter(|(_, e)| !e.is_matched())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Classify every commission row in order and bucket its amount.
///
/// Policies present in `index` go to matched buckets. Everything else goes to
/// unmatched buckets, which take their insured name and company from the
/// first row seen for that policy.
pub fn aggregate_payments(
    rows: &[Row],
    index: &PolicyIndex<'_>,
    profile: &FieldProfile,
    stats: &mut RunStats,
) -> PaymentLedger {
    let mut ledger = PaymentLedger::default();

    for row in rows {
        stats.commission_rows += 1;

        let (policy_number, category, payment_type, amount) = match classify_row(row, profile) {
            RowClass::NoPolicy => {
                stats.skipped_no_policy += 1;
                continue;
            }
            RowClass::Skipped { policy_number, status } => {
                debug!("skipping payment for '{policy_number}': status '{status}'");
                stats.skipped_by_status += 1;
                continue;
            }
            RowClass::Payment { policy_number, category, payment_type, amount } => {
                (policy_number, category, payment_type, amount)
            }
        };

        let entry = if index.contains(&policy_number) {
            stats.matched_rows += 1;
            ledger.entry_or_insert_with(&policy_number, || BucketEntry::Matched(PaymentBucket::default()))
        } else {
            stats.unmatched_rows += 1;
            ledger.entry_or_insert_with(&policy_number, || BucketEntry::Unmatched {
                payments: PaymentBucket::default(),
                insured_name: fields::insured_name(row, profile),
                company_name: fields::company_name(row, profile),
            })
        };

        match category {
            Some(category) => entry.payments_mut().push(category, amount),
            None => {
                debug!("dropping '{payment_type}' payment of {amount} for '{policy_number}'");
                stats.unrecognized_payment_type += 1;
            }
        }
    }

    ledger
}
