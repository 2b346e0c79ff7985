use std::collections::HashMap;

use log::{debug, warn};

use crate::config::FieldProfile;
use crate::fields;
use crate::model::Row;

/// Normalized policy number -> BoB row. At most one row per policy number;
/// a later row with the same number replaces the earlier one.
#[derive(Debug, Default)]
pub struct PolicyIndex<'a> {
    by_policy: HashMap<String, &'a Row>,
    /// Rows skipped because they had no policy number.
    pub rows_without_policy: usize,
    /// Rows that replaced an earlier row with the same policy number.
    pub duplicates: usize,
}

impl<'a> PolicyIndex<'a> {
    pub fn contains(&self, policy_number: &str) -> bool {
        self.by_policy.contains_key(policy_number)
    }

    pub fn get(&self, policy_number: &str) -> Option<&'a Row> {
        self.by_policy.get(policy_number).copied()
    }

    pub fn len(&self) -> usize {
        self.by_policy.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_policy.is_empty()
    }
}

/// Index rows by policy number. Rows without one are skipped.
pub fn build_index<'a, R>(rows: R, profile: &FieldProfile) -> PolicyIndex<'a>
where
    R: IntoIterator<Item = &'a Row>,
{
    let mut index = PolicyIndex::default();
    for row in rows {
        let Some(policy) = fields::policy_number(row, profile) else {
            index.rows_without_policy += 1;
            continue;
        };
        if index.by_policy.insert(policy.clone(), row).is_some() {
            warn!("duplicate policy number '{policy}' in book of business; keeping the last row");
            index.duplicates += 1;
        }
    }
    debug!(
        "policy index: {} policies, {} rows without policy number",
        index.len(),
        index.rows_without_policy
    );
    index
}

/// Rows whose lower-cased status is exactly the profile's active status.
pub fn filter_active<'a>(rows: &'a [Row], profile: &FieldProfile) -> Vec<&'a Row> {
    rows.iter()
        .filter(|row| fields::status(row, profile).as_deref() == Some(profile.active_status.as_str()))
        .collect()
}
