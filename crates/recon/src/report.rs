use crate::aggregate::PaymentLedger;
use crate::config::FieldProfile;
use crate::fields;
use crate::model::{AnalysisResult, BucketEntry, PaymentBucket, ReconciledRecord, Row, RunStats, UnmatchedRecord};

/// One record per active BoB row, in BoB order, whether or not it was paid.
pub fn build_reconciled(active: &[&Row], ledger: &PaymentLedger, profile: &FieldProfile) -> Vec<ReconciledRecord> {
    let empty = PaymentBucket::default();
    active
        .iter()
        .map(|row| {
            let policy_number =
                fields::policy_number(row, profile).unwrap_or_else(|| profile.fallback_text.clone());
            let payments = ledger.matched(&policy_number).unwrap_or(&empty);
            let commission_total = payments.commission_total();
            let override_total = payments.override_total();
            ReconciledRecord {
                policy_number,
                original_bob: (*row).clone(),
                commission_payments: payments.commissions.clone(),
                override_payments: payments.overrides.clone(),
                commission_total,
                override_total,
                net_total: commission_total + override_total,
            }
        })
        .collect()
}

/// One record per unmatched policy number, in first-encounter order.
pub fn build_unmatched(ledger: &PaymentLedger) -> Vec<UnmatchedRecord> {
    ledger
        .unmatched()
        .filter_map(|(policy_number, entry)| match entry {
            BucketEntry::Unmatched { payments, insured_name, company_name } => {
                let commission_total = payments.commission_total();
                let override_total = payments.override_total();
                Some(UnmatchedRecord {
                    policy_number: policy_number.to_string(),
                    insured_name: insured_name.clone(),
                    company: company_name.clone(),
                    commission_payments: payments.commissions.clone(),
                    override_payments: payments.overrides.clone(),
                    commission_total,
                    override_total,
                    net_total: commission_total + override_total,
                })
            }
            BucketEntry::Matched(_) => None,
        })
        .collect()
}

/// Assemble the final result and its grand totals.
pub fn assemble(records: Vec<ReconciledRecord>, unmatched_records: Vec<UnmatchedRecord>, stats: RunStats) -> AnalysisResult {
    let grand_total_commission = records.iter().map(|r| r.commission_total).sum();
    let grand_total_override = records.iter().map(|r| r.override_total).sum();
    let grand_total_net = records.iter().map(|r| r.net_total).sum();
    let unmatched_total_net = unmatched_records.iter().map(|r| r.net_total).sum();

    AnalysisResult {
        active_policies_count: records.len(),
        records,
        unmatched_records,
        grand_total_commission,
        grand_total_override,
        grand_total_net,
        unmatched_total_net,
        stats,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate_payments;
    use crate::index::build_index;
    use crate::model::CellValue;

    #[test]
    fn active_row_without_policy_gets_fallback() {
        let profile = FieldProfile::default();
        let bob = vec![Row::from_pairs([("Status", "Active"), ("Plan", "Gold")])];
        let active: Vec<&Row> = bob.iter().collect();
        let index = build_index(active.iter().copied(), &profile);
        let ledger = aggregate_payments(&[], &index, &profile, &mut RunStats::default());

        let records = build_reconciled(&active, &ledger, &profile);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].policy_number, "N/A");
        assert_eq!(records[0].net_total, 0.0);
        assert_eq!(records[0].original_bob.get("Plan"), Some(&CellValue::from("Gold")));
    }

    #[test]
    fn grand_totals_sum_records() {
        let profile = FieldProfile::default();
        let bob = vec![
            Row::from_pairs([("Policy Number", "A"), ("Status", "Active")]),
            Row::from_pairs([("Policy Number", "B"), ("Status", "Active")]),
        ];
        let active: Vec<&Row> = bob.iter().collect();
        let index = build_index(active.iter().copied(), &profile);
        let comm = vec![
            Row::from_pairs([("Policy Number", CellValue::from("A")), ("Payment Type", CellValue::from("Commission")), ("Net", CellValue::from(10.0))]),
            Row::from_pairs([("Policy Number", CellValue::from("B")), ("Payment Type", CellValue::from("Override")), ("Net", CellValue::from(4.0))]),
            Row::from_pairs([("Policy Number", CellValue::from("C")), ("Payment Type", CellValue::from("Commission")), ("Net", CellValue::from(7.0))]),
        ];
        let mut stats = RunStats::default();
        let ledger = aggregate_payments(&comm, &index, &profile, &mut stats);
        let result = assemble(build_reconciled(&active, &ledger, &profile), build_unmatched(&ledger), stats);

        assert_eq!(result.grand_total_commission, 10.0);
        assert_eq!(result.grand_total_override, 4.0);
        assert_eq!(result.grand_total_net, 14.0);
        assert_eq!(result.unmatched_total_net, 7.0);
        assert_eq!(result.total_in_files(), 21.0);
        assert_eq!(result.active_policies_count, 2);
        assert_eq!(result.unmatched_records[0].insured_name, "N/A");
    }
}
