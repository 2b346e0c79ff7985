use log::info;

use crate::aggregate::aggregate_payments;
use crate::config::FieldProfile;
use crate::index::{build_index, filter_active};
use crate::model::{AnalysisResult, ReconInput, RunStats};
use crate::report::{assemble, build_reconciled, build_unmatched};

/// Reconcile one BoB / commission-report pair.
///
/// Payments are matched against the *active* BoB rows only, so a policy that
/// is present in the BoB with any other status shows up as unmatched.
/// Pure: the same input always yields the same result.
pub fn run(profile: &FieldProfile, input: &ReconInput) -> AnalysisResult {
    let mut stats = RunStats {
        bob_rows: input.bob_rows.len(),
        ..RunStats::default()
    };

    let active = filter_active(&input.bob_rows, profile);
    stats.bob_active_rows = active.len();

    let index = build_index(active.iter().copied(), profile);
    stats.bob_rows_without_policy = index.rows_without_policy;
    stats.bob_duplicate_policies = index.duplicates;

    let ledger = aggregate_payments(&input.commission_rows, &index, profile, &mut stats);

    let records = build_reconciled(&active, &ledger, profile);
    let unmatched = build_unmatched(&ledger);

    info!(
        "reconciled {} active policies ({} paid), {} unmatched policy numbers from {} commission rows",
        records.len(),
        ledger.iter().filter(|(_, e)| e.is_matched()).count(),
        unmatched.len(),
        stats.commission_rows,
    );

    assemble(records, unmatched, stats)
}
