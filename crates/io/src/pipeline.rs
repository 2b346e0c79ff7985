// One-shot invocation: two files in, one AnalysisResult out

use std::path::Path;

use log::info;
use polaudit_recon::{run, AnalysisResult, FieldProfile, ReconInput};

use crate::error::IoError;
use crate::reader::{read_bytes, read_file, SheetScope};

/// Read both files and reconcile them. Either both decode and a full result
/// comes back, or the first failure is returned.
pub fn process_files(bob: &Path, commissions: &Path, profile: &FieldProfile) -> Result<AnalysisResult, IoError> {
    let bob_bytes = read_file(bob)?;
    let commission_bytes = read_file(commissions)?;
    process_named(
        (bob_bytes, &bob.display().to_string()),
        (commission_bytes, &commissions.display().to_string()),
        profile,
    )
}

/// Same as [`process_files`] for in-memory blobs.
pub fn process_bytes(bob: Vec<u8>, commissions: Vec<u8>, profile: &FieldProfile) -> Result<AnalysisResult, IoError> {
    process_named((bob, "book of business"), (commissions, "commission report"), profile)
}

fn process_named(
    (bob, bob_name): (Vec<u8>, &str),
    (commissions, commission_name): (Vec<u8>, &str),
    profile: &FieldProfile,
) -> Result<AnalysisResult, IoError> {
    let bob_rows = read_bytes(bob, bob_name, SheetScope::First)?;
    let commission_rows = read_bytes(commissions, commission_name, SheetScope::All)?;
    info!(
        "loaded {} book-of-business rows and {} commission rows",
        bob_rows.len(),
        commission_rows.len()
    );

    Ok(run(profile, &ReconInput { bob_rows, commission_rows }))
}
