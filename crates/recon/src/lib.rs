//! `polaudit-recon`: book-of-business vs. commission report reconciliation.
//!
//! Pure engine crate: receives pre-loaded rows, returns reconciled and
//! unmatched policy records with totals. No file IO.

pub mod aggregate;
pub mod classify;
pub mod config;
pub mod engine;
pub mod error;
pub mod fields;
pub mod index;
pub mod model;
pub mod report;
pub mod search;

pub use config::FieldProfile;
pub use engine::run;
pub use error::ReconError;
pub use model::{AnalysisResult, CellValue, ReconInput, ReconciledRecord, Row, UnmatchedRecord};
