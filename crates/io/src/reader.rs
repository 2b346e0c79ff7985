//! Tabular reader: one file in, ordered rows out.
//!
//! The format is detected from the content, not the file name. Workbooks go
//! through calamine; everything else is treated as delimited text.

use std::fs;
use std::path::Path;

use polaudit_recon::model::Row;

use crate::error::IoError;
use crate::workbook;

/// Which sheets of a workbook contribute rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetScope {
    /// First sheet only (book of business).
    First,
    /// All sheets concatenated in workbook order (commission report).
    All,
}

pub fn read_bytes(bytes: Vec<u8>, input: &str, scope: SheetScope) -> Result<Vec<Row>, IoError> {
    if !workbook::is_workbook(&bytes) {
        return crate::csv::read_rows(&bytes, input);
    }

    let limit = match scope {
        SheetScope::First => Some(1),
        SheetScope::All => None,
    };
    let sheets = workbook::read_sheets(bytes, input, limit)?;
    Ok(sheets.into_iter().flatten().collect())
}

pub fn read_path(path: &Path, scope: SheetScope) -> Result<Vec<Row>, IoError> {
    let bytes = read_file(path)?;
    read_bytes(bytes, &path.display().to_string(), scope)
}

pub(crate) fn read_file(path: &Path) -> Result<Vec<u8>, IoError> {
    fs::read(path).map_err(|source| IoError::Read {
        path: path.display().to_string(),
        source,
    })
}
