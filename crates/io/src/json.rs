// JSON export

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use polaudit_recon::AnalysisResult;

use crate::error::IoError;

/// Write the result as pretty JSON.
pub fn write_result(result: &AnalysisResult, path: &Path) -> Result<(), IoError> {
    let file = File::create(path).map_err(|e| IoError::Export(format!("{}: {e}", path.display())))?;
    let mut writer = BufWriter::new(file);
    to_writer(result, &mut writer)?;
    writer.flush().map_err(|e| IoError::Export(e.to_string()))
}

pub fn to_writer<W: Write>(result: &AnalysisResult, writer: W) -> Result<(), IoError> {
    serde_json::to_writer_pretty(writer, result).map_err(|e| IoError::Export(e.to_string()))
}
