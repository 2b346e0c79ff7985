// Workbook reading (xlsx, xls, xlsb, ods)

use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use log::{info, warn};
use polaudit_recon::model::{CellValue, Row};

use crate::error::IoError;
use crate::table::rows_from_grid;

const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
const OLE_MAGIC: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0];

/// True if the bytes look like a binary workbook rather than delimited text.
pub fn is_workbook(bytes: &[u8]) -> bool {
    bytes.starts_with(ZIP_MAGIC) || bytes.starts_with(OLE_MAGIC)
}

/// Read sheets in workbook order; `limit` caps how many are read.
pub fn read_sheets(bytes: Vec<u8>, input: &str, limit: Option<usize>) -> Result<Vec<Vec<Row>>, IoError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes)).map_err(|e| IoError::decode(input, e))?;

    let sheet_names: Vec<String> = workbook.sheet_names().to_vec();
    if sheet_names.is_empty() {
        return Err(IoError::NoSheets { input: input.to_string() });
    }

    let take = limit.unwrap_or(sheet_names.len());
    let mut sheets = Vec::new();
    for sheet_name in sheet_names.iter().take(take) {
        let range = workbook
            .worksheet_range(sheet_name)
            .map_err(|e| IoError::decode(input, format!("sheet '{sheet_name}': {e}")))?;

        let grid = range.rows().map(|row| row.iter().map(cell_value).collect::<Vec<_>>());
        let rows = rows_from_grid(grid);
        if rows.is_empty() {
            warn!("{input}: sheet '{sheet_name}' has no data rows");
        }
        info!("{input}: read {} rows from sheet '{sheet_name}'", rows.len());
        sheets.push(rows);
    }

    Ok(sheets)
}

/// Map a calamine cell onto the engine's scalar. `None` for empty cells.
pub fn cell_value(cell: &Data) -> Option<CellValue> {
    match cell {
        Data::Empty => None,
        Data::String(s) if s.is_empty() => None,
        Data::String(s) => Some(CellValue::Text(s.clone())),
        Data::Float(n) => Some(CellValue::Number(*n)),
        Data::Int(n) => Some(CellValue::Number(*n as f64)),
        Data::Bool(b) => Some(CellValue::Bool(*b)),
        Data::Error(e) => Some(CellValue::Text(e.to_string())),
        // Dates stay as Excel serials, as a spreadsheet formula would see them
        Data::DateTime(dt) => Some(CellValue::Number(dt.as_f64())),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Some(CellValue::Text(s.clone())),
    }
}
