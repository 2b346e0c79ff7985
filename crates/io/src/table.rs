// Grid -> Row conversion shared by the workbook and CSV readers

use std::collections::HashSet;

use polaudit_recon::model::{CellValue, Row};

const EMPTY_HEADER: &str = "__EMPTY";

/// Turn a sheet grid into rows keyed by the header row.
///
/// The first row holding any value is the header. Blank header cells become
/// `__EMPTY`, `__EMPTY_1`, ...; repeated names get `_1`, `_2`, ... so that no
/// column is lost. Empty cells are left out of each row and rows without any
/// value are skipped.
pub fn rows_from_grid<I>(grid: I) -> Vec<Row>
where
    I: IntoIterator<Item = Vec<Option<CellValue>>>,
{
    let mut grid = grid
        .into_iter()
        .map(|cells| cells.into_iter().map(|c| c.filter(|v| !v.is_blank())).collect::<Vec<_>>())
        .filter(|cells| cells.iter().any(Option::is_some));

    let Some(header_cells) = grid.next() else {
        return Vec::new();
    };

    let mut headers = HeaderNames::default();
    let mut names: Vec<String> = header_cells
        .iter()
        .map(|cell| headers.assign(cell.as_ref().map(|v| v.to_text()).unwrap_or_default()))
        .collect();

    let mut rows = Vec::new();
    for cells in grid {
        // Data wider than the header gets generated column names
        while names.len() < cells.len() {
            names.push(headers.assign(String::new()));
        }
        let mut row = Row::new();
        for (name, cell) in names.iter().zip(cells) {
            if let Some(value) = cell {
                row.insert(name.clone(), value);
            }
        }
        rows.push(row);
    }
    rows
}

#[derive(Default)]
struct HeaderNames {
    taken: HashSet<String>,
}

impl HeaderNames {
    fn assign(&mut self, raw: String) -> String {
        let base = if raw.trim().is_empty() { EMPTY_HEADER.to_string() } else { raw };
        let mut name = base.clone();
        let mut n = 0;
        while self.taken.contains(&name) {
            n += 1;
            name = format!("{base}_{n}");
        }
        self.taken.insert(name.clone());
        name
    }
}
