use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};
use thiserror::Error;
use tracing::{debug, info};

use crate::normalize::{Cell, RawGrid};

#[derive(Error, Debug)]
pub enum WorkbookError {
    #[error("Failed to open workbook: {0}")]
    Open(String),

    #[error("Workbook has no worksheets")]
    NoSheets,

    #[error("Failed to read worksheet: {0}")]
    Sheet(String),
}

/// Decode the first worksheet of an in-memory `.xls`/`.xlsx` workbook
///
/// Synchronous; async callers should run it inside `spawn_blocking()`.
pub fn read_first_sheet(bytes: Vec<u8>) -> Result<RawGrid, WorkbookError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| WorkbookError::Open(e.to_string()))?;

    let sheet_names = workbook.sheet_names();
    if let Some(name) = sheet_names.first() {
        info!("Reading worksheet '{}' ({} sheets total)", name, sheet_names.len());
    }

    let range = match workbook.worksheet_range_at(0) {
        Some(Ok(range)) => range,
        Some(Err(e)) => return Err(WorkbookError::Sheet(e.to_string())),
        None => return Err(WorkbookError::NoSheets),
    };

    Ok(range_to_grid(&range))
}

/// Convert a calamine range to a grid indexed by sheet coordinates
///
/// calamine ranges start at the first used cell, so leading blank rows and
/// columns are restored as empty cells.
pub fn range_to_grid(range: &Range<Data>) -> RawGrid {
    let (row_offset, col_offset) = range
        .start()
        .map(|(r, c)| (r as usize, c as usize))
        .unwrap_or((0, 0));

    let mut rows: Vec<Vec<Cell>> = vec![Vec::new(); row_offset];
    for row in range.rows() {
        let mut cells = vec![Cell::Empty; col_offset];
        cells.extend(row.iter().map(cell_from_data));
        rows.push(cells);
    }

    debug!("Decoded worksheet into {} rows", rows.len());
    RawGrid::new(rows)
}

pub fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::Int(i) => Cell::Int(*i),
        Data::Float(f) => Cell::Float(*f),
        Data::String(s) => Cell::from(s.as_str()),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) => Cell::Float(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::from(s.as_str()),
        Data::Error(e) => Cell::Error(e.to_string()),
    }
}
