// Reading the indicator worksheet out of an Excel workbook.

use calamine::{open_workbook, DataType, Range, Reader, Xlsx};
use contingency_indicators::{Cell, Grid};

use crate::report::*;

fn to_cell(dt: &DataType) -> Cell {
    match dt {
        DataType::Empty => Cell::Empty,
        DataType::String(s) => Cell::Text(s.clone()),
        DataType::Float(f) => Cell::Number(*f),
        DataType::Int(i) => Cell::Number(*i as f64),
        DataType::Bool(b) => Cell::Bool(*b),
        // Serial date number, as Excel stores it.
        DataType::DateTime(f) => Cell::Number(*f),
        DataType::Error(e) => {
            debug!("to_cell: error cell {:?}", e);
            Cell::Error
        }
        #[allow(unreachable_patterns)]
        other => Cell::Text(format!("{:?}", other)),
    }
}

/// Places the cells of the range at their absolute position in the sheet.
///
/// The ranges returned by calamine start at the first used cell, while the
/// layout of the workbook is expressed from A1.
pub fn range_to_grid(range: &Range<DataType>) -> Grid {
    let (row0, col0) = match range.start() {
        Some((r, c)) => (r as usize, c as usize),
        None => return Vec::new(),
    };
    let mut grid: Grid = vec![Vec::new(); row0];
    for row in range.rows() {
        let mut cells: Vec<Cell> = vec![Cell::Empty; col0];
        cells.extend(row.iter().map(to_cell));
        grid.push(cells);
    }
    debug!(
        "range_to_grid: start: {:?} rows: {} width: {}",
        (row0, col0),
        grid.len(),
        col0 + range.width()
    );
    grid
}

pub fn read_grid(path: &str, worksheet_name: &str) -> DashboardResult<Grid> {
    debug!("read_grid: path: {:?} worksheet: {:?}", path, worksheet_name);
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;
    let wrange = workbook
        .worksheet_range(worksheet_name)
        .context(MissingWorksheetSnafu {
            worksheet: worksheet_name,
            path,
        })?
        .context(OpeningExcelSnafu { path })?;
    Ok(range_to_grid(&wrange))
}

/// Reads the workbook and extracts the indicators. Failing to read the workbook
/// is the only fatal error, everything else is absorbed row by row.
pub fn load_extraction(
    path: &Path,
    worksheet_name: &str,
    layout: &SheetLayout,
) -> DashboardResult<Extraction> {
    let p = path.display().to_string();
    info!("Attempting to read indicator file {:?}", p);
    let grid = read_grid(&p, worksheet_name)?;
    let extraction = extract_indicators(&grid, layout);
    for (row, reason) in extraction.skipped.iter() {
        debug!("load_extraction: row {} skipped: {:?}", row + 1, reason);
    }
    Ok(extraction)
}
