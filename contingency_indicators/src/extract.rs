use log::{debug, info, warn};
use std::collections::HashSet;

use crate::config::*;
use crate::normalize::{category_number, cell_text, indicator_number};

static EMPTY_CELL: Cell = Cell::Empty;

fn grid_width(grid: &Grid) -> usize {
    grid.iter().map(|r| r.len()).max().unwrap_or(0)
}

fn cell_at(row: &[Cell], col: usize) -> &Cell {
    row.get(col).unwrap_or(&EMPTY_CELL)
}

fn read_measurement(row: &[Cell], block: &PeriodBlock, width: usize) -> PeriodMeasurement {
    if !block.fits(width) {
        debug!(
            "read_measurement: period {:?} is outside of the grid (width {})",
            block.label, width
        );
        return PeriodMeasurement::default();
    }
    PeriodMeasurement {
        numerator: cell_text(cell_at(row, block.numerator)),
        denominator: cell_text(cell_at(row, block.denominator)),
        value: cell_text(cell_at(row, block.value)),
    }
}

/// Turns one row of the grid into a record, or explains why it cannot be one.
pub fn evaluate_row(grid: &Grid, row_idx: usize, layout: &SheetLayout) -> RowOutcome {
    let row = match grid.get(row_idx) {
        Some(r) => r,
        None => {
            return RowOutcome::Skipped {
                row: row_idx,
                reason: SkipReason::RowOutOfRange,
            }
        }
    };
    let number = match indicator_number(cell_at(row, layout.number_column)) {
        Ok(n) => n,
        Err(reason) => return RowOutcome::Skipped { row: row_idx, reason },
    };

    let category = cell_text(cell_at(row, layout.category_column));
    let width = grid_width(grid);
    let period_values = layout
        .periods
        .iter()
        .map(|block| (block.label.clone(), read_measurement(row, block, width)))
        .collect();

    RowOutcome::Valid(IndicatorRecord {
        number,
        category_number: category_number(&category),
        category,
        name: cell_text(cell_at(row, layout.name_column)),
        kind: cell_text(cell_at(row, layout.kind_column)),
        definition: cell_text(cell_at(row, layout.definition_column)),
        period_values,
    })
}

/// Scans the data window of the worksheet and returns the indicators in
/// canonical order, along with the rows that were skipped.
pub fn extract_indicators(grid: &Grid, layout: &SheetLayout) -> Extraction {
    let end = layout
        .first_data_row
        .saturating_add(layout.max_data_rows)
        .min(grid.len());
    let mut res = Extraction::default();
    for row_idx in layout.first_data_row..end {
        match evaluate_row(grid, row_idx, layout) {
            RowOutcome::Valid(record) => {
                debug!(
                    "extract_indicators: row {}: indicator {} ({:?})",
                    row_idx, record.number, record.name
                );
                res.records.push(record);
            }
            RowOutcome::Skipped { row, reason } => {
                debug!("extract_indicators: skipping row {}: {:?}", row, reason);
                res.skipped.push((row, reason));
            }
        }
    }

    // Stable: duplicates keep the worksheet order.
    res.records.sort_by_key(|r| (r.category_number, r.number));

    let mut seen: HashSet<i64> = HashSet::new();
    for r in res.records.iter() {
        if !seen.insert(r.number) {
            warn!(
                "extract_indicators: indicator number {} appears more than once",
                r.number
            );
        }
    }

    info!(
        "Extracted {} indicators ({} rows skipped)",
        res.records.len(),
        res.skipped.len()
    );
    res
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_layout() -> SheetLayout {
        SheetLayout {
            first_data_row: 1,
            max_data_rows: 10,
            number_column: 0,
            category_column: 1,
            name_column: 2,
            kind_column: 3,
            definition_column: 4,
            periods: vec![
                PeriodBlock::new("P1", 5, 6, 7),
                PeriodBlock::new("P2", 8, 9, 10),
            ],
        }
    }

    fn row(number: Cell, category: &str, values: [&str; 2]) -> Vec<Cell> {
        vec![
            number,
            Cell::text(category),
            Cell::text("name"),
            Cell::text("Proceso"),
            Cell::text("def"),
            Cell::Number(3.0),
            Cell::Number(4.0),
            Cell::text(values[0]),
            Cell::Empty,
            Cell::Empty,
            Cell::text(values[1]),
        ]
    }

    #[test]
    fn skips_rows_without_number() {
        let grid = vec![
            vec![Cell::text("header")],
            row(Cell::Empty, "1.A", ["SI", ""]),
            row(Cell::text("Total"), "1.A", ["SI", ""]),
            row(Cell::Number(2.0), "1.A", ["SI", ""]),
        ];
        let ex = extract_indicators(&grid, &small_layout());
        assert_eq!(ex.records.len(), 1);
        assert_eq!(ex.records[0].number, 2);
        assert_eq!(
            ex.skipped,
            vec![
                (1, SkipReason::BlankNumber),
                (2, SkipReason::InvalidNumber("Total".to_string()))
            ]
        );
    }

    #[test]
    fn sorted_by_category_then_number() {
        let grid = vec![
            vec![],
            row(Cell::Number(9.0), "", ["", ""]),
            row(Cell::Number(3.0), "2.B", ["", ""]),
            row(Cell::Number(1.0), "2.B", ["", ""]),
            row(Cell::Number(5.0), "1.A", ["", ""]),
        ];
        let ex = extract_indicators(&grid, &small_layout());
        let keys: Vec<(i64, i64)> = ex
            .records
            .iter()
            .map(|r| (r.category_number, r.number))
            .collect();
        assert_eq!(keys, vec![(1, 5), (2, 1), (2, 3), (UNCLASSIFIED_CATEGORY, 9)]);
    }

    #[test]
    fn duplicates_keep_sheet_order_and_first_wins() {
        let mut first = row(Cell::Number(4.0), "1.A", ["SI", ""]);
        first[2] = Cell::text("first");
        let mut second = row(Cell::Number(4.0), "1.A", ["NO", ""]);
        second[2] = Cell::text("second");
        let grid = vec![vec![], first, second];
        let ex = extract_indicators(&grid, &small_layout());
        assert_eq!(ex.records.len(), 2);
        assert_eq!(ex.records[0].name, "first");
        assert_eq!(ex.find(4).map(|r| r.name.as_str()), Some("first"));
        assert_eq!(ex.find(40), None);
    }

    #[test]
    fn scan_window_is_bounded() {
        let mut layout = small_layout();
        layout.max_data_rows = 2;
        let grid = vec![
            vec![],
            row(Cell::Number(1.0), "1.A", ["", ""]),
            row(Cell::Number(2.0), "1.A", ["", ""]),
            row(Cell::Number(3.0), "1.A", ["", ""]),
        ];
        let ex = extract_indicators(&grid, &layout);
        assert_eq!(ex.records.len(), 2);
    }

    #[test]
    fn unbounded_window_stops_at_the_grid() {
        let mut layout = small_layout();
        layout.max_data_rows = usize::MAX;
        let grid = vec![vec![], row(Cell::Number(1.0), "1.A", ["SI", ""])];
        let ex = extract_indicators(&grid, &layout);
        assert_eq!(ex.records.len(), 1);

        layout.first_data_row = usize::MAX;
        assert!(extract_indicators(&grid, &layout).records.is_empty());
    }

    #[test]
    fn out_of_range_period_is_empty() {
        let mut layout = small_layout();
        layout.periods.push(PeriodBlock::new("P3", 40, 41, 42));
        let grid = vec![vec![], row(Cell::Number(1.0), "1.A", ["0.5", "SI"])];
        let ex = extract_indicators(&grid, &layout);
        let r = &ex.records[0];
        assert_eq!(r.period_values.len(), 3);
        assert_eq!(r.measurement("P1").map(|m| m.value.as_str()), Some("0.5"));
        assert_eq!(r.measurement("P1").map(|m| m.numerator.as_str()), Some("3"));
        assert_eq!(r.measurement("P2").map(|m| m.value.as_str()), Some("SI"));
        assert_eq!(r.measurement("P3"), Some(&PeriodMeasurement::default()));
    }

    #[test]
    fn short_rows_read_as_blank() {
        let grid = vec![
            vec![],
            vec![Cell::Number(1.0), Cell::text("1.A")],
            row(Cell::Number(2.0), "1.A", ["SI", "NO"]),
        ];
        let ex = extract_indicators(&grid, &small_layout());
        let r = ex.find(1).unwrap();
        assert_eq!(r.name, "");
        assert!(r.period_values.iter().all(|(_, m)| !m.is_reported()));
    }

    #[test]
    fn evaluate_row_past_the_end() {
        let grid: Grid = vec![vec![]];
        assert_eq!(
            evaluate_row(&grid, 5, &small_layout()),
            RowOutcome::Skipped {
                row: 5,
                reason: SkipReason::RowOutOfRange
            }
        );
    }
}
