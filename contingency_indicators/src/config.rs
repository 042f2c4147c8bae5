// ********* Input data structures ***********

/// A raw cell of the source worksheet, as handed over by the spreadsheet reader.
///
/// The readers are responsible for mapping their own cell types onto this one.
#[derive(PartialEq, Debug, Clone)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    /// A cell holding a spreadsheet error (#DIV/0!, #REF!, ...).
    Error,
}

impl Cell {
    pub fn text(s: &str) -> Cell {
        Cell::Text(s.to_string())
    }
}

/// A rectangular (or ragged) grid of cells, indexed by absolute row and column.
pub type Grid = Vec<Vec<Cell>>;

/// The three columns holding the measurements of one reporting period.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct PeriodBlock {
    pub label: String,
    pub numerator: usize,
    pub denominator: usize,
    pub value: usize,
}

impl PeriodBlock {
    pub fn new(label: &str, numerator: usize, denominator: usize, value: usize) -> PeriodBlock {
        PeriodBlock {
            label: label.to_string(),
            numerator,
            denominator,
            value,
        }
    }

    fn max_column(&self) -> usize {
        self.numerator.max(self.denominator).max(self.value)
    }

    /// True if all the columns of this block exist in a grid of the given width.
    pub fn fits(&self, width: usize) -> bool {
        self.max_column() < width
    }
}

/// Where every logical field lives in the worksheet.
///
/// The positions are 0-based. Changing the shape of the source workbook means
/// providing a new layout, not patching the extractor.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct SheetLayout {
    pub first_data_row: usize,
    /// Upper bound on the number of candidate rows scanned after the header.
    pub max_data_rows: usize,
    pub number_column: usize,
    pub category_column: usize,
    pub name_column: usize,
    pub kind_column: usize,
    pub definition_column: usize,
    pub periods: Vec<PeriodBlock>,
}

impl SheetLayout {
    /// The layout of the contingency plan workbook: header in rows 0-3, up to 25
    /// indicators, metadata in columns A-E and the last three months in X-AF.
    pub fn contract() -> SheetLayout {
        SheetLayout {
            first_data_row: 4,
            max_data_rows: 25,
            number_column: 0,
            category_column: 1,
            name_column: 2,
            kind_column: 3,
            definition_column: 4,
            periods: vec![
                PeriodBlock::new("Mar 2025", 23, 24, 25),
                PeriodBlock::new("Abr 2025", 26, 27, 28),
                PeriodBlock::new("May 2025", 29, 30, 31),
            ],
        }
    }

    pub fn period_labels(&self) -> Vec<String> {
        self.periods.iter().map(|p| p.label.clone()).collect()
    }
}

// ******** Output data structures *********

/// Category number given to the records without a usable category.
pub const UNCLASSIFIED_CATEGORY: i64 = 999;

/// The raw values of one indicator for one period, trimmed but not interpreted.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct PeriodMeasurement {
    pub numerator: String,
    pub denominator: String,
    /// The reported value (ILE): a number, SI/NO or blank when not reported yet.
    pub value: String,
}

impl PeriodMeasurement {
    pub fn is_reported(&self) -> bool {
        !self.value.trim().is_empty()
    }
}

#[derive(PartialEq, Debug, Clone)]
pub struct IndicatorRecord {
    pub number: i64,
    pub category: String,
    pub category_number: i64,
    pub name: String,
    pub kind: String,
    pub definition: String,
    /// One entry per configured period, in layout order.
    pub period_values: Vec<(String, PeriodMeasurement)>,
}

impl IndicatorRecord {
    pub fn measurement(&self, period: &str) -> Option<&PeriodMeasurement> {
        self.period_values
            .iter()
            .find(|(label, _)| label == period)
            .map(|(_, m)| m)
    }
}

/// Why a candidate row did not produce a record.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum SkipReason {
    /// The indicator number cell is empty.
    BlankNumber,
    /// The indicator number cell holds something that is not a number.
    InvalidNumber(String),
    /// The row is beyond the end of the grid.
    RowOutOfRange,
}

#[derive(PartialEq, Debug, Clone)]
pub enum RowOutcome {
    Valid(IndicatorRecord),
    Skipped { row: usize, reason: SkipReason },
}

/// The result of scanning a worksheet.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct Extraction {
    /// Sorted by (category number, indicator number).
    pub records: Vec<IndicatorRecord>,
    pub skipped: Vec<(usize, SkipReason)>,
}

impl Extraction {
    /// The first record with this indicator number, in canonical order.
    pub fn find(&self, number: i64) -> Option<&IndicatorRecord> {
        self.records.iter().find(|r| r.number == number)
    }
}

/// The rendering strategy of an indicator, derived from its reported values.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum IndicatorType {
    NoData,
    /// Every reported value is SI or NO.
    Qualitative,
    Quantitative,
}

impl IndicatorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            IndicatorType::NoData => "no-data",
            IndicatorType::Qualitative => "qualitative",
            IndicatorType::Quantitative => "quantitative",
        }
    }
}

// ******** Aggregation results *********

#[derive(PartialEq, Debug, Clone)]
pub struct CategorySummary {
    pub label: String,
    pub indicator_count: usize,
    pub mean_completeness: f64,
}

#[derive(PartialEq, Debug, Clone)]
pub struct CompletenessSummary {
    pub total_indicators: usize,
    pub mean_completeness: f64,
    /// Records reported in every configured period.
    pub complete_indicators: usize,
    /// Sorted by label.
    pub categories: Vec<CategorySummary>,
}

/// Restricts the records shown. `None` accepts everything.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct RecordFilter {
    pub category_label: Option<String>,
    pub kind: Option<String>,
}
