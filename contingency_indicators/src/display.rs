use crate::category::category_label;
use crate::classify::{classify, is_yes_no};
use crate::config::*;
use crate::normalize::{correct_percentage, CorrectedValue};

pub const PENDING: &str = "Pending";
pub const NOT_AVAILABLE: &str = "N/A";

pub const DEFINITION_PREVIEW_CHARS: usize = 200;
pub const TITLE_NAME_CHARS: usize = 50;

/// Keeps the first `max_chars` characters, marking the cut with "...".
pub fn truncate_with_ellipsis(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        format!("{}...", text.chars().take(max_chars).collect::<String>())
    } else {
        text.to_string()
    }
}

/// The reported value as shown to the user: SI/NO as written, numbers
/// percentage-corrected with one decimal, other text untouched.
pub fn display_value(value: &str) -> String {
    if value.trim().is_empty() {
        return PENDING.to_string();
    }
    if is_yes_no(value) {
        return value.to_string();
    }
    match correct_percentage(value) {
        CorrectedValue::Number(f) => format!("{:.1}", f),
        CorrectedValue::Raw(s) => s,
    }
}

fn or_placeholder(s: &str, placeholder: &str) -> String {
    if s.is_empty() {
        placeholder.to_string()
    } else {
        s.to_string()
    }
}

/// One line of the detailed table: an indicator in one period.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct DetailRow {
    pub number: i64,
    pub name: String,
    pub category: String,
    pub kind: String,
    pub definition: String,
    pub period: String,
    pub numerator: String,
    pub denominator: String,
    pub value: String,
}

pub fn period_row(record: &IndicatorRecord, period: &str, m: &PeriodMeasurement) -> DetailRow {
    DetailRow {
        number: record.number,
        name: record.name.clone(),
        category: category_label(&record.category),
        kind: record.kind.clone(),
        definition: record.definition.clone(),
        period: period.to_string(),
        numerator: or_placeholder(&m.numerator, PENDING),
        denominator: or_placeholder(&m.denominator, NOT_AVAILABLE),
        value: display_value(&m.value),
    }
}

/// The detailed table, records in the given order, periods in the given order.
pub fn detail_rows(records: &[&IndicatorRecord], periods: &[String]) -> Vec<DetailRow> {
    let mut res: Vec<DetailRow> = Vec::new();
    for r in records.iter() {
        for p in periods.iter() {
            if let Some(m) = r.measurement(p) {
                res.push(period_row(r, p, m));
            }
        }
    }
    res
}

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum QualitativeStatus {
    Done,
    NotDone,
    Pending,
}

#[derive(PartialEq, Debug, Clone)]
pub struct ProgressPoint {
    pub period: String,
    /// None when nothing numeric can be plotted for this period.
    pub value: Option<f64>,
    pub label: String,
}

#[derive(PartialEq, Debug, Clone)]
pub enum ProgressSeries {
    Qualitative(Vec<(String, QualitativeStatus)>),
    Quantitative(Vec<ProgressPoint>),
}

fn progress_point(period: &str, value: &str) -> ProgressPoint {
    let (value, label) = match value.trim().to_uppercase().as_str() {
        "" => (None, PENDING.to_string()),
        "SI" => (Some(1.0), "SI".to_string()),
        "NO" => (Some(0.0), "NO".to_string()),
        _ => match correct_percentage(value) {
            CorrectedValue::Number(f) => (Some(f), format!("{:.1}", f)),
            CorrectedValue::Raw(s) => (None, s),
        },
    };
    ProgressPoint {
        period: period.to_string(),
        value,
        label,
    }
}

/// The evolution of an indicator over the periods. None when nothing was reported.
pub fn progress_series(record: &IndicatorRecord, periods: &[String]) -> Option<ProgressSeries> {
    let values: Vec<(String, String)> = periods
        .iter()
        .filter_map(|p| record.measurement(p).map(|m| (p.clone(), m.value.clone())))
        .collect();
    if values.iter().all(|(_, v)| v.trim().is_empty()) {
        return None;
    }
    match classify(record, periods) {
        IndicatorType::Qualitative => Some(ProgressSeries::Qualitative(
            values
                .iter()
                .map(|(p, v)| {
                    let status = match v.trim().to_uppercase().as_str() {
                        "SI" => QualitativeStatus::Done,
                        "NO" => QualitativeStatus::NotDone,
                        _ => QualitativeStatus::Pending,
                    };
                    (p.clone(), status)
                })
                .collect(),
        )),
        _ => Some(ProgressSeries::Quantitative(
            values.iter().map(|(p, v)| progress_point(p, v)).collect(),
        )),
    }
}

pub fn chart_title(record: &IndicatorRecord) -> String {
    format!(
        "Indicator {}: {}...",
        record.number,
        record.name.chars().take(TITLE_NAME_CHARS).collect::<String>()
    )
}
