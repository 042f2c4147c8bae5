use log::debug;
use std::collections::BTreeMap;

use crate::category::category_label;
use crate::config::*;

/// Rounds to one decimal, the precision used for every displayed percentage.
pub fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

fn reported_count(record: &IndicatorRecord, periods: &[String]) -> usize {
    periods
        .iter()
        .filter(|p| record.measurement(p).map_or(false, |m| m.is_reported()))
        .count()
}

/// Percentage of the periods for which the indicator has a reported value.
pub fn completeness(record: &IndicatorRecord, periods: &[String]) -> f64 {
    if periods.is_empty() {
        return 0.0;
    }
    reported_count(record, periods) as f64 / periods.len() as f64 * 100.0
}

fn mean(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        0.0
    } else {
        xs.iter().sum::<f64>() / xs.len() as f64
    }
}

/// Overall and per-category completeness of a set of records.
pub fn summarize(records: &[&IndicatorRecord], periods: &[String]) -> CompletenessSummary {
    let mut by_category: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    let mut all: Vec<f64> = Vec::new();
    let mut complete = 0;
    for r in records.iter() {
        let c = completeness(r, periods);
        if !periods.is_empty() && reported_count(r, periods) == periods.len() {
            complete += 1;
        }
        all.push(c);
        by_category.entry(category_label(&r.category)).or_default().push(c);
    }

    let categories: Vec<CategorySummary> = by_category
        .into_iter()
        .map(|(label, cs)| CategorySummary {
            label,
            indicator_count: cs.len(),
            mean_completeness: mean(&cs),
        })
        .collect();
    debug!("summarize: {} records, categories: {:?}", records.len(), categories);

    CompletenessSummary {
        total_indicators: records.len(),
        mean_completeness: mean(&all),
        complete_indicators: complete,
        categories,
    }
}

/// Number of records for each authored kind, sorted by kind.
pub fn kind_distribution(records: &[&IndicatorRecord]) -> Vec<(String, usize)> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for r in records.iter() {
        *counts.entry(r.kind.clone()).or_insert(0) += 1;
    }
    counts.into_iter().collect()
}

/// The category labels present in the records, sorted and without duplicates.
pub fn category_labels(records: &[IndicatorRecord]) -> Vec<String> {
    let mut labels: Vec<String> = records.iter().map(|r| category_label(&r.category)).collect();
    labels.sort();
    labels.dedup();
    labels
}

/// The distinct non-blank kinds, in order of first appearance.
pub fn kinds(records: &[IndicatorRecord]) -> Vec<String> {
    let mut res: Vec<String> = Vec::new();
    for r in records.iter() {
        if !r.kind.is_empty() && !res.contains(&r.kind) {
            res.push(r.kind.clone());
        }
    }
    res
}

pub fn filter_records<'a>(
    records: &'a [IndicatorRecord],
    filter: &RecordFilter,
) -> Vec<&'a IndicatorRecord> {
    records
        .iter()
        .filter(|r| {
            filter
                .category_label
                .as_ref()
                .map_or(true, |l| *l == category_label(&r.category))
        })
        .filter(|r| filter.kind.as_ref().map_or(true, |k| *k == r.kind))
        .collect()
}
