use log::{debug, info, warn};

use contingency_indicators::display::*;
use contingency_indicators::*;
use snafu::prelude::*;

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde_json::json;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;
use crate::report::branding::Branding;
use crate::report::cache::DatasetCache;
use crate::report::config_reader::*;
use crate::report::io_csv::export_csv;
use crate::report::io_xlsx::load_extraction;

pub mod branding;
pub mod cache;
pub mod config_reader;
pub mod io_csv;
pub mod io_xlsx;

#[derive(Debug, Snafu)]
pub enum DashboardError {
    #[snafu(display("Error opening workbook {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("Worksheet {worksheet} not found in {path}"))]
    MissingWorksheet { worksheet: String, path: String },
    #[snafu(display("No indicators could be read from {path}"))]
    NoIndicators { path: String },
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON content"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Could not understand column {content}"))]
    ParsingColumn { content: String },
    #[snafu(display("Invalid layout: {reason}"))]
    InvalidLayout { reason: String },
    #[snafu(display("The configuration file has no parent directory"))]
    MissingParentDir {},
    #[snafu(display("Error creating file {path}"))]
    CsvCreate {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error writing CSV file {path}"))]
    CsvWrite { source: csv::Error, path: String },
    #[snafu(display("Error reading CSV line"))]
    CsvLineParse { source: csv::Error },
    #[snafu(display("CSV line {lineno} does not have the expected number of columns"))]
    CsvLineTooShort { lineno: usize },
    #[snafu(display("Error writing summary to {path}"))]
    WritingSummary {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Difference detected between computed summary and reference summary"))]
    ReferenceMismatch {},

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type DashboardResult<T> = Result<T, DashboardError>;

const SHORT_LABEL_CHARS: usize = 20;

/// The configuration file (or the defaults), with the command line applied on top.
fn resolve_settings(args: &Args) -> DashboardResult<ReportSettings> {
    let mut settings = match &args.config {
        Some(path) => read_config(path)?,
        None => ReportSettings::default(),
    };
    if let Some(input) = &args.input {
        settings.source_file = input.clone();
    }
    if let Some(ws) = &args.worksheet {
        settings.worksheet_name = ws.clone();
    }
    if let Some(export) = &args.export {
        settings.export_file = Some(export.clone());
    }
    if let Some(logo) = &args.logo {
        settings.logo_file = logo.clone();
    }
    Ok(settings)
}

fn record_filter(args: &Args) -> RecordFilter {
    RecordFilter {
        category_label: args.category.clone(),
        kind: args.kind.clone(),
    }
}

fn series_to_json(series: &Option<ProgressSeries>) -> JSValue {
    match series {
        None => JSValue::Null,
        Some(ProgressSeries::Qualitative(statuses)) => statuses
            .iter()
            .map(|(period, status)| {
                let s = match status {
                    QualitativeStatus::Done => "done",
                    QualitativeStatus::NotDone => "not-done",
                    QualitativeStatus::Pending => "pending",
                };
                json!({"period": period, "status": s})
            })
            .collect(),
        Some(ProgressSeries::Quantitative(points)) => points
            .iter()
            .map(|p| json!({"period": p.period, "value": p.value, "label": p.label}))
            .collect(),
    }
}

fn indicator_to_json(record: &IndicatorRecord, periods: &[String]) -> JSValue {
    let rows: Vec<JSValue> = periods
        .iter()
        .filter_map(|p| record.measurement(p).map(|m| period_row(record, p, m)))
        .map(|r| {
            json!({
                "period": r.period,
                "numerator": r.numerator,
                "denominator": r.denominator,
                "value": r.value,
            })
        })
        .collect();
    json!({
        "number": record.number,
        "name": record.name,
        "title": chart_title(record),
        "category": category_label(&record.category),
        "kind": record.kind,
        "type": classify(record, periods).as_str(),
        "completeness": round1(completeness(record, periods)),
        "series": series_to_json(&progress_series(record, periods)),
        "periods": rows,
    })
}

pub fn build_summary_js(
    settings: &ReportSettings,
    extraction: &Extraction,
    filter: &RecordFilter,
    selected: &[&IndicatorRecord],
) -> JSValue {
    let periods = settings.layout.period_labels();
    let summary = summarize(selected, &periods);
    let categories: Vec<JSValue> = summary
        .categories
        .iter()
        .map(|c| {
            json!({
                "label": c.label,
                "shortLabel": short_label(&c.label, SHORT_LABEL_CHARS),
                "indicators": c.indicator_count,
                "completeness": round1(c.mean_completeness),
            })
        })
        .collect();
    let kinds: Vec<JSValue> = kind_distribution(selected)
        .iter()
        .map(|(kind, count)| json!({"kind": kind, "count": count}))
        .collect();
    let indicators: Vec<JSValue> = selected
        .iter()
        .map(|r| indicator_to_json(r, &periods))
        .collect();
    json!({
        "config": {
            "title": settings.title,
            "organization": settings.organization,
            "worksheet": settings.worksheet_name,
            "periods": periods,
            "lastPeriod": periods.last(),
            "filters": {"category": filter.category_label, "kind": filter.kind},
            "availableCategories": category_labels(&extraction.records),
            "availableKinds": contingency_indicators::kinds(&extraction.records),
        },
        "summary": {
            "loadedIndicators": extraction.records.len(),
            "skippedRows": extraction.skipped.len(),
            "totalIndicators": summary.total_indicators,
            "meanCompleteness": round1(summary.mean_completeness),
            "completeIndicators": summary.complete_indicators,
        },
        "categories": categories,
        "kinds": kinds,
        "indicators": indicators,
    })
}

/// The executive summary and the list of indicators, as plain text.
pub fn render_text(
    settings: &ReportSettings,
    branding: &Branding,
    extraction: &Extraction,
    selected: &[&IndicatorRecord],
) -> String {
    let periods = settings.layout.period_labels();
    let summary = summarize(selected, &periods);
    let mut out: Vec<String> = vec![
        settings.title.clone(),
        format!("{} | {}", settings.organization, branding.label()),
        format!(
            "Loaded {} indicators | periods: {}",
            extraction.records.len(),
            periods.join(", ")
        ),
        "".to_string(),
        format!("Total indicators: {}", summary.total_indicators),
        format!("Mean completeness: {:.1}%", summary.mean_completeness),
        format!("Complete indicators: {}", summary.complete_indicators),
        format!("Last period: {}", periods.last().map_or("", |p| p.as_str())),
    ];

    if selected.is_empty() {
        out.push("".to_string());
        out.push("No indicators match the selected filters.".to_string());
        return out.join("\n") + "\n";
    }

    out.push("".to_string());
    out.push("Completeness by strategic line:".to_string());
    for c in summary.categories.iter() {
        out.push(format!(
            "  {} | {} indicators | {:.1}%",
            short_label(&c.label, SHORT_LABEL_CHARS),
            c.indicator_count,
            c.mean_completeness
        ));
    }

    out.push("".to_string());
    out.push("Indicator kinds:".to_string());
    for (kind, count) in kind_distribution(selected) {
        out.push(format!("  {}: {}", kind, count));
    }

    let mut by_category: BTreeMap<String, Vec<&IndicatorRecord>> = BTreeMap::new();
    for r in selected.iter() {
        by_category.entry(category_label(&r.category)).or_default().push(r);
    }
    for (label, records) in by_category.iter() {
        out.push("".to_string());
        out.push(label.clone());
        for r in records.iter() {
            out.push(format!(
                "  {}. {} | {} | {} | reported {:.0}%",
                r.number,
                r.name,
                r.kind,
                classify(r, &periods).as_str(),
                completeness(r, &periods)
            ));
            if !r.definition.is_empty() {
                out.push(format!(
                    "     {}",
                    truncate_with_ellipsis(&r.definition, DEFINITION_PREVIEW_CHARS)
                ));
            }
            for row in detail_rows(&[*r], &periods) {
                out.push(format!(
                    "     {}: {} ({} / {})",
                    row.period, row.value, row.numerator, row.denominator
                ));
            }
        }
    }
    out.join("\n") + "\n"
}

fn read_reference(path: &str) -> DashboardResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})
}

/// Compares the computed summary with a reference one, printing the differences.
pub fn check_reference(path: &str, computed: &JSValue) -> DashboardResult<()> {
    let reference = read_reference(path)?;
    let pretty_ref = serde_json::to_string_pretty(&reference).context(ParsingJsonSnafu {})?;
    let pretty = serde_json::to_string_pretty(computed).context(ParsingJsonSnafu {})?;
    if pretty_ref != pretty {
        warn!("Found differences with the reference summary {:?}", path);
        print_diff(pretty_ref.as_str(), pretty.as_str(), "\n");
        return ReferenceMismatchSnafu {}.fail();
    }
    info!("Summary matches the reference {:?}", path);
    Ok(())
}

pub fn run_report(args: &Args) -> DashboardResult<()> {
    let settings = resolve_settings(args)?;
    info!("settings: {:?}", settings);

    let branding = Branding::load(&settings.logo_file, &settings.branding_text);

    let mut cache = DatasetCache::new();
    let source = settings.source_file.clone();
    let extraction = cache.get_or_load(Path::new(&source), |p| {
        load_extraction(p, &settings.worksheet_name, &settings.layout)
    })?;
    ensure!(
        !extraction.records.is_empty(),
        NoIndicatorsSnafu { path: source }
    );
    info!(
        "Loaded {} indicators, periods: {:?}",
        extraction.records.len(),
        settings.layout.period_labels()
    );

    let filter = record_filter(args);
    let selected = filter_records(&extraction.records, &filter);
    debug!("run_report: {} indicators selected by {:?}", selected.len(), filter);
    if selected.is_empty() {
        warn!("No indicators match the filters {:?}", filter);
    }

    print!("{}", render_text(&settings, &branding, &extraction, &selected));

    if let Some(path) = &settings.export_file {
        let rows = detail_rows(&selected, &settings.layout.period_labels());
        export_csv(path, &rows)?;
    }

    let summary_js = build_summary_js(&settings, &extraction, &filter, &selected);
    let pretty = serde_json::to_string_pretty(&summary_js).context(ParsingJsonSnafu {})?;
    match args.out.as_deref() {
        Some("stdout") => println!("{}", pretty),
        Some(path) if !path.is_empty() => {
            fs::write(path, &pretty).context(WritingSummarySnafu { path })?;
        }
        _ => {}
    }

    if let Some(reference) = &args.reference {
        check_reference(reference, &summary_js)?;
    }
    Ok(())
}
