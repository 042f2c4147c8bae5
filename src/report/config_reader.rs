use crate::report::*;

use contingency_indicators::{PeriodBlock, SheetLayout};
use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;
use std::collections::HashSet;

pub const DEFAULT_SOURCE_FILE: &str = "indicadores.xlsx";
pub const DEFAULT_WORKSHEET: &str = "Ficha_indicadores";
pub const DEFAULT_LOGO_FILE: &str = "Logo_gobernacion.png";

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct PeriodSettings {
    pub label: String,
    pub numerator: JSValue,
    pub denominator: JSValue,
    pub value: JSValue,
}

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct LayoutSettings {
    #[serde(rename = "firstDataRow")]
    pub first_data_row: Option<usize>,
    #[serde(rename = "maxDataRows")]
    pub max_data_rows: Option<usize>,
    #[serde(rename = "numberColumn")]
    pub number_column: Option<JSValue>,
    #[serde(rename = "categoryColumn")]
    pub category_column: Option<JSValue>,
    #[serde(rename = "nameColumn")]
    pub name_column: Option<JSValue>,
    #[serde(rename = "kindColumn")]
    pub kind_column: Option<JSValue>,
    #[serde(rename = "definitionColumn")]
    pub definition_column: Option<JSValue>,
    pub periods: Option<Vec<PeriodSettings>>,
}

/// The configuration file, as written by the user.
#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(rename = "sourceFile")]
    pub source_file: Option<String>,
    #[serde(rename = "worksheetName")]
    pub worksheet_name: Option<String>,
    #[serde(rename = "logoFile")]
    pub logo_file: Option<String>,
    #[serde(rename = "exportFile")]
    pub export_file: Option<String>,
    pub title: Option<String>,
    pub organization: Option<String>,
    #[serde(rename = "brandingText")]
    pub branding_text: Option<String>,
    pub layout: Option<LayoutSettings>,
}

/// The configuration once defaults are filled in and paths are resolved.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ReportSettings {
    pub source_file: String,
    pub worksheet_name: String,
    pub logo_file: String,
    pub export_file: Option<String>,
    pub title: String,
    pub organization: String,
    pub branding_text: String,
    pub layout: SheetLayout,
}

impl Default for ReportSettings {
    fn default() -> Self {
        ReportSettings {
            source_file: DEFAULT_SOURCE_FILE.to_string(),
            worksheet_name: DEFAULT_WORKSHEET.to_string(),
            logo_file: DEFAULT_LOGO_FILE.to_string(),
            export_file: None,
            title: "Plan de Contingencia para Alertas y Emergencia por Fiebre Amarilla".to_string(),
            organization: "Secretaría de Salud del Tolima".to_string(),
            branding_text: "Gobernación del Tolima".to_string(),
            layout: SheetLayout::contract(),
        }
    }
}

fn resolve_path(root: &Path, p: &str) -> String {
    if Path::new(p).is_absolute() {
        p.to_string()
    } else {
        root.join(p).display().to_string()
    }
}

impl ReportConfig {
    /// Fills the missing entries with the defaults of the contingency plan workbook.
    /// Relative paths are taken relative to `root`.
    pub fn settings(&self, root: &Path) -> DashboardResult<ReportSettings> {
        let d = ReportSettings::default();
        let layout = match &self.layout {
            Some(ls) => ls.layout()?,
            None => d.layout,
        };
        Ok(ReportSettings {
            source_file: resolve_path(
                root,
                self.source_file.as_deref().unwrap_or(DEFAULT_SOURCE_FILE),
            ),
            worksheet_name: self.worksheet_name.clone().unwrap_or(d.worksheet_name),
            logo_file: resolve_path(root, self.logo_file.as_deref().unwrap_or(DEFAULT_LOGO_FILE)),
            export_file: self.export_file.as_deref().map(|p| resolve_path(root, p)),
            title: self.title.clone().unwrap_or(d.title),
            organization: self.organization.clone().unwrap_or(d.organization),
            branding_text: self.branding_text.clone().unwrap_or(d.branding_text),
            layout,
        })
    }
}

impl LayoutSettings {
    pub fn layout(&self) -> DashboardResult<SheetLayout> {
        let d = SheetLayout::contract();
        let periods = match &self.periods {
            Some(ps) => ps
                .iter()
                .map(|p| {
                    Ok(PeriodBlock {
                        label: p.label.clone(),
                        numerator: read_column(&p.numerator)?,
                        denominator: read_column(&p.denominator)?,
                        value: read_column(&p.value)?,
                    })
                })
                .collect::<DashboardResult<Vec<PeriodBlock>>>()?,
            None => d.periods,
        };
        ensure!(
            !periods.is_empty(),
            InvalidLayoutSnafu {
                reason: "at least one period is required"
            }
        );
        let mut labels: HashSet<&str> = HashSet::new();
        for p in periods.iter() {
            ensure!(
                labels.insert(p.label.as_str()),
                InvalidLayoutSnafu {
                    reason: format!("period {:?} appears more than once", p.label)
                }
            );
        }
        ensure!(
            self.max_data_rows != Some(0),
            InvalidLayoutSnafu {
                reason: "maxDataRows must be positive"
            }
        );
        Ok(SheetLayout {
            first_data_row: self.first_data_row.unwrap_or(d.first_data_row),
            max_data_rows: self.max_data_rows.unwrap_or(d.max_data_rows),
            number_column: read_column_or(&self.number_column, d.number_column)?,
            category_column: read_column_or(&self.category_column, d.category_column)?,
            name_column: read_column_or(&self.name_column, d.name_column)?,
            kind_column: read_column_or(&self.kind_column, d.kind_column)?,
            definition_column: read_column_or(&self.definition_column, d.definition_column)?,
            periods,
        })
    }
}

pub fn read_config(path: &str) -> DashboardResult<ReportSettings> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let config: ReportConfig =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    debug!("read_config: {:?}", config);
    let root = Path::new(path).parent().context(MissingParentDirSnafu {})?;
    config.settings(root)
}

fn read_column_or(x: &Option<JSValue>, default: usize) -> DashboardResult<usize> {
    match x {
        Some(v) => read_column(v),
        None => Ok(default),
    }
}

/// A column position: either a 0-based number or an Excel column name ("X", "AF").
fn read_column(x: &JSValue) -> DashboardResult<usize> {
    match x {
        JSValue::Number(n) => n.as_u64().map(|x| x as usize).context(ParsingColumnSnafu {
            content: n.to_string(),
        }),
        JSValue::String(s) if !s.is_empty() && s.chars().all(|c| c.is_ascii_alphabetic()) => s
            .to_ascii_uppercase()
            .bytes()
            .try_fold(0usize, |acc, b| {
                acc.checked_mul(26)?.checked_add((b - b'A' + 1) as usize)
            })
            .map(|n| n - 1)
            .context(ParsingColumnSnafu { content: s.clone() }),
        JSValue::String(s) => s
            .trim()
            .parse::<usize>()
            .ok()
            .context(ParsingColumnSnafu { content: s.clone() }),
        _ => None.context(ParsingColumnSnafu {
            content: x.to_string(),
        }),
    }
}
