// Export of the detailed table as a flat CSV file.

use std::fs::File;
use std::io::{Read, Write};

use contingency_indicators::display::DetailRow;

use crate::report::*;

pub const CSV_HEADER: [&str; 9] = [
    "Indicator",
    "Name",
    "Category",
    "Kind",
    "Definition",
    "Period",
    "Numerator",
    "Denominator",
    "Value",
];

pub fn write_detail_rows<W: Write>(rows: &[DetailRow], writer: W) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(CSV_HEADER)?;
    for r in rows.iter() {
        let number = r.number.to_string();
        wtr.write_record([
            number.as_str(),
            r.name.as_str(),
            r.category.as_str(),
            r.kind.as_str(),
            r.definition.as_str(),
            r.period.as_str(),
            r.numerator.as_str(),
            r.denominator.as_str(),
            r.value.as_str(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn export_csv(path: &str, rows: &[DetailRow]) -> DashboardResult<()> {
    info!("Writing {} lines to {:?}", rows.len(), path);
    let file = File::create(path).context(CsvCreateSnafu { path })?;
    write_detail_rows(rows, file).context(CsvWriteSnafu { path })
}

/// Reads back a table written by `write_detail_rows`.
pub fn read_detail_rows<R: Read>(reader: R) -> DashboardResult<Vec<DetailRow>> {
    let mut rdr = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);
    let mut res: Vec<DetailRow> = Vec::new();
    for (idx, line_r) in rdr.records().enumerate() {
        // The header is line 1.
        let lineno = idx + 2;
        let line = line_r.context(CsvLineParseSnafu {})?;
        ensure!(line.len() == CSV_HEADER.len(), CsvLineTooShortSnafu { lineno });
        let number = match line[0].parse::<i64>() {
            Ok(n) => n,
            Err(_) => whatever!("line {}: invalid indicator number {:?}", lineno, &line[0]),
        };
        res.push(DetailRow {
            number,
            name: line[1].to_string(),
            category: line[2].to_string(),
            kind: line[3].to_string(),
            definition: line[4].to_string(),
            period: line[5].to_string(),
            numerator: line[6].to_string(),
            denominator: line[7].to_string(),
            value: line[8].to_string(),
        });
    }
    debug!("read_detail_rows: {} lines", res.len());
    Ok(res)
}
