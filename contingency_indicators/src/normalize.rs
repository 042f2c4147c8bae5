use crate::config::*;

/// A reported value after the percentage correction.
#[derive(PartialEq, Debug, Clone)]
pub enum CorrectedValue {
    Number(f64),
    /// Not a plain number (SI/NO, free text, ...). Kept as written.
    Raw(String),
}

/// The textual content of a cell, trimmed. Blank and error cells give an empty string.
pub fn cell_text(cell: &Cell) -> String {
    match cell {
        Cell::Empty | Cell::Error => "".to_string(),
        Cell::Text(s) => s.trim().to_string(),
        Cell::Number(f) if f.is_finite() => format!("{}", f),
        Cell::Number(_) => "".to_string(),
        Cell::Bool(true) => "True".to_string(),
        Cell::Bool(false) => "False".to_string(),
    }
}

/// Parses a number that may use a comma as decimal separator.
pub fn parse_decimal(s: &str) -> Option<f64> {
    let f = s.trim().replace(',', ".").parse::<f64>().ok()?;
    if f.is_finite() {
        Some(f)
    } else {
        None
    }
}

/// Some percentages are stored as fractions in the workbook: values in [0, 1]
/// are scaled to [0, 100]. Anything that does not parse is returned untouched.
pub fn correct_percentage(s: &str) -> CorrectedValue {
    match parse_decimal(s) {
        Some(f) if (0.0..=1.0).contains(&f) => CorrectedValue::Number(f * 100.0),
        Some(f) => CorrectedValue::Number(f),
        None => CorrectedValue::Raw(s.to_string()),
    }
}

/// Reads the indicator number of a row: float parse, then truncation.
pub fn indicator_number(cell: &Cell) -> Result<i64, SkipReason> {
    let f = match cell {
        Cell::Number(f) => *f,
        Cell::Text(s) if s.trim().is_empty() => return Err(SkipReason::BlankNumber),
        Cell::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| SkipReason::InvalidNumber(s.clone()))?,
        Cell::Empty => return Err(SkipReason::BlankNumber),
        c => return Err(SkipReason::InvalidNumber(cell_text(c))),
    };
    if !f.is_finite() {
        return Err(SkipReason::InvalidNumber(cell_text(cell)));
    }
    Ok(f.trunc() as i64)
}

/// The leading token of a category ("2.Vigilancia" -> 2), or the unclassified sentinel.
pub fn category_number(category: &str) -> i64 {
    if category.trim().is_empty() {
        return UNCLASSIFIED_CATEGORY;
    }
    category
        .split('.')
        .next()
        .and_then(|tok| tok.trim().parse::<i64>().ok())
        .unwrap_or(UNCLASSIFIED_CATEGORY)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corrected(s: &str) -> f64 {
        match correct_percentage(s) {
            CorrectedValue::Number(f) => f,
            CorrectedValue::Raw(r) => panic!("not a number: {}", r),
        }
    }

    #[test]
    fn fractions_become_percentages() {
        assert_eq!(corrected("0.42"), 42.0);
        assert_eq!(corrected("1"), 100.0);
        assert_eq!(corrected("0"), 0.0);
        assert_eq!(corrected("0,5"), 50.0);
    }

    #[test]
    fn values_above_one_are_unchanged() {
        assert_eq!(corrected("1.5"), 1.5);
        assert_eq!(corrected("60"), 60.0);
        for x in ["1.0001", "45", "250.75"] {
            let once = corrected(x);
            assert_eq!(corrected(&format!("{}", once)), once);
        }
    }

    #[test]
    fn text_is_returned_raw() {
        assert_eq!(correct_percentage("SI"), CorrectedValue::Raw("SI".to_string()));
        assert_eq!(
            correct_percentage("en proceso"),
            CorrectedValue::Raw("en proceso".to_string())
        );
        assert_eq!(correct_percentage("nan"), CorrectedValue::Raw("nan".to_string()));
        assert_eq!(correct_percentage("1,234.5"), CorrectedValue::Raw("1,234.5".to_string()));
    }

    #[test]
    fn cell_text_trims_and_blanks() {
        assert_eq!(cell_text(&Cell::Empty), "");
        assert_eq!(cell_text(&Cell::Error), "");
        assert_eq!(cell_text(&Cell::text("  SI ")), "SI");
        assert_eq!(cell_text(&Cell::Number(7.0)), "7");
        assert_eq!(cell_text(&Cell::Number(0.5)), "0.5");
        assert_eq!(cell_text(&Cell::Bool(true)), "True");
    }

    #[test]
    fn indicator_numbers() {
        assert_eq!(indicator_number(&Cell::Number(7.0)), Ok(7));
        assert_eq!(indicator_number(&Cell::Number(7.9)), Ok(7));
        assert_eq!(indicator_number(&Cell::text(" 12.0 ")), Ok(12));
        assert_eq!(indicator_number(&Cell::Empty), Err(SkipReason::BlankNumber));
        assert_eq!(indicator_number(&Cell::text("  ")), Err(SkipReason::BlankNumber));
        assert_eq!(
            indicator_number(&Cell::text("Total")),
            Err(SkipReason::InvalidNumber("Total".to_string()))
        );
        assert!(indicator_number(&Cell::Bool(true)).is_err());
        assert!(indicator_number(&Cell::text("inf")).is_err());
    }

    #[test]
    fn category_numbers() {
        assert_eq!(category_number("2.Vigilancia"), 2);
        assert_eq!(category_number("5. Comunicación"), 5);
        assert_eq!(category_number(""), UNCLASSIFIED_CATEGORY);
        assert_eq!(category_number("Vigilancia"), UNCLASSIFIED_CATEGORY);
        assert_eq!(category_number("2a. Otro"), UNCLASSIFIED_CATEGORY);
    }
}
