use crate::config::*;

/// The non-blank reported values of a record for the given periods, trimmed
/// and upper-cased.
fn reported_values(record: &IndicatorRecord, periods: &[String]) -> Vec<String> {
    periods
        .iter()
        .filter_map(|p| record.measurement(p))
        .map(|m| m.value.trim().to_uppercase())
        .filter(|v| !v.is_empty())
        .collect()
}

pub fn is_yes_no(value: &str) -> bool {
    let v = value.trim().to_uppercase();
    v == "SI" || v == "NO"
}

/// Decides how an indicator should be rendered, from the values actually reported.
pub fn classify(record: &IndicatorRecord, periods: &[String]) -> IndicatorType {
    let values = reported_values(record, periods);
    if values.is_empty() {
        IndicatorType::NoData
    } else if values.iter().all(|v| is_yes_no(v)) {
        IndicatorType::Qualitative
    } else {
        IndicatorType::Quantitative
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_with_values(values: &[&str]) -> IndicatorRecord {
        IndicatorRecord {
            number: 1,
            category: "1.".to_string(),
            category_number: 1,
            name: "n".to_string(),
            kind: "Proceso".to_string(),
            definition: "".to_string(),
            period_values: values
                .iter()
                .enumerate()
                .map(|(idx, v)| {
                    (
                        format!("P{}", idx + 1),
                        PeriodMeasurement {
                            value: v.to_string(),
                            ..Default::default()
                        },
                    )
                })
                .collect(),
        }
    }

    fn periods() -> Vec<String> {
        vec!["P1".to_string(), "P2".to_string(), "P3".to_string()]
    }

    #[test]
    fn yes_no_is_qualitative() {
        let r = record_with_values(&["SI", "NO", "SI"]);
        assert_eq!(classify(&r, &periods()), IndicatorType::Qualitative);
        let r = record_with_values(&["si", " No ", ""]);
        assert_eq!(classify(&r, &periods()), IndicatorType::Qualitative);
    }

    #[test]
    fn any_number_is_quantitative() {
        let r = record_with_values(&["SI", "45", ""]);
        assert_eq!(classify(&r, &periods()), IndicatorType::Quantitative);
        let r = record_with_values(&["", "", "pendiente de envío"]);
        assert_eq!(classify(&r, &periods()), IndicatorType::Quantitative);
    }

    #[test]
    fn blanks_are_no_data() {
        let r = record_with_values(&["", "", ""]);
        assert_eq!(classify(&r, &periods()), IndicatorType::NoData);
        assert_eq!(classify(&r, &[]), IndicatorType::NoData);
    }

    #[test]
    fn only_requested_periods_count() {
        let r = record_with_values(&["SI", "NO", "12"]);
        let first_two = vec!["P1".to_string(), "P2".to_string()];
        assert_eq!(classify(&r, &first_two), IndicatorType::Qualitative);
        assert_eq!(classify(&r, &["P9".to_string()]), IndicatorType::NoData);
    }
}
