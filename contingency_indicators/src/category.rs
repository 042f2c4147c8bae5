/// Label used when a record has no category at all.
pub const UNCLASSIFIED_LABEL: &str = "Unclassified";

const MAX_UNKNOWN_LABEL_CHARS: usize = 50;

/// The strategic lines of the contingency plan, keyed by their leading token.
const KNOWN_CATEGORIES: [(&str, &str); 5] = [
    ("1.", "1. Gestión integral de la contingencia"),
    ("2.", "2. Intensificación de la vigilancia"),
    ("3.", "3. Promoción de la salud y prevención"),
    ("4.", "4. Atención integral de casos"),
    ("5.", "5. Comunicación del riesgo y comunitaria"),
];

/// Maps the free-text category of a record onto its grouping label.
///
/// Known leading tokens map to the plan's strategic lines, other texts are kept
/// (truncated), and blank categories are unclassified.
pub fn category_label(category: &str) -> String {
    if category.trim().is_empty() {
        return UNCLASSIFIED_LABEL.to_string();
    }
    let token = format!("{}.", category.split('.').next().unwrap_or(""));
    KNOWN_CATEGORIES
        .iter()
        .find(|(key, _)| *key == token)
        .map(|(_, label)| label.to_string())
        .unwrap_or_else(|| category.chars().take(MAX_UNKNOWN_LABEL_CHARS).collect())
}

/// The part of a label after its number, used in compact tables.
pub fn short_label(label: &str, max_chars: usize) -> String {
    let name = match label.split_once('.') {
        Some((_, rest)) => rest.split('.').next().unwrap_or("").trim(),
        None => label,
    };
    if name.chars().count() > max_chars {
        format!("{}...", name.chars().take(max_chars).collect::<String>())
    } else {
        name.to_string()
    }
}
