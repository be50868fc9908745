//! Cell value cleaning.

use tabex_model::Cell;

const ISO_DATETIME: &str = "%Y-%m-%dT%H:%M:%S";

/// Converts a raw cell into trimmed text, or `None` when it holds nothing.
///
/// - dates render as ISO-8601 (`2024-03-09T14:05:00`)
/// - integral numbers render without a decimal point (`9876543210`)
/// - text is trimmed; whitespace-only text is `None`
pub fn clean_value(cell: &Cell) -> Option<String> {
    match cell {
        Cell::Empty => None,
        Cell::Text(value) => {
            let trimmed = value.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Cell::Int(value) => Some(value.to_string()),
        Cell::Float(value) => Some(format_number(*value)),
        Cell::DateTime(value) => Some(value.format(ISO_DATETIME).to_string()),
        Cell::Bool(value) => Some(value.to_string()),
        Cell::Error(value) => {
            let trimmed = value.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
    }
}

/// Phone numbers arrive as floats; `9876543210.0` must read `9876543210`.
fn format_number(value: f64) -> String {
    if value.is_finite() && value == value.trunc() {
        if value == 0.0 {
            return "0".to_string();
        }
        return format!("{value:.0}");
    }
    value.to_string()
}
