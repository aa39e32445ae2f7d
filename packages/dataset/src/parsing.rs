//! Shared coercion helpers for CSV cell values.
//!
//! Source files carry numbers as strings, sometimes with thousands
//! separators or placeholder text. These helpers coerce what they can and
//! return `None` for everything else so callers can count rejections.

/// Parses a numeric cell, tolerating surrounding whitespace and thousands
/// separators. Non-finite results are rejected — NaN and infinity must
/// never reach the aggregator.
#[must_use]
pub fn parse_value(raw: &str) -> Option<f64> {
    let cleaned = raw.trim().replace(',', "");
    if cleaned.is_empty() {
        return None;
    }
    let value: f64 = cleaned.parse().ok()?;
    value.is_finite().then_some(value)
}

/// Parses a year cell. Tolerates float-formatted years (`"2022.0"`) left
/// behind by spreadsheet exports.
#[must_use]
pub fn parse_year(raw: &str) -> Option<i32> {
    let trimmed = raw.trim();
    if let Ok(year) = trimmed.parse::<i32>() {
        return Some(year);
    }
    let as_float: f64 = trimmed.parse().ok()?;
    if as_float.fract() == 0.0 && (1000.0..=9999.0).contains(&as_float) {
        #[allow(clippy::cast_possible_truncation)]
        return Some(as_float as i32);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_numbers() {
        assert_eq!(parse_value("105.4"), Some(105.4));
        assert_eq!(parse_value(" 105.4 "), Some(105.4));
    }

    #[test]
    fn parses_thousands_separators() {
        assert_eq!(parse_value("1,407,563,842"), Some(1_407_563_842.0));
    }

    #[test]
    fn rejects_placeholder_text() {
        assert_eq!(parse_value(""), None);
        assert_eq!(parse_value("n/a"), None);
        assert_eq!(parse_value("NaN"), None);
        assert_eq!(parse_value("inf"), None);
    }

    #[test]
    fn parses_integer_and_float_years() {
        assert_eq!(parse_year("2022"), Some(2022));
        assert_eq!(parse_year("2022.0"), Some(2022));
        assert_eq!(parse_year("2022.5"), None);
        assert_eq!(parse_year("year"), None);
    }
}
