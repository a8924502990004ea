use std::str::FromStr;

/// Trims `raw` and drops it when nothing is left.
pub fn non_empty(raw: Option<String>) -> Option<String> {
    raw.map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Parses a trimmed, non-empty value, handing back the raw text on failure so
/// the caller can report which key was wrong.
pub fn parse_value<T: FromStr>(raw: Option<String>) -> Result<Option<T>, String> {
    match non_empty(raw) {
        Some(value) => value.parse().map(Some).map_err(|_| value),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_empty_trims_and_filters() {
        assert_eq!(non_empty(Some("  value ".into())), Some("value".into()));
        assert_eq!(non_empty(Some("   ".into())), None);
        assert_eq!(non_empty(None), None);
    }

    #[test]
    fn parse_value_reports_raw_text() {
        assert_eq!(parse_value::<u16>(Some(" 8080 ".into())), Ok(Some(8080)));
        assert_eq!(parse_value::<u16>(Some("".into())), Ok(None));
        assert_eq!(parse_value::<u16>(Some("eighty".into())), Err("eighty".into()));
    }
}
