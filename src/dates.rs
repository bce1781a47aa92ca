//! Date parameters
//!
//! The API takes dates as compact `YYYYMMDD`. Callers may pass `2024-01-05`,
//! `2024/01/05` or `2024.01.05`; the separators are stripped and the result is
//! checked to be a real calendar date.

use crate::error::{Error, Result};
use chrono::{Local, NaiveDate};
use regex::Regex;
use std::sync::LazyLock;

/// Separators accepted between date components
static SEPARATORS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[-/.\s]").unwrap());

/// Compact API date format
const COMPACT_FORMAT: &str = "%Y%m%d";

/// Strip separators and validate the result as `YYYYMMDD`
pub fn compact_date(raw: &str) -> Result<String> {
    let compact = SEPARATORS.replace_all(raw.trim(), "");

    let well_formed = compact.len() == 8 && compact.bytes().all(|b| b.is_ascii_digit());
    if !well_formed || NaiveDate::parse_from_str(&compact, COMPACT_FORMAT).is_err() {
        return Err(Error::validation(format!(
            "invalid date '{raw}', expected YYYYMMDD or YYYY-MM-DD"
        )));
    }

    Ok(compact.into_owned())
}

/// Today's local date as `YYYYMMDD`
pub fn today() -> String {
    Local::now().format(COMPACT_FORMAT).to_string()
}

/// Trim a value and drop it if nothing is left
pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Date for an equities master request.
///
/// The configured override wins, then the caller's date, then today. Blank
/// strings count as absent.
pub fn resolve_master_date(date_override: Option<&str>, date: Option<&str>) -> Result<String> {
    if let Some(forced) = non_blank(date_override) {
        return compact_date(forced);
    }
    if let Some(date) = non_blank(date) {
        return compact_date(date);
    }
    Ok(today())
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("2024-01-05", "20240105" ; "iso dashes")]
    #[test_case("20240105", "20240105" ; "already compact")]
    #[test_case("2024/01/05", "20240105" ; "slashes")]
    #[test_case("2024.01.05", "20240105" ; "dots")]
    #[test_case(" 2024-01-05 ", "20240105" ; "surrounding whitespace")]
    fn test_compact_date(raw: &str, expected: &str) {
        assert_eq!(compact_date(raw).unwrap(), expected);
    }

    #[test_case("2024-1-5" ; "unpadded")]
    #[test_case("2024-13-01" ; "bad month")]
    #[test_case("2023-02-29" ; "not a leap year")]
    #[test_case("yesterday" ; "word")]
    #[test_case("" ; "empty")]
    fn test_compact_date_rejects(raw: &str) {
        assert!(matches!(compact_date(raw), Err(Error::Validation { .. })));
    }

    #[test]
    fn test_today_format() {
        let today = today();
        assert_eq!(today.len(), 8);
        assert!(NaiveDate::parse_from_str(&today, COMPACT_FORMAT).is_ok());
    }

    #[test]
    fn test_resolve_master_date_precedence() {
        assert_eq!(
            resolve_master_date(Some("2023-12-29"), Some("2024-01-05")).unwrap(),
            "20231229"
        );
        assert_eq!(
            resolve_master_date(None, Some("2024-01-05")).unwrap(),
            "20240105"
        );
        assert_eq!(
            resolve_master_date(Some("  "), Some("2024-01-05")).unwrap(),
            "20240105"
        );

        let before = today();
        let resolved = resolve_master_date(None, None).unwrap();
        let after = today();
        assert!(resolved == before || resolved == after);
    }

    #[test]
    fn test_resolve_master_date_blank_date_means_today() {
        let before = today();
        let resolved = resolve_master_date(None, Some("")).unwrap();
        assert!(resolved == before || resolved == today());
    }
}
