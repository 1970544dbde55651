//! Cell values and the row abstraction the table sorts over.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::hash::BuildHasher;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::{Map, Value};

/// A sortable value read out of a row.
///
/// ISO timestamps travel as [`CellValue::Text`]; the default comparator
/// recognises them when both sides parse.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Number(f64),
    Text(String),
}

impl CellValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Number(_) => None,
        }
    }

    /// Parses a text value as a timestamp.
    ///
    /// Accepts RFC 3339, naive `YYYY-MM-DDTHH:MM:SS[.f]` (read as UTC) and
    /// plain `YYYY-MM-DD`. Numbers are never treated as dates.
    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        let text = self.as_text()?.trim();

        if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
            return Some(parsed.with_timezone(&Utc));
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
            return Some(naive.and_utc());
        }
        NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Whole numbers print without a trailing ".0" so that lexical
            // fallback ordering matches what the user sees.
            Self::Number(n) if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<u32> for CellValue {
    fn from(value: u32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Orders two present cell values.
///
/// Numbers compare numerically, two parseable timestamps compare
/// chronologically, anything else compares by its string form
/// (case-sensitive).
pub fn default_compare(a: &CellValue, b: &CellValue) -> Ordering {
    if let (CellValue::Number(x), CellValue::Number(y)) = (a, b) {
        return x.total_cmp(y);
    }
    match (a.as_timestamp(), b.as_timestamp()) {
        (Some(x), Some(y)) => x.cmp(&y),
        _ => a.to_string().cmp(&b.to_string()),
    }
}

/// A row the table can read sortable values from.
///
/// `None` marks the field as null for that row. Null-ness decides placement
/// for every column, including columns with their own comparator: null rows
/// always go after the non-null ones.
pub trait TableRow {
    fn cell(&self, field: &str) -> Option<CellValue>;
}

fn json_cell(value: &Value) -> Option<CellValue> {
    match value {
        Value::Null => None,
        Value::Number(n) => n.as_f64().map(CellValue::Number),
        Value::String(s) => Some(CellValue::Text(s.clone())),
        Value::Bool(b) => Some(CellValue::Text(b.to_string())),
        Value::Array(_) | Value::Object(_) => Some(CellValue::Text(value.to_string())),
    }
}

/// Dotted fields (`totalProducts.total`) walk into nested objects.
impl TableRow for Map<String, Value> {
    fn cell(&self, field: &str) -> Option<CellValue> {
        let mut parts = field.split('.');
        let first = self.get(parts.next()?)?;
        let leaf = parts.try_fold(first, |value, key| value.get(key))?;
        json_cell(leaf)
    }
}

impl TableRow for Value {
    fn cell(&self, field: &str) -> Option<CellValue> {
        self.as_object()?.cell(field)
    }
}

impl<S: BuildHasher> TableRow for HashMap<String, CellValue, S> {
    fn cell(&self, field: &str) -> Option<CellValue> {
        self.get(field).cloned()
    }
}

impl TableRow for BTreeMap<String, CellValue> {
    fn cell(&self, field: &str) -> Option<CellValue> {
        self.get(field).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numbers_compare_numerically() {
        let a = CellValue::from(9_i64);
        let b = CellValue::from(10_i64);
        assert_eq!(default_compare(&a, &b), Ordering::Less);
    }

    #[test]
    fn dates_compare_chronologically() {
        let a = CellValue::from("2024-02-01T00:00:00Z");
        let b = CellValue::from("2023-12-31");
        assert_eq!(default_compare(&a, &b), Ordering::Greater);
    }

    #[test]
    fn mixed_values_fall_back_to_lexical_order() {
        let number = CellValue::from(10_i64);
        let text = CellValue::from("9 apples");
        assert_eq!(default_compare(&number, &text), Ordering::Less);
    }

    #[test]
    fn lexical_order_is_case_sensitive() {
        let upper = CellValue::from("Zed");
        let lower = CellValue::from("alpha");
        assert_eq!(default_compare(&upper, &lower), Ordering::Less);
    }

    #[test]
    fn plain_words_are_not_dates() {
        assert!(CellValue::from("alpha").as_timestamp().is_none());
        assert!(CellValue::from(20240101_i64).as_timestamp().is_none());
    }

    #[test]
    fn whole_numbers_display_without_fraction() {
        assert_eq!(CellValue::from(42_i64).to_string(), "42");
        assert_eq!(CellValue::from(2.5).to_string(), "2.5");
    }

    #[test]
    fn json_rows_resolve_nested_fields_and_nulls() {
        let row = json!({
            "name": "Asha",
            "missing": null,
            "totalProducts": { "total": 4 }
        });

        assert_eq!(row.cell("name"), Some(CellValue::from("Asha")));
        assert_eq!(row.cell("missing"), None);
        assert_eq!(row.cell("absent"), None);
        assert_eq!(row.cell("totalProducts.total"), Some(CellValue::Number(4.0)));
        assert_eq!(row.cell("totalProducts.started"), None);
    }
}
