//! Filterer - substring match across a set of fields

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::row::DisplayRow;
use super::value::js_string;

/// How a field that is absent (or null) on a row is coerced before matching
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingFieldPolicy {
    /// Absent and null fields read as "", like the row mapper's defaults
    #[default]
    Empty,
    /// Browser coercion: absent reads as "undefined", null as "null"
    Undefined,
}

impl MissingFieldPolicy {
    fn coerce(&self, value: Option<&Value>) -> String {
        match (value, self) {
            (None, MissingFieldPolicy::Empty) | (Some(Value::Null), MissingFieldPolicy::Empty) => {
                String::new()
            }
            (None, MissingFieldPolicy::Undefined) => "undefined".to_string(),
            (Some(v), _) => js_string(v),
        }
    }
}

/// Keep rows where any of `fields` contains `needle`, ignoring case
///
/// An empty needle keeps every row that has at least one field to match
/// against; with no fields nothing is kept.
pub fn filter_rows<S: AsRef<str>>(
    rows: &[DisplayRow],
    fields: &[S],
    needle: &str,
    policy: MissingFieldPolicy,
) -> Vec<DisplayRow> {
    let needle = needle.to_lowercase();
    let kept: Vec<DisplayRow> = rows
        .iter()
        .filter(|row| {
            fields.iter().any(|field| {
                policy
                    .coerce(row.get(field.as_ref()))
                    .to_lowercase()
                    .contains(&needle)
            })
        })
        .cloned()
        .collect();

    log::debug!(
        "Filter '{}' kept {} of {} rows",
        needle,
        kept.len(),
        rows.len()
    );
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::row::records_from_json;
    use serde_json::json;

    fn rows() -> Vec<DisplayRow> {
        records_from_json(json!([
            {"Id": "1", "Name": "Widget", "Family": "Hardware"},
            {"Id": "2", "Name": "Gadget", "Family": "Software", "Quantity": 12},
            {"Id": "3", "Name": "Undefined Thing", "Family": null}
        ]))
        .into_iter()
        .map(DisplayRow::from)
        .collect()
    }

    fn ids(rows: &[DisplayRow]) -> Vec<String> {
        rows.iter().map(|r| r.text("Id")).collect()
    }

    #[test]
    fn test_empty_needle_keeps_everything() {
        let input = rows();
        assert_eq!(filter_rows(&input, &["Name"], "", MissingFieldPolicy::Empty), input);
    }

    #[test]
    fn test_no_fields_keeps_nothing() {
        let no_fields: [&str; 0] = [];
        assert!(filter_rows(&rows(), &no_fields, "", MissingFieldPolicy::Empty).is_empty());
        assert!(filter_rows(&rows(), &no_fields, "wid", MissingFieldPolicy::Empty).is_empty());
    }

    #[test]
    fn test_case_insensitive_match() {
        let single = records_from_json(json!([{"Name": "Widget"}]))
            .into_iter()
            .map(DisplayRow::from)
            .collect::<Vec<_>>();
        assert_eq!(filter_rows(&single, &["Name"], "WID", MissingFieldPolicy::Empty).len(), 1);
    }

    #[test]
    fn test_any_field_matches() {
        let kept = filter_rows(&rows(), &["Name", "Family"], "ware", MissingFieldPolicy::Empty);
        assert_eq!(ids(&kept), vec!["1", "2"]);
    }

    #[test]
    fn test_numbers_are_coerced() {
        let kept = filter_rows(&rows(), &["Quantity"], "12", MissingFieldPolicy::Empty);
        assert_eq!(ids(&kept), vec!["2"]);
    }

    #[test]
    fn test_no_match_returns_empty() {
        let kept = filter_rows(&rows(), &["Name"], "sprocket", MissingFieldPolicy::Empty);
        assert!(kept.is_empty());
    }

    #[test]
    fn test_missing_field_never_matches_by_default() {
        let kept = filter_rows(&rows(), &["Quantity"], "undef", MissingFieldPolicy::Empty);
        assert!(kept.is_empty());
        let kept = filter_rows(&rows(), &["Family"], "null", MissingFieldPolicy::Empty);
        assert!(kept.is_empty());
    }

    #[test]
    fn test_undefined_policy_reproduces_browser_coercion() {
        let kept = filter_rows(&rows(), &["Quantity"], "undef", MissingFieldPolicy::Undefined);
        assert_eq!(ids(&kept), vec!["1", "3"]);
        let kept = filter_rows(&rows(), &["Family"], "null", MissingFieldPolicy::Undefined);
        assert_eq!(ids(&kept), vec!["3"]);
    }

    #[test]
    fn test_filter_does_not_touch_input() {
        let input = rows();
        let before = input.clone();
        let _ = filter_rows(&input, &["Name"], "gad", MissingFieldPolicy::Empty);
        assert_eq!(input, before);
    }
}
