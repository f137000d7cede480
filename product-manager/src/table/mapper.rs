//! Row mapper - turns backend records into display rows

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::row::{
    DETAIL_LINK_FIELD, DisplayRow, FAMILY_FIELD, ID_FIELD, LAST_MODIFIED_FIELD, MOD_DATE_FIELD,
    NAME_FIELD, PARENT_FIELD, PRODUCT_NAME_FIELD, Record,
};
use super::value::{format_display_date, is_truthy, parse_timestamp, text_or_empty};

/// Record view page; `{id}` is replaced by the (URL-encoded) product id
pub const DEFAULT_DETAIL_LINK_TEMPLATE: &str = "/lightning/r/Product2/{id}/view";

/// Which shape of record the backend returns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordShape {
    /// Product records carrying `Name`/`Family` themselves
    #[default]
    Flat,
    /// Line items referencing their product through `Product2`
    Nested,
}

impl RecordShape {
    pub fn label(&self) -> &'static str {
        match self {
            RecordShape::Flat => "flat",
            RecordShape::Nested => "nested",
        }
    }
}

/// Options for a mapping pass
#[derive(Debug, Clone, PartialEq)]
pub struct MapOptions {
    pub shape: RecordShape,
    pub detail_link_template: String,
    /// Zone the `modDate` column is rendered in
    pub timezone: Tz,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            shape: RecordShape::Flat,
            detail_link_template: DEFAULT_DETAIL_LINK_TEMPLATE.to_string(),
            timezone: Tz::UTC,
        }
    }
}

impl MapOptions {
    pub fn nested() -> Self {
        Self {
            shape: RecordShape::Nested,
            ..Self::default()
        }
    }
}

/// Map every record to a display row, preserving order
pub fn map_records(records: &[Record], options: &MapOptions) -> Vec<DisplayRow> {
    log::trace!(
        "Mapping {} {} records",
        records.len(),
        options.shape.label()
    );
    records
        .iter()
        .map(|record| map_record(record, options))
        .collect()
}

/// Map a single record
///
/// Never fails: absent optional fields, including a missing `Product2`
/// on nested records, degrade to empty strings.
pub fn map_record(record: &Record, options: &MapOptions) -> DisplayRow {
    let mut row = DisplayRow::new(record.clone());

    let link_id = match options.shape {
        RecordShape::Flat => {
            row.set(FAMILY_FIELD, truthy_or_empty(record.get(FAMILY_FIELD)));
            text_or_empty(record.get(ID_FIELD))
        }
        RecordShape::Nested => {
            let parent = record.get(PARENT_FIELD).and_then(Value::as_object);
            let parent_field = |field: &str| parent.and_then(|p| p.get(field));

            row.set(PRODUCT_NAME_FIELD, truthy_or_empty(parent_field(NAME_FIELD)));
            row.set(FAMILY_FIELD, truthy_or_empty(parent_field(FAMILY_FIELD)));
            text_or_empty(parent_field(ID_FIELD))
        }
    };

    row.set(
        DETAIL_LINK_FIELD,
        Value::String(detail_link(&options.detail_link_template, &link_id)),
    );
    row.set(
        MOD_DATE_FIELD,
        Value::String(mod_date(record.get(LAST_MODIFIED_FIELD), options.timezone)),
    );

    row
}

/// Interpolate an id into a link template
pub fn detail_link(template: &str, id: &str) -> String {
    template.replace("{id}", &urlencoding::encode(id))
}

fn mod_date(value: Option<&Value>, timezone: Tz) -> String {
    value
        .and_then(|v| parse_timestamp(v, timezone))
        .map(|instant| format_display_date(instant, timezone))
        .unwrap_or_default()
}

/// `value ? value : ''`, keeping the JSON type when truthy
fn truthy_or_empty(value: Option<&Value>) -> Value {
    match value {
        Some(v) if is_truthy(Some(v)) => v.clone(),
        _ => Value::String(String::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::row::records_from_json;
    use serde_json::json;

    fn scenario_records() -> Vec<Record> {
        records_from_json(json!([
            {"Id": "1", "Family": null, "LastModifiedDate": "2024-01-01T10:00:00Z"},
            {"Id": "2", "Family": "Hardware", "LastModifiedDate": "2024-02-01T10:00:00Z"}
        ]))
    }

    #[test]
    fn test_map_preserves_count_and_order() {
        let records = scenario_records();
        let rows = map_records(&records, &MapOptions::default());

        assert_eq!(rows.len(), records.len());
        assert_eq!(rows[0].text("Id"), "1");
        assert_eq!(rows[1].text("Id"), "2");
    }

    #[test]
    fn test_map_empty_input() {
        assert!(map_records(&[], &MapOptions::default()).is_empty());
    }

    #[test]
    fn test_map_flat_scenario() {
        let rows = map_records(&scenario_records(), &MapOptions::default());

        assert_eq!(rows[0].get("Family"), Some(&json!("")));
        assert_eq!(rows[1].get("Family"), Some(&json!("Hardware")));

        assert_eq!(rows[0].text("modDate"), "Jan 1, 2024, 10:00 AM");
        assert_eq!(rows[1].text("modDate"), "Feb 1, 2024, 10:00 AM");

        assert!(rows[0].text("detail_link").contains("1"));
        assert_eq!(rows[1].text("detail_link"), "/lightning/r/Product2/2/view");
    }

    #[test]
    fn test_map_absent_family_defaults_to_empty() {
        let records = records_from_json(json!([{"Id": "9"}]));
        let rows = map_records(&records, &MapOptions::default());
        assert_eq!(rows[0].get("Family"), Some(&json!("")));
        assert_eq!(rows[0].text("modDate"), "");
    }

    #[test]
    fn test_map_leaves_input_untouched() {
        let records = scenario_records();
        let before = records.clone();
        let _ = map_records(&records, &MapOptions::default());
        assert_eq!(records, before);
        assert!(records[0].get("modDate").is_none());
    }

    #[test]
    fn test_map_nested_flattens_parent() {
        let records = records_from_json(json!([{
            "Id": "00k1",
            "Quantity": 3,
            "LastModifiedDate": "2024-05-06T18:30:00.000+0000",
            "Product2": {"Id": "01t9", "Name": "Gearbox", "Family": "Hardware"}
        }]));
        let rows = map_records(&records, &MapOptions::nested());

        assert_eq!(rows[0].text("Product2_Name"), "Gearbox");
        assert_eq!(rows[0].text("Family"), "Hardware");
        assert_eq!(rows[0].text("detail_link"), "/lightning/r/Product2/01t9/view");
        assert_eq!(rows[0].text("modDate"), "May 6, 2024, 6:30 PM");
        assert_eq!(rows[0].get("Quantity"), Some(&json!(3)));
    }

    #[test]
    fn test_map_nested_without_parent_degrades() {
        let records = records_from_json(json!([
            {"Id": "00k2", "Product2": null},
            {"Id": "00k3"}
        ]));
        let rows = map_records(&records, &MapOptions::nested());

        for row in &rows {
            assert_eq!(row.text("Product2_Name"), "");
            assert_eq!(row.text("Family"), "");
            assert_eq!(row.text("detail_link"), "/lightning/r/Product2//view");
        }
    }

    #[test]
    fn test_map_uses_configured_timezone() {
        let options = MapOptions {
            timezone: Tz::America__Los_Angeles,
            ..MapOptions::default()
        };
        let rows = map_records(&scenario_records(), &options);
        assert_eq!(rows[0].text("modDate"), "Jan 1, 2024, 2:00 AM");
    }

    #[test]
    fn test_detail_link_encodes_id() {
        assert_eq!(
            detail_link(DEFAULT_DETAIL_LINK_TEMPLATE, "a b/c"),
            "/lightning/r/Product2/a%20b%2Fc/view"
        );
    }
}
