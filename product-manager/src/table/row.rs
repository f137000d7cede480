//! Record and display-row types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::value::{js_string, text_or_empty};

/// A raw backend record as returned by the platform
pub type Record = Map<String, Value>;

/// Draft cell values committed by the table (always carries `Id`)
pub type PartialRecord = Map<String, Value>;

pub const ID_FIELD: &str = "Id";
pub const NAME_FIELD: &str = "Name";
pub const FAMILY_FIELD: &str = "Family";
pub const QUANTITY_FIELD: &str = "Quantity";
pub const LAST_MODIFIED_FIELD: &str = "LastModifiedDate";
/// Parent product reference on opportunity line items
pub const PARENT_FIELD: &str = "Product2";
pub const PRODUCT_NAME_FIELD: &str = "Product2_Name";
pub const MOD_DATE_FIELD: &str = "modDate";
pub const DETAIL_LINK_FIELD: &str = "detail_link";
pub const DOWNLOAD_LINK_FIELD: &str = "download_link";

/// A record plus the derived display fields the table binds to
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DisplayRow {
    fields: Map<String, Value>,
}

impl DisplayRow {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Field rendered as text, with null/absent/falsy values as ""
    pub fn text(&self, field: &str) -> String {
        text_or_empty(self.fields.get(field))
    }

    /// Record identifier, if present
    pub fn id(&self) -> Option<String> {
        self.fields
            .get(ID_FIELD)
            .filter(|v| !v.is_null())
            .map(js_string)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn into_fields(self) -> Map<String, Value> {
        self.fields
    }

    pub(crate) fn set(&mut self, field: &str, value: Value) {
        self.fields.insert(field.to_string(), value);
    }
}

impl From<Record> for DisplayRow {
    fn from(fields: Record) -> Self {
        Self::new(fields)
    }
}

/// Collect records from a JSON array, skipping anything that is not an object
pub fn records_from_json(value: Value) -> Vec<Record> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::Object(map) => Some(map),
                other => {
                    log::warn!("Skipping non-object record: {}", other);
                    None
                }
            })
            .collect(),
        Value::Object(map) => vec![map],
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_and_id_accessors() {
        let records = records_from_json(json!([{"Id": "01t1", "Name": "Widget", "Family": null}]));
        let row = DisplayRow::from(records[0].clone());

        assert_eq!(row.id().as_deref(), Some("01t1"));
        assert_eq!(row.text("Name"), "Widget");
        assert_eq!(row.text("Family"), "");
        assert_eq!(row.text("Missing"), "");
    }

    #[test]
    fn test_records_from_json_skips_scalars() {
        let records = records_from_json(json!([{"Id": "1"}, 7, "x", {"Id": "2"}]));
        assert_eq!(records.len(), 2);
        assert_eq!(records[1]["Id"], json!("2"));
    }

    #[test]
    fn test_display_row_serializes_flat() {
        let mut row = DisplayRow::default();
        row.set("Id", json!("1"));
        assert_eq!(serde_json::to_value(&row).unwrap(), json!({"Id": "1"}));
    }
}
