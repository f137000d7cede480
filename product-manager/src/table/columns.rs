//! Column builder - column descriptors for the table renderer

use std::collections::HashMap;
use std::str::FromStr;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::error::TableError;
use super::mapper::RecordShape;
use super::row::{
    FAMILY_FIELD, ID_FIELD, MOD_DATE_FIELD, NAME_FIELD, PRODUCT_NAME_FIELD, QUANTITY_FIELD,
};

/// Field the renderer reads per-row actions from
pub const ROW_ACTIONS_FIELD: &str = "rowActions";

/// A column the table can be asked to show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldKey {
    Name,
    #[serde(rename = "Product2_Name")]
    ProductName,
    Quantity,
    #[serde(rename = "Amount__c")]
    Amount,
    #[serde(rename = "Discount__c")]
    Discount,
    Family,
    LastModifiedDate,
}

impl FieldKey {
    /// Key as the host passes it
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKey::Name => "Name",
            FieldKey::ProductName => "Product2_Name",
            FieldKey::Quantity => "Quantity",
            FieldKey::Amount => "Amount__c",
            FieldKey::Discount => "Discount__c",
            FieldKey::Family => "Family",
            FieldKey::LastModifiedDate => "LastModifiedDate",
        }
    }

    /// Row field the column is bound to
    ///
    /// Differs from the key only where the mapper derives a display field,
    /// e.g. `LastModifiedDate` is shown through `modDate`.
    pub fn display_field(&self) -> &'static str {
        match self {
            FieldKey::LastModifiedDate => MOD_DATE_FIELD,
            other => other.as_str(),
        }
    }

    /// Key whose column fits rows of `shape`
    ///
    /// Line items carry the product name as `Product2_Name`, so `Name` on
    /// a nested table becomes the `Product2_Name` column.
    pub fn for_shape(self, shape: RecordShape) -> FieldKey {
        match (self, shape) {
            (FieldKey::Name, RecordShape::Nested) => FieldKey::ProductName,
            (key, _) => key,
        }
    }

    pub fn all_variants() -> &'static [FieldKey] {
        &[
            FieldKey::Name,
            FieldKey::ProductName,
            FieldKey::Quantity,
            FieldKey::Amount,
            FieldKey::Discount,
            FieldKey::Family,
            FieldKey::LastModifiedDate,
        ]
    }
}

impl FromStr for FieldKey {
    type Err = TableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        FieldKey::all_variants()
            .iter()
            .copied()
            .find(|variant| variant.as_str() == key)
            .ok_or_else(|| TableError::UnknownField(key.to_string()))
    }
}

impl std::fmt::Display for FieldKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse a comma separated field list such as `"Name, Family"`
pub fn parse_field_list(list: &str) -> Result<Vec<FieldKey>, TableError> {
    list.replace(' ', "")
        .split(',')
        .filter(|key| !key.is_empty())
        .map(FieldKey::from_str)
        .collect()
}

/// Apply [`FieldKey::for_shape`] to every key
pub fn resolve_fields(fields: &[FieldKey], shape: RecordShape) -> Vec<FieldKey> {
    fields.iter().map(|key| key.for_shape(shape)).collect()
}

/// Renderer column types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Text,
    Currency,
    Number,
    Date,
    Picklist,
    Action,
}

/// One selectable value of an enumerated field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PicklistOption {
    pub label: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

impl PicklistOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            key: None,
        }
    }
}

/// Binds a sub-attribute to a row field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldBinding {
    #[serde(rename = "fieldName")]
    pub field_name: String,
}

impl FieldBinding {
    fn to(field: &str) -> Self {
        Self {
            field_name: field.to_string(),
        }
    }
}

/// Entry of the row-action menu
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowActionItem {
    pub label: String,
    pub name: String,
    #[serde(rename = "iconName")]
    pub icon_name: String,
}

/// Type-specific column attributes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TypeAttributes {
    Picklist {
        placeholder: String,
        options: Vec<PicklistOption>,
        value: FieldBinding,
        context: FieldBinding,
    },
    Date {
        year: String,
        month: String,
        day: String,
        hour: String,
        minute: String,
    },
    Action {
        #[serde(rename = "fieldName")]
        field_name: String,
        #[serde(rename = "rowActions")]
        row_actions: Vec<RowActionItem>,
        #[serde(rename = "menuAlignment")]
        menu_alignment: String,
    },
}

/// Column definition in the renderer's JSON shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDescriptor {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_name: Option<String>,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub sortable: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub editable: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub hide_default_actions: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_attributes: Option<TypeAttributes>,
}

impl ColumnDescriptor {
    fn field(label: &str, field: &str, column_type: ColumnType) -> Self {
        Self {
            label: Some(label.to_string()),
            field_name: Some(field.to_string()),
            column_type,
            sortable: true,
            editable: false,
            hide_default_actions: false,
            type_attributes: None,
        }
    }

    fn editable(mut self) -> Self {
        self.editable = true;
        self
    }

    fn hide_default_actions(mut self) -> Self {
        self.hide_default_actions = true;
        self
    }

    fn with_attributes(mut self, attributes: TypeAttributes) -> Self {
        self.type_attributes = Some(attributes);
        self
    }
}

static COLUMN_TEMPLATES: Lazy<HashMap<FieldKey, ColumnDescriptor>> = Lazy::new(|| {
    FieldKey::all_variants()
        .iter()
        .map(|key| (*key, column_template(*key)))
        .collect()
});

static ACTIONS_COLUMN: Lazy<ColumnDescriptor> = Lazy::new(|| ColumnDescriptor {
    label: None,
    field_name: None,
    column_type: ColumnType::Action,
    sortable: false,
    editable: false,
    hide_default_actions: false,
    type_attributes: Some(TypeAttributes::Action {
        field_name: ROW_ACTIONS_FIELD.to_string(),
        row_actions: vec![RowActionItem {
            label: "Details".to_string(),
            name: "detail".to_string(),
            icon_name: "utility:list".to_string(),
        }],
        menu_alignment: "auto".to_string(),
    }),
});

fn column_template(key: FieldKey) -> ColumnDescriptor {
    match key {
        FieldKey::Name => ColumnDescriptor::field("Name", NAME_FIELD, ColumnType::Text)
            .editable()
            .hide_default_actions(),
        FieldKey::ProductName => {
            ColumnDescriptor::field("Name", PRODUCT_NAME_FIELD, ColumnType::Text)
                .editable()
                .hide_default_actions()
        }
        FieldKey::Quantity => {
            ColumnDescriptor::field("Quantity", QUANTITY_FIELD, ColumnType::Number)
                .editable()
                .hide_default_actions()
        }
        FieldKey::Amount => {
            ColumnDescriptor::field("Amount", key.as_str(), ColumnType::Currency).editable()
        }
        FieldKey::Discount => {
            ColumnDescriptor::field("Discount", key.as_str(), ColumnType::Currency).editable()
        }
        FieldKey::Family => ColumnDescriptor::field("Family", FAMILY_FIELD, ColumnType::Picklist)
            .hide_default_actions()
            .with_attributes(TypeAttributes::Picklist {
                placeholder: "Choose Family".to_string(),
                options: Vec::new(),
                value: FieldBinding::to(FAMILY_FIELD),
                context: FieldBinding::to(ID_FIELD),
            }),
        FieldKey::LastModifiedDate => {
            ColumnDescriptor::field("Modified", MOD_DATE_FIELD, ColumnType::Date)
                .hide_default_actions()
                .with_attributes(TypeAttributes::Date {
                    year: "numeric".to_string(),
                    month: "short".to_string(),
                    day: "2-digit".to_string(),
                    hour: "2-digit".to_string(),
                    minute: "2-digit".to_string(),
                })
        }
    }
}

/// Build column descriptors for `fields`, in order, followed by the
/// "Actions" column
///
/// `options` become the selectable values of the Family picklist.
pub fn build_columns(fields: &[FieldKey], options: &[PicklistOption]) -> Vec<ColumnDescriptor> {
    log::debug!(
        "Building {} columns with {} picklist options",
        fields.len(),
        options.len()
    );

    fields
        .iter()
        .map(|key| {
            // every FieldKey has a template
            let mut column = COLUMN_TEMPLATES[key].clone();
            if let Some(TypeAttributes::Picklist { options: slot, .. }) =
                column.type_attributes.as_mut()
            {
                *slot = options.to_vec();
            }
            column
        })
        .chain(std::iter::once(ACTIONS_COLUMN.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn families() -> Vec<PicklistOption> {
        vec![
            PicklistOption::new("Hardware", "Hardware"),
            PicklistOption::new("Software", "Software"),
        ]
    }

    #[test]
    fn test_build_length_and_trailing_actions() {
        let fields = [FieldKey::Name, FieldKey::Family, FieldKey::LastModifiedDate];
        let columns = build_columns(&fields, &families());

        assert_eq!(columns.len(), fields.len() + 1);
        assert_eq!(columns.last().unwrap().column_type, ColumnType::Action);
    }

    #[test]
    fn test_build_with_no_fields_only_has_actions() {
        let columns = build_columns(&[], &[]);
        assert_eq!(columns.len(), 1);
        assert_eq!(columns[0].column_type, ColumnType::Action);
    }

    #[test]
    fn test_build_preserves_requested_order() {
        let fields = [FieldKey::LastModifiedDate, FieldKey::Quantity, FieldKey::Name];
        let columns = build_columns(&fields, &[]);
        let bound: Vec<_> = columns.iter().map(|c| c.field_name.as_deref()).collect();
        assert_eq!(bound, vec![Some("modDate"), Some("Quantity"), Some("Name"), None]);
    }

    #[test]
    fn test_family_picklist_embeds_options() {
        let columns = build_columns(&[FieldKey::Family], &families());
        match &columns[0].type_attributes {
            Some(TypeAttributes::Picklist { options, value, context, .. }) => {
                assert_eq!(options, &families());
                assert_eq!(value.field_name, "Family");
                assert_eq!(context.field_name, "Id");
            }
            other => panic!("expected picklist attributes, got {:?}", other),
        }
    }

    #[test]
    fn test_rebuild_picks_up_late_options() {
        let before = build_columns(&[FieldKey::Family], &[]);
        let after = build_columns(&[FieldKey::Family], &families());
        assert_ne!(before, after);
        // The template itself is never modified
        assert_eq!(build_columns(&[FieldKey::Family], &[]), before);
    }

    #[test]
    fn test_actions_column_json_shape() {
        let columns = build_columns(&[], &[]);
        assert_eq!(
            serde_json::to_value(&columns[0]).unwrap(),
            json!({
                "type": "action",
                "typeAttributes": {
                    "fieldName": "rowActions",
                    "rowActions": [
                        {"label": "Details", "name": "detail", "iconName": "utility:list"}
                    ],
                    "menuAlignment": "auto"
                }
            })
        );
    }

    #[test]
    fn test_name_column_json_shape() {
        let columns = build_columns(&[FieldKey::ProductName], &[]);
        assert_eq!(
            serde_json::to_value(&columns[0]).unwrap(),
            json!({
                "label": "Name",
                "fieldName": "Product2_Name",
                "type": "text",
                "sortable": true,
                "editable": true,
                "hideDefaultActions": true
            })
        );
    }

    #[test]
    fn test_field_key_parsing() {
        assert_eq!("Amount__c".parse::<FieldKey>(), Ok(FieldKey::Amount));
        assert_eq!(" Family ".parse::<FieldKey>(), Ok(FieldKey::Family));
        assert_eq!(
            "Owner".parse::<FieldKey>(),
            Err(TableError::UnknownField("Owner".to_string()))
        );
    }

    #[test]
    fn test_parse_field_list() {
        assert_eq!(
            parse_field_list("Name, Family,LastModifiedDate"),
            Ok(vec![FieldKey::Name, FieldKey::Family, FieldKey::LastModifiedDate])
        );
        assert_eq!(parse_field_list(""), Ok(vec![]));
        assert!(parse_field_list("Name,Bogus").is_err());
    }

    #[test]
    fn test_nested_name_binds_product_name() {
        let fields = [FieldKey::Name, FieldKey::Family, FieldKey::LastModifiedDate];

        let flat = build_columns(&resolve_fields(&fields, RecordShape::Flat), &[]);
        assert_eq!(flat[0].field_name.as_deref(), Some("Name"));

        let nested = build_columns(&resolve_fields(&fields, RecordShape::Nested), &[]);
        assert_eq!(nested[0].field_name.as_deref(), Some("Product2_Name"));
        assert_eq!(nested[0].label.as_deref(), Some("Name"));
        assert_eq!(nested[1].field_name.as_deref(), Some("Family"));
        assert_eq!(nested[2].field_name.as_deref(), Some("modDate"));
    }

    #[test]
    fn test_every_key_has_a_template() {
        for key in FieldKey::all_variants() {
            assert!(COLUMN_TEMPLATES.contains_key(key), "missing template for {}", key);
        }
    }
}
