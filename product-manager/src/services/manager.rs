//! Product table controller
//!
//! Owns the row set behind one table: the full mapped set, the currently
//! visible subset, the header sort state and the two filter inputs. Every
//! renderer event goes through [`ProductTable::handle`], which talks to the
//! backend where needed and returns the effects for the host to apply.

use anyhow::Result;
use serde_json::Value;

use super::backend::{ItemConfig, ProductBackend};
use super::events::{FilterInput, Notification, RowActionName, TableEffect, TableEvent};
use crate::config::TableSettings;
use crate::table::row::{
    DETAIL_LINK_FIELD, DOWNLOAD_LINK_FIELD, FAMILY_FIELD, ID_FIELD, QUANTITY_FIELD,
};
use crate::table::{
    ColumnDescriptor, DisplayRow, FieldKey, MapOptions, MissingFieldPolicy, PartialRecord,
    PicklistOption, Record, RecordShape, RowSorter, TableError, build_columns, filter_rows,
    map_records, resolve_fields,
};

pub const DEFAULT_SORT_FIELD: &str = "LastModifiedDate";
pub const DEFAULT_SORT_DIRECTION: &str = "desc";

/// Option of the Family filter picklist (`value` is `None` for "no filter")
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOption {
    pub label: String,
    pub value: Option<String>,
    pub key: String,
}

#[derive(Debug)]
pub struct ProductTable {
    parent_id: String,
    fields: Vec<FieldKey>,
    map_options: MapOptions,
    sorter: RowSorter,
    missing_field_policy: MissingFieldPolicy,
    picklist: Vec<PicklistOption>,
    all_rows: Vec<DisplayRow>,
    viewable_rows: Vec<DisplayRow>,
    sorted_by: String,
    sorted_direction: String,
    current_family: Option<String>,
    current_any: Option<String>,
}

impl ProductTable {
    pub fn new(parent_id: impl Into<String>) -> Self {
        Self {
            parent_id: parent_id.into(),
            fields: vec![FieldKey::Name, FieldKey::Family, FieldKey::LastModifiedDate],
            map_options: MapOptions::default(),
            sorter: RowSorter::default(),
            missing_field_policy: MissingFieldPolicy::default(),
            picklist: Vec::new(),
            all_rows: Vec::new(),
            viewable_rows: Vec::new(),
            sorted_by: DEFAULT_SORT_FIELD.to_string(),
            sorted_direction: DEFAULT_SORT_DIRECTION.to_string(),
            current_family: None,
            current_any: None,
        }
    }

    pub fn from_settings(
        parent_id: impl Into<String>,
        settings: &TableSettings,
    ) -> Result<Self, TableError> {
        Ok(Self {
            fields: settings.field_keys()?,
            map_options: settings.map_options()?,
            sorter: settings.sorter()?,
            missing_field_policy: settings.missing_field_policy,
            ..Self::new(parent_id)
        })
    }

    pub fn with_fields(mut self, fields: Vec<FieldKey>) -> Self {
        self.fields = fields;
        self
    }

    pub fn with_map_options(mut self, options: MapOptions) -> Self {
        self.map_options = options;
        self
    }

    /// Rows currently shown
    pub fn rows(&self) -> &[DisplayRow] {
        &self.viewable_rows
    }

    /// Every mapped row, ignoring filters
    pub fn all_rows(&self) -> &[DisplayRow] {
        &self.all_rows
    }

    pub fn sorted_by(&self) -> &str {
        &self.sorted_by
    }

    pub fn sorted_direction(&self) -> &str {
        &self.sorted_direction
    }

    pub fn current_family(&self) -> Option<&str> {
        self.current_family.as_deref()
    }

    pub fn current_any(&self) -> Option<&str> {
        self.current_any.as_deref()
    }

    /// Replace the row set; clears any filtered view
    pub fn set_records(&mut self, records: &[Record]) {
        self.all_rows = map_records(records, &self.map_options);
        self.viewable_rows = self.all_rows.clone();
    }

    /// Re-fetch and re-map the rows of the parent record
    pub async fn refresh(&mut self, backend: &dyn ProductBackend) -> Result<()> {
        let records = backend.fetch_rows(&self.parent_id).await?;
        self.set_records(&records);
        log::debug!("Refreshed {} rows for '{}'", self.all_rows.len(), self.parent_id);
        Ok(())
    }

    /// Load the Family picklist values
    ///
    /// The options usually arrive after the first render, so columns must be
    /// rebuilt afterwards.
    pub async fn load_options(&mut self, backend: &dyn ProductBackend) -> Result<()> {
        self.picklist = backend.fetch_enum_options(FAMILY_FIELD).await?;
        log::debug!("Loaded {} family options", self.picklist.len());
        Ok(())
    }

    /// Family options keyed for the renderer
    pub fn families(&self) -> Vec<PicklistOption> {
        self.picklist
            .iter()
            .enumerate()
            .map(|(i, option)| PicklistOption {
                label: option.label.clone(),
                value: option.value.clone(),
                key: Some(format!("_k{}", i)),
            })
            .collect()
    }

    /// Family filter choices, led by a "(No Filter)" entry
    pub fn filter_families(&self) -> Vec<FilterOption> {
        std::iter::once(FilterOption {
            label: "(No Filter)".to_string(),
            value: None,
            key: "noFilterZero".to_string(),
        })
        .chain(self.families().into_iter().map(|option| FilterOption {
            label: option.label,
            value: Some(option.value),
            key: option.key.unwrap_or_default(),
        }))
        .collect()
    }

    /// Configured fields as they apply to the row shape
    pub fn fields(&self) -> Vec<FieldKey> {
        resolve_fields(&self.fields, self.map_options.shape)
    }

    pub fn columns(&self) -> Vec<ColumnDescriptor> {
        build_columns(&self.fields(), &self.families())
    }

    /// Row fields searched by the "Any" filter
    pub fn mapped_fields(&self) -> Vec<String> {
        self.fields()
            .iter()
            .map(|key| key.display_field().to_string())
            .collect()
    }

    /// Handle one renderer event
    pub async fn handle(
        &mut self,
        backend: &dyn ProductBackend,
        event: TableEvent,
    ) -> Vec<TableEffect> {
        match event {
            TableEvent::SortChange { field, direction } => {
                self.sort_changed(field, direction);
                Vec::new()
            }
            TableEvent::FilterChange { input, value } => {
                self.filter_changed(input, value);
                Vec::new()
            }
            TableEvent::RowAction { row_id, action } => {
                self.row_action(backend, &row_id, action).await
            }
            TableEvent::CellEditCommit { drafts } => self.save_drafts(backend, drafts).await,
            TableEvent::FamilyChange { record_id, .. }
                if self.map_options.shape == RecordShape::Nested =>
            {
                // line items show the Family of their product
                log::warn!("Ignoring Family change on line item {}", record_id);
                vec![TableEffect::Notify(Notification::info(
                    "Family belongs to the product and cannot be changed on a line item",
                ))]
            }
            TableEvent::FamilyChange { record_id, family } => {
                let mut draft = PartialRecord::new();
                draft.insert(ID_FIELD.to_string(), Value::String(record_id));
                draft.insert(FAMILY_FIELD.to_string(), Value::String(family));
                self.save_drafts(backend, vec![draft]).await
            }
            TableEvent::ItemsSelected { name, selected } => {
                self.add_selected(backend, &name, &selected).await
            }
        }
    }

    fn sort_changed(&mut self, field: String, direction: String) {
        self.viewable_rows = self.sorter.sort(&self.viewable_rows, &field, &direction);
        self.sorted_by = field;
        self.sorted_direction = direction;
    }

    fn filter_changed(&mut self, input: FilterInput, value: Option<String>) {
        let value = value.filter(|v| !v.is_empty());
        match input {
            FilterInput::Family => self.current_family = value.clone(),
            FilterInput::Any => self.current_any = value.clone(),
        }

        let policy = self.missing_field_policy;
        let family_field = [FAMILY_FIELD];
        let current_family = self.current_family.clone();
        let current_any = self.current_any.clone();

        self.viewable_rows = match (
            value.as_deref(),
            input,
            current_family.as_deref(),
            current_any.as_deref(),
        ) {
            // Any cleared, Family still set
            (None, FilterInput::Any, Some(family), _) => {
                self.current_any = None;
                filter_rows(&self.all_rows, &family_field, family, policy)
            }
            // Family cleared, Any still set
            (None, FilterInput::Family, _, Some(any)) => {
                self.current_family = None;
                filter_rows(&self.all_rows, &self.mapped_fields(), any, policy)
            }
            // Any typed while a Family is selected
            (Some(any), FilterInput::Any, Some(family), _) => {
                let possibles = filter_rows(&self.all_rows, &family_field, family, policy);
                filter_rows(&possibles, &self.mapped_fields(), any, policy)
            }
            (None, _, _, _) => self.all_rows.clone(),
            (Some(needle), input, _, _) => {
                let fields = match input {
                    FilterInput::Any => self.mapped_fields(),
                    FilterInput::Family => vec![FAMILY_FIELD.to_string()],
                };
                filter_rows(&self.all_rows, &fields, needle, policy)
            }
        };
    }

    async fn row_action(
        &mut self,
        backend: &dyn ProductBackend,
        row_id: &str,
        action: RowActionName,
    ) -> Vec<TableEffect> {
        let Some(row) = self
            .all_rows
            .iter()
            .find(|r| r.id().as_deref() == Some(row_id))
        else {
            log::warn!("Row action {:?} for unknown row {}", action, row_id);
            return Vec::new();
        };

        match action {
            RowActionName::Detail => open_link(row, DETAIL_LINK_FIELD),
            RowActionName::Download => open_link(row, DOWNLOAD_LINK_FIELD),
            RowActionName::Delete => self.delete(backend, row_id).await,
            RowActionName::Add => {
                log::info!("Add requested for row {}", row_id);
                Vec::new()
            }
            RowActionName::Other(name) => {
                log::debug!("Ignoring row action '{}'", name);
                Vec::new()
            }
        }
    }

    async fn delete(&mut self, backend: &dyn ProductBackend, id: &str) -> Vec<TableEffect> {
        let result = async {
            let status = backend.delete_row(id).await?;
            self.refresh(backend).await?;
            Ok::<_, anyhow::Error>(status)
        }
        .await;
        notify(result)
    }

    async fn save_drafts(
        &mut self,
        backend: &dyn ProductBackend,
        drafts: Vec<PartialRecord>,
    ) -> Vec<TableEffect> {
        let result = async {
            let status = backend.apply_mutation(drafts).await?;
            self.refresh(backend).await?;
            Ok::<_, anyhow::Error>(status)
        }
        .await;
        notify(result)
    }

    async fn add_selected(
        &mut self,
        backend: &dyn ProductBackend,
        name: &str,
        selected: &[DisplayRow],
    ) -> Vec<TableEffect> {
        let configs: Vec<ItemConfig> = selected
            .iter()
            .map(|row| ItemConfig {
                id: row.id().unwrap_or_default(),
                quantity: row.get(QUANTITY_FIELD).and_then(Value::as_f64),
            })
            .collect();

        match backend.add_items(&self.parent_id, configs).await {
            Ok(records) => {
                self.set_records(&records);
                vec![TableEffect::Notify(Notification::success(format!(
                    "Added {} from {}",
                    selected.len(),
                    name
                )))]
            }
            Err(e) => {
                log::error!("Failed to add items from {}: {:#}", name, e);
                vec![TableEffect::Notify(Notification::error(e.to_string()))]
            }
        }
    }
}

fn open_link(row: &DisplayRow, field: &str) -> Vec<TableEffect> {
    let link = row.text(field);
    if link.is_empty() {
        return Vec::new();
    }
    vec![TableEffect::Open(link)]
}

fn notify(result: Result<String>) -> Vec<TableEffect> {
    match result {
        Ok(status) => vec![TableEffect::Notify(Notification::success(status))],
        Err(e) => {
            log::error!("Remote call failed: {:#}", e);
            vec![TableEffect::Notify(Notification::error(e.to_string()))]
        }
    }
}
