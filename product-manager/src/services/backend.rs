//! Remote operations the table depends on
//!
//! The platform exposes these as opaque remote procedures; the table only
//! needs their shapes. `InMemoryBackend` implements them over a local
//! record set for the CLI and tests.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::Mutex;

use crate::table::row::{ID_FIELD, LAST_MODIFIED_FIELD, PARENT_FIELD, QUANTITY_FIELD};
use crate::table::value::js_string;
use crate::table::{PartialRecord, PicklistOption, Record, records_from_json};

/// Field linking a line item to its parent record
pub const PARENT_ID_FIELD: &str = "OpportunityId";

/// Product to add to a parent record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemConfig {
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "Quantity", default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
}

#[async_trait]
pub trait ProductBackend: Send + Sync {
    /// Rows belonging to `parent_id`
    async fn fetch_rows(&self, parent_id: &str) -> Result<Vec<Record>>;

    /// Add products to `parent_id`, returning the parent's rows afterwards
    async fn add_items(&self, parent_id: &str, configs: Vec<ItemConfig>) -> Result<Vec<Record>>;

    /// Write edited cells back; returns a status message
    async fn apply_mutation(&self, drafts: Vec<PartialRecord>) -> Result<String>;

    /// Delete a row; returns a status message
    async fn delete_row(&self, id: &str) -> Result<String>;

    /// Valid values of an enumerated field
    async fn fetch_enum_options(&self, field: &str) -> Result<Vec<PicklistOption>>;
}

/// On-disk layout accepted by [`InMemoryBackend::from_json_file`]
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct BackendFile {
    records: Vec<Value>,
    catalog: Vec<Value>,
    options: HashMap<String, Vec<PicklistOption>>,
}

#[derive(Debug, Default)]
struct BackendState {
    records: Vec<Record>,
    next_line_item: usize,
}

/// Backend over an in-memory record set
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    state: Mutex<BackendState>,
    /// Products that `add_items` can attach to a parent
    catalog: Vec<Record>,
    options: HashMap<String, Vec<PicklistOption>>,
}

impl InMemoryBackend {
    pub fn new(records: Vec<Record>) -> Self {
        Self {
            state: Mutex::new(BackendState {
                records,
                next_line_item: 1,
            }),
            ..Self::default()
        }
    }

    pub fn with_catalog(mut self, catalog: Vec<Record>) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_options(mut self, field: impl Into<String>, options: Vec<PicklistOption>) -> Self {
        self.options.insert(field.into(), options);
        self
    }

    /// Load records from a JSON file
    ///
    /// The file is either a bare array of records or an object with
    /// `records`, `catalog` and `options` keys.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read records file: {}", path.display()))?;
        Self::from_json_str(&content)
            .with_context(|| format!("Failed to parse records file: {}", path.display()))
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let json: Value = serde_json::from_str(content).context("Invalid JSON")?;
        let file = match json {
            Value::Array(records) => BackendFile {
                records,
                ..BackendFile::default()
            },
            other => serde_json::from_value(other).context("Unexpected records file layout")?,
        };

        let records = records_from_json(Value::Array(file.records));
        log::info!("Loaded {} records", records.len());

        let mut backend = Self::new(records).with_catalog(records_from_json(Value::Array(file.catalog)));
        backend.options = file.options;
        Ok(backend)
    }

    /// Snapshot of every record, regardless of parent
    pub async fn records(&self) -> Vec<Record> {
        self.state.lock().await.records.clone()
    }
}

/// An empty `parent_id` matches every record; otherwise the record's
/// `OpportunityId` must equal it
fn belongs_to(record: &Record, parent_id: &str) -> bool {
    if parent_id.is_empty() {
        return true;
    }
    match record.get(PARENT_ID_FIELD) {
        Some(value) if !value.is_null() => js_string(value) == parent_id,
        _ => false,
    }
}

fn record_id(record: &Record) -> Option<String> {
    record
        .get(ID_FIELD)
        .filter(|v| !v.is_null())
        .map(js_string)
}

fn now_timestamp() -> Value {
    Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true))
}

#[async_trait]
impl ProductBackend for InMemoryBackend {
    async fn fetch_rows(&self, parent_id: &str) -> Result<Vec<Record>> {
        let state = self.state.lock().await;
        let rows: Vec<Record> = state
            .records
            .iter()
            .filter(|record| belongs_to(record, parent_id))
            .cloned()
            .collect();
        log::debug!("Fetched {} rows for parent '{}'", rows.len(), parent_id);
        Ok(rows)
    }

    async fn add_items(&self, parent_id: &str, configs: Vec<ItemConfig>) -> Result<Vec<Record>> {
        // resolve every product before adding anything
        let products = configs
            .iter()
            .map(|config| {
                self.catalog
                    .iter()
                    .find(|p| record_id(p).as_deref() == Some(config.id.as_str()))
                    .ok_or_else(|| anyhow::anyhow!("Product {} not found", config.id))
            })
            .collect::<Result<Vec<&Record>>>()?;

        {
            let mut state = self.state.lock().await;
            for (config, product) in configs.iter().zip(products) {
                let line_id = format!("00k{:015}", state.next_line_item);
                state.next_line_item += 1;

                let mut item = Record::new();
                item.insert(ID_FIELD.to_string(), Value::String(line_id));
                item.insert(PARENT_ID_FIELD.to_string(), Value::String(parent_id.to_string()));
                item.insert(
                    QUANTITY_FIELD.to_string(),
                    serde_json::json!(config.quantity.unwrap_or(1.0)),
                );
                item.insert(PARENT_FIELD.to_string(), Value::Object(product.clone()));
                item.insert(LAST_MODIFIED_FIELD.to_string(), now_timestamp());
                state.records.push(item);
            }
            log::info!("Added {} items to '{}'", configs.len(), parent_id);
        }
        self.fetch_rows(parent_id).await
    }

    async fn apply_mutation(&self, drafts: Vec<PartialRecord>) -> Result<String> {
        let mut state = self.state.lock().await;

        // validate everything before touching any record
        let mut targets = Vec::with_capacity(drafts.len());
        for draft in &drafts {
            let id = record_id(draft).context("Draft values are missing an Id")?;
            let index = state
                .records
                .iter()
                .position(|r| record_id(r).as_deref() == Some(id.as_str()))
                .ok_or_else(|| anyhow::anyhow!("Record {} not found", id))?;
            targets.push(index);
        }

        for (index, draft) in targets.into_iter().zip(drafts.iter()) {
            let record = &mut state.records[index];
            for (field, value) in draft {
                record.insert(field.clone(), value.clone());
            }
            record.insert(LAST_MODIFIED_FIELD.to_string(), now_timestamp());
        }

        Ok(format!("Updated {} records", drafts.len()))
    }

    async fn delete_row(&self, id: &str) -> Result<String> {
        let mut state = self.state.lock().await;
        let before = state.records.len();
        state
            .records
            .retain(|r| record_id(r).as_deref() != Some(id));
        if state.records.len() == before {
            anyhow::bail!("Record {} not found", id);
        }
        Ok(format!("Deleted {}", id))
    }

    async fn fetch_enum_options(&self, field: &str) -> Result<Vec<PicklistOption>> {
        Ok(self.options.get(field).cloned().unwrap_or_default())
    }
}
