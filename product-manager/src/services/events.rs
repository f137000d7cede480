//! Typed events from the table renderer and the effects handed back to it

use serde::{Deserialize, Serialize};

use crate::table::{DisplayRow, PartialRecord};

/// Which filter input changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterInput {
    /// The Family picklist filter
    Family,
    /// The free-text filter across all visible columns
    Any,
}

/// Row-action menu entries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowActionName {
    Detail,
    Download,
    Delete,
    Add,
    #[serde(untagged)]
    Other(String),
}

impl RowActionName {
    pub fn parse(name: &str) -> Self {
        match name {
            "detail" => RowActionName::Detail,
            "download" => RowActionName::Download,
            "delete" => RowActionName::Delete,
            "add" => RowActionName::Add,
            other => RowActionName::Other(other.to_string()),
        }
    }
}

/// Something the user did in the table
#[derive(Debug, Clone, PartialEq)]
pub enum TableEvent {
    /// Header sort clicked; `direction` is the raw renderer token
    SortChange { field: String, direction: String },
    /// Inline edits saved
    CellEditCommit { drafts: Vec<PartialRecord> },
    /// A row-action menu entry was picked
    RowAction { row_id: String, action: RowActionName },
    /// Family picked from the inline picklist of a row
    FamilyChange { record_id: String, family: String },
    /// A filter input changed; `None` (or "") clears it
    FilterChange {
        input: FilterInput,
        value: Option<String>,
    },
    /// Products were selected in a catalog section for adding
    ItemsSelected {
        name: String,
        selected: Vec<DisplayRow>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationVariant {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

/// User-visible toast
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub message: String,
    pub variant: NotificationVariant,
}

impl Notification {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            title: "Info".to_string(),
            message: message.into(),
            variant: NotificationVariant::Info,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            title: "Success".to_string(),
            message: message.into(),
            variant: NotificationVariant::Success,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            title: "Error".to_string(),
            message: message.into(),
            variant: NotificationVariant::Error,
        }
    }
}

/// What the host should do after an event was handled
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableEffect {
    Notify(Notification),
    /// Open a link in a new tab
    Open(String),
}
