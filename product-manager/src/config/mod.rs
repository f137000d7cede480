//! Configuration loaded from `config.toml`

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::table::mapper::DEFAULT_DETAIL_LINK_TEMPLATE;
use crate::table::{
    FieldClassification, FieldKey, MapOptions, MissingFieldPolicy, RecordShape, RowSorter,
    TableError,
};

const CONFIG_DIR_NAME: &str = "product-manager";
const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub table: TableSettings,
}

/// `[table]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableSettings {
    /// Columns to show, in order
    pub fields: Vec<String>,
    /// Fields sorted as timestamps
    pub date_fields: Vec<String>,
    pub detail_link_template: String,
    /// IANA zone used to render `modDate`
    pub timezone: String,
    pub missing_field_policy: MissingFieldPolicy,
    pub record_shape: RecordShape,
}

impl Default for TableSettings {
    fn default() -> Self {
        let classification = FieldClassification::default();
        Self {
            fields: vec![
                "Name".to_string(),
                "Family".to_string(),
                "LastModifiedDate".to_string(),
            ],
            date_fields: classification.date_fields,
            detail_link_template: DEFAULT_DETAIL_LINK_TEMPLATE.to_string(),
            timezone: "UTC".to_string(),
            missing_field_policy: MissingFieldPolicy::default(),
            record_shape: RecordShape::default(),
        }
    }
}

impl TableSettings {
    pub fn field_keys(&self) -> Result<Vec<FieldKey>, TableError> {
        self.fields.iter().map(|f| f.parse()).collect()
    }

    pub fn timezone(&self) -> Result<Tz, TableError> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| TableError::InvalidTimezone(self.timezone.clone()))
    }

    pub fn classification(&self) -> FieldClassification {
        FieldClassification {
            date_fields: self.date_fields.clone(),
        }
    }

    pub fn map_options(&self) -> Result<MapOptions, TableError> {
        Ok(MapOptions {
            shape: self.record_shape,
            detail_link_template: self.detail_link_template.clone(),
            timezone: self.timezone()?,
        })
    }

    pub fn sorter(&self) -> Result<RowSorter, TableError> {
        Ok(RowSorter::new(self.classification(), self.timezone()?))
    }
}

impl Config {
    /// `<config dir>/product-manager/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Load from `path`, or from the default location
    ///
    /// An explicit path must exist. A missing default file yields the
    /// default configuration.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, explicit) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => match Self::default_path() {
                Some(path) => (path, false),
                None => {
                    log::debug!("No config directory available, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        if !path.exists() {
            if explicit {
                anyhow::bail!("Config file does not exist: {}", path.display());
            }
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config = Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check values that serde cannot
    pub fn validate(&self) -> Result<()> {
        self.table.field_keys()?;
        self.table.timezone()?;
        Ok(())
    }
}
