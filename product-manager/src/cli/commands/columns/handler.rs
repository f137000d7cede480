//! Columns command handler

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use super::ColumnsCommands;
use crate::config::Config;
use crate::table::{PicklistOption, RecordShape, build_columns, parse_field_list, resolve_fields};

pub fn handle_columns_command(args: ColumnsCommands, config: &Config) -> Result<()> {
    let fields = match &args.fields {
        Some(list) => parse_field_list(list).context("Invalid --fields")?,
        None => config.table.field_keys()?,
    };

    let options = match &args.options {
        Some(path) => read_options(path)?,
        None => Vec::new(),
    };

    let shape = if args.nested {
        RecordShape::Nested
    } else {
        config.table.record_shape
    };

    let columns = build_columns(&resolve_fields(&fields, shape), &options);
    let output = if args.compact {
        serde_json::to_string(&columns)
    } else {
        serde_json::to_string_pretty(&columns)
    }
    .context("Failed to format JSON output")?;

    println!("{}", output);
    Ok(())
}

fn read_options(path: &Path) -> Result<Vec<PicklistOption>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read options file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse options file: {}", path.display()))
}
