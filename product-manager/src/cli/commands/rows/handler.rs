//! Rows command handler

use anyhow::{Context, Result};
use colored::*;
use serde_json::Value;
use unicode_width::UnicodeWidthStr;

use super::{OutputFormat, RowsCommands};
use crate::config::Config;
use crate::services::{FilterInput, InMemoryBackend, ProductTable, TableEvent};
use crate::table::value::js_string;
use crate::table::{ColumnType, DisplayRow, RecordShape, parse_field_list};

/// Load the records file, apply filters and sort, and print the rows
pub async fn handle_rows_command(args: RowsCommands, config: &Config) -> Result<()> {
    if args.no_color {
        colored::control::set_override(false);
    }

    if !args.file.exists() {
        anyhow::bail!("Records file does not exist: {}", args.file.display());
    }

    let mut settings = config.table.clone();
    if let Some(fields) = &args.fields {
        settings.fields = parse_field_list(fields)
            .context("Invalid --fields")?
            .iter()
            .map(|key| key.as_str().to_string())
            .collect();
    }
    if args.nested {
        settings.record_shape = RecordShape::Nested;
    }

    let backend = InMemoryBackend::from_json_file(&args.file)?;
    let mut table = ProductTable::from_settings(args.parent.clone(), &settings)?;
    table
        .refresh(&backend)
        .await
        .context("Failed to load rows")?;
    table
        .load_options(&backend)
        .await
        .context("Failed to load family options")?;

    if let Some(family) = args.family {
        table
            .handle(
                &backend,
                TableEvent::FilterChange {
                    input: FilterInput::Family,
                    value: Some(family),
                },
            )
            .await;
    }
    if let Some(filter) = args.filter {
        table
            .handle(
                &backend,
                TableEvent::FilterChange {
                    input: FilterInput::Any,
                    value: Some(filter),
                },
            )
            .await;
    }
    if let Some(field) = args.sort {
        table
            .handle(
                &backend,
                TableEvent::SortChange {
                    field,
                    direction: args.direction,
                },
            )
            .await;
    }

    println!("{}", format_output(&table, args.format)?);
    Ok(())
}

/// Render the visible rows in the requested format
pub fn format_output(table: &ProductTable, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(table.rows()).context("Failed to format JSON output")
        }
        OutputFormat::Csv => rows_to_csv(table),
        OutputFormat::Table => Ok(rows_to_table(table)),
    }
}

/// (label, bound field) of every data column
fn data_columns(table: &ProductTable) -> Vec<(String, String)> {
    table
        .columns()
        .into_iter()
        .filter(|column| column.column_type != ColumnType::Action)
        .filter_map(|column| {
            let field = column.field_name?;
            Some((column.label.unwrap_or_else(|| field.clone()), field))
        })
        .collect()
}

fn cell(row: &DisplayRow, field: &str) -> String {
    match row.get(field) {
        None | Some(Value::Null) => String::new(),
        Some(value) => js_string(value),
    }
}

fn rows_to_csv(table: &ProductTable) -> Result<String> {
    let columns = data_columns(table);
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer.write_record(columns.iter().map(|(label, _)| label.as_str()))?;
    for row in table.rows() {
        writer.write_record(columns.iter().map(|(_, field)| cell(row, field)))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to finish CSV output: {}", e))?;
    String::from_utf8(bytes).context("CSV output is not valid UTF-8")
}

fn pad(text: &str, width: usize) -> String {
    let used = UnicodeWidthStr::width(text);
    format!("{}{}", text, " ".repeat(width.saturating_sub(used)))
}

fn rows_to_table(table: &ProductTable) -> String {
    let columns = data_columns(table);
    let cells: Vec<Vec<String>> = table
        .rows()
        .iter()
        .map(|row| columns.iter().map(|(_, field)| cell(row, field)).collect())
        .collect();

    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, (label, _))| {
            cells
                .iter()
                .map(|row| UnicodeWidthStr::width(row[i].as_str()))
                .chain(std::iter::once(UnicodeWidthStr::width(label.as_str())))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    let header: Vec<String> = columns
        .iter()
        .zip(&widths)
        .map(|((label, _), width)| pad(label, *width))
        .collect();
    out.push_str(&header.join("  ").bold().cyan().to_string());
    out.push('\n');

    for row in &cells {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(text, width)| pad(text, *width))
            .collect();
        out.push_str(line.join("  ").trim_end());
        out.push('\n');
    }

    let summary = format!(
        "{} of {} rows (sorted by {} {})",
        table.rows().len(),
        table.all_rows().len(),
        table.sorted_by(),
        table.sorted_direction()
    );
    out.push_str(&summary.dimmed().to_string());
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{FieldKey, records_from_json};
    use serde_json::json;

    fn table() -> ProductTable {
        let mut table = ProductTable::new("")
            .with_fields(vec![FieldKey::Name, FieldKey::Quantity, FieldKey::LastModifiedDate]);
        table.set_records(&records_from_json(json!([
            {"Id": "1", "Name": "Widget, large", "Quantity": 0, "LastModifiedDate": "2024-01-01T10:00:00Z"},
            {"Id": "2", "Name": "Gädget", "Quantity": 2.5}
        ])));
        table
    }

    #[test]
    fn test_csv_output() {
        let csv = format_output(&table(), OutputFormat::Csv).unwrap();
        assert_eq!(
            csv,
            "Name,Quantity,Modified\n\"Widget, large\",0,\"Jan 1, 2024, 10:00 AM\"\nGädget,2.5,\n"
        );
    }

    #[test]
    fn test_json_output_contains_derived_fields() {
        let json: Value =
            serde_json::from_str(&format_output(&table(), OutputFormat::Json).unwrap()).unwrap();
        assert_eq!(json[0]["detail_link"], json!("/lightning/r/Product2/1/view"));
        assert_eq!(json[1]["Family"], json!(""));
    }

    #[test]
    fn test_table_output_aligns_columns() {
        colored::control::set_override(false);
        let text = format_output(&table(), OutputFormat::Table).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Name           Quantity  Modified"));
        assert!(lines[2].starts_with("Gädget         2.5"));
        assert_eq!(lines[3], "2 of 2 rows (sorted by LastModifiedDate desc)");
    }
}
