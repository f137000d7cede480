//! `rows` command

pub mod handler;

use std::path::PathBuf;

use clap::{Args, ValueEnum};

pub use handler::handle_rows_command;

#[derive(Debug, Args)]
pub struct RowsCommands {
    /// JSON file with a record array, or an object with `records`/`catalog`/`options`
    pub file: PathBuf,

    /// Parent record id; only rows linked to it are shown
    #[arg(long, default_value = "")]
    pub parent: String,

    /// Comma separated columns, e.g. "Name,Family,LastModifiedDate"
    #[arg(long)]
    pub fields: Option<String>,

    /// Field to sort by
    #[arg(long)]
    pub sort: Option<String>,

    /// Sort direction token (asc|desc); other values leave the order alone
    #[arg(long, default_value = "asc")]
    pub direction: String,

    /// Case-insensitive text to look for in any shown column
    #[arg(long)]
    pub filter: Option<String>,

    /// Case-insensitive Family filter
    #[arg(long)]
    pub family: Option<String>,

    /// Records are line items nesting their product under `Product2`
    #[arg(long)]
    pub nested: bool,

    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}
