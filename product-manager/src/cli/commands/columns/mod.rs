//! `columns` command

pub mod handler;

use std::path::PathBuf;

use clap::Args;

pub use handler::handle_columns_command;

#[derive(Debug, Args)]
pub struct ColumnsCommands {
    /// Comma separated columns (defaults to the configured fields)
    #[arg(long)]
    pub fields: Option<String>,

    /// JSON file with the Family options: [{"label": .., "value": ..}]
    #[arg(long)]
    pub options: Option<PathBuf>,

    /// Columns for line items nesting their product
    #[arg(long)]
    pub nested: bool,

    /// Single-line JSON
    #[arg(long)]
    pub compact: bool,
}
