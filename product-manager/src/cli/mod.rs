//! Command line interface

pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::columns::ColumnsCommands;
use commands::rows::RowsCommands;

#[derive(Debug, Parser)]
#[command(
    name = "product-manager",
    version,
    about = "Map, sort and filter product records the way the product table shows them"
)]
pub struct Cli {
    /// Config file (defaults to <config dir>/product-manager/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show mapped rows from a records file
    Rows(RowsCommands),
    /// Print the column descriptors for a field list
    Columns(ColumnsCommands),
}
