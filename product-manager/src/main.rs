use anyhow::Result;
use clap::Parser;

use product_manager::cli::commands::{columns, rows};
use product_manager::cli::{Cli, Commands};
use product_manager::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Rows(args) => rows::handle_rows_command(args, &config).await,
        Commands::Columns(args) => columns::handle_columns_command(args, &config),
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}
