//! Tabula CLI - query a directory of CSV/TSV files with SQL.

mod cli;
mod commands;
mod server;

use clap::Parser;
use cli::{Cli, Commands};
use commands::CommandResult;
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "tabula=debug,tabula_cli=debug,tower_http=debug"
    } else {
        "tabula=info,tabula_cli=info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result: CommandResult = match cli.config() {
        Err(e) => Err(e.into()),
        Ok(config) => match cli.command {
            Commands::Load { json } => commands::load::run(config, json, cli.verbose),
            Commands::Tables => commands::tables::run(config),
            Commands::Schema { table } => commands::schema::run(config, &table),
            Commands::Columns { table, json } => commands::columns::run(config, &table, json),
            Commands::Query {
                sql,
                describe,
                json,
            } => commands::query::run(config, &sql, describe, json),
            Commands::Serve { port } => commands::serve::run(config, port),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
