//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use tabula::{StoreLocation, TabulaConfig, TabulaError};

/// Tabula: query a directory of CSV/TSV files with SQL
#[derive(Parser)]
#[command(name = "tabula")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory containing the source files (default: ./csv)
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// SQLite database file (default: ./tabula.db)
    #[arg(long, global = true, value_name = "FILE")]
    pub db: Option<PathBuf>,

    /// Schema artifact file (default: ./table_info.txt)
    #[arg(long, global = true, value_name = "FILE")]
    pub schema_file: Option<PathBuf>,

    /// Keep the store in memory instead of a database file
    #[arg(long, global = true)]
    pub in_memory: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load the data directory and report what was loaded
    Load {
        /// Output the load report as JSON
        #[arg(long)]
        json: bool,
    },

    /// List loaded table names
    Tables,

    /// Show the schema artifact block for a table
    Schema {
        /// Table name (the source file name without extension)
        #[arg(value_name = "TABLE")]
        table: String,
    },

    /// Show per-column types and statistics for a table
    Columns {
        /// Table name (the source file name without extension)
        #[arg(value_name = "TABLE")]
        table: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run a read-only SELECT query
    Query {
        /// SQL query text
        #[arg(value_name = "SQL")]
        sql: String,

        /// Append numeric summary statistics for the result
        #[arg(short, long)]
        describe: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Serve the tool operations over HTTP
    Serve {
        /// Port for web server
        #[arg(short, long, default_value = "3141")]
        port: u16,
    },
}

impl Cli {
    /// Environment configuration with command-line flags applied on top.
    pub fn config(&self) -> Result<TabulaConfig, TabulaError> {
        let mut config = TabulaConfig::from_env()?;

        if let Some(ref dir) = self.data_dir {
            config = config.with_data_dir(dir);
        }
        if let Some(ref db) = self.db {
            config = config.with_store(StoreLocation::File(db.clone()));
        }
        if self.in_memory {
            config = config.with_store(StoreLocation::InMemory);
        }
        if let Some(ref path) = self.schema_file {
            config = config.with_schema_path(path);
        }

        Ok(config)
    }
}
