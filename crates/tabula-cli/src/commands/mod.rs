//! CLI command implementations.

pub mod columns;
pub mod load;
pub mod query;
pub mod schema;
pub mod serve;
pub mod tables;

use colored::Colorize;
use tabula::{LoadReport, Tabula, TabulaConfig};

pub type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Load the data directory, printing any files that failed.
pub fn open(config: TabulaConfig) -> Result<Tabula, Box<dyn std::error::Error>> {
    let tabula = Tabula::open(config)?;
    print_failures(tabula.last_report());
    Ok(tabula)
}

pub fn print_failures(report: &LoadReport) {
    for failure in &report.failures {
        eprintln!(
            "{} {}: {}",
            "Skipped".yellow().bold(),
            failure.path.display(),
            failure.error
        );
    }
}
