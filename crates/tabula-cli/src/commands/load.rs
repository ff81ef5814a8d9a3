//! Load command - materialize the data directory and report the result.

use colored::Colorize;
use tabula::{StoreLocation, TabulaConfig};

use super::CommandResult;

pub fn run(config: TabulaConfig, json_output: bool, verbose: bool) -> CommandResult {
    if !json_output {
        println!(
            "{} {}",
            "Loading".cyan().bold(),
            config.data_dir.display().to_string().white()
        );
    }

    let tabula = super::open(config)?;
    let report = tabula.last_report();

    if json_output {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    println!();
    for entry in tabula.catalog().iter() {
        let schema = &entry.schema;
        println!(
            "  {} {:>8} rows {:>4} columns",
            format!("{:24}", schema.name).white().bold(),
            schema.row_count,
            schema.column_count()
        );
        if verbose {
            for column in &schema.columns {
                println!("      {:20} {}", column.name, column.type_description().dimmed());
            }
        }
    }
    println!();

    println!(
        "Loaded {} tables ({} failed)",
        report.loaded.len().to_string().white().bold(),
        if report.failures.is_empty() {
            "0".green()
        } else {
            report.failures.len().to_string().red()
        }
    );
    for name in &report.collisions {
        println!(
            "{} more than one file maps to table '{}', the last one was kept",
            "Warning:".yellow().bold(),
            name
        );
    }
    if !report.dropped.is_empty() {
        println!("Dropped stale tables: {}", report.dropped.join(", ").dimmed());
    }

    let store = match &tabula.config().store {
        StoreLocation::InMemory => "in-memory store".to_string(),
        StoreLocation::File(path) => path.display().to_string(),
    };
    println!("{} {}", "Store:".green().bold(), store.white());
    println!(
        "{} {}",
        "Schema:".green().bold(),
        tabula.artifact().path().display().to_string().white()
    );

    Ok(())
}
