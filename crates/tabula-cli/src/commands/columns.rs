//! Columns command - per-column types and statistics.

use colored::Colorize;
use tabula::query::format_float;
use tabula::{ColumnKind, TabulaConfig};

use super::CommandResult;

pub fn run(config: TabulaConfig, table: &str, json_output: bool) -> CommandResult {
    let tabula = super::open(config)?;
    let schema = tabula.try_column_details(table)?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(schema)?);
        return Ok(());
    }

    println!(
        "{} {} ({} rows, {} columns)",
        "Table".cyan().bold(),
        schema.name.white().bold(),
        schema.row_count,
        schema.column_count()
    );
    println!();

    for column in &schema.columns {
        let kind = match column.kind {
            ColumnKind::Numeric => format!("{:20}", column.type_description()).blue(),
            ColumnKind::Text => format!("{:20}", column.type_description()).green(),
        };
        let stats = &column.statistics;
        print!(
            "  {:20} {} nulls={:<6} unique={:<6}",
            column.name, kind, stats.null_count, stats.unique_count
        );
        if let (Some(min), Some(max)) = (stats.min, stats.max) {
            print!(" min={} max={}", format_float(min), format_float(max));
        }
        println!();
    }

    Ok(())
}
