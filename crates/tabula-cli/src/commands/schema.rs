//! Schema command - print the artifact block for one table.

use tabula::TabulaConfig;

use super::CommandResult;

pub fn run(config: TabulaConfig, table: &str) -> CommandResult {
    let tabula = super::open(config)?;
    print!("{}", tabula.try_get_schema(table)?);
    Ok(())
}
