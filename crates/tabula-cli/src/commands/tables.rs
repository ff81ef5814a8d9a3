//! Tables command - list loaded table names.

use tabula::TabulaConfig;

use super::CommandResult;

pub fn run(config: TabulaConfig) -> CommandResult {
    let tabula = super::open(config)?;

    for name in tabula.try_list_table_names()? {
        println!("{}", name);
    }

    Ok(())
}
