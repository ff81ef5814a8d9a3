//! Query command - run a read-only query against the store.

use tabula::query::{render_result, render_summaries};
use tabula::{TabulaConfig, MAX_RESULT_ROWS};

use super::CommandResult;

pub fn run(config: TabulaConfig, sql: &str, describe: bool, json_output: bool) -> CommandResult {
    let tabula = super::open(config)?;

    if json_output {
        let body = if describe {
            let (result, summaries) = tabula.try_describe_query(sql)?;
            serde_json::json!({ "result": result, "summary": summaries })
        } else {
            serde_json::to_value(tabula.try_execute_query(sql)?)?
        };
        println!("{}", serde_json::to_string_pretty(&body)?);
        return Ok(());
    }

    if describe {
        let (result, summaries) = tabula.try_describe_query(sql)?;
        print!(
            "{}\n{}",
            render_result(&result, MAX_RESULT_ROWS),
            render_summaries(&summaries)
        );
    } else {
        let result = tabula.try_execute_query(sql)?;
        print!("{}", render_result(&result, MAX_RESULT_ROWS));
    }

    Ok(())
}
