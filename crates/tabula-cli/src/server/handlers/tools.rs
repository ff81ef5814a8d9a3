//! Tool catalog and tool-call dispatch.
//!
//! Tool calls always answer 200: failures are reported as text in `content`
//! with `is_error` set, the way tool-calling hosts expect.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tabula::query::{render_result, render_summaries};
use tabula::{error_text, render_column_details, Tabula, TabulaError, MAX_RESULT_ROWS};
use tracing::debug;

use crate::server::state::AppState;

/// A tool advertised to callers.
#[derive(Debug, Clone, Serialize)]
pub struct ToolSpec {
    pub name: &'static str,
    pub description: &'static str,
    /// JSON Schema for the `arguments` object.
    pub parameters: Value,
}

#[derive(Debug, Deserialize)]
pub struct ToolCall {
    pub name: String,
    #[serde(default)]
    pub arguments: Value,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct ToolOutput {
    pub content: String,
    pub is_error: bool,
}

fn string_args(names: &[&str]) -> Value {
    let properties: serde_json::Map<String, Value> = names
        .iter()
        .map(|n| (n.to_string(), json!({ "type": "string" })))
        .collect();
    json!({
        "type": "object",
        "properties": properties,
        "required": names,
    })
}

/// Every tool the server exposes.
pub fn tool_specs() -> Vec<ToolSpec> {
    vec![
        ToolSpec {
            name: "list_table_names",
            description: "List the names of all loaded tables, one per line.",
            parameters: string_args(&[]),
        },
        ToolSpec {
            name: "get_schema",
            description: "Show column types, sample rows and source details for one table.",
            parameters: string_args(&["table_name"]),
        },
        ToolSpec {
            name: "execute_query",
            description: "Run a read-only SELECT query. At most 10 rows are shown, with the true row and column counts.",
            parameters: string_args(&["query"]),
        },
        ToolSpec {
            name: "column_details",
            description: "Per-column type, null count, unique count and numeric range for one table.",
            parameters: string_args(&["table_name"]),
        },
        ToolSpec {
            name: "describe_query",
            description: "Run a SELECT query and summarize every numeric result column.",
            parameters: string_args(&["query"]),
        },
    ]
}

fn argument<'a>(arguments: &'a Value, name: &str) -> Result<&'a str, String> {
    arguments
        .get(name)
        .and_then(Value::as_str)
        .ok_or_else(|| format!("Error: missing string argument '{}'", name))
}

fn dispatch(tabula: &Tabula, call: &ToolCall) -> Result<String, String> {
    let text = |e: TabulaError| error_text(&e);

    match call.name.as_str() {
        "list_table_names" => tabula
            .try_list_table_names()
            .map(|names| names.join("\n"))
            .map_err(text),
        "get_schema" => tabula
            .try_get_schema(argument(&call.arguments, "table_name")?)
            .map_err(text),
        "execute_query" => tabula
            .try_execute_query(argument(&call.arguments, "query")?)
            .map(|result| render_result(&result, MAX_RESULT_ROWS))
            .map_err(text),
        "column_details" => tabula
            .try_column_details(argument(&call.arguments, "table_name")?)
            .map(render_column_details)
            .map_err(text),
        "describe_query" => tabula
            .try_describe_query(argument(&call.arguments, "query")?)
            .map(|(result, summaries)| {
                format!(
                    "{}\n{}",
                    render_result(&result, MAX_RESULT_ROWS),
                    render_summaries(&summaries)
                )
            })
            .map_err(text),
        other => Err(format!("Error: unknown tool '{}'", other)),
    }
}

/// Run one tool call against the loaded tables.
pub fn call_tool(tabula: &Tabula, call: &ToolCall) -> ToolOutput {
    debug!(tool = %call.name, "tool call");
    match dispatch(tabula, call) {
        Ok(content) => ToolOutput {
            content,
            is_error: false,
        },
        Err(content) => ToolOutput {
            content,
            is_error: true,
        },
    }
}

/// GET /api/tools
pub async fn list_tools() -> Json<Vec<ToolSpec>> {
    Json(tool_specs())
}

/// POST /api/tools/call
pub async fn invoke_tool(State(state): State<AppState>, Json(call): Json<ToolCall>) -> Json<ToolOutput> {
    let tabula = state.tabula.lock().await;
    Json(call_tool(&tabula, &call))
}
