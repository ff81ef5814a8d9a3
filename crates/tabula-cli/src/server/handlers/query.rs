//! Query handler.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tabula::{NumericSummary, QueryResult};

use crate::server::error::ApiError;
use crate::server::state::AppState;

#[derive(Deserialize)]
pub struct QueryRequest {
    pub query: String,
    /// Also summarize numeric result columns.
    #[serde(default)]
    pub describe: bool,
}

#[derive(Serialize)]
pub struct QueryResponse {
    pub result: QueryResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<Vec<NumericSummary>>,
}

/// POST /api/query
pub async fn run_query(
    State(state): State<AppState>,
    Json(req): Json<QueryRequest>,
) -> Result<Json<QueryResponse>, ApiError> {
    let tabula = state.tabula.lock().await;

    let response = if req.describe {
        let (result, summaries) = tabula.try_describe_query(&req.query)?;
        QueryResponse {
            result,
            summary: Some(summaries),
        }
    } else {
        QueryResponse {
            result: tabula.try_execute_query(&req.query)?,
            summary: None,
        }
    };

    Ok(Json(response))
}
