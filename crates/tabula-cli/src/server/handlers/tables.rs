//! Table listing and schema handlers.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use tabula::{LoadReport, TableSchema};

use crate::server::error::ApiError;
use crate::server::state::AppState;

#[derive(Serialize)]
pub struct TablesResponse {
    pub tables: Vec<String>,
}

#[derive(Serialize)]
pub struct SchemaResponse {
    pub table: String,
    /// The table's block from the schema artifact.
    pub schema: String,
}

/// GET /api/tables
pub async fn list_tables(State(state): State<AppState>) -> Result<Json<TablesResponse>, ApiError> {
    let tabula = state.tabula.lock().await;
    Ok(Json(TablesResponse {
        tables: tabula.try_list_table_names()?,
    }))
}

/// GET /api/tables/:name/schema
pub async fn get_table_schema(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<SchemaResponse>, ApiError> {
    let tabula = state.tabula.lock().await;
    let schema = tabula.try_get_schema(&name)?;
    Ok(Json(SchemaResponse { table: name, schema }))
}

/// GET /api/tables/:name/columns
pub async fn get_table_columns(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<TableSchema>, ApiError> {
    let tabula = state.tabula.lock().await;
    Ok(Json(tabula.try_column_details(&name)?.clone()))
}

/// POST /api/reload
pub async fn reload(State(state): State<AppState>) -> Result<Json<LoadReport>, ApiError> {
    let mut tabula = state.tabula.lock().await;
    Ok(Json(tabula.reload()?))
}
