//! Axum application setup.

use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use super::handlers;
use super::state::AppState;

/// Create the Axum router with all routes.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Tool surface
        .route("/tools", get(handlers::list_tools))
        .route("/tools/call", post(handlers::invoke_tool))
        // Tables
        .route("/tables", get(handlers::list_tables))
        .route("/tables/:name/schema", get(handlers::get_table_schema))
        .route("/tables/:name/columns", get(handlers::get_table_columns))
        .route("/reload", post(handlers::reload))
        // Queries
        .route("/query", post(handlers::run_query));

    Router::new()
        .nest("/api", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutting down");
}

/// Start the web server.
pub async fn run_server(state: AppState, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let app = create_router(state);
    let addr = std::net::SocketAddr::from(([127, 0, 0, 1], port));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use std::fs;
    use tabula::{StoreLocation, Tabula, TabulaConfig};
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn app(dir: &TempDir) -> Router {
        let data = dir.path().join("csv");
        fs::create_dir_all(&data).unwrap();
        fs::write(data.join("codes.csv"), "postal,n\n00123,1\n04560,2\n").unwrap();

        let config = TabulaConfig::default()
            .with_data_dir(data)
            .with_store(StoreLocation::InMemory)
            .with_schema_path(dir.path().join("table_info.txt"));
        create_router(AppState::new(Tabula::open(config).unwrap()))
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_list_tools() {
        let dir = TempDir::new().unwrap();
        let (status, body) = send(app(&dir), get("/api/tools")).await;

        assert_eq!(status, StatusCode::OK);
        let names: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|t| t["name"].as_str())
            .collect();
        assert!(names.contains(&"execute_query"));
        assert!(names.contains(&"get_schema"));
    }

    #[tokio::test]
    async fn test_tool_call_errors_are_ok_responses() {
        let dir = TempDir::new().unwrap();
        let (status, body) = send(
            app(&dir),
            post_json(
                "/api/tools/call",
                json!({ "name": "execute_query", "arguments": { "query": "DELETE FROM codes" } }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["is_error"], json!(true));
        assert!(body["content"].as_str().unwrap().starts_with("Error: "));
    }

    #[tokio::test]
    async fn test_tables_and_schema() {
        let dir = TempDir::new().unwrap();
        let (status, body) = send(app(&dir), get("/api/tables")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["tables"], json!(["codes"]));

        let (status, body) = send(app(&dir), get("/api/tables/codes/schema")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["schema"].as_str().unwrap().starts_with("# Table: codes"));
    }

    #[tokio::test]
    async fn test_unknown_table_is_not_found() {
        let dir = TempDir::new().unwrap();
        let (status, body) = send(app(&dir), get("/api/tables/nope/columns")).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], json!("not_found"));
    }

    #[tokio::test]
    async fn test_query_route() {
        let dir = TempDir::new().unwrap();
        let (status, body) = send(
            app(&dir),
            post_json("/api/query", json!({ "query": "SELECT postal FROM codes ORDER BY n" })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["result"]["rows"], json!([["00123"], ["04560"]]));
        assert_eq!(body["result"]["total_rows"], json!(2));
        assert!(body.get("summary").is_none());
    }

    #[tokio::test]
    async fn test_rejected_query_is_bad_request() {
        let dir = TempDir::new().unwrap();
        let (status, _) = send(
            app(&dir),
            post_json("/api/query", json!({ "query": "DROP TABLE codes" })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_reload_picks_up_new_files() {
        let dir = TempDir::new().unwrap();
        let router = app(&dir);
        fs::write(dir.path().join("csv").join("extra.csv"), "a\n1\n").unwrap();

        let (status, body) = send(router, post_json("/api/reload", json!({}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["loaded"], json!(["codes", "extra"]));
    }
}
