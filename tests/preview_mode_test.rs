//! Integration tests for preview mode.
//!
//! With `--preview` the server answers the catalog endpoints from a static
//! mock dataset and disables ad-hoc query execution. These tests drive the
//! handlers the same way the browser UI does.

use axum::Json;
use axum::extract::{Query, State};
use axum::http::{StatusCode, Uri};
use pg_studio::api::{AppState, connect, metadata, query, row};
use pg_studio::db::ConnectionManager;
use pg_studio::models::{ConnectRequest, DeleteRowRequest, QueryRequest};
use pg_studio::preview::QUERY_DISABLED_MESSAGE;
use serde::de::DeserializeOwned;
use serde_json::json;

fn preview_state() -> AppState {
    AppState::new(ConnectionManager::default(), true)
}

fn parse_query<T: DeserializeOwned>(query_string: &str) -> Query<T> {
    let uri: Uri = format!("http://localhost/x?{}", query_string)
        .parse()
        .unwrap();
    Query::try_from_uri(&uri).unwrap()
}

/// Test that connect short-circuits with the preview marker.
#[tokio::test]
async fn test_connect_simulates_success() {
    let request: ConnectRequest = serde_json::from_value(json!({
        "host": "localhost",
        "port": 5432,
        "database": "mydb",
        "user": "postgres",
        "password": "secret"
    }))
    .unwrap();

    let Json(response) = connect::connect(State(preview_state()), Json(request))
        .await
        .unwrap();
    assert!(response.success);
    assert_eq!(response.preview_mode, Some(true));
}

/// Test that connect skips parameter validation entirely in preview mode.
#[tokio::test]
async fn test_connect_ignores_missing_parameters() {
    let request: ConnectRequest = serde_json::from_value(json!({})).unwrap();

    let Json(response) = connect::connect(State(preview_state()), Json(request))
        .await
        .unwrap();
    assert!(response.success);
}

/// Test that the mock catalog exposes both schemas.
#[tokio::test]
async fn test_schemas_come_from_mock_catalog() {
    let Json(response) = metadata::schemas(State(preview_state())).await.unwrap();

    let names: Vec<&str> = response
        .schemas
        .iter()
        .map(|s| s.schema_name.as_str())
        .collect();
    assert_eq!(names, vec!["public", "auth"]);
}

/// Test the mock tables per schema, including the default schema.
#[tokio::test]
async fn test_tables_per_schema() {
    let Json(response) = metadata::tables(State(preview_state()), parse_query(""))
        .await
        .unwrap();
    let names: Vec<&str> = response.tables.iter().map(|t| t.table_name.as_str()).collect();
    assert_eq!(names, vec!["users", "posts", "comments"]);
    assert_eq!(response.tables[0].column_count, 6);
    assert_eq!(response.tables[0].table_size, 0);

    let Json(response) = metadata::tables(State(preview_state()), parse_query("schema=auth"))
        .await
        .unwrap();
    let names: Vec<&str> = response.tables.iter().map(|t| t.table_name.as_str()).collect();
    assert_eq!(names, vec!["sessions", "tokens"]);

    let Json(response) = metadata::tables(State(preview_state()), parse_query("schema=missing"))
        .await
        .unwrap();
    assert!(response.tables.is_empty());
}

/// Test the mock structure for the users table.
#[tokio::test]
async fn test_table_structure_marks_primary_key() {
    let Json(response) =
        metadata::table_structure(State(preview_state()), parse_query("table=users"))
            .await
            .unwrap();

    let id = &response.columns[0];
    assert_eq!(id.column_name, "id");
    assert!(id.is_primary);
    assert_eq!(id.constraint_type.as_deref(), Some("PRIMARY KEY"));

    let email = response
        .columns
        .iter()
        .find(|c| c.column_name == "email")
        .unwrap();
    assert!(!email.is_primary);
    assert_eq!(email.is_nullable, "NO");
}

/// Test that table name validation still applies in preview mode.
#[tokio::test]
async fn test_table_structure_still_requires_table() {
    let err = metadata::table_structure(State(preview_state()), parse_query(""))
        .await
        .unwrap_err();
    assert_eq!(err.public_message(), "Table name is required");
}

/// Test mock data pagination and window math.
#[tokio::test]
async fn test_table_data_slices_mock_rows() {
    let Json(response) = metadata::table_data(
        State(preview_state()),
        parse_query("table=users&page=2&limit=2"),
    )
    .await
    .unwrap();

    assert_eq!(response.total_count, 3);
    assert_eq!(response.page, 2);
    assert_eq!(response.limit, 2);
    assert_eq!(response.total_pages, 2);
    assert_eq!(response.data.len(), 1);
    assert_eq!(response.data[0]["name"], json!("Carol Williams"));
}

/// Test that a page past the end returns an empty slice, not an error.
#[tokio::test]
async fn test_table_data_past_end_is_empty() {
    let Json(response) = metadata::table_data(
        State(preview_state()),
        parse_query("table=users&page=10&limit=50"),
    )
    .await
    .unwrap();

    assert_eq!(response.total_count, 3);
    assert!(response.data.is_empty());
}

/// Test that query execution is disabled with the stable message.
#[tokio::test]
async fn test_query_execution_is_disabled() {
    let request = QueryRequest::new("SELECT * FROM users LIMIT 10;");

    let err = query::run_query(State(preview_state()), Json(request))
        .await
        .unwrap_err();
    assert_eq!(err.public_message(), QUERY_DISABLED_MESSAGE);
    assert_eq!(err.status(), StatusCode::BAD_REQUEST);
}

/// Test that row mutations fail closed: preview installs no pool, so the
/// handlers report a missing connection.
#[tokio::test]
async fn test_row_mutations_report_disconnected() {
    let request: DeleteRowRequest = serde_json::from_value(json!({
        "schema": "public",
        "table": "users",
        "where": {"id": 1}
    }))
    .unwrap();

    let err = row::delete_row(State(preview_state()), Json(request))
        .await
        .unwrap_err();
    assert_eq!(err.public_message(), "Database not connected");
}
