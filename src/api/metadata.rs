//! Catalog browsing endpoints: schemas, tables, structure, table data.

use crate::api::AppState;
use crate::db::SchemaInspector;
use crate::error::{ApiError, ApiResult};
use crate::models::{
    SchemasResponse, StructureQuery, TableDataQuery, TableDataResponse, TableStructureResponse,
    TablesQuery, TablesResponse,
};
use crate::preview;
use axum::Json;
use axum::extract::{Query, State};

/// `GET /api/db/schemas`
pub async fn schemas(State(state): State<AppState>) -> ApiResult<Json<SchemasResponse>> {
    if state.preview {
        return Ok(Json(preview::schemas()));
    }

    let pool = state.manager.require().await?;
    let schemas = SchemaInspector::list_schemas(&pool).await?;
    Ok(Json(SchemasResponse { schemas }))
}

/// `GET /api/db/tables?schema=`
pub async fn tables(
    State(state): State<AppState>,
    Query(params): Query<TablesQuery>,
) -> ApiResult<Json<TablesResponse>> {
    let schema = params.schema();
    if state.preview {
        return Ok(Json(preview::tables(schema)));
    }

    let pool = state.manager.require().await?;
    let tables = SchemaInspector::list_tables(&pool, schema).await?;
    Ok(Json(TablesResponse { tables }))
}

/// `GET /api/db/table-structure?schema=&table=`
pub async fn table_structure(
    State(state): State<AppState>,
    Query(params): Query<StructureQuery>,
) -> ApiResult<Json<TableStructureResponse>> {
    let table = require_table(params.table.as_deref())?;
    if state.preview {
        return Ok(Json(preview::table_structure(table)));
    }

    let pool = state.manager.require().await?;
    let columns = SchemaInspector::table_structure(&pool, params.schema(), table).await?;
    Ok(Json(TableStructureResponse { columns }))
}

/// `GET /api/db/table-data?schema=&table=&page=&limit=`
pub async fn table_data(
    State(state): State<AppState>,
    Query(params): Query<TableDataQuery>,
) -> ApiResult<Json<TableDataResponse>> {
    let table = require_table(params.table.as_deref())?;
    let pagination = params
        .pagination()
        .map_err(|e| ApiError::invalid_input(e.to_string()))?;

    if state.preview {
        return Ok(Json(preview::table_data(table, pagination)));
    }

    let pool = state.manager.require().await?;
    let response = SchemaInspector::table_data(&pool, params.schema(), table, pagination).await?;
    Ok(Json(response))
}

fn require_table(table: Option<&str>) -> ApiResult<&str> {
    match table {
        Some(t) if !t.trim().is_empty() => Ok(t),
        _ => Err(ApiError::invalid_input("Table name is required")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::ConnectionManager;

    fn preview_state() -> AppState {
        AppState::new(ConnectionManager::default(), true)
    }

    fn disconnected_state() -> AppState {
        AppState::new(ConnectionManager::default(), false)
    }

    fn query_params<T: serde::de::DeserializeOwned>(qs: &str) -> Query<T> {
        let uri: axum::http::Uri = format!("http://127.0.0.1/x?{qs}").parse().unwrap();
        Query::try_from_uri(&uri).unwrap()
    }

    #[tokio::test]
    async fn test_preview_schemas() {
        let response = schemas(State(preview_state())).await.unwrap();
        assert_eq!(response.0.schemas.len(), 2);
    }

    #[tokio::test]
    async fn test_disconnected_schemas() {
        let err = schemas(State(disconnected_state())).await.unwrap_err();
        assert_eq!(err.public_message(), "Database not connected");
    }

    #[tokio::test]
    async fn test_tables_defaults_to_public() {
        let response = tables(State(preview_state()), query_params(""))
            .await
            .unwrap();
        let names: Vec<&str> = response
            .0
            .tables
            .iter()
            .map(|t| t.table_name.as_str())
            .collect();
        assert_eq!(names, vec!["users", "posts", "comments"]);
    }

    #[tokio::test]
    async fn test_structure_requires_table() {
        let err = table_structure(State(preview_state()), query_params("schema=public"))
            .await
            .unwrap_err();
        assert_eq!(err.public_message(), "Table name is required");
        assert_eq!(err.status(), axum::http::StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_table_data_rejects_bad_pagination() {
        let err = table_data(
            State(preview_state()),
            query_params("table=users&page=abc"),
        )
        .await
        .unwrap_err();
        assert_eq!(err.public_message(), "Invalid page or limit parameter");
    }

    #[tokio::test]
    async fn test_preview_table_data_pages() {
        let response = table_data(
            State(preview_state()),
            query_params("table=users&page=2&limit=2"),
        )
        .await
        .unwrap();
        assert_eq!(response.0.data.len(), 1);
        assert_eq!(response.0.total_count, 3);
        assert_eq!(response.0.total_pages, 2);
    }
}
