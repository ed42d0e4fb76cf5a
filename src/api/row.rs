//! Single-row mutation endpoints.
//!
//! POST inserts, PUT updates, DELETE deletes, all on `/api/db/row`. The
//! connection check runs before parameter validation, matching the rest of
//! the API. In preview mode no pool exists, so these report
//! "Database not connected".

use crate::api::AppState;
use crate::db::RowMutator;
use crate::error::{ApiError, ApiResult};
use crate::models::{
    DeleteRowRequest, DeleteRowResponse, InsertRowRequest, RowResponse, UpdateRowRequest,
};
use axum::Json;
use axum::extract::State;
use serde_json::{Map, Value as JsonValue};
use tracing::info;

const MISSING_PARAMETERS: &str = "Missing required parameters";

/// `POST /api/db/row`
pub async fn insert_row(
    State(state): State<AppState>,
    Json(request): Json<InsertRowRequest>,
) -> ApiResult<Json<RowResponse>> {
    let pool = state.manager.require().await?;

    require_target(&request.schema, &request.table)?;
    let data = require_map(request.data.as_ref())?;

    info!(schema = %request.schema, table = %request.table, "Inserting row");
    let row = RowMutator::insert_row(&pool, &request.schema, &request.table, data).await?;
    Ok(Json(RowResponse::new(row)))
}

/// `PUT /api/db/row`
pub async fn update_row(
    State(state): State<AppState>,
    Json(request): Json<UpdateRowRequest>,
) -> ApiResult<Json<RowResponse>> {
    let pool = state.manager.require().await?;

    require_target(&request.schema, &request.table)?;
    let data = require_map(request.data.as_ref())?;
    let where_values = require_map(request.where_values.as_ref())?;

    info!(schema = %request.schema, table = %request.table, "Updating row");
    let row = RowMutator::update_row(
        &pool,
        &request.schema,
        &request.table,
        data,
        where_values,
    )
    .await?;
    Ok(Json(RowResponse::new(row)))
}

/// `DELETE /api/db/row`
pub async fn delete_row(
    State(state): State<AppState>,
    Json(request): Json<DeleteRowRequest>,
) -> ApiResult<Json<DeleteRowResponse>> {
    let pool = state.manager.require().await?;

    require_target(&request.schema, &request.table)?;
    let where_values = require_map(request.where_values.as_ref())?;

    info!(schema = %request.schema, table = %request.table, "Deleting row");
    RowMutator::delete_row(&pool, &request.schema, &request.table, where_values).await?;
    Ok(Json(DeleteRowResponse::ok()))
}

fn require_target(schema: &str, table: &str) -> ApiResult<()> {
    if schema.trim().is_empty() || table.trim().is_empty() {
        return Err(ApiError::invalid_input(MISSING_PARAMETERS));
    }
    Ok(())
}

/// An absent or empty map cannot drive a mutation.
fn require_map(map: Option<&Map<String, JsonValue>>) -> ApiResult<&Map<String, JsonValue>> {
    map.filter(|m| !m.is_empty())
        .ok_or_else(|| ApiError::invalid_input(MISSING_PARAMETERS))
}
