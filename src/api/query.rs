//! Free-form query endpoint.

use crate::api::AppState;
use crate::db::run_sql;
use crate::error::{ApiError, ApiResult};
use crate::models::{QueryRequest, QueryResponse};
use crate::preview::QUERY_DISABLED_MESSAGE;
use axum::Json;
use axum::extract::State;
use tracing::info;

/// `POST /api/db/query`
///
/// Runs the submitted SQL verbatim over the live pool and returns rows,
/// field descriptors, and timing. The connection check comes before query
/// validation, so a missing pool wins over a missing query.
pub async fn run_query(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> ApiResult<Json<QueryResponse>> {
    if state.preview {
        return Err(ApiError::invalid_input(QUERY_DISABLED_MESSAGE));
    }

    let pool = state.manager.require().await?;

    let sql = request.trimmed();
    if sql.is_empty() {
        return Err(ApiError::invalid_input("Query is required"));
    }

    let response = run_sql(&pool, sql).await?;
    info!(
        rows = response.row_count,
        ms = response.execution_time,
        "Query executed"
    );
    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::ConnectionManager;

    #[tokio::test]
    async fn test_preview_rejects_queries() {
        let state = AppState::new(ConnectionManager::default(), true);
        let err = run_query(State(state), Json(QueryRequest::new("SELECT 1")))
            .await
            .unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::BAD_REQUEST);
        assert!(err.public_message().contains("disabled in preview mode"));
    }

    #[tokio::test]
    async fn test_disconnected_wins_over_missing_query() {
        let state = AppState::new(ConnectionManager::default(), false);
        let err = run_query(State(state), Json(QueryRequest::new("")))
            .await
            .unwrap_err();
        assert_eq!(err.public_message(), "Database not connected");
    }
}
