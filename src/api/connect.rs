//! Connection establishment endpoint.

use crate::api::AppState;
use crate::error::{ApiError, ApiResult};
use crate::models::{ConnectRequest, ConnectResponse};
use axum::Json;
use axum::extract::State;
use tracing::info;

/// `POST /api/db/connect`
///
/// Validates the submitted parameters, probes the server with a short-lived
/// single-connection pool, and installs the live pool on success. Probe
/// failures come back as 400 with a mapped message. In preview mode the
/// connection is simulated and nothing is dialed.
pub async fn connect(
    State(state): State<AppState>,
    Json(request): Json<ConnectRequest>,
) -> ApiResult<Json<ConnectResponse>> {
    if state.preview {
        info!("Preview mode: simulating successful connection");
        return Ok(Json(ConnectResponse::preview()));
    }

    let params = request
        .into_params()
        .map_err(|e| ApiError::invalid_input(e.to_string()))?;

    info!(server = %params.display_target(), "Testing database connection");
    state.manager.test(&params).await?;
    state.manager.connect(&params).await?;
    info!(server = %params.display_target(), "Database connection established");

    Ok(Json(ConnectResponse::ok()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::ConnectionManager;
    use serde_json::json;

    fn preview_state() -> AppState {
        AppState::new(ConnectionManager::default(), true)
    }

    fn live_state() -> AppState {
        AppState::new(ConnectionManager::default(), false)
    }

    fn request(body: serde_json::Value) -> Json<ConnectRequest> {
        Json(serde_json::from_value(body).unwrap())
    }

    #[tokio::test]
    async fn test_preview_simulates_connection() {
        let response = connect(State(preview_state()), request(json!({})))
            .await
            .unwrap();
        assert!(response.0.success);
        assert_eq!(response.0.preview_mode, Some(true));
    }

    #[tokio::test]
    async fn test_missing_parameters_rejected() {
        let err = connect(
            State(live_state()),
            request(json!({"host": "localhost", "port": 5432})),
        )
        .await
        .unwrap_err();
        assert_eq!(
            err.public_message(),
            "Missing required connection parameters"
        );
        assert_eq!(err.status(), axum::http::StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_blank_host_rejected() {
        let err = connect(
            State(live_state()),
            request(json!({
                "host": "  ",
                "port": 5432,
                "database": "app",
                "user": "postgres",
                "password": "secret"
            })),
        )
        .await
        .unwrap_err();
        assert_eq!(
            err.public_message(),
            "Missing required connection parameters"
        );
    }
}
