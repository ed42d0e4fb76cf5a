//! HTTP API surface.
//!
//! Every endpoint lives under `/api/db` and speaks JSON. Handlers share one
//! [`AppState`]: the process-wide connection manager plus the preview flag.
//! With `--preview` the metadata endpoints serve the static dataset and the
//! query endpoint is disabled.

pub mod connect;
pub mod metadata;
pub mod query;
pub mod row;

use crate::db::ConnectionManager;
use axum::Router;
use axum::routing::{get, post};

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub manager: ConnectionManager,
    pub preview: bool,
}

impl AppState {
    pub fn new(manager: ConnectionManager, preview: bool) -> Self {
        Self { manager, preview }
    }
}

/// Build the `/api/db` router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/db/connect", post(connect::connect))
        .route("/api/db/query", post(query::run_query))
        .route("/api/db/schemas", get(metadata::schemas))
        .route("/api/db/tables", get(metadata::tables))
        .route("/api/db/table-structure", get(metadata::table_structure))
        .route("/api/db/table-data", get(metadata::table_data))
        .route(
            "/api/db/row",
            post(row::insert_row)
                .put(row::update_row)
                .delete(row::delete_row),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_router_builds() {
        let state = AppState::new(ConnectionManager::default(), false);
        let _ = router(state);
    }
}
