//! Error types for pg-studio.
//!
//! This module defines the API error taxonomy using `thiserror`. Every
//! failure leaving a handler becomes a `{"error": "..."}` JSON body with
//! HTTP 400 for validation and connectivity problems or HTTP 500 for
//! everything else, matching what the browser UI expects.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum ApiError {
    /// Connecting or authenticating against the target server failed.
    /// The message is already mapped to a user-facing string.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// The database reported an error while executing a statement.
    #[error("database error: {message}")]
    Database {
        message: String,
        /// e.g., "42P01" for undefined table
        sql_state: Option<String>,
    },

    /// No pool is installed; the caller has to connect first.
    #[error("database not connected")]
    NotConnected,

    /// The request body or query string failed validation.
    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    #[error("internal error: {message}")]
    Internal { message: String },
}

impl ApiError {
    /// Create a connection error with an already-mapped message.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a database error with optional SQL state.
    pub fn database(message: impl Into<String>, sql_state: Option<String>) -> Self {
        Self::Database {
            message: message.into(),
            sql_state,
        }
    }

    /// Create an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// HTTP status for this error: validation and connectivity report 400,
    /// everything else 500.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Connection { .. } | Self::NotConnected | Self::InvalidInput { .. } => {
                StatusCode::BAD_REQUEST
            }
            Self::Database { .. } | Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The string placed in the `{"error": ...}` body. Raw driver messages
    /// pass through unchanged; an empty message degrades to "Unknown error".
    pub fn public_message(&self) -> String {
        let message = match self {
            Self::Connection { message } => message.as_str(),
            Self::Database { message, .. } => message.as_str(),
            Self::NotConnected => "Database not connected",
            Self::InvalidInput { message } => message.as_str(),
            Self::Internal { message } => message.as_str(),
        };
        if message.is_empty() {
            "Unknown error".to_string()
        } else {
            message.to_string()
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }
        let body = Json(serde_json::json!({ "error": self.public_message() }));
        (status, body).into_response()
    }
}

/// Convert sqlx errors to ApiError. Anything the driver reports during
/// normal execution is a 500 with the driver's own message; the connect
/// path maps its failures separately in `db::pool`.
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => {
                let code = db_err.code().map(|c| c.to_string());
                ApiError::database(db_err.message(), code)
            }
            sqlx::Error::PoolClosed => ApiError::internal("Connection pool is closed"),
            sqlx::Error::PoolTimedOut => {
                ApiError::internal("Timed out acquiring a connection from the pool")
            }
            sqlx::Error::Io(io_err) => ApiError::internal(format!("I/O error: {}", io_err)),
            sqlx::Error::Tls(tls_err) => ApiError::internal(format!("TLS error: {}", tls_err)),
            sqlx::Error::Protocol(msg) => ApiError::internal(format!("Protocol error: {}", msg)),
            sqlx::Error::Configuration(msg) => ApiError::internal(msg.to_string()),
            sqlx::Error::ColumnDecode { index, source } => {
                ApiError::internal(format!("Failed to decode column {}: {}", index, source))
            }
            sqlx::Error::Decode(source) => ApiError::internal(format!("Decode error: {}", source)),
            _ => ApiError::internal(err.to_string()),
        }
    }
}

/// Result type alias for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ApiError::connection("Authentication failed");
        assert!(err.to_string().contains("connection failed"));
    }

    #[test]
    fn test_validation_errors_are_400() {
        assert_eq!(
            ApiError::invalid_input("Query is required").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::NotConnected.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::connection("refused").status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_database_errors_are_500() {
        let err = ApiError::database("syntax error", Some("42601".to_string()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            ApiError::internal("boom").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_public_message_passthrough() {
        let err = ApiError::database("relation \"users\" does not exist", Some("42P01".into()));
        assert_eq!(err.public_message(), "relation \"users\" does not exist");
    }

    #[test]
    fn test_not_connected_message() {
        assert_eq!(ApiError::NotConnected.public_message(), "Database not connected");
    }

    #[test]
    fn test_empty_message_degrades_to_unknown() {
        assert_eq!(ApiError::internal("").public_message(), "Unknown error");
    }

    #[tokio::test]
    async fn test_into_response_body_shape() {
        let resp = ApiError::invalid_input("Missing required parameters").into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "Missing required parameters");
    }
}
