//! Connection-related data models.
//!
//! This module defines the connect request/response wire types and the
//! resolved connection parameters handed to the driver adapter.

use serde::{Deserialize, Serialize};

/// Default Postgres port, used when a database URL omits one.
pub const DEFAULT_DB_PORT: u16 = 5432;

/// A port as it arrives on the wire. The connect form submits it as a
/// string, API clients tend to send a number; both are accepted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PortValue {
    Number(u16),
    Text(String),
}

impl PortValue {
    /// Resolve to a usable port number. Zero and non-numeric text count
    /// as absent.
    pub fn resolve(&self) -> Option<u16> {
        match self {
            Self::Number(n) if *n > 0 => Some(*n),
            Self::Number(_) => None,
            Self::Text(s) => s.trim().parse::<u16>().ok().filter(|p| *p > 0),
        }
    }
}

/// Body of `POST /api/db/connect`.
///
/// All fields default so that an absent field and an empty field fail
/// validation the same way instead of failing deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectRequest {
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub port: Option<PortValue>,
    #[serde(default)]
    pub database: String,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub password: String,
}

impl ConnectRequest {
    /// Validate the request and produce resolved connection parameters.
    pub fn into_params(self) -> Result<ConnectParams, ConnectRequestError> {
        if self.host.trim().is_empty()
            || self.database.trim().is_empty()
            || self.user.trim().is_empty()
            || self.password.is_empty()
            || self.port.is_none()
        {
            return Err(ConnectRequestError::MissingParameters);
        }
        let port = self
            .port
            .as_ref()
            .and_then(PortValue::resolve)
            .ok_or(ConnectRequestError::InvalidPort)?;

        Ok(ConnectParams {
            host: self.host,
            port,
            database: self.database,
            user: self.user,
            password: self.password,
        })
    }
}

/// Errors that can occur when validating a connect request.
#[derive(Debug, thiserror::Error)]
pub enum ConnectRequestError {
    #[error("Missing required connection parameters")]
    MissingParameters,

    #[error("Invalid port number")]
    InvalidPort,
}

/// Resolved parameters for a database connection.
#[derive(Debug, Clone)]
pub struct ConnectParams {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: String,
}

impl ConnectParams {
    /// Display-safe target description (no password).
    pub fn display_target(&self) -> String {
        format!(
            "{}@{}:{}/{}",
            self.user, self.host, self.port, self.database
        )
    }
}

/// Body of a successful `POST /api/db/connect` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview_mode: Option<bool>,
}

impl ConnectResponse {
    /// A live connection was established.
    pub fn ok() -> Self {
        Self {
            success: true,
            preview_mode: None,
        }
    }

    /// Preview mode simulates a successful connect.
    pub fn preview() -> Self {
        Self {
            success: true,
            preview_mode: Some(true),
        }
    }
}
