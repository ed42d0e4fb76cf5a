//! Connection pool management.
//!
//! This module owns the single process-wide Postgres pool. Connecting
//! replaces any previous pool; a dedicated short-lived pool is used to test
//! credentials before the real pool is installed.

use crate::config::PoolSettings;
use crate::error::{ApiError, ApiResult};
use crate::models::ConnectParams;
use sqlx::PgPool;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// `application_name` reported to the server by the live pool.
pub const APPLICATION_NAME: &str = "pg-studio";

/// `application_name` for the throwaway credential-test pool.
const TEST_APPLICATION_NAME: &str = "pg-studio-test";

/// Hostname fragment of Supabase's transaction pooler.
const SUPABASE_POOLER_HOST: &str = "pooler.supabase.com";

const AUTH_FAILED_MESSAGE: &str =
    "Authentication failed. Please check your username and password.";
const MISSING_DATABASE_MESSAGE: &str =
    "Database does not exist. Please check the database name.";
const POOLER_REJECTED_MESSAGE: &str = "Connection rejected by database. If using Supabase, \
     try the direct connection string (not pooler). Check that your password is correct \
     and database allows connections.";

/// Pick an SSL mode from the hostname. Hosted providers that sit behind
/// their own TLS termination accept `prefer`; everything else is asked to
/// require SSL. A heuristic, not a guarantee.
pub fn ssl_mode_for_host(host: &str) -> PgSslMode {
    if host.contains("supabase.com") || host.contains("neon.tech") {
        PgSslMode::Prefer
    } else {
        PgSslMode::Require
    }
}

/// Map a connect-path driver error to a stable operator-facing message.
pub fn map_connect_error(err: &sqlx::Error) -> String {
    let code = match err {
        sqlx::Error::Database(db) => db.code().map(|c| c.to_string()),
        _ => None,
    };
    connect_error_message(code.as_deref(), &err.to_string())
}

/// SQLSTATE/message-text mapping, factored out so it is testable without a
/// live connection.
fn connect_error_message(code: Option<&str>, message: &str) -> String {
    if message.contains("db_termination") || code == Some("XX000") {
        return POOLER_REJECTED_MESSAGE.to_string();
    }
    match code {
        Some("28P01") => AUTH_FAILED_MESSAGE.to_string(),
        Some("3D000") => MISSING_DATABASE_MESSAGE.to_string(),
        _ => message.to_string(),
    }
}

fn base_options(params: &ConnectParams) -> PgConnectOptions {
    PgConnectOptions::new()
        .host(&params.host)
        .port(params.port)
        .username(&params.user)
        .password(&params.password)
        .database(&params.database)
}

fn warn_if_pooler(host: &str) {
    if host.contains(SUPABASE_POOLER_HOST) {
        warn!(
            host = %host,
            "Supabase pooler hostname detected; if the connection is rejected, use the direct connection string"
        );
    }
}

/// Holds the single live pool. Cloning shares the slot.
#[derive(Debug, Clone)]
pub struct ConnectionManager {
    pool: Arc<RwLock<Option<PgPool>>>,
    settings: PoolSettings,
}

impl ConnectionManager {
    pub fn new(settings: PoolSettings) -> Self {
        Self {
            pool: Arc::new(RwLock::new(None)),
            settings,
        }
    }

    /// Probe the credentials with a dedicated single-connection pool.
    ///
    /// The probe runs `SELECT 1 as test` and the pool is closed either way.
    /// Failures come back as a connectivity error with the mapped message.
    pub async fn test(&self, params: &ConnectParams) -> ApiResult<()> {
        warn_if_pooler(&params.host);
        debug!(server = %params.display_target(), "Testing connection");

        let options = base_options(params)
            .ssl_mode(PgSslMode::Prefer)
            .application_name(TEST_APPLICATION_NAME)
            .statement_cache_capacity(0);

        let pool = PgPoolOptions::new()
            .max_connections(1)
            .acquire_timeout(self.settings.acquire_timeout)
            .connect_lazy_with(options);

        let probe = sqlx::query("SELECT 1 as test").fetch_one(&pool).await;
        pool.close().await;

        match probe {
            Ok(_) => {
                debug!(server = %params.display_target(), "Connection test succeeded");
                Ok(())
            }
            Err(e) => Err(ApiError::connection(map_connect_error(&e))),
        }
    }

    /// Install a new pool for the given parameters, replacing any previous
    /// one. The pool connects lazily; credentials should be verified with
    /// [`ConnectionManager::test`] first.
    pub async fn connect(&self, params: &ConnectParams) -> ApiResult<()> {
        let options = base_options(params)
            .ssl_mode(ssl_mode_for_host(&params.host))
            .application_name(APPLICATION_NAME)
            .statement_cache_capacity(0);

        info!(server = %params.display_target(), "Installing connection pool");
        self.install(self.build_pool(options)).await;
        Ok(())
    }

    /// Connect from a `postgres://` URL (startup auto-connect). Unlike
    /// [`ConnectionManager::connect`] this probes the pool before keeping
    /// it, so a failure leaves the process unconnected.
    pub async fn connect_url(&self, raw: &str) -> ApiResult<()> {
        let options = PgConnectOptions::from_str(raw)
            .map_err(|e| ApiError::connection(format!("Invalid database URL: {e}")))?;

        let host = url::Url::parse(raw)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
            .unwrap_or_default();
        warn_if_pooler(&host);

        let options = options
            .application_name(APPLICATION_NAME)
            .statement_cache_capacity(0);
        // An explicit sslmode in the URL wins over the host heuristic.
        let options = if raw.contains("sslmode=") {
            options
        } else {
            options.ssl_mode(ssl_mode_for_host(&host))
        };

        let pool = self.build_pool(options);
        if let Err(e) = sqlx::query("SELECT 1 as test").fetch_one(&pool).await {
            pool.close().await;
            return Err(ApiError::connection(map_connect_error(&e)));
        }

        info!(host = %host, "Installing connection pool from database URL");
        self.install(pool).await;
        Ok(())
    }

    /// Clone of the live pool, if any.
    pub async fn current(&self) -> Option<PgPool> {
        self.pool.read().await.clone()
    }

    /// The live pool, or the not-connected error.
    pub async fn require(&self) -> ApiResult<PgPool> {
        self.current().await.ok_or(ApiError::NotConnected)
    }

    pub async fn is_connected(&self) -> bool {
        self.pool.read().await.is_some()
    }

    /// Close and drop the live pool. Used at shutdown.
    pub async fn close(&self) {
        let previous = { self.pool.write().await.take() };
        if let Some(pool) = previous {
            info!("Closing connection pool");
            pool.close().await;
        }
    }

    fn build_pool(&self, options: PgConnectOptions) -> PgPool {
        PgPoolOptions::new()
            .max_connections(self.settings.max_connections)
            .acquire_timeout(self.settings.acquire_timeout)
            .idle_timeout(self.settings.idle_timeout)
            .connect_lazy_with(options)
    }

    async fn install(&self, pool: PgPool) {
        // Swap under the lock, close the old pool outside it. Closing is
        // best-effort; a failure only leaks already-dying connections.
        let previous = { self.pool.write().await.replace(pool) };
        if let Some(old) = previous {
            debug!("Closing previous connection pool");
            old.close().await;
        }
    }
}

impl Default for ConnectionManager {
    fn default() -> Self {
        Self::new(PoolSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ssl_mode_heuristic() {
        assert!(matches!(
            ssl_mode_for_host("db.abcdefgh.supabase.com"),
            PgSslMode::Prefer
        ));
        assert!(matches!(
            ssl_mode_for_host("ep-cool-name-123456.us-east-2.aws.neon.tech"),
            PgSslMode::Prefer
        ));
        assert!(matches!(
            ssl_mode_for_host("aws-0-us-east-1.pooler.supabase.com"),
            PgSslMode::Prefer
        ));
        assert!(matches!(ssl_mode_for_host("localhost"), PgSslMode::Require));
        assert!(matches!(
            ssl_mode_for_host("db.internal.example.com"),
            PgSslMode::Require
        ));
    }

    #[test]
    fn test_connect_error_mapping_auth() {
        let msg = connect_error_message(Some("28P01"), "password authentication failed");
        assert_eq!(msg, AUTH_FAILED_MESSAGE);
    }

    #[test]
    fn test_connect_error_mapping_missing_database() {
        let msg = connect_error_message(Some("3D000"), "database \"nope\" does not exist");
        assert_eq!(msg, MISSING_DATABASE_MESSAGE);
    }

    #[test]
    fn test_connect_error_mapping_pooler() {
        let msg = connect_error_message(Some("XX000"), "some internal error");
        assert_eq!(msg, POOLER_REJECTED_MESSAGE);

        // Message text match applies regardless of code
        let msg = connect_error_message(None, "connection closed: db_termination");
        assert_eq!(msg, POOLER_REJECTED_MESSAGE);
    }

    #[test]
    fn test_connect_error_mapping_passthrough() {
        let msg = connect_error_message(None, "connection refused");
        assert_eq!(msg, "connection refused");

        let msg = connect_error_message(Some("57014"), "canceling statement");
        assert_eq!(msg, "canceling statement");
    }

    #[tokio::test]
    async fn test_manager_starts_unconnected() {
        let manager = ConnectionManager::default();
        assert!(!manager.is_connected().await);
        assert!(manager.current().await.is_none());
    }

    #[tokio::test]
    async fn test_require_reports_not_connected() {
        let manager = ConnectionManager::default();
        let err = manager.require().await.unwrap_err();
        assert_eq!(err.public_message(), "Database not connected");
    }

    #[tokio::test]
    async fn test_close_without_pool_is_noop() {
        let manager = ConnectionManager::default();
        manager.close().await;
        assert!(!manager.is_connected().await);
    }
}
