//! PG Studio Library
//!
//! A browser-based admin console for PostgreSQL: a JSON API over a shared
//! connection pool plus an embedded single-page UI for browsing schemas,
//! editing table data, and running ad-hoc SQL.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod preview;
pub mod server;
pub mod web;

pub use config::Config;
pub use error::{ApiError, ApiResult};
pub use server::Server;
