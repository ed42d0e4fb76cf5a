//! Database access layer.
//!
//! This module provides everything that talks to Postgres:
//! - Connection pool management with SSL negotiation
//! - Free-form query execution
//! - Catalog introspection and paged table reads
//! - Single-row mutations
//! - Postgres-to-JSON value decoding

pub mod executor;
pub mod mutation;
pub mod pool;
pub mod schema;
pub mod types;

pub use executor::run_sql;
pub use mutation::{RowMutator, qualified_table, quote_ident};
pub use pool::{ConnectionManager, map_connect_error, ssl_mode_for_host};
pub use schema::SchemaInspector;
pub use types::RowToJson;
