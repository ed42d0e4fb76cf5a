//! Data models for pg-studio.
//!
//! This module re-exports all wire types used throughout the application.

pub mod connection;
pub mod query;
pub mod row;
pub mod schema;

// Re-export commonly used types
pub use connection::{
    ConnectParams, ConnectRequest, ConnectRequestError, ConnectResponse, DEFAULT_DB_PORT,
    PortValue,
};
pub use query::{FieldInfo, QueryRequest, QueryResponse};
pub use row::{
    DeleteRowRequest, DeleteRowResponse, InsertRowRequest, RowResponse, UpdateRowRequest,
};
pub use schema::{
    ColumnEntry, DEFAULT_PAGE, DEFAULT_PAGE_LIMIT, DEFAULT_SCHEMA, InvalidPagination, Pagination,
    SchemaEntry, SchemasResponse, StructureQuery, TableDataQuery, TableDataResponse, TableEntry,
    TableStructureResponse, TablesQuery, TablesResponse,
};
