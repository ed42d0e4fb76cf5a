//! Query-related data models.
//!
//! Wire types for the SQL editor endpoint: a free-text query in, decoded
//! rows with field descriptors and timing out.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Body of `POST /api/db/query`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRequest {
    #[serde(default)]
    pub query: String,
}

impl QueryRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
        }
    }

    /// The query with surrounding whitespace removed. Empty means the
    /// request is invalid.
    pub fn trimmed(&self) -> &str {
        self.query.trim()
    }
}

/// Descriptor for one result column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldInfo {
    pub name: String,
    /// Postgres type OID, when the driver reports one.
    #[serde(rename = "dataTypeID", skip_serializing_if = "Option::is_none")]
    pub data_type_id: Option<u32>,
}

impl FieldInfo {
    pub fn new(name: impl Into<String>, data_type_id: Option<u32>) -> Self {
        Self {
            name: name.into(),
            data_type_id,
        }
    }
}

/// Body of a successful `POST /api/db/query` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResponse {
    pub rows: Vec<serde_json::Map<String, JsonValue>>,
    pub fields: Vec<FieldInfo>,
    pub row_count: usize,
    /// Wall-clock execution time in milliseconds.
    pub execution_time: u64,
}

impl QueryResponse {
    /// Result with no rows (DDL, or a SELECT matching nothing).
    pub fn empty(execution_time: u64) -> Self {
        Self {
            rows: Vec::new(),
            fields: Vec::new(),
            row_count: 0,
            execution_time,
        }
    }
}
