//! Row mutation data models.
//!
//! Wire types for the single-row INSERT/UPDATE/DELETE endpoints. `data`
//! carries new column values, `where` carries the equality match for the
//! row being updated or deleted.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Body of `POST /api/db/row`. All parts are required; handlers reject
/// requests with a blank schema or table or an absent/empty `data`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsertRowRequest {
    #[serde(default)]
    pub schema: String,
    #[serde(default)]
    pub table: String,
    #[serde(default)]
    pub data: Option<serde_json::Map<String, JsonValue>>,
}

/// Body of `PUT /api/db/row`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateRowRequest {
    #[serde(default)]
    pub schema: String,
    #[serde(default)]
    pub table: String,
    #[serde(default)]
    pub data: Option<serde_json::Map<String, JsonValue>>,
    #[serde(rename = "where", default)]
    pub where_values: Option<serde_json::Map<String, JsonValue>>,
}

/// Body of `DELETE /api/db/row`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteRowRequest {
    #[serde(default)]
    pub schema: String,
    #[serde(default)]
    pub table: String,
    #[serde(rename = "where", default)]
    pub where_values: Option<serde_json::Map<String, JsonValue>>,
}

/// Body of a successful insert/update response.
///
/// `row` is the full row as returned by `RETURNING *`. An update whose
/// match found nothing serializes as `{}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row: Option<JsonValue>,
}

impl RowResponse {
    pub fn new(row: Option<JsonValue>) -> Self {
        Self { row }
    }
}

/// Body of a successful delete response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteRowResponse {
    pub success: bool,
}

impl DeleteRowResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}
