//! Schema-browsing data models.
//!
//! Wire types for the metadata endpoints: schema and table listings, column
//! structure, and paginated table data.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Schema used when a request does not name one.
pub const DEFAULT_SCHEMA: &str = "public";

/// Default page number for table data.
pub const DEFAULT_PAGE: i64 = 1;

/// Default page size for table data.
pub const DEFAULT_PAGE_LIMIT: i64 = 50;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaEntry {
    pub schema_name: String,
}

impl SchemaEntry {
    pub fn new(schema_name: impl Into<String>) -> Self {
        Self {
            schema_name: schema_name.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemasResponse {
    pub schemas: Vec<SchemaEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableEntry {
    pub table_name: String,
    pub column_count: i64,
    /// Total relation size in bytes. Zero in preview mode.
    pub table_size: i64,
}

impl TableEntry {
    pub fn new(table_name: impl Into<String>, column_count: i64, table_size: i64) -> Self {
        Self {
            table_name: table_name.into(),
            column_count,
            table_size,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TablesResponse {
    pub tables: Vec<TableEntry>,
}

/// One column as reported by `information_schema.columns`, joined with
/// primary-key constraint information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnEntry {
    pub column_name: String,
    pub data_type: String,
    /// `YES` / `NO`, passed through from the catalog.
    pub is_nullable: String,
    pub column_default: Option<String>,
    pub constraint_type: Option<String>,
    pub is_primary: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableStructureResponse {
    pub columns: Vec<ColumnEntry>,
}

/// Query string of `GET /api/db/tables`.
#[derive(Debug, Clone, Deserialize)]
pub struct TablesQuery {
    pub schema: Option<String>,
}

impl TablesQuery {
    pub fn schema(&self) -> &str {
        self.schema.as_deref().unwrap_or(DEFAULT_SCHEMA)
    }
}

/// Query string of `GET /api/db/table-structure`.
#[derive(Debug, Clone, Deserialize)]
pub struct StructureQuery {
    pub schema: Option<String>,
    pub table: Option<String>,
}

impl StructureQuery {
    pub fn schema(&self) -> &str {
        self.schema.as_deref().unwrap_or(DEFAULT_SCHEMA)
    }
}

/// Query string of `GET /api/db/table-data`.
///
/// `page` and `limit` stay strings here so that a non-numeric value maps to
/// a 400 with a stable message instead of an extractor rejection.
#[derive(Debug, Clone, Deserialize)]
pub struct TableDataQuery {
    pub schema: Option<String>,
    pub table: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl TableDataQuery {
    pub fn schema(&self) -> &str {
        self.schema.as_deref().unwrap_or(DEFAULT_SCHEMA)
    }

    /// Parse page/limit with defaults, rejecting non-numeric or
    /// non-positive values.
    pub fn pagination(&self) -> Result<Pagination, InvalidPagination> {
        let page = parse_param(self.page.as_deref(), DEFAULT_PAGE)?;
        let limit = parse_param(self.limit.as_deref(), DEFAULT_PAGE_LIMIT)?;
        Ok(Pagination { page, limit })
    }
}

fn parse_param(raw: Option<&str>, default: i64) -> Result<i64, InvalidPagination> {
    match raw {
        None => Ok(default),
        Some(s) if s.trim().is_empty() => Ok(default),
        Some(s) => match s.trim().parse::<i64>() {
            Ok(n) if n >= 1 => Ok(n),
            _ => Err(InvalidPagination),
        },
    }
}

/// `page`/`limit` did not parse to positive integers.
#[derive(Debug, thiserror::Error)]
#[error("Invalid page or limit parameter")]
pub struct InvalidPagination;

/// Resolved pagination window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
}

impl Pagination {
    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }

    /// `ceil(total_count / limit)`.
    pub fn total_pages(&self, total_count: i64) -> i64 {
        if self.limit <= 0 {
            return 0;
        }
        (total_count + self.limit - 1) / self.limit
    }
}

/// Body of a `GET /api/db/table-data` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableDataResponse {
    pub data: Vec<serde_json::Map<String, JsonValue>>,
    pub total_count: i64,
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
}

impl TableDataResponse {
    pub fn new(
        data: Vec<serde_json::Map<String, JsonValue>>,
        total_count: i64,
        pagination: Pagination,
    ) -> Self {
        Self {
            data,
            total_count,
            page: pagination.page,
            limit: pagination.limit,
            total_pages: pagination.total_pages(total_count),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_defaults_to_public() {
        let q = TablesQuery { schema: None };
        assert_eq!(q.schema(), "public");

        let q = TablesQuery {
            schema: Some("auth".to_string()),
        };
        assert_eq!(q.schema(), "auth");
    }

    #[test]
    fn test_pagination_defaults() {
        let q = TableDataQuery {
            schema: None,
            table: Some("users".to_string()),
            page: None,
            limit: None,
        };
        let p = q.pagination().unwrap();
        assert_eq!(p.page, 1);
        assert_eq!(p.limit, 50);
        assert_eq!(p.offset(), 0);
    }

    #[test]
    fn test_pagination_parses_strings() {
        let q = TableDataQuery {
            schema: None,
            table: Some("users".to_string()),
            page: Some("3".to_string()),
            limit: Some("25".to_string()),
        };
        let p = q.pagination().unwrap();
        assert_eq!(p.page, 3);
        assert_eq!(p.limit, 25);
        assert_eq!(p.offset(), 50);
    }

    #[test]
    fn test_pagination_rejects_garbage() {
        let q = TableDataQuery {
            schema: None,
            table: Some("users".to_string()),
            page: Some("NaN".to_string()),
            limit: None,
        };
        assert!(q.pagination().is_err());

        let q = TableDataQuery {
            schema: None,
            table: Some("users".to_string()),
            page: Some("0".to_string()),
            limit: None,
        };
        assert!(q.pagination().is_err());

        let q = TableDataQuery {
            schema: None,
            table: Some("users".to_string()),
            page: None,
            limit: Some("-5".to_string()),
        };
        assert!(q.pagination().is_err());
    }

    #[test]
    fn test_total_pages_rounds_up() {
        let p = Pagination { page: 1, limit: 50 };
        assert_eq!(p.total_pages(120), 3);
        assert_eq!(p.total_pages(100), 2);
        assert_eq!(p.total_pages(1), 1);
        assert_eq!(p.total_pages(0), 0);
    }

    #[test]
    fn test_table_data_response_serialization() {
        let response = TableDataResponse::new(vec![], 120, Pagination { page: 1, limit: 50 });
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"totalCount\":120"));
        assert!(json.contains("\"totalPages\":3"));
        assert!(json.contains("\"page\":1"));
        assert!(json.contains("\"limit\":50"));
    }

    #[test]
    fn test_column_entry_serializes_snake_case() {
        let entry = ColumnEntry {
            column_name: "id".to_string(),
            data_type: "integer".to_string(),
            is_nullable: "NO".to_string(),
            column_default: Some("nextval('users_id_seq'::regclass)".to_string()),
            constraint_type: Some("PRIMARY KEY".to_string()),
            is_primary: true,
        };
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"column_name\":\"id\""));
        assert!(json.contains("\"is_primary\":true"));
        assert!(json.contains("\"constraint_type\":\"PRIMARY KEY\""));
    }
}
