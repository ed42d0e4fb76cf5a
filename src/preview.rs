//! Static dataset served in preview mode.
//!
//! With `--preview` the server never opens a database connection. Metadata
//! and table data come from the fixed catalog below: a `public` schema with
//! users/posts/comments and an `auth` schema with sessions/tokens. Tables
//! report size 0 and pagination slices the in-memory rows.

use crate::models::{
    ColumnEntry, Pagination, SchemaEntry, SchemasResponse, TableDataResponse, TableEntry,
    TableStructureResponse, TablesResponse,
};
use serde_json::{json, Map, Value as JsonValue};

/// 400 body for `/api/db/query` in preview mode.
pub const QUERY_DISABLED_MESSAGE: &str =
    "Query execution is disabled in preview mode. Connect to a real database to use this feature.";

pub fn schemas() -> SchemasResponse {
    SchemasResponse {
        schemas: vec![SchemaEntry::new("public"), SchemaEntry::new("auth")],
    }
}

/// Tables of one mock schema. Unknown schemas list nothing.
pub fn tables(schema: &str) -> TablesResponse {
    let tables = match schema {
        "public" => vec![
            TableEntry::new("users", 6, 0),
            TableEntry::new("posts", 5, 0),
            TableEntry::new("comments", 4, 0),
        ],
        "auth" => vec![
            TableEntry::new("sessions", 4, 0),
            TableEntry::new("tokens", 3, 0),
        ],
        _ => Vec::new(),
    };
    TablesResponse { tables }
}

pub fn table_structure(table: &str) -> TableStructureResponse {
    let columns = match table {
        "users" => vec![
            serial_pk("id", "users_id_seq"),
            column("name", "character varying", "NO", None),
            column("email", "character varying", "NO", None),
            column("created_at", "timestamp with time zone", "NO", Some("now()")),
            column("role", "character varying", "NO", Some("'user'::character varying")),
            column("active", "boolean", "NO", Some("true")),
        ],
        "posts" => vec![
            serial_pk("id", "posts_id_seq"),
            column("user_id", "integer", "NO", None),
            column("title", "character varying", "NO", None),
            column("content", "text", "YES", None),
            column("created_at", "timestamp with time zone", "NO", Some("now()")),
        ],
        "comments" => vec![
            serial_pk("id", "comments_id_seq"),
            column("post_id", "integer", "NO", None),
            column("user_id", "integer", "NO", None),
            column("content", "text", "NO", None),
            column("created_at", "timestamp with time zone", "NO", Some("now()")),
        ],
        _ => Vec::new(),
    };
    TableStructureResponse { columns }
}

/// Slice the mock rows of `table` into one page.
pub fn table_data(table: &str, pagination: Pagination) -> TableDataResponse {
    let rows = table_rows(table);
    let total_count = rows.len() as i64;

    let offset = pagination.offset() as usize;
    let page_rows = rows
        .into_iter()
        .skip(offset)
        .take(pagination.limit as usize)
        .collect();

    TableDataResponse::new(page_rows, total_count, pagination)
}

fn table_rows(table: &str) -> Vec<Map<String, JsonValue>> {
    let rows = match table {
        "users" => json!([
            {
                "id": 1,
                "name": "Alice Johnson",
                "email": "alice@example.com",
                "created_at": "2024-01-15T10:30:00Z",
                "role": "admin",
                "active": true
            },
            {
                "id": 2,
                "name": "Bob Smith",
                "email": "bob@example.com",
                "created_at": "2024-02-20T14:22:00Z",
                "role": "user",
                "active": true
            },
            {
                "id": 3,
                "name": "Carol Williams",
                "email": "carol@example.com",
                "created_at": "2024-03-10T09:15:00Z",
                "role": "user",
                "active": false
            }
        ]),
        "posts" => json!([
            {
                "id": 1,
                "user_id": 1,
                "title": "Getting Started with PostgreSQL",
                "content": "A comprehensive guide...",
                "created_at": "2024-01-20T11:00:00Z"
            },
            {
                "id": 2,
                "user_id": 2,
                "title": "Database Best Practices",
                "content": "Learn about indexing...",
                "created_at": "2024-02-25T16:30:00Z"
            }
        ]),
        "comments" => json!([
            {
                "id": 1,
                "post_id": 1,
                "user_id": 2,
                "content": "Great article!",
                "created_at": "2024-01-21T12:00:00Z"
            },
            {
                "id": 2,
                "post_id": 1,
                "user_id": 3,
                "content": "Very helpful, thanks!",
                "created_at": "2024-01-22T09:30:00Z"
            }
        ]),
        _ => json!([]),
    };

    match rows {
        JsonValue::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                JsonValue::Object(map) => Some(map),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn column(
    name: &str,
    data_type: &str,
    is_nullable: &str,
    column_default: Option<&str>,
) -> ColumnEntry {
    ColumnEntry {
        column_name: name.to_string(),
        data_type: data_type.to_string(),
        is_nullable: is_nullable.to_string(),
        column_default: column_default.map(str::to_string),
        constraint_type: None,
        is_primary: false,
    }
}

fn serial_pk(name: &str, sequence: &str) -> ColumnEntry {
    ColumnEntry {
        column_name: name.to_string(),
        data_type: "integer".to_string(),
        is_nullable: "NO".to_string(),
        column_default: Some(format!("nextval('{}'::regclass)", sequence)),
        constraint_type: Some("PRIMARY KEY".to_string()),
        is_primary: true,
    }
}
