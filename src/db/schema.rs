//! Schema introspection.
//!
//! Read-only queries against `information_schema` and `pg_catalog` backing
//! the schema browser: schema and table listings, column structure, and
//! paginated table data. Nothing here is cached; every request hits the
//! live catalog.

use crate::db::mutation::qualified_table;
use crate::db::types::RowToJson;
use crate::error::ApiResult;
use crate::models::{ColumnEntry, Pagination, SchemaEntry, TableDataResponse, TableEntry};
use sqlx::{PgPool, Row};
use tracing::debug;

mod queries {
    pub const LIST_SCHEMAS: &str = r#"
        SELECT schema_name
        FROM information_schema.schemata
        WHERE schema_name NOT IN ('pg_catalog', 'information_schema', 'pg_toast')
        ORDER BY schema_name
        "#;

    pub const LIST_TABLES: &str = r#"
        SELECT
            t.table_name,
            (
                SELECT COUNT(*)
                FROM information_schema.columns c
                WHERE c.table_schema = t.table_schema
                    AND c.table_name = t.table_name
            ) as column_count,
            pg_total_relation_size(
                quote_ident(t.table_schema) || '.' || quote_ident(t.table_name)
            ) as table_size
        FROM information_schema.tables t
        WHERE t.table_schema = $1
            AND t.table_type = 'BASE TABLE'
        ORDER BY t.table_name
        "#;

    pub const TABLE_STRUCTURE: &str = r#"
        SELECT
            c.column_name,
            c.data_type,
            c.is_nullable,
            c.column_default,
            tc.constraint_type,
            CASE WHEN tc.constraint_type = 'PRIMARY KEY' THEN true ELSE false END as is_primary
        FROM information_schema.columns c
        LEFT JOIN information_schema.key_column_usage kcu
            ON c.table_schema = kcu.table_schema
            AND c.table_name = kcu.table_name
            AND c.column_name = kcu.column_name
        LEFT JOIN information_schema.table_constraints tc
            ON kcu.constraint_name = tc.constraint_name
            AND kcu.table_schema = tc.table_schema
            AND tc.constraint_type = 'PRIMARY KEY'
        WHERE c.table_schema = $1 AND c.table_name = $2
        ORDER BY c.ordinal_position
        "#;
}

/// SQL for counting rows of a table. Identifiers are interpolated quoted;
/// they cannot be bound.
fn count_sql(schema: &str, table: &str) -> String {
    format!(
        "SELECT COUNT(*) as count FROM {}",
        qualified_table(schema, table)
    )
}

/// SQL for one page of table data. Limit and offset are bound.
fn page_sql(schema: &str, table: &str) -> String {
    format!(
        "SELECT * FROM {} LIMIT $1 OFFSET $2",
        qualified_table(schema, table)
    )
}

/// Schema inspector backing the metadata endpoints.
pub struct SchemaInspector;

impl SchemaInspector {
    /// List user-visible schemas, ordered by name.
    pub async fn list_schemas(pool: &PgPool) -> ApiResult<Vec<SchemaEntry>> {
        let rows = sqlx::query(queries::LIST_SCHEMAS).fetch_all(pool).await?;

        let schemas = rows
            .iter()
            .map(|row| SchemaEntry::new(row.get::<String, _>("schema_name")))
            .collect::<Vec<_>>();

        debug!(count = schemas.len(), "Listed schemas");
        Ok(schemas)
    }

    /// List base tables of one schema with column counts and on-disk sizes.
    pub async fn list_tables(pool: &PgPool, schema: &str) -> ApiResult<Vec<TableEntry>> {
        let rows = sqlx::query(queries::LIST_TABLES)
            .bind(schema)
            .fetch_all(pool)
            .await?;

        let tables = rows
            .iter()
            .map(|row| {
                let name: String = row.get("table_name");
                let column_count: i64 = row.try_get("column_count").unwrap_or(0);
                let table_size: i64 = row.try_get("table_size").unwrap_or(0);
                TableEntry::new(name, column_count, table_size)
            })
            .collect::<Vec<_>>();

        debug!(count = tables.len(), schema = schema, "Listed tables");
        Ok(tables)
    }

    /// Column structure of a table, in ordinal order, with primary-key
    /// columns flagged.
    pub async fn table_structure(
        pool: &PgPool,
        schema: &str,
        table: &str,
    ) -> ApiResult<Vec<ColumnEntry>> {
        let rows = sqlx::query(queries::TABLE_STRUCTURE)
            .bind(schema)
            .bind(table)
            .fetch_all(pool)
            .await?;

        let columns = rows
            .iter()
            .map(|row| ColumnEntry {
                column_name: row.get("column_name"),
                data_type: row.get("data_type"),
                is_nullable: row.get("is_nullable"),
                column_default: row.try_get("column_default").ok().flatten(),
                constraint_type: row.try_get("constraint_type").ok().flatten(),
                is_primary: row.try_get("is_primary").unwrap_or(false),
            })
            .collect::<Vec<_>>();

        debug!(
            count = columns.len(),
            schema = schema,
            table = table,
            "Fetched table structure"
        );
        Ok(columns)
    }

    /// One page of rows plus the total count for the pagination footer.
    pub async fn table_data(
        pool: &PgPool,
        schema: &str,
        table: &str,
        pagination: Pagination,
    ) -> ApiResult<TableDataResponse> {
        let total_count: i64 = sqlx::query_scalar(&count_sql(schema, table))
            .fetch_one(pool)
            .await?;

        let rows = sqlx::query(&page_sql(schema, table))
            .bind(pagination.limit)
            .bind(pagination.offset())
            .fetch_all(pool)
            .await?;

        let data = rows.iter().map(RowToJson::to_json_map).collect();

        debug!(
            schema = schema,
            table = table,
            page = pagination.page,
            rows = rows.len(),
            total = total_count,
            "Fetched table data"
        );
        Ok(TableDataResponse::new(data, total_count, pagination))
    }
}
