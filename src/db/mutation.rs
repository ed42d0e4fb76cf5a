//! Row mutation SQL.
//!
//! Builds single-row INSERT/UPDATE/DELETE statements from JSON key-value
//! mappings. Identifiers (schema, table, column) are interpolated as quoted
//! identifiers since the protocol cannot parameterize them; every value is
//! bound, never concatenated.
//!
//! Values arrive as JSON, so timestamps, UUIDs, numerics, and arrays are
//! strings or JSON structures by the time they get here. Each one is bound
//! as text and the placeholder carries an explicit `::type` cast taken from
//! `information_schema.columns`, letting the server parse the text into the
//! real column type. Columns the catalog does not know keep a bare
//! placeholder so the server's own error surfaces.

use crate::db::types::RowToJson;
use crate::error::ApiResult;
use serde_json::Value as JsonValue;
use sqlx::postgres::PgArguments;
use sqlx::query::Query;
use sqlx::{PgPool, Postgres, Row};
use std::collections::HashMap;
use tracing::debug;

const COLUMN_TYPES: &str = r#"
    SELECT column_name, data_type, udt_schema, udt_name
    FROM information_schema.columns
    WHERE table_schema = $1 AND table_name = $2
    "#;

/// Quote an identifier for interpolation: double quotes around it, embedded
/// double quotes doubled.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// `"schema"."table"` with both parts quoted.
pub fn qualified_table(schema: &str, table: &str) -> String {
    format!("{}.{}", quote_ident(schema), quote_ident(table))
}

/// Target type of one column, resolved from the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnType {
    /// SQL type for the `::cast` suffix.
    pub cast: String,
    pub is_array: bool,
}

impl ColumnType {
    /// Resolve from an `information_schema.columns` row. `data_type` is
    /// usable verbatim except for the ARRAY and USER-DEFINED markers, which
    /// fall back to the qualified `udt_name`.
    pub fn from_catalog(data_type: &str, udt_schema: &str, udt_name: &str) -> Self {
        match data_type {
            "ARRAY" => Self {
                cast: format!("{}.{}", quote_ident(udt_schema), quote_ident(udt_name)),
                is_array: true,
            },
            "USER-DEFINED" => Self {
                cast: format!("{}.{}", quote_ident(udt_schema), quote_ident(udt_name)),
                is_array: false,
            },
            other => Self {
                cast: other.to_string(),
                is_array: false,
            },
        }
    }

    fn is_json(&self) -> bool {
        self.cast == "json" || self.cast == "jsonb"
    }
}

/// Fetch the column-to-type map for a table.
pub async fn column_types(
    pool: &PgPool,
    schema: &str,
    table: &str,
) -> ApiResult<HashMap<String, ColumnType>> {
    let rows = sqlx::query(COLUMN_TYPES)
        .bind(schema)
        .bind(table)
        .fetch_all(pool)
        .await?;

    Ok(rows
        .iter()
        .map(|row| {
            let name: String = row.get("column_name");
            let data_type: String = row.get("data_type");
            let udt_schema: String = row.get("udt_schema");
            let udt_name: String = row.get("udt_name");
            (
                name,
                ColumnType::from_catalog(&data_type, &udt_schema, &udt_name),
            )
        })
        .collect())
}

/// A statement ready to execute: SQL text plus text-rendered parameters in
/// placeholder order. `None` binds SQL NULL.
#[derive(Debug, Clone)]
pub struct BuiltStatement {
    pub sql: String,
    pub params: Vec<Option<String>>,
}

/// Render a JSON value to its text parameter form. Arrays destined for
/// array columns become Postgres array literals; for json/jsonb columns the
/// JSON text passes through unchanged.
fn render_value(value: &JsonValue, column_type: Option<&ColumnType>) -> Option<String> {
    match value {
        JsonValue::Null => None,
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Bool(b) => Some(b.to_string()),
        JsonValue::Number(n) => Some(n.to_string()),
        JsonValue::Array(items) => {
            if column_type.is_some_and(ColumnType::is_json) {
                Some(value.to_string())
            } else {
                Some(array_literal(items))
            }
        }
        JsonValue::Object(_) => Some(value.to_string()),
    }
}

/// Render a JSON array as a Postgres array literal. String elements are
/// quoted with `\` and `"` escaped; other scalars use their JSON form.
fn array_literal(items: &[JsonValue]) -> String {
    let elements = items
        .iter()
        .map(|item| match item {
            JsonValue::Null => "NULL".to_string(),
            JsonValue::String(s) => {
                format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
            }
            other => other.to_string(),
        })
        .collect::<Vec<_>>()
        .join(",");
    format!("{{{}}}", elements)
}

fn cast_suffix(column_type: Option<&ColumnType>) -> String {
    column_type
        .map(|t| format!("::{}", t.cast))
        .unwrap_or_default()
}

/// `INSERT INTO "s"."t" ("c1", ...) VALUES ($1::type, ...) RETURNING *`
///
/// Callers validate that `data` is non-empty.
pub fn build_insert(
    schema: &str,
    table: &str,
    data: &serde_json::Map<String, JsonValue>,
    types: &HashMap<String, ColumnType>,
) -> BuiltStatement {
    let mut columns = Vec::with_capacity(data.len());
    let mut placeholders = Vec::with_capacity(data.len());
    let mut params = Vec::with_capacity(data.len());

    for (column, value) in data {
        let column_type = types.get(column);
        columns.push(quote_ident(column));
        params.push(render_value(value, column_type));
        placeholders.push(format!("${}{}", params.len(), cast_suffix(column_type)));
    }

    BuiltStatement {
        sql: format!(
            "INSERT INTO {} ({}) VALUES ({}) RETURNING *",
            qualified_table(schema, table),
            columns.join(", "),
            placeholders.join(", ")
        ),
        params,
    }
}

/// `UPDATE "s"."t" SET ... WHERE ... RETURNING *`
///
/// A null `where` value becomes `"col" IS NULL`; a bound null would never
/// match. Callers validate that `data` and `where_values` are non-empty.
pub fn build_update(
    schema: &str,
    table: &str,
    data: &serde_json::Map<String, JsonValue>,
    where_values: &serde_json::Map<String, JsonValue>,
    types: &HashMap<String, ColumnType>,
) -> BuiltStatement {
    let mut params = Vec::with_capacity(data.len() + where_values.len());
    let mut assignments = Vec::with_capacity(data.len());

    for (column, value) in data {
        let column_type = types.get(column);
        params.push(render_value(value, column_type));
        assignments.push(format!(
            "{} = ${}{}",
            quote_ident(column),
            params.len(),
            cast_suffix(column_type)
        ));
    }

    let conditions = build_conditions(where_values, types, &mut params);

    BuiltStatement {
        sql: format!(
            "UPDATE {} SET {} WHERE {} RETURNING *",
            qualified_table(schema, table),
            assignments.join(", "),
            conditions.join(" AND ")
        ),
        params,
    }
}

/// `DELETE FROM "s"."t" WHERE ...`
///
/// Callers validate that `where_values` is non-empty.
pub fn build_delete(
    schema: &str,
    table: &str,
    where_values: &serde_json::Map<String, JsonValue>,
    types: &HashMap<String, ColumnType>,
) -> BuiltStatement {
    let mut params = Vec::with_capacity(where_values.len());
    let conditions = build_conditions(where_values, types, &mut params);

    BuiltStatement {
        sql: format!(
            "DELETE FROM {} WHERE {}",
            qualified_table(schema, table),
            conditions.join(" AND ")
        ),
        params,
    }
}

fn build_conditions(
    where_values: &serde_json::Map<String, JsonValue>,
    types: &HashMap<String, ColumnType>,
    params: &mut Vec<Option<String>>,
) -> Vec<String> {
    let mut conditions = Vec::with_capacity(where_values.len());
    for (column, value) in where_values {
        if value.is_null() {
            conditions.push(format!("{} IS NULL", quote_ident(column)));
        } else {
            let column_type = types.get(column);
            params.push(render_value(value, column_type));
            conditions.push(format!(
                "{} = ${}{}",
                quote_ident(column),
                params.len(),
                cast_suffix(column_type)
            ));
        }
    }
    conditions
}

fn bind_params<'q>(
    mut query: Query<'q, Postgres, PgArguments>,
    params: &'q [Option<String>],
) -> Query<'q, Postgres, PgArguments> {
    for param in params {
        query = query.bind(param.as_deref());
    }
    query
}

/// Executes the built statements against the live pool.
pub struct RowMutator;

impl RowMutator {
    /// Insert one row and return it as the server stored it.
    pub async fn insert_row(
        pool: &PgPool,
        schema: &str,
        table: &str,
        data: &serde_json::Map<String, JsonValue>,
    ) -> ApiResult<Option<JsonValue>> {
        let types = column_types(pool, schema, table).await?;
        let stmt = build_insert(schema, table, data, &types);
        debug!(sql = %stmt.sql, "Inserting row");

        let row = bind_params(sqlx::query(&stmt.sql), &stmt.params)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(|r| JsonValue::Object(r.to_json_map())))
    }

    /// Update the row matched by `where_values` and return its new state.
    /// Returns `None` when nothing matched.
    pub async fn update_row(
        pool: &PgPool,
        schema: &str,
        table: &str,
        data: &serde_json::Map<String, JsonValue>,
        where_values: &serde_json::Map<String, JsonValue>,
    ) -> ApiResult<Option<JsonValue>> {
        let types = column_types(pool, schema, table).await?;
        let stmt = build_update(schema, table, data, where_values, &types);
        debug!(sql = %stmt.sql, "Updating row");

        let row = bind_params(sqlx::query(&stmt.sql), &stmt.params)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(|r| JsonValue::Object(r.to_json_map())))
    }

    /// Delete the rows matched by `where_values`.
    pub async fn delete_row(
        pool: &PgPool,
        schema: &str,
        table: &str,
        where_values: &serde_json::Map<String, JsonValue>,
    ) -> ApiResult<()> {
        let types = column_types(pool, schema, table).await?;
        let stmt = build_delete(schema, table, where_values, &types);
        debug!(sql = %stmt.sql, "Deleting row");

        bind_params(sqlx::query(&stmt.sql), &stmt.params)
            .execute(pool)
            .await?;
        Ok(())
    }
}
