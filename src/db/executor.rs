//! Free-text SQL execution.
//!
//! Runs the SQL editor's input verbatim over the live pool using the
//! driver's unprepared path, so DDL, DML, and multi-statement input all
//! execute with the caller's full privileges. There is no row limit and no
//! application-level timeout; failures surface the driver's own error.

use crate::db::types::RowToJson;
use crate::error::ApiResult;
use crate::models::{FieldInfo, QueryResponse};
use futures_util::TryStreamExt;
use sqlx::postgres::PgRow;
use sqlx::{Column, Executor, PgPool, Row};
use std::time::Instant;
use tracing::debug;

/// Execute `sql` and decode the result set for the wire.
///
/// Field descriptors are taken from the first returned row; statements
/// that return nothing produce an empty `fields` list.
pub async fn run_sql(pool: &PgPool, sql: &str) -> ApiResult<QueryResponse> {
    let start = Instant::now();
    debug!(bytes = sql.len(), "Executing query");

    let rows: Vec<PgRow> = pool.fetch(sql).try_collect().await?;
    let execution_time = start.elapsed().as_millis() as u64;

    let fields = rows.first().map(field_descriptors).unwrap_or_default();
    let row_count = rows.len();
    let json_rows = rows.iter().map(RowToJson::to_json_map).collect();

    debug!(
        rows = row_count,
        elapsed_ms = execution_time,
        "Query finished"
    );

    Ok(QueryResponse {
        rows: json_rows,
        fields,
        row_count,
        execution_time,
    })
}

fn field_descriptors(row: &PgRow) -> Vec<FieldInfo> {
    row.columns()
        .iter()
        .map(|col| FieldInfo::new(col.name(), col.type_info().oid().map(|oid| oid.0)))
        .collect()
}
