//! Execution of compiled queries on SQLite through sqlx.

use sqlx::sqlite::{SqliteArguments, SqliteQueryResult, SqliteRow};
use sqlx::{FromRow, Sqlite};

use crate::builder::Query;
use crate::error::Result;
use crate::sharding::ExecResult;
use crate::value::SqlValue;

type SqliteQuery<'q> = sqlx::query::Query<'q, Sqlite, SqliteArguments<'q>>;
type SqliteQueryAs<'q, O> = sqlx::query::QueryAs<'q, Sqlite, O, SqliteArguments<'q>>;

/// Prepares `query` for execution, binding its arguments in placeholder
/// order.
pub fn bind_query(query: &Query) -> SqliteQuery<'_> {
    query
        .args
        .iter()
        .cloned()
        .fold(sqlx::query(&query.sql), bind_param)
}

/// Like [`bind_query`], mapping each row to `O`.
pub fn bind_query_as<O>(query: &Query) -> SqliteQueryAs<'_, O>
where
    O: for<'r> FromRow<'r, SqliteRow>,
{
    query
        .args
        .iter()
        .cloned()
        .fold(sqlx::query_as(&query.sql), bind_param_as)
}

fn bind_param(query: SqliteQuery<'_>, value: SqlValue) -> SqliteQuery<'_> {
    match value {
        SqlValue::Null => query.bind(Option::<i64>::None),
        SqlValue::Bool(b) => query.bind(b),
        SqlValue::Int(i) => query.bind(i),
        SqlValue::Float(f) => query.bind(f),
        SqlValue::Text(s) => query.bind(s),
        SqlValue::Blob(b) => query.bind(b),
    }
}

fn bind_param_as<O>(query: SqliteQueryAs<'_, O>, value: SqlValue) -> SqliteQueryAs<'_, O>
where
    O: for<'r> FromRow<'r, SqliteRow>,
{
    match value {
        SqlValue::Null => query.bind(Option::<i64>::None),
        SqlValue::Bool(b) => query.bind(b),
        SqlValue::Int(i) => query.bind(i),
        SqlValue::Float(f) => query.bind(f),
        SqlValue::Text(s) => query.bind(s),
        SqlValue::Blob(b) => query.bind(b),
    }
}

impl ExecResult for SqliteQueryResult {
    fn last_insert_id(&self) -> Result<i64> {
        Ok(self.last_insert_rowid())
    }

    fn rows_affected(&self) -> Result<u64> {
        Ok(Self::rows_affected(self))
    }
}
