#![allow(dead_code)]

use eorm_core::dialect::SqliteDialect;
use eorm_derive::Model;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{FromRow, Row};

pub static DIALECT: SqliteDialect = SqliteDialect::new();

#[derive(Debug, Clone, PartialEq, Eq, Model)]
pub struct TestModel {
    #[eorm(auto_increment, primary_key)]
    pub id: i64,
    pub first_name: String,
    pub age: i8,
    pub last_name: Option<String>,
}

impl<'r> FromRow<'r, SqliteRow> for TestModel {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            first_name: row.try_get("first_name")?,
            age: row.try_get("age")?,
            last_name: row.try_get("last_name")?,
        })
    }
}

/// Opens an in-memory database with the `test_model` table.
pub async fn setup_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(":memory:")
        .await
        .unwrap();
    sqlx::query(
        "CREATE TABLE test_model (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            first_name TEXT NOT NULL,
            age INTEGER NOT NULL,
            last_name TEXT
        )",
    )
    .execute(&pool)
    .await
    .unwrap();
    pool
}

pub async fn insert(pool: &SqlitePool, first_name: &str, age: i8, last_name: Option<&str>) -> i64 {
    sqlx::query("INSERT INTO test_model (first_name, age, last_name) VALUES (?, ?, ?)")
        .bind(first_name)
        .bind(age)
        .bind(last_name)
        .execute(pool)
        .await
        .unwrap()
        .last_insert_rowid()
}
