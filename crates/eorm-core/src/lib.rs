//! # eorm-core
//!
//! Expression compiler, table metadata and shard result aggregation for a
//! parameterized SQL ORM.
//!
//! This crate provides:
//! - A closed expression tree ([`expr`]) with column, value, aggregate, math
//!   and predicate nodes
//! - A compiler ([`builder::Builder`]) that renders trees into SQL with
//!   positional placeholders and collects the bound arguments in order
//! - A concurrent metadata registry ([`meta::MetaRegistry`]) mapping model
//!   types to tables
//! - Result aggregation across shards ([`sharding::ShardResult`])
//!
//! ## Compiling a statement
//!
//! ```rust
//! use eorm_core::builder::{QueryBuilder, Selector};
//! use eorm_core::dialect::MySqlDialect;
//! use eorm_core::expr::col;
//! use eorm_core::meta::{FieldDescriptor, MetaRegistry, Model};
//! use eorm_core::SqlValue;
//!
//! struct TestModel;
//!
//! impl Model for TestModel {
//!     fn fields() -> Vec<FieldDescriptor> {
//!         vec![
//!             FieldDescriptor::new::<i64>("id", "auto_increment,primary_key"),
//!             FieldDescriptor::new::<String>("first_name", ""),
//!             FieldDescriptor::new::<i8>("age", ""),
//!         ]
//!     }
//! }
//!
//! let registry = MetaRegistry::new();
//! let query = Selector::<TestModel>::new(&registry, &MySqlDialect)
//!     .where_clause([col("age").add(1).gt(18), col("first_name").eq("Tom")])
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(
//!     query.sql,
//!     "SELECT * FROM `test_model` WHERE ((`age`+?)>?) AND (`first_name`=?);"
//! );
//! assert_eq!(
//!     query.args,
//!     vec![SqlValue::Int(1), SqlValue::Int(18), SqlValue::Text("Tom".into())]
//! );
//! ```
//!
//! ## SQL Injection Prevention
//!
//! Values never reach the SQL text; they are always bound as arguments.

pub mod builder;
pub mod dialect;
pub mod error;
pub mod expr;
pub mod meta;
pub mod sharding;
pub mod sqlite;
pub mod value;

#[cfg(test)]
mod fixtures;

pub use builder::{Builder, Deleter, Query, QueryBuilder, Selector};
pub use error::{EormError, Result};
pub use expr::{col, Expr, Predicate};
pub use meta::{MetaRegistry, Model, TableMeta};
pub use sharding::{ExecResult, ShardResult};
pub use value::{SqlValue, ToSqlValue};
