//! Expression compiler and statement builders.
//!
//! [`Builder`] renders expression trees into a SQL buffer and collects the
//! bound arguments in placeholder order. [`Selector`] and [`Deleter`] drive it
//! to produce whole statements.
//!
//! # Example
//!
//! ```rust
//! use eorm_core::builder::{Builder, Query};
//! use eorm_core::dialect::MySqlDialect;
//! use eorm_core::expr::{col, Expr, Op};
//! use eorm_core::meta::{FieldDescriptor, MetaRegistry, Model};
//! use eorm_core::SqlValue;
//!
//! struct Person;
//!
//! impl Model for Person {
//!     fn fields() -> Vec<FieldDescriptor> {
//!         vec![FieldDescriptor::new::<i32>("age", "")]
//!     }
//! }
//!
//! let registry = MetaRegistry::new();
//! let meta = registry.get::<Person>().unwrap();
//! let mut builder = Builder::new(&meta, &MySqlDialect);
//! builder
//!     .build_expr(&Expr::binary(col("age").add(1), Op::Gt, 18))
//!     .unwrap();
//!
//! let Query { sql, args } = builder.into_query();
//! assert_eq!(sql, "(`age`+?)>?");
//! assert_eq!(args, vec![SqlValue::Int(1), SqlValue::Int(18)]);
//! ```

mod delete;
mod select;

use std::collections::HashSet;

pub use delete::Deleter;
pub use select::{OrderBy, Selectable, Selector};

use crate::dialect::Dialect;
use crate::error::{EormError, Result};
use crate::expr::{Aggregate, BinaryExpr, Column, Expr, Predicate, RawExpr};
use crate::meta::{ColumnMeta, TableMeta};
use crate::value::SqlValue;

// Capacity hint for the first bound argument.
const INITIAL_ARGS_CAPACITY: usize = 4;

/// A compiled statement.
///
/// `args[i]` binds the i-th placeholder of `sql`.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    /// SQL text with positional placeholders.
    pub sql: String,
    /// Bound values in placeholder order.
    pub args: Vec<SqlValue>,
}

/// Anything that compiles to a [`Query`].
pub trait QueryBuilder {
    /// Compiles the statement.
    ///
    /// # Errors
    ///
    /// Returns an error if a referenced field cannot be resolved or the model
    /// metadata cannot be derived.
    fn build(&self) -> Result<Query>;
}

/// Compiles expressions against one table's metadata.
///
/// A builder accumulates state for a single statement. After an error its
/// buffer and arguments are not a valid partial result; drop it (or
/// [`reset`](Self::reset) it) instead of continuing.
#[derive(Debug)]
pub struct Builder<'a> {
    meta: &'a TableMeta,
    quote: char,
    placeholder: &'static str,
    buffer: String,
    args: Vec<SqlValue>,
    aliases: HashSet<String>,
}

impl<'a> Builder<'a> {
    /// Creates a builder for statements over `meta`.
    ///
    /// The dialect is consulted here only; its quote character and
    /// placeholder are kept for the whole compilation.
    #[must_use]
    pub fn new(meta: &'a TableMeta, dialect: &dyn Dialect) -> Self {
        Self {
            meta,
            quote: dialect.identifier_quote(),
            placeholder: dialect.parameter_placeholder(),
            buffer: String::with_capacity(64),
            args: Vec::new(),
            aliases: HashSet::new(),
        }
    }

    /// Returns the active table metadata.
    #[must_use]
    pub const fn meta(&self) -> &'a TableMeta {
        self.meta
    }

    /// Registers an alias. Columns named like it are quoted as given instead
    /// of being resolved through the metadata.
    pub fn register_alias(&mut self, alias: &str) {
        self.aliases.insert(alias.to_string());
    }

    /// Returns true if `name` is a registered alias.
    #[must_use]
    pub fn is_alias(&self, name: &str) -> bool {
        self.aliases.contains(name)
    }

    /// Appends raw text.
    pub fn push_str(&mut self, s: &str) {
        self.buffer.push_str(s);
    }

    /// Appends a character.
    pub fn push(&mut self, c: char) {
        self.buffer.push(c);
    }

    /// Appends an identifier surrounded by the dialect's quote character.
    pub fn quote(&mut self, ident: &str) {
        self.buffer.push(self.quote);
        self.buffer.push_str(ident);
        self.buffer.push(self.quote);
    }

    /// Writes a placeholder and binds `arg` to it.
    pub fn parameter(&mut self, arg: SqlValue) {
        if self.args.capacity() == 0 {
            self.args.reserve(INITIAL_ARGS_CAPACITY);
        }
        self.buffer.push_str(self.placeholder);
        self.args.push(arg);
    }

    /// Resolves a logical field name to its physical column name.
    ///
    /// # Errors
    ///
    /// Returns [`EormError::InvalidColumn`] if the table has no such field.
    pub fn column_name(&self, field: &str) -> Result<&'a str> {
        let meta: &'a TableMeta = self.meta;
        meta.column(field)
            .map(ColumnMeta::column_name)
            .ok_or_else(|| EormError::InvalidColumn(field.to_string()))
    }

    /// Compiles an expression at top level.
    ///
    /// # Errors
    ///
    /// Returns [`EormError::InvalidColumn`] for any column or aggregate
    /// argument that is neither a known field nor (for columns) an alias.
    /// Compilation stops at the first error.
    pub fn build_expr(&mut self, expr: &Expr) -> Result<()> {
        match expr {
            Expr::Raw(raw) => self.build_raw_expr(raw),
            Expr::Column(column) => self.build_column(column)?,
            Expr::Aggregate(aggregate) => self.build_aggregate(aggregate)?,
            Expr::Value(value) => self.parameter(value.clone()),
            Expr::Math(math) => self.build_binary_expr(math.as_binary())?,
            Expr::Binary(binary) => self.build_binary_expr(binary)?,
            Expr::Predicate(predicate) => self.build_binary_expr(predicate.as_binary())?,
        }
        Ok(())
    }

    /// Folds `predicates` with AND, left to right, and compiles the result.
    ///
    /// Callers pass at least one predicate; an empty slice writes nothing.
    ///
    /// # Errors
    ///
    /// Same as [`build_expr`](Self::build_expr).
    pub fn build_predicates(&mut self, predicates: &[Predicate]) -> Result<()> {
        let Some((first, rest)) = predicates.split_first() else {
            return Ok(());
        };
        let folded = rest.iter().cloned().fold(first.clone(), Predicate::and);
        self.build_binary_expr(folded.as_binary())
    }

    pub(crate) fn build_column(&mut self, column: &Column) -> Result<()> {
        let name = column.name();
        if name.is_empty() {
            return Ok(());
        }
        if self.is_alias(name) {
            self.quote(name);
            return Ok(());
        }
        let column_name = self.column_name(name)?;
        self.quote(column_name);
        Ok(())
    }

    pub(crate) fn build_aggregate(&mut self, aggregate: &Aggregate) -> Result<()> {
        self.buffer.push_str(aggregate.func());
        self.buffer.push('(');
        let column_name = self.column_name(aggregate.field())?;
        self.quote(column_name);
        self.buffer.push(')');
        Ok(())
    }

    fn build_binary_expr(&mut self, expr: &BinaryExpr) -> Result<()> {
        self.build_sub_expr(expr.left())?;
        self.buffer.push_str(expr.op().text());
        self.build_sub_expr(expr.right())
    }

    pub(crate) fn build_raw_expr(&mut self, raw: &RawExpr) {
        self.buffer.push_str(raw.sql());
        self.args.extend_from_slice(raw.args());
    }

    // Operands that are themselves binary nodes are parenthesized.
    fn build_sub_expr(&mut self, expr: &Expr) -> Result<()> {
        if expr.is_compound() {
            self.buffer.push('(');
            self.build_expr(expr)?;
            self.buffer.push(')');
            Ok(())
        } else {
            self.build_expr(expr)
        }
    }

    /// Returns the SQL written so far.
    #[must_use]
    pub fn sql(&self) -> &str {
        &self.buffer
    }

    /// Returns the arguments bound so far.
    #[must_use]
    pub fn args(&self) -> &[SqlValue] {
        &self.args
    }

    /// Clears the buffer, arguments and aliases for a new statement.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.args.clear();
        self.aliases.clear();
    }

    /// Consumes the builder and returns the compiled query.
    #[must_use]
    pub fn into_query(self) -> Query {
        Query {
            sql: self.buffer,
            args: self.args,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::{GenericDialect, MySqlDialect};
    use crate::expr::{avg, col, not, raw, value, Op};
    use crate::fixtures::test_model_meta;
    use crate::meta::{FieldDescriptor, MetaRegistry, Model};

    fn compile(expr: impl Into<Expr>) -> Result<Query> {
        let meta = test_model_meta();
        let mut builder = Builder::new(&meta, &MySqlDialect);
        builder.build_expr(&expr.into())?;
        Ok(builder.into_query())
    }

    #[test]
    fn test_column_resolves_and_quotes() {
        let query = compile(col("first_name")).unwrap();
        assert_eq!(query.sql, "`first_name`");
        assert!(query.args.is_empty());
    }

    #[test]
    fn test_column_with_generic_dialect() {
        let meta = test_model_meta();
        let mut builder = Builder::new(&meta, &GenericDialect);
        builder.build_expr(&col("age").eq(18).into()).unwrap();
        assert_eq!(builder.sql(), "\"age\"=?");
    }

    #[test]
    fn test_empty_column_writes_nothing() {
        let query = compile(col("")).unwrap();
        assert_eq!(query.sql, "");
    }

    #[test]
    fn test_invalid_column_keeps_prior_text() {
        let meta = test_model_meta();
        let mut builder = Builder::new(&meta, &MySqlDialect);
        builder.push_str("SELECT ");
        builder.build_expr(&col("id").into()).unwrap();
        builder.push(',');

        let err = builder.build_expr(&col("nickname").into()).unwrap_err();
        assert!(matches!(err, EormError::InvalidColumn(ref f) if f == "nickname"));
        assert_eq!(err.to_string(), "invalid column: nickname");
        assert_eq!(builder.sql(), "SELECT `id`,");
    }

    #[test]
    fn test_invalid_column_inside_predicate() {
        let err = compile(col("id").eq(1).and(col("nickname").eq("x"))).unwrap_err();
        assert!(matches!(err, EormError::InvalidColumn(ref f) if f == "nickname"));
    }

    #[test]
    fn test_alias_bypasses_metadata() {
        struct Renamed;
        impl Model for Renamed {
            fn fields() -> Vec<FieldDescriptor> {
                vec![FieldDescriptor::new::<i64>("x", "column=x_col")]
            }
        }
        let registry = MetaRegistry::new();
        let meta = registry.get::<Renamed>().unwrap();

        let mut builder = Builder::new(&meta, &MySqlDialect);
        builder.build_expr(&col("x").into()).unwrap();
        assert_eq!(builder.sql(), "`x_col`");

        builder.reset();
        builder.register_alias("x");
        builder.build_expr(&col("x").into()).unwrap();
        assert_eq!(builder.sql(), "`x`");

        builder.register_alias("total");
        builder.push(',');
        builder.build_expr(&col("total").into()).unwrap();
        assert_eq!(builder.sql(), "`x`,`total`");
    }

    #[test]
    fn test_aliases_are_per_builder() {
        let meta = test_model_meta();
        let mut first = Builder::new(&meta, &MySqlDialect);
        first.register_alias("total");
        assert!(first.build_expr(&col("total").into()).is_ok());

        let mut second = Builder::new(&meta, &MySqlDialect);
        assert!(second.build_expr(&col("total").into()).is_err());
    }

    #[test]
    fn test_aggregate() {
        let query = compile(avg("age")).unwrap();
        assert_eq!(query.sql, "AVG(`age`)");
    }

    #[test]
    fn test_aggregate_ignores_aliases() {
        let meta = test_model_meta();
        let mut builder = Builder::new(&meta, &MySqlDialect);
        builder.register_alias("total");
        let err = builder.build_expr(&avg("total").into()).unwrap_err();
        assert!(matches!(err, EormError::InvalidColumn(ref f) if f == "total"));
    }

    #[test]
    fn test_value_is_parameterized() {
        let query = compile(value("'; DROP TABLE users; --")).unwrap();
        assert_eq!(query.sql, "?");
        assert_eq!(
            query.args,
            vec![SqlValue::Text("'; DROP TABLE users; --".to_string())]
        );
    }

    #[test]
    fn test_nested_math_is_parenthesized() {
        let query = compile(Expr::binary(col("age").add(1), Op::Gt, 18)).unwrap();
        assert_eq!(query.sql, "(`age`+?)>?");
        assert_eq!(query.args, vec![SqlValue::Int(1), SqlValue::Int(18)]);
    }

    #[test]
    fn test_right_nested_math() {
        let query = compile(col("age").multi(col("age").add(1))).unwrap();
        assert_eq!(query.sql, "`age`*(`age`+?)");
        assert_eq!(query.args, vec![SqlValue::Int(1)]);
    }

    #[test]
    fn test_predicate_and_or() {
        let query = compile(col("id").eq(1).or(col("age").gt(18).and(col("age").lt(65)))).unwrap();
        assert_eq!(query.sql, "(`id`=?) OR ((`age`>?) AND (`age`<?))");
        assert_eq!(
            query.args,
            vec![SqlValue::Int(1), SqlValue::Int(18), SqlValue::Int(65)]
        );
    }

    #[test]
    fn test_not() {
        let query = compile(not(col("id").eq(1))).unwrap();
        assert_eq!(query.sql, "NOT (`id`=?)");
    }

    #[test]
    fn test_like() {
        let query = compile(col("first_name").like("Tom%")).unwrap();
        assert_eq!(query.sql, "`first_name` LIKE ?");
    }

    #[test]
    fn test_raw_args_are_appended_in_place() {
        let expr = Predicate::new(
            col("id").eq(1),
            Op::And,
            raw("`age` BETWEEN ? AND ?", vec![SqlValue::Int(18), SqlValue::Int(65)]),
        );
        let query = compile(expr).unwrap();
        assert_eq!(query.sql, "(`id`=?) AND `age` BETWEEN ? AND ?");
        assert_eq!(
            query.args,
            vec![SqlValue::Int(1), SqlValue::Int(18), SqlValue::Int(65)]
        );
    }

    #[test]
    fn test_build_predicates_matches_manual_fold() {
        let p1 = col("id").eq(1);
        let p2 = col("age").gt(18);
        let p3 = col("first_name").like("T%");

        let meta = test_model_meta();
        let mut folded = Builder::new(&meta, &MySqlDialect);
        folded
            .build_predicates(&[p1.clone(), p2.clone(), p3.clone()])
            .unwrap();

        let mut manual = Builder::new(&meta, &MySqlDialect);
        manual.build_expr(&p1.and(p2).and(p3).into()).unwrap();

        assert_eq!(folded.sql(), manual.sql());
        assert_eq!(folded.args(), manual.args());
        assert_eq!(
            folded.sql(),
            "((`id`=?) AND (`age`>?)) AND (`first_name` LIKE ?)"
        );
    }

    #[test]
    fn test_build_single_predicate() {
        let meta = test_model_meta();
        let mut builder = Builder::new(&meta, &MySqlDialect);
        builder.build_predicates(&[col("id").eq(7)]).unwrap();
        assert_eq!(builder.sql(), "`id`=?");
        assert_eq!(builder.args(), &[SqlValue::Int(7)]);
    }

    #[test]
    fn test_build_no_predicates_writes_nothing() {
        let meta = test_model_meta();
        let mut builder = Builder::new(&meta, &MySqlDialect);
        builder.build_predicates(&[]).unwrap();
        assert_eq!(builder.sql(), "");
        assert!(builder.args().is_empty());
    }

    #[test]
    fn test_placeholders_match_args() {
        let trees: Vec<Expr> = vec![
            col("id").eq(1).into(),
            Expr::binary(col("age"), Op::Add, Expr::binary(2, Op::Multi, col("age"))),
            col("age")
                .gt(10)
                .and(col("age").lt(20))
                .or(col("first_name").eq("Tom"))
                .into(),
            Expr::binary(Expr::binary(1, Op::Add, 2), Op::Eq, Expr::binary(3, Op::Sub, 4)),
        ];
        for tree in trees {
            let query = compile(tree).unwrap();
            assert_eq!(query.sql.matches('?').count(), query.args.len(), "{}", query.sql);
        }

        let query =
            compile(Expr::binary(Expr::binary(1, Op::Add, 2), Op::Eq, Expr::binary(3, Op::Sub, 4)))
                .unwrap();
        assert_eq!(query.sql, "(?+?)=(?-?)");
        assert_eq!(
            query.args,
            vec![
                SqlValue::Int(1),
                SqlValue::Int(2),
                SqlValue::Int(3),
                SqlValue::Int(4)
            ]
        );
    }

    #[test]
    fn test_reset_clears_state() {
        let meta = test_model_meta();
        let mut builder = Builder::new(&meta, &MySqlDialect);
        builder.register_alias("total");
        builder.build_expr(&col("id").eq(1).into()).unwrap();
        builder.reset();
        assert_eq!(builder.sql(), "");
        assert!(builder.args().is_empty());
        assert!(!builder.is_alias("total"));
    }

    #[test]
    fn test_dialect_is_read_once() {
        use std::cell::Cell;

        #[derive(Default)]
        struct CountingDialect {
            quotes: Cell<usize>,
            placeholders: Cell<usize>,
        }
        impl Dialect for CountingDialect {
            fn name(&self) -> &'static str {
                "counting"
            }
            fn identifier_quote(&self) -> char {
                self.quotes.set(self.quotes.get() + 1);
                '`'
            }
            fn parameter_placeholder(&self) -> &'static str {
                self.placeholders.set(self.placeholders.get() + 1);
                "?"
            }
        }

        let dialect = CountingDialect::default();
        let meta = test_model_meta();
        let mut builder = Builder::new(&meta, &dialect);
        builder
            .build_predicates(&[col("id").eq(1), col("age").gt(18), col("first_name").like("T%")])
            .unwrap();
        assert_eq!(builder.sql(), "((`id`=?) AND (`age`>?)) AND (`first_name` LIKE ?)");
        assert_eq!(dialect.quotes.get(), 1);
        assert_eq!(dialect.placeholders.get(), 1);
    }

    #[test]
    fn test_column_name_lookup() {
        let meta = test_model_meta();
        let builder = Builder::new(&meta, &MySqlDialect);
        assert_eq!(builder.column_name("last_name").unwrap(), "last_name");
        assert!(builder.column_name("LastName").is_err());
        assert_eq!(builder.meta().table_name(), "test_model");
    }
}
