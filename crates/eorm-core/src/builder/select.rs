//! SELECT statement builder.

use std::marker::PhantomData;

use tracing::debug;

use super::{Builder, Query, QueryBuilder};
use crate::dialect::Dialect;
use crate::error::Result;
use crate::expr::{col, Aggregate, Column, Predicate, RawExpr};
use crate::meta::{MetaRegistry, Model};
use crate::value::SqlValue;

/// An item of the select list.
#[derive(Debug, Clone, PartialEq)]
pub enum Selectable {
    /// A column, optionally aliased.
    Column(Column),
    /// An aggregate, optionally aliased.
    Aggregate(Aggregate),
    /// Raw SQL written as given.
    Raw(RawExpr),
}

impl From<Column> for Selectable {
    fn from(column: Column) -> Self {
        Self::Column(column)
    }
}

impl From<Aggregate> for Selectable {
    fn from(aggregate: Aggregate) -> Self {
        Self::Aggregate(aggregate)
    }
}

impl From<RawExpr> for Selectable {
    fn from(raw: RawExpr) -> Self {
        Self::Raw(raw)
    }
}

/// An ORDER BY term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    column: Column,
    desc: bool,
}

impl OrderBy {
    /// Ascending order by a field or alias.
    #[must_use]
    pub fn asc(field: &str) -> Self {
        Self {
            column: col(field),
            desc: false,
        }
    }

    /// Descending order by a field or alias.
    #[must_use]
    pub fn desc(field: &str) -> Self {
        Self {
            column: col(field),
            desc: true,
        }
    }
}

/// Builds `SELECT` statements over the table of `M`.
///
/// # Example
///
/// ```rust
/// use eorm_core::builder::{OrderBy, QueryBuilder, Selector};
/// use eorm_core::dialect::MySqlDialect;
/// use eorm_core::expr::{avg, col};
/// use eorm_core::meta::{FieldDescriptor, MetaRegistry, Model};
///
/// struct Order;
///
/// impl Model for Order {
///     fn fields() -> Vec<FieldDescriptor> {
///         vec![
///             FieldDescriptor::new::<i64>("id", "primary_key"),
///             FieldDescriptor::new::<i64>("buyer_id", ""),
///             FieldDescriptor::new::<f64>("amount", ""),
///         ]
///     }
/// }
///
/// let registry = MetaRegistry::new();
/// let query = Selector::<Order>::new(&registry, &MySqlDialect)
///     .select(vec![col("buyer_id").into(), avg("amount").alias("avg_amount").into()])
///     .where_clause([col("amount").gt(10)])
///     .group_by(&["buyer_id"])
///     .order_by(OrderBy::desc("avg_amount"))
///     .build()
///     .unwrap();
///
/// assert_eq!(
///     query.sql,
///     "SELECT `buyer_id`,AVG(`amount`) AS `avg_amount` FROM `order` \
///      WHERE `amount`>? GROUP BY `buyer_id` ORDER BY `avg_amount` DESC;"
/// );
/// ```
pub struct Selector<'r, M> {
    registry: &'r MetaRegistry,
    dialect: &'r dyn Dialect,
    distinct: bool,
    columns: Vec<Selectable>,
    where_clause: Vec<Predicate>,
    group_by: Vec<Column>,
    having: Vec<Predicate>,
    order_by: Vec<OrderBy>,
    limit: Option<i64>,
    offset: Option<i64>,
    _model: PhantomData<fn() -> M>,
}

impl<'r, M: Model> Selector<'r, M> {
    /// Creates a `SELECT *` over the table of `M`.
    #[must_use]
    pub fn new(registry: &'r MetaRegistry, dialect: &'r dyn Dialect) -> Self {
        Self {
            registry,
            dialect,
            distinct: false,
            columns: vec![],
            where_clause: vec![],
            group_by: vec![],
            having: vec![],
            order_by: vec![],
            limit: None,
            offset: None,
            _model: PhantomData,
        }
    }

    /// Sets the select list. An empty list selects `*`.
    #[must_use]
    pub fn select(mut self, columns: Vec<Selectable>) -> Self {
        self.columns = columns;
        self
    }

    /// Adds DISTINCT.
    #[must_use]
    pub const fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    /// Sets the WHERE predicates, joined with AND.
    #[must_use]
    pub fn where_clause(mut self, predicates: impl IntoIterator<Item = Predicate>) -> Self {
        self.where_clause = predicates.into_iter().collect();
        self
    }

    /// Sets the GROUP BY fields. Empty names are skipped.
    #[must_use]
    pub fn group_by(mut self, fields: &[&str]) -> Self {
        self.group_by = fields
            .iter()
            .filter(|f| !f.is_empty())
            .map(|f| col(f))
            .collect();
        self
    }

    /// Sets the HAVING predicates, joined with AND.
    #[must_use]
    pub fn having(mut self, predicates: impl IntoIterator<Item = Predicate>) -> Self {
        self.having = predicates.into_iter().collect();
        self
    }

    /// Appends an ORDER BY term. A term with an empty field is skipped.
    #[must_use]
    pub fn order_by(mut self, order: OrderBy) -> Self {
        if !order.column.name().is_empty() {
            self.order_by.push(order);
        }
        self
    }

    /// Sets LIMIT.
    #[must_use]
    pub const fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Sets OFFSET.
    #[must_use]
    pub const fn offset(mut self, offset: i64) -> Self {
        self.offset = Some(offset);
        self
    }

    fn build_selectable(builder: &mut Builder<'_>, item: &Selectable) -> Result<()> {
        let alias = match item {
            Selectable::Column(column) => {
                builder.build_column(column)?;
                column.alias_name()
            }
            Selectable::Aggregate(aggregate) => {
                builder.build_aggregate(aggregate)?;
                aggregate.alias_name()
            }
            Selectable::Raw(raw) => {
                builder.build_raw_expr(raw);
                None
            }
        };
        if let Some(alias) = alias {
            builder.push_str(" AS ");
            builder.quote(alias);
            builder.register_alias(alias);
        }
        Ok(())
    }
}

impl<M: Model> QueryBuilder for Selector<'_, M> {
    fn build(&self) -> Result<Query> {
        let meta = self.registry.get::<M>()?;
        let mut builder = Builder::new(&meta, self.dialect);

        builder.push_str("SELECT ");
        if self.distinct {
            builder.push_str("DISTINCT ");
        }
        if self.columns.is_empty() {
            builder.push('*');
        } else {
            for (i, item) in self.columns.iter().enumerate() {
                if i > 0 {
                    builder.push(',');
                }
                Self::build_selectable(&mut builder, item)?;
            }
        }

        builder.push_str(" FROM ");
        builder.quote(meta.table_name());

        if !self.where_clause.is_empty() {
            builder.push_str(" WHERE ");
            builder.build_predicates(&self.where_clause)?;
        }

        if !self.group_by.is_empty() {
            builder.push_str(" GROUP BY ");
            for (i, column) in self.group_by.iter().enumerate() {
                if i > 0 {
                    builder.push(',');
                }
                builder.build_column(column)?;
            }
        }

        if !self.having.is_empty() {
            builder.push_str(" HAVING ");
            builder.build_predicates(&self.having)?;
        }

        if !self.order_by.is_empty() {
            builder.push_str(" ORDER BY ");
            for (i, order) in self.order_by.iter().enumerate() {
                if i > 0 {
                    builder.push(',');
                }
                builder.build_column(&order.column)?;
                builder.push_str(if order.desc { " DESC" } else { " ASC" });
            }
        }

        if let Some(limit) = self.limit {
            builder.push_str(" LIMIT ");
            builder.parameter(SqlValue::Int(limit));
        }

        if let Some(offset) = self.offset {
            builder.push_str(" OFFSET ");
            builder.parameter(SqlValue::Int(offset));
        }

        builder.push(';');
        let query = builder.into_query();
        debug!(model = M::type_name(), sql = %query.sql, args = query.args.len(), "compiled select");
        Ok(query)
    }
}
