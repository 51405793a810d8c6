//! DELETE statement builder.

use std::marker::PhantomData;

use tracing::debug;

use super::{Builder, Query, QueryBuilder};
use crate::dialect::Dialect;
use crate::error::Result;
use crate::expr::Predicate;
use crate::meta::{MetaRegistry, Model};

/// Builds `DELETE` statements over the table of `M`.
///
/// Without a WHERE clause the statement deletes every row.
pub struct Deleter<'r, M> {
    registry: &'r MetaRegistry,
    dialect: &'r dyn Dialect,
    where_clause: Vec<Predicate>,
    _model: PhantomData<fn() -> M>,
}

impl<'r, M: Model> Deleter<'r, M> {
    /// Creates a DELETE over the table of `M`.
    #[must_use]
    pub fn new(registry: &'r MetaRegistry, dialect: &'r dyn Dialect) -> Self {
        Self {
            registry,
            dialect,
            where_clause: vec![],
            _model: PhantomData,
        }
    }

    /// Sets the WHERE predicates, joined with AND.
    #[must_use]
    pub fn where_clause(mut self, predicates: impl IntoIterator<Item = Predicate>) -> Self {
        self.where_clause = predicates.into_iter().collect();
        self
    }
}

impl<M: Model> QueryBuilder for Deleter<'_, M> {
    fn build(&self) -> Result<Query> {
        let meta = self.registry.get::<M>()?;
        let mut builder = Builder::new(&meta, self.dialect);

        builder.push_str("DELETE FROM ");
        builder.quote(meta.table_name());
        if !self.where_clause.is_empty() {
            builder.push_str(" WHERE ");
            builder.build_predicates(&self.where_clause)?;
        }
        builder.push(';');

        let query = builder.into_query();
        debug!(model = M::type_name(), sql = %query.sql, args = query.args.len(), "compiled delete");
        Ok(query)
    }
}
