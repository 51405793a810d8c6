//! Column references.

use super::{impl_arithmetic, impl_comparisons, Op, Predicate};

/// Creates a column reference from a logical field name.
#[must_use]
pub fn col(name: &str) -> Column {
    Column {
        name: String::from(name),
        alias: None,
    }
}

/// A column referenced by its logical field name.
///
/// The name is resolved to the physical column through the active table
/// metadata, unless it matches an alias registered on the builder. An empty
/// name renders nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    name: String,
    alias: Option<String>,
}

impl Column {
    /// Returns the logical field name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the select-list alias, if any.
    #[must_use]
    pub fn alias_name(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// Attaches a select-list alias (`col AS alias`).
    #[must_use]
    pub fn alias(mut self, alias: &str) -> Self {
        self.alias = Some(String::from(alias));
        self
    }

    /// Creates a LIKE predicate.
    #[must_use]
    pub fn like(self, pattern: impl Into<super::Expr>) -> Predicate {
        Predicate::new(self, Op::Like, pattern)
    }

    /// Creates a NOT LIKE predicate.
    #[must_use]
    pub fn not_like(self, pattern: impl Into<super::Expr>) -> Predicate {
        Predicate::new(self, Op::NotLike, pattern)
    }
}

impl_comparisons!(Column);
impl_arithmetic!(Column);
