//! Aggregate functions for SELECT lists and HAVING clauses.

use super::impl_comparisons;

/// An aggregate function applied to one field, e.g. `AVG(`age`)`.
///
/// The field is always resolved through the active table metadata; aliases
/// do not apply to the argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aggregate {
    func: String,
    field: String,
    alias: Option<String>,
}

impl Aggregate {
    /// Creates an aggregate from a function name, written verbatim.
    #[must_use]
    pub fn new(func: &str, field: &str) -> Self {
        Self {
            func: String::from(func),
            field: String::from(field),
            alias: None,
        }
    }

    /// Returns the function name.
    #[must_use]
    pub fn func(&self) -> &str {
        &self.func
    }

    /// Returns the logical field name.
    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Returns the select-list alias, if any.
    #[must_use]
    pub fn alias_name(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// Attaches a select-list alias.
    #[must_use]
    pub fn alias(mut self, alias: &str) -> Self {
        self.alias = Some(String::from(alias));
        self
    }
}

impl_comparisons!(Aggregate);

/// `AVG(field)`
#[must_use]
pub fn avg(field: &str) -> Aggregate {
    Aggregate::new("AVG", field)
}

/// `MAX(field)`
#[must_use]
pub fn max(field: &str) -> Aggregate {
    Aggregate::new("MAX", field)
}

/// `MIN(field)`
#[must_use]
pub fn min(field: &str) -> Aggregate {
    Aggregate::new("MIN", field)
}

/// `COUNT(field)`
#[must_use]
pub fn count(field: &str) -> Aggregate {
    Aggregate::new("COUNT", field)
}

/// `SUM(field)`
#[must_use]
pub fn sum(field: &str) -> Aggregate {
    Aggregate::new("SUM", field)
}
