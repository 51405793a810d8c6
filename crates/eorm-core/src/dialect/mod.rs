//! SQL dialect support.
//!
//! The compiler only needs a dialect for identifier quoting and the
//! placeholder marker. Each builder looks its dialect up once and keeps it for
//! the whole compilation.

mod generic;
mod mysql;
mod sqlite;

pub use generic::GenericDialect;
pub use mysql::MySqlDialect;
pub use sqlite::SqliteDialect;

/// Trait for SQL dialect-specific behavior.
pub trait Dialect {
    /// Returns the name of the dialect.
    fn name(&self) -> &'static str;

    /// Returns the identifier quote character (e.g., `"` for standard SQL, `` ` `` for MySQL).
    fn identifier_quote(&self) -> char {
        '"'
    }

    /// Returns the parameter placeholder marker.
    fn parameter_placeholder(&self) -> &'static str {
        "?"
    }

    /// Quotes an identifier with the dialect's quote character.
    fn quote_identifier(&self, name: &str) -> String {
        let quote = self.identifier_quote();
        format!("{quote}{name}{quote}")
    }
}
