//! Error types for expression compilation, metadata and result aggregation.

use std::sync::Arc;

use thiserror::Error;

/// Errors raised while compiling queries or deriving model metadata.
#[derive(Debug, Error)]
pub enum EormError {
    /// A referenced field has no column in the active table metadata and is
    /// not a registered alias.
    #[error("invalid column: {0}")]
    InvalidColumn(String),

    /// The model cannot be mapped to a table.
    #[error("invalid model {model}: {reason}")]
    InvalidModel {
        /// Model type name.
        model: String,
        /// What made the model unusable.
        reason: String,
    },

    /// A field annotation carries a token the registry does not understand.
    #[error("invalid tag on field {field}: unknown token `{token}`")]
    InvalidTag {
        /// Logical field name.
        field: String,
        /// The offending token.
        token: String,
    },

    /// An aggregated result was built from zero shard results.
    #[error("no shard results to aggregate")]
    NoShardResults,

    /// An error that was set on an aggregated result before it was read.
    #[error(transparent)]
    Preset(Arc<EormError>),

    /// A shard reported a failure through a non-sqlx driver.
    #[error("execution error: {0}")]
    Execution(String),

    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Result type alias for eorm operations.
pub type Result<T> = std::result::Result<T, EormError>;
