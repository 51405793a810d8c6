//! Aggregation of execution results from several shards.
//!
//! A statement fanned out to N shards yields N driver results. [`ShardResult`]
//! presents them as one: the last shard's insert id and the sum of affected
//! rows.

use std::sync::Arc;

use crate::error::{EormError, Result};

/// The outcome of executing a non-query statement.
pub trait ExecResult {
    /// Returns the id generated by the last insert.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver cannot report it.
    fn last_insert_id(&self) -> Result<i64>;

    /// Returns the number of rows the statement changed.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver cannot report it.
    fn rows_affected(&self) -> Result<u64>;
}

/// Combined result of one statement executed on several shards.
///
/// A result may carry an error set by the caller (for example when one shard
/// failed to execute at all). It is reported by [`err`](Self::err) and by both
/// accessors.
#[derive(Debug)]
pub struct ShardResult<R> {
    err: Option<Arc<EormError>>,
    results: Vec<R>,
}

impl<R: ExecResult> ShardResult<R> {
    /// Wraps the per-shard results in shard order.
    #[must_use]
    pub const fn new(results: Vec<R>) -> Self {
        Self { err: None, results }
    }

    /// Returns a result carrying the same shard results and `err`.
    #[must_use]
    pub fn with_err(self, err: EormError) -> Self {
        Self {
            err: Some(Arc::new(err)),
            results: self.results,
        }
    }

    /// Returns the stored error, if any.
    #[must_use]
    pub fn err(&self) -> Option<&EormError> {
        self.err.as_deref()
    }

    /// Returns the per-shard results.
    #[must_use]
    pub fn results(&self) -> &[R] {
        &self.results
    }

    fn check(&self) -> Result<()> {
        match &self.err {
            Some(err) => Err(EormError::Preset(Arc::clone(err))),
            None => Ok(()),
        }
    }
}

impl<R: ExecResult> ExecResult for ShardResult<R> {
    /// Returns the last shard's insert id.
    fn last_insert_id(&self) -> Result<i64> {
        self.check()?;
        self.results
            .last()
            .ok_or(EormError::NoShardResults)?
            .last_insert_id()
    }

    /// Sums affected rows across shards, stopping at the first failure.
    fn rows_affected(&self) -> Result<u64> {
        self.check()?;
        if self.results.is_empty() {
            return Err(EormError::NoShardResults);
        }
        let mut sum = 0;
        for result in &self.results {
            sum += result.rows_affected()?;
        }
        Ok(sum)
    }
}
