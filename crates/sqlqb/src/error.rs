//! Error types for sqlqb

use crate::qb::{Op, StatementKind};
use thiserror::Error;

/// Result type alias for sqlqb operations
pub type QbResult<T> = Result<T, QbError>;

/// Errors reported by the strict validation path.
///
/// [`QueryBuilder::build`](crate::QueryBuilder::build) never fails; these are only
/// produced by [`QueryBuilder::validate`](crate::QueryBuilder::validate),
/// [`QueryBuilder::try_build`](crate::QueryBuilder::try_build) and config loading.
#[derive(Debug, Error)]
pub enum QbError {
    /// No SELECT/INSERT/UPDATE/DELETE has been started
    #[error("No statement started: call select, insert, update or delete first")]
    NoStatement,

    /// Write statement without a target table
    #[error("{kind} statement has no target table")]
    MissingTable { kind: StatementKind },

    /// UPDATE without any SET assignment
    #[error("UPDATE {table} has no SET assignments")]
    EmptyUpdate { table: String },

    /// IN / NOT IN given a value that is not a list
    #[error("{op} predicate on '{column}' expects a list value")]
    NonListMembership { column: String, op: Op },

    /// Configuration could not be parsed
    #[error("Config error: {0}")]
    Config(String),
}

impl QbError {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Check if this error came from the IN / NOT IN value check
    pub fn is_non_list_membership(&self) -> bool {
        matches!(self, Self::NonListMembership { .. })
    }
}

impl From<toml::de::Error> for QbError {
    fn from(err: toml::de::Error) -> Self {
        Self::config(err.to_string())
    }
}
