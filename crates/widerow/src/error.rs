//! Error types for the mapping layer
//!
//! A single enum covers the whole crate: entity usage guards, statement
//! shape rejection, and failures passed through from the store client.
//! Absence of a record is not an error here; lookups that tolerate absence
//! return `Ok(None)` and only the `*_or_fail` variants produce
//! [`MapperError::RecordRequired`].

use thiserror::Error;

/// Result type alias for mapper operations
pub type MapperResult<T> = Result<T, MapperError>;

/// Errors surfaced by entity, query, and executor operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MapperError {
    /// A lookup that promised a record came back empty
    #[error("required record not found: {0}")]
    RecordRequired(String),

    /// The row behind a hydrated entity no longer exists in the store
    #[error("record no longer exists: {0}")]
    RecordGone(String),

    /// Attempt to change the primary key of a persisted entity
    #[error("column '{column}' is immutable on a persisted entity")]
    ImmutableField { column: String },

    /// Operation needs a primary-key value the entity does not carry
    #[error("primary key is missing or unset")]
    MissingPrimaryKey,

    /// Identifier is not part of the trusted schema metadata
    #[error("unknown column '{column}' in table '{table}'")]
    UnknownColumn { table: String, column: String },

    /// Clause combination the partitioned store cannot execute
    #[error("invalid query shape: {0}")]
    InvalidQueryShape(String),

    /// Continuation cursor failed to decode
    #[error("invalid continuation cursor: {0}")]
    InvalidCursor(String),

    /// Transport-level failure reaching the store
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    /// The store accepted the connection but rejected the statement
    #[error("statement rejected by store: {0}")]
    InvalidStatement(String),

    /// A store reply could not be mapped back into attributes
    #[error("hydration failed: {0}")]
    Hydration(String),

    /// Schema metadata failed validation at construction
    #[error("schema error: {0}")]
    Schema(String),
}

impl MapperError {
    /// True for failures worth retrying at a higher layer. The mapper
    /// itself never retries; a failed statement surfaces exactly once.
    pub fn is_transient(&self) -> bool {
        matches!(self, MapperError::StoreUnavailable(_))
    }
}
