//! Store client capability
//!
//! The mapper touches the store through this one trait. Connection
//! management, node selection, retry policy, and timeouts all belong to
//! the implementation behind it; the mapper submits a statement and gets
//! rows or a typed failure, nothing more.

use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;

use crate::error::MapperError;
use crate::value::StoreValue;

/// One raw row as returned by the store, keyed by result-column name
pub type StoreRow = HashMap<String, StoreValue>;

/// Failure kinds a client implementation may report
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClientError {
    /// Transport failure before or while the request ran
    #[error("unavailable: {0}")]
    Unavailable(String),

    /// The store reached, parsed, and refused the statement
    #[error("rejected: {0}")]
    Rejected(String),
}

impl From<ClientError> for MapperError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Unavailable(msg) => MapperError::StoreUnavailable(msg),
            ClientError::Rejected(msg) => MapperError::InvalidStatement(msg),
        }
    }
}

/// Request/response capability into the row store.
///
/// `params` bind positionally to the `?` placeholders of `statement`.
/// Implementations must return reply rows in store order; the insertion
/// order of rows within a partition is meaningful to callers.
#[async_trait]
pub trait StoreClient: Send + Sync {
    async fn execute(
        &self,
        statement: &str,
        params: &[StoreValue],
    ) -> Result<Vec<StoreRow>, ClientError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_map_onto_mapper_errors() {
        let err: MapperError = ClientError::Unavailable("no contact points".to_string()).into();
        assert_eq!(err, MapperError::StoreUnavailable("no contact points".to_string()));

        let err: MapperError = ClientError::Rejected("unknown table".to_string()).into();
        assert_eq!(err, MapperError::InvalidStatement("unknown table".to_string()));
    }
}
