//! Statement execution
//!
//! Bridges compiled statements to the external store client and maps raw
//! reply rows into normalized attribute bags. There is no retry here: a
//! failed statement surfaces exactly once, as a typed error, and the
//! caller decides what a retry would even mean for its workload.

use tracing::debug;

use crate::attributes::AttributeBag;
use crate::client::StoreClient;
use crate::error::MapperResult;
use crate::query::Statement;

/// Runs compiled statements against a store client
pub struct Executor<'a> {
    client: &'a dyn StoreClient,
}

impl<'a> Executor<'a> {
    pub fn new(client: &'a dyn StoreClient) -> Self {
        Self { client }
    }

    /// Run a read statement and hydrate each reply row, preserving store
    /// order.
    pub async fn fetch(&self, statement: &Statement) -> MapperResult<Vec<AttributeBag>> {
        debug!(
            statement = %statement.text,
            params = statement.params.len(),
            "executing read"
        );
        let rows = self
            .client
            .execute(&statement.text, &statement.params)
            .await?;
        Ok(rows.into_iter().map(AttributeBag::from_row).collect())
    }

    /// Run a write statement, discarding any reply rows.
    pub async fn apply(&self, statement: &Statement) -> MapperResult<()> {
        debug!(
            statement = %statement.text,
            params = statement.params.len(),
            "executing write"
        );
        self.client
            .execute(&statement.text, &statement.params)
            .await?;
        Ok(())
    }
}
