//! Query terminals
//!
//! Each terminal consumes the builder, compiles the accumulated clause
//! state against the builder's schema, runs the statement through the
//! executor, and hydrates whatever came back. Reply rows stay in store
//! order end to end.

use crate::client::StoreClient;
use crate::entity::Entity;
use crate::error::{MapperError, MapperResult};
use crate::executor::Executor;
use crate::query::builder::QueryBuilder;
use crate::query::compile::StatementCompiler;
use crate::value::StoreValue;

impl QueryBuilder {
    /// Execute and hydrate every matching row
    pub async fn get(self, client: &dyn StoreClient) -> MapperResult<Vec<Entity>> {
        let statement = StatementCompiler::new(&self.schema).select(&self.clauses)?;
        let bags = Executor::new(client).fetch(&statement).await?;
        bags.into_iter()
            .map(|bag| Entity::hydrate(self.schema.clone(), bag))
            .collect()
    }

    /// Execute and hydrate the first matching row, if any
    pub async fn first(self, client: &dyn StoreClient) -> MapperResult<Option<Entity>> {
        let mut entities = self.limit(1).get(client).await?;
        Ok(entities.pop())
    }

    /// Like [`QueryBuilder::first`], but absence is a hard failure
    pub async fn first_or_fail(self, client: &dyn StoreClient) -> MapperResult<Entity> {
        let table = self.schema.table().to_string();
        self.first(client)
            .await?
            .ok_or_else(|| MapperError::RecordRequired(format!("{} (first match)", table)))
    }

    /// Fetch one row by primary key; absence is `Ok(None)`
    pub async fn find(
        self,
        client: &dyn StoreClient,
        key: impl Into<StoreValue>,
    ) -> MapperResult<Option<Entity>> {
        let pk = self.schema.primary_key().to_string();
        self.where_eq(&pk, key).first(client).await
    }

    /// Fetch one row by primary key or fail with `RecordRequired`
    pub async fn find_or_fail(
        self,
        client: &dyn StoreClient,
        key: impl Into<StoreValue>,
    ) -> MapperResult<Entity> {
        let key = key.into();
        let table = self.schema.table().to_string();
        let shown = key.to_string();
        self.find(client, key)
            .await?
            .ok_or_else(|| MapperError::RecordRequired(format!("{}({})", table, shown)))
    }

    /// Count matching rows
    pub async fn count(self, client: &dyn StoreClient) -> MapperResult<u64> {
        let statement = StatementCompiler::new(&self.schema).count(&self.clauses)?;
        let bags = Executor::new(client).fetch(&statement).await?;
        let bag = bags
            .into_iter()
            .next()
            .ok_or_else(|| MapperError::Hydration("count reply carried no row".to_string()))?;
        match bag.get("count") {
            Some(StoreValue::Int(n)) if *n >= 0 => Ok(*n as u64),
            Some(other) => Err(MapperError::Hydration(format!(
                "count column held {} instead of a non-negative integer",
                other.type_name()
            ))),
            None => Err(MapperError::Hydration(
                "count reply carried no count column".to_string(),
            )),
        }
    }

    /// Whether at least one row matches
    pub async fn exists(self, client: &dyn StoreClient) -> MapperResult<bool> {
        let statement = StatementCompiler::new(&self.schema).exists(&self.clauses)?;
        let bags = Executor::new(client).fetch(&statement).await?;
        Ok(!bags.is_empty())
    }

    /// Collect one column's values across matching rows. Rows that came
    /// back without the column yield `Null` rather than shifting the
    /// positions of the rest.
    pub async fn pluck(
        self,
        client: &dyn StoreClient,
        column: &str,
    ) -> MapperResult<Vec<StoreValue>> {
        let statement = StatementCompiler::new(&self.schema).pluck(&self.clauses, column)?;
        let bags = Executor::new(client).fetch(&statement).await?;
        Ok(bags
            .into_iter()
            .map(|mut bag| bag.remove(column).unwrap_or(StoreValue::Null))
            .collect())
    }
}
