//! Entity persistence
//!
//! Create, dirty-subset update, delete, and the two re-query operations.
//! All writes go through the compiler, so everything here inherits the
//! parameterization and identifier rules. Writes are last-write-wins at
//! the store's timestamp resolution and nothing here claims atomicity
//! across columns of one row.

use std::sync::Arc;

use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use crate::attributes::AttributeBag;
use crate::client::StoreClient;
use crate::entity::{Entity, EntityState};
use crate::error::{MapperError, MapperResult};
use crate::executor::Executor;
use crate::query::{QueryBuilder, StatementCompiler, WriteOptions};
use crate::schema::{TableSchema, CREATED_AT_COLUMN, UPDATED_AT_COLUMN};
use crate::value::StoreValue;

impl Entity {
    /// Build an entity from `attrs` and persist it in one call
    pub async fn create(
        client: &dyn StoreClient,
        schema: Arc<TableSchema>,
        attrs: AttributeBag,
    ) -> MapperResult<Entity> {
        let mut entity = Entity::new(schema);
        for (column, value) in attrs.iter() {
            entity.set(column, value.clone())?;
        }
        entity.save(client).await?;
        Ok(entity)
    }

    /// Persist this entity: insert for a new one, dirty-subset update for
    /// a persisted one. A clean persisted entity sends nothing at all.
    pub async fn save(&mut self, client: &dyn StoreClient) -> MapperResult<()> {
        self.save_with(client, &WriteOptions::default()).await
    }

    /// [`Entity::save`] with write options, for TTL-bearing rows
    pub async fn save_with(
        &mut self,
        client: &dyn StoreClient,
        opts: &WriteOptions,
    ) -> MapperResult<()> {
        match self.state {
            EntityState::New => self.insert_row(client, opts).await,
            EntityState::Persisted => self.update_dirty(client, opts).await,
        }
    }

    /// Mass-assign several attributes, then save
    pub async fn update(
        &mut self,
        client: &dyn StoreClient,
        attrs: AttributeBag,
    ) -> MapperResult<()> {
        for (column, value) in attrs.iter() {
            self.set(column, value.clone())?;
        }
        self.save(client).await
    }

    /// Delete the row and consume the entity. Touching a deleted entity
    /// is thereby a compile error, not a runtime one.
    pub async fn delete(self, client: &dyn StoreClient) -> MapperResult<()> {
        let key = self
            .primary_key()
            .cloned()
            .ok_or(MapperError::MissingPrimaryKey)?;
        let statement = StatementCompiler::new(&self.schema).delete(&key)?;
        Executor::new(client).apply(&statement).await?;
        debug!(table = self.schema.table(), "entity deleted");
        Ok(())
    }

    /// Re-query by primary key, replacing both bags in place. Pending
    /// unsaved changes are discarded; the recently-created flag is not.
    pub async fn refresh(&mut self, client: &dyn StoreClient) -> MapperResult<()> {
        let fresh = self.fetch_by_key(client).await?;
        self.current = fresh.current;
        self.original = fresh.original;
        self.state = EntityState::Persisted;
        Ok(())
    }

    /// Re-query by primary key into a new entity, leaving this one as is
    pub async fn fresh(&self, client: &dyn StoreClient) -> MapperResult<Entity> {
        self.fetch_by_key(client).await
    }

    async fn fetch_by_key(&self, client: &dyn StoreClient) -> MapperResult<Entity> {
        let key = self
            .primary_key()
            .cloned()
            .ok_or(MapperError::MissingPrimaryKey)?;
        let pk = self.schema.primary_key().to_string();
        let shown = key.to_string();
        let found = QueryBuilder::new(self.schema.clone())
            .where_eq(&pk, key)
            .first(client)
            .await?;
        found.ok_or_else(|| {
            MapperError::RecordGone(format!("{}({})", self.schema.table(), shown))
        })
    }

    async fn insert_row(
        &mut self,
        client: &dyn StoreClient,
        opts: &WriteOptions,
    ) -> MapperResult<()> {
        if self.schema.uses_timestamps() {
            let now = StoreValue::Timestamp(Utc::now());
            self.current.set(CREATED_AT_COLUMN, now.clone());
            self.current.set(UPDATED_AT_COLUMN, now);
        }
        let pk = self.schema.primary_key().to_string();
        if self.current.get(&pk).is_none() {
            self.current.set(pk.as_str(), Uuid::new_v4());
        }
        let statement = StatementCompiler::new(&self.schema).insert(&self.current, opts)?;
        Executor::new(client).apply(&statement).await?;
        self.original = self.current.clone();
        self.state = EntityState::Persisted;
        self.recently_created = true;
        debug!(table = self.schema.table(), "entity created");
        Ok(())
    }

    async fn update_dirty(
        &mut self,
        client: &dyn StoreClient,
        opts: &WriteOptions,
    ) -> MapperResult<()> {
        if self.schema.uses_timestamps() && self.is_dirty() {
            self.current
                .set(UPDATED_AT_COLUMN, StoreValue::Timestamp(Utc::now()));
        }
        let dirty = self.dirty_columns();
        if dirty.is_empty() {
            return Ok(());
        }
        let key = self
            .primary_key()
            .cloned()
            .ok_or(MapperError::MissingPrimaryKey)?;
        // dirty subset in schema column order; a column removed from the
        // current bag writes NULL
        let changes: Vec<(String, StoreValue)> = self
            .schema
            .columns()
            .iter()
            .filter(|column| dirty.iter().any(|d| d == *column))
            .map(|column| {
                (
                    column.clone(),
                    self.current.get(column).cloned().unwrap_or(StoreValue::Null),
                )
            })
            .collect();
        let statement = StatementCompiler::new(&self.schema).update(&key, &changes, opts)?;
        Executor::new(client).apply(&statement).await?;
        self.original = self.current.clone();
        debug!(
            table = self.schema.table(),
            columns = changes.len(),
            "entity updated"
        );
        Ok(())
    }
}
