//! Entities
//!
//! A record held in memory: one bag of current values, one untouched
//! snapshot from the last hydration or persist, and the lifecycle state
//! that picks the persistence path when `save` runs. Dirty columns are
//! computed from the two bags on demand; there is no per-field flag to
//! fall out of sync.

mod persistence;

use std::sync::Arc;

use crate::attributes::AttributeBag;
use crate::error::{MapperError, MapperResult};
use crate::query::QueryBuilder;
use crate::schema::TableSchema;
use crate::value::StoreValue;

/// Lifecycle state of an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityState {
    /// Constructed in memory; no row is known to exist yet
    New,
    /// Hydrated from the store or successfully persisted
    Persisted,
}

/// A record with identity, dirty tracking, and lifecycle transitions.
///
/// Deleting consumes the entity by value, so a deleted instance cannot be
/// touched again; that class of misuse fails at compile time instead of
/// at the store.
#[derive(Debug, Clone)]
pub struct Entity {
    pub(crate) schema: Arc<TableSchema>,
    pub(crate) current: AttributeBag,
    pub(crate) original: AttributeBag,
    pub(crate) state: EntityState,
    pub(crate) recently_created: bool,
}

impl Entity {
    /// Start a new, unsaved entity with empty bags
    pub fn new(schema: Arc<TableSchema>) -> Self {
        Self {
            schema,
            current: AttributeBag::new(),
            original: AttributeBag::new(),
            state: EntityState::New,
            recently_created: false,
        }
    }

    /// Hydrate from a normalized attribute bag. The row must carry its
    /// primary key; an entity without identity could never be written
    /// back or refreshed.
    pub(crate) fn hydrate(schema: Arc<TableSchema>, bag: AttributeBag) -> MapperResult<Self> {
        if bag.get(schema.primary_key()).is_none() {
            return Err(MapperError::Hydration(format!(
                "row from '{}' is missing its primary key column '{}'",
                schema.table(),
                schema.primary_key()
            )));
        }
        Ok(Self {
            original: bag.clone(),
            current: bag,
            schema,
            state: EntityState::Persisted,
            recently_created: false,
        })
    }

    /// Query builder over this entity type's table
    pub fn query(schema: Arc<TableSchema>) -> QueryBuilder {
        QueryBuilder::new(schema)
    }

    pub fn schema(&self) -> &TableSchema {
        &self.schema
    }

    pub fn state(&self) -> EntityState {
        self.state
    }

    /// True only on the instance that performed the insert, never on an
    /// entity hydrated from a query, and it survives later saves of the
    /// same instance.
    pub fn was_recently_created(&self) -> bool {
        self.recently_created
    }

    /// Current value of a column; `None` when the field is unset
    pub fn get(&self, column: &str) -> Option<&StoreValue> {
        self.current.get(column)
    }

    /// Current primary-key value, if set
    pub fn primary_key(&self) -> Option<&StoreValue> {
        self.current.get(self.schema.primary_key())
    }

    /// Set a column on the current bag; the original snapshot is
    /// untouched, which is what makes the column dirty.
    pub fn set(&mut self, column: &str, value: impl Into<StoreValue>) -> MapperResult<()> {
        self.guard_column(column)?;
        self.current.set(column, value);
        Ok(())
    }

    /// Drop a column from the current bag. On a persisted entity the next
    /// save writes `NULL` for it.
    pub fn unset(&mut self, column: &str) -> MapperResult<()> {
        self.guard_column(column)?;
        self.current.remove(column);
        Ok(())
    }

    /// Whether any column differs from the original snapshot
    pub fn is_dirty(&self) -> bool {
        !self.dirty_columns().is_empty()
    }

    pub fn is_clean(&self) -> bool {
        !self.is_dirty()
    }

    /// Columns whose current value differs from the original snapshot,
    /// recomputed on every call
    pub fn dirty_columns(&self) -> Vec<String> {
        self.current.changed_from(&self.original)
    }

    /// Read-only view of the current attributes
    pub fn attributes(&self) -> &AttributeBag {
        &self.current
    }

    fn guard_column(&self, column: &str) -> MapperResult<()> {
        if !self.schema.has_column(column) {
            return Err(MapperError::UnknownColumn {
                table: self.schema.table().to_string(),
                column: column.to_string(),
            });
        }
        if self.state == EntityState::Persisted && column == self.schema.primary_key() {
            return Err(MapperError::ImmutableField {
                column: column.to_string(),
            });
        }
        Ok(())
    }
}
