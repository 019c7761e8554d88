//! Relation resolution
//!
//! The store has no joins, so relations resolve as separate statements
//! against the related table. One generic resolver covers has-one and
//! has-many by filtering on a foreign key; link-table relations resolve
//! with two statements. Resolving per owner costs a statement per owner,
//! a property of the store's architecture this layer deliberately leaves
//! visible rather than hiding behind an emulated join.

use std::sync::Arc;

use crate::client::StoreClient;
use crate::entity::Entity;
use crate::error::{MapperError, MapperResult};
use crate::query::QueryBuilder;
use crate::schema::TableSchema;
use crate::value::StoreValue;

/// Resolver for foreign-key relations.
///
/// Holds only the description of the relation. Nothing runs until a
/// terminal is called, and every call builds a fresh query, so resolving
/// twice observes current store state both times.
#[derive(Debug, Clone)]
pub struct Related {
    related: Arc<TableSchema>,
    foreign_key: String,
    owner_key: StoreValue,
}

impl Related {
    /// Fresh builder filtered to rows whose foreign key equals the
    /// owner's primary key. Further clauses chain as usual.
    pub fn query(&self) -> QueryBuilder {
        QueryBuilder::new(self.related.clone()).where_eq(&self.foreign_key, self.owner_key.clone())
    }

    /// Resolve as a has-many: every related row
    pub async fn get(&self, client: &dyn StoreClient) -> MapperResult<Vec<Entity>> {
        self.query().get(client).await
    }

    /// Resolve as a has-one: the first related row, if any
    pub async fn first(&self, client: &dyn StoreClient) -> MapperResult<Option<Entity>> {
        self.query().first(client).await
    }

    /// Count related rows without hydrating them
    pub async fn count(&self, client: &dyn StoreClient) -> MapperResult<u64> {
        self.query().count(client).await
    }
}

/// Resolver for many-to-many relations through a link table
#[derive(Debug, Clone)]
pub struct RelatedThrough {
    link: Arc<TableSchema>,
    link_owner_key: String,
    link_related_key: String,
    related: Arc<TableSchema>,
    owner_key: StoreValue,
}

impl RelatedThrough {
    /// Resolve in two statements: pluck related keys from the link table,
    /// then fetch the related rows by `IN` over those keys. An owner with
    /// no links skips the second statement entirely.
    pub async fn get(&self, client: &dyn StoreClient) -> MapperResult<Vec<Entity>> {
        let keys = QueryBuilder::new(self.link.clone())
            .where_eq(&self.link_owner_key, self.owner_key.clone())
            .pluck(client, &self.link_related_key)
            .await?;
        let keys: Vec<StoreValue> = keys.into_iter().filter(|k| !k.is_null()).collect();
        if keys.is_empty() {
            return Ok(Vec::new());
        }
        QueryBuilder::new(self.related.clone())
            .where_in(self.related.primary_key(), keys)
            .get(client)
            .await
    }
}

impl Entity {
    /// Describe a relation to rows of `related` whose `foreign_key`
    /// column holds this entity's primary key
    pub fn related(&self, related: Arc<TableSchema>, foreign_key: &str) -> MapperResult<Related> {
        if !related.has_column(foreign_key) {
            return Err(MapperError::UnknownColumn {
                table: related.table().to_string(),
                column: foreign_key.to_string(),
            });
        }
        Ok(Related {
            related,
            foreign_key: foreign_key.to_string(),
            owner_key: self.owner_key()?,
        })
    }

    /// Describe a many-to-many relation resolved through `link`, which
    /// holds one row per edge with both foreign keys
    pub fn related_through(
        &self,
        link: Arc<TableSchema>,
        link_owner_key: &str,
        link_related_key: &str,
        related: Arc<TableSchema>,
    ) -> MapperResult<RelatedThrough> {
        for column in [link_owner_key, link_related_key] {
            if !link.has_column(column) {
                return Err(MapperError::UnknownColumn {
                    table: link.table().to_string(),
                    column: column.to_string(),
                });
            }
        }
        Ok(RelatedThrough {
            link,
            link_owner_key: link_owner_key.to_string(),
            link_related_key: link_related_key.to_string(),
            related,
            owner_key: self.owner_key()?,
        })
    }

    fn owner_key(&self) -> MapperResult<StoreValue> {
        self.primary_key()
            .cloned()
            .ok_or(MapperError::MissingPrimaryKey)
    }
}
