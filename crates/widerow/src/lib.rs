//! # widerow: entity mapping for partition-oriented row stores
//!
//! Data-mapping layer for schema-flexible, distributed row stores:
//! entities with dirty tracking, a fluent clause builder, a statement
//! compiler that emits parameterized text only, token-based cursor
//! pagination, and join-free relation resolution.
//!
//! The store itself stays behind the [`StoreClient`] trait; this crate
//! never opens a connection, never retries, and sends nothing it has not
//! validated against trusted [`TableSchema`] metadata first.

pub mod attributes;
pub mod client;
pub mod entity;
pub mod error;
pub mod executor;
pub mod query;
pub mod relation;
pub mod schema;
pub mod value;


// Re-export the working surface
pub use attributes::*;
pub use client::*;
pub use entity::*;
pub use error::*;
pub use executor::*;
pub use query::*;
pub use relation::*;
pub use schema::*;
pub use value::*;
