//! Query builder
//!
//! Fluent clause accumulation over one table schema. Builder methods take
//! the builder by value and hand it back, so a chain reads top to bottom
//! and a half-built query cannot be reused by accident; terminal methods
//! consume the builder outright.
//!
//! Accumulation never validates. Column names are checked against the
//! schema and the clause combination is checked against what the store
//! can execute when a terminal compiles the statement.

use std::sync::Arc;

use crate::query::clause::{BoolOp, ClauseSet, Comparator, OrderTerm, Predicate};
use crate::query::page::PageCursor;
use crate::schema::{SortOrder, TableSchema};
use crate::value::StoreValue;

/// Fluent query builder over one table
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    pub(crate) schema: Arc<TableSchema>,
    pub(crate) clauses: ClauseSet,
}

impl QueryBuilder {
    /// Start an empty query against a table
    pub fn new(schema: Arc<TableSchema>) -> Self {
        Self {
            schema,
            clauses: ClauseSet::default(),
        }
    }

    pub fn schema(&self) -> &TableSchema {
        &self.schema
    }

    /// Accumulated clause state, for feeding a compiler directly
    pub fn clauses(&self) -> &ClauseSet {
        &self.clauses
    }

    /// Consume the builder, yielding the accumulated clause state
    pub fn into_clauses(self) -> ClauseSet {
        self.clauses
    }

    fn push(mut self, boolean: BoolOp, column: &str, cmp: Comparator, values: Vec<StoreValue>) -> Self {
        self.clauses.predicates.push(Predicate {
            boolean,
            column: column.to_string(),
            cmp,
            values,
        });
        self
    }

    /// Append an AND-joined predicate with an arbitrary comparator
    pub fn where_cond(self, column: &str, cmp: Comparator, value: impl Into<StoreValue>) -> Self {
        self.push(BoolOp::And, column, cmp, vec![value.into()])
    }

    /// Append an AND-joined equality predicate
    pub fn where_eq(self, column: &str, value: impl Into<StoreValue>) -> Self {
        self.where_cond(column, Comparator::Eq, value)
    }

    pub fn where_gt(self, column: &str, value: impl Into<StoreValue>) -> Self {
        self.where_cond(column, Comparator::Gt, value)
    }

    pub fn where_gte(self, column: &str, value: impl Into<StoreValue>) -> Self {
        self.where_cond(column, Comparator::Gte, value)
    }

    pub fn where_lt(self, column: &str, value: impl Into<StoreValue>) -> Self {
        self.where_cond(column, Comparator::Lt, value)
    }

    pub fn where_lte(self, column: &str, value: impl Into<StoreValue>) -> Self {
        self.where_cond(column, Comparator::Lte, value)
    }

    /// Append an AND-joined `IN` predicate over one or more values
    pub fn where_in<V>(self, column: &str, values: Vec<V>) -> Self
    where
        V: Into<StoreValue>,
    {
        let values = values.into_iter().map(Into::into).collect();
        self.push(BoolOp::And, column, Comparator::In, values)
    }

    /// Append an OR-joined predicate with an arbitrary comparator
    pub fn or_where_cond(self, column: &str, cmp: Comparator, value: impl Into<StoreValue>) -> Self {
        self.push(BoolOp::Or, column, cmp, vec![value.into()])
    }

    /// Append an OR-joined equality predicate
    pub fn or_where_eq(self, column: &str, value: impl Into<StoreValue>) -> Self {
        self.or_where_cond(column, Comparator::Eq, value)
    }

    /// Append an OR-joined `IN` predicate
    pub fn or_where_in<V>(self, column: &str, values: Vec<V>) -> Self
    where
        V: Into<StoreValue>,
    {
        let values = values.into_iter().map(Into::into).collect();
        self.push(BoolOp::Or, column, Comparator::In, values)
    }

    /// Set or replace the single ordering term. The store only orders by
    /// a clustering column under an equality-bound partition key; the
    /// compiler enforces that before anything is sent.
    pub fn order_by(mut self, column: &str, order: SortOrder) -> Self {
        self.clauses.ordering = Some(OrderTerm {
            column: column.to_string(),
            order,
        });
        self
    }

    /// Cap the number of returned rows, replacing any previous cap
    pub fn limit(mut self, n: u32) -> Self {
        self.clauses.limit = Some(n);
        self
    }

    /// Resume after a continuation cursor from a previous `paginate` call
    pub fn after(mut self, cursor: PageCursor) -> Self {
        self.clauses.cursor = Some(cursor);
        self
    }
}
