//! Statement compilation
//!
//! Renders clause state into parameterized statement text. Two rules hold
//! on every path and the tests pin both: runtime values travel as bound
//! parameters, never as literal text, and identifiers are rendered only
//! from validated schema metadata.
//!
//! The compiler also rejects clause combinations the partitioned store
//! cannot execute (ordering without an equality-bound partition key,
//! ordering on a non-clustering column, a zero limit) so the failure is a
//! typed [`MapperError::InvalidQueryShape`] instead of a store-side
//! rejection after a round trip.

use crate::attributes::AttributeBag;
use crate::error::{MapperError, MapperResult};
use crate::query::clause::{BoolOp, ClauseSet, Comparator};
use crate::schema::{TableSchema, ROW_TOKEN_COLUMN};
use crate::value::StoreValue;

/// A compiled statement: text template plus bound values in placeholder
/// order
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub text: String,
    pub params: Vec<StoreValue>,
}

/// Write-time options forwarded to the store
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteOptions {
    /// Row time-to-live in seconds, rendered as `USING TTL ?`
    pub ttl: Option<u32>,
}

impl WriteOptions {
    pub fn ttl(seconds: u32) -> Self {
        Self { ttl: Some(seconds) }
    }
}

/// Compiles clause state against one table's trusted metadata
pub struct StatementCompiler<'a> {
    schema: &'a TableSchema,
}

impl<'a> StatementCompiler<'a> {
    pub fn new(schema: &'a TableSchema) -> Self {
        Self { schema }
    }

    /// Full-row select honoring predicates, ordering, and limit
    pub fn select(&self, clauses: &ClauseSet) -> MapperResult<Statement> {
        self.reject_cursor(clauses)?;
        self.validate_ordering(clauses)?;
        let mut text = format!(
            "SELECT {} FROM {}",
            self.schema.columns().join(", "),
            self.schema.table()
        );
        let mut params = Vec::new();
        self.render_where(clauses, &mut text, &mut params)?;
        self.render_ordering(clauses, &mut text);
        self.render_limit(clauses.limit, &mut text)?;
        Ok(Statement { text, params })
    }

    /// Single-column select backing `pluck`
    pub fn pluck(&self, clauses: &ClauseSet, column: &str) -> MapperResult<Statement> {
        self.reject_cursor(clauses)?;
        self.check_column(column)?;
        self.validate_ordering(clauses)?;
        let mut text = format!("SELECT {} FROM {}", column, self.schema.table());
        let mut params = Vec::new();
        self.render_where(clauses, &mut text, &mut params)?;
        self.render_ordering(clauses, &mut text);
        self.render_limit(clauses.limit, &mut text)?;
        Ok(Statement { text, params })
    }

    /// Count aggregate. Ordering and limit do not affect the result and
    /// are not rendered.
    pub fn count(&self, clauses: &ClauseSet) -> MapperResult<Statement> {
        self.reject_cursor(clauses)?;
        let mut text = format!("SELECT COUNT(*) FROM {}", self.schema.table());
        let mut params = Vec::new();
        self.render_where(clauses, &mut text, &mut params)?;
        Ok(Statement { text, params })
    }

    /// Cheapest existence probe: key column only, capped at one row
    pub fn exists(&self, clauses: &ClauseSet) -> MapperResult<Statement> {
        self.reject_cursor(clauses)?;
        let mut text = format!(
            "SELECT {} FROM {}",
            self.schema.primary_key(),
            self.schema.table()
        );
        let mut params = Vec::new();
        self.render_where(clauses, &mut text, &mut params)?;
        text.push_str(" LIMIT 1");
        Ok(Statement { text, params })
    }

    /// Paged select: every schema column plus the partition-ordering token
    /// aliased as [`ROW_TOKEN_COLUMN`], a strictly-greater token predicate
    /// when resuming, and the page size as the row cap. An OR-joined
    /// predicate group renders parenthesized so the resume bound applies
    /// to the whole group.
    pub fn select_page(&self, clauses: &ClauseSet, page_size: u32) -> MapperResult<Statement> {
        if page_size == 0 {
            return Err(MapperError::InvalidQueryShape(
                "page size must be greater than zero".to_string(),
            ));
        }
        if clauses.ordering.is_some() {
            return Err(MapperError::InvalidQueryShape(
                "ordering cannot be combined with cursor pagination".to_string(),
            ));
        }
        if clauses.limit.is_some() {
            return Err(MapperError::InvalidQueryShape(
                "limit cannot be combined with cursor pagination; the page size is the cap"
                    .to_string(),
            ));
        }
        let pk = self.schema.primary_key();
        let mut text = format!(
            "SELECT {}, TOKEN({}) AS {} FROM {}",
            self.schema.columns().join(", "),
            pk,
            ROW_TOKEN_COLUMN,
            self.schema.table()
        );
        let mut params = Vec::new();
        let group = self.render_predicates(clauses, &mut params)?;
        if !group.is_empty() {
            // parenthesized so the ANDed token bound covers the whole
            // group, not just the last disjunct
            if clauses.or_joined() {
                text.push_str(&format!(" WHERE ({})", group));
            } else {
                text.push_str(&format!(" WHERE {}", group));
            }
        }
        if let Some(cursor) = clauses.cursor {
            text.push_str(if group.is_empty() { " WHERE " } else { " AND " });
            text.push_str(&format!("TOKEN({}) > ?", pk));
            params.push(StoreValue::Int(cursor.token()));
        }
        text.push_str(&format!(" LIMIT {}", page_size));
        Ok(Statement { text, params })
    }

    /// Insert of the current attribute set, columns in schema order. The
    /// store treats this as an upsert; colliding keys overwrite silently.
    pub fn insert(&self, bag: &AttributeBag, opts: &WriteOptions) -> MapperResult<Statement> {
        for column in bag.columns() {
            self.check_column(column)?;
        }
        let mut columns: Vec<&str> = Vec::new();
        let mut params = Vec::new();
        for column in self.schema.columns() {
            if let Some(value) = bag.get(column) {
                columns.push(column.as_str());
                params.push(value.clone());
            }
        }
        if columns.is_empty() {
            return Err(MapperError::InvalidQueryShape(
                "insert requires at least one attribute".to_string(),
            ));
        }
        let placeholders = vec!["?"; columns.len()].join(", ");
        let mut text = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.schema.table(),
            columns.join(", "),
            placeholders
        );
        if let Some(ttl) = opts.ttl {
            text.push_str(" USING TTL ?");
            params.push(StoreValue::Int(ttl as i64));
        }
        Ok(Statement { text, params })
    }

    /// Update of the changed subset only, keyed by the primary key. The
    /// key column itself may not appear among the changes.
    pub fn update(
        &self,
        key: &StoreValue,
        changes: &[(String, StoreValue)],
        opts: &WriteOptions,
    ) -> MapperResult<Statement> {
        if changes.is_empty() {
            return Err(MapperError::InvalidQueryShape(
                "update requires at least one changed column".to_string(),
            ));
        }
        let pk = self.schema.primary_key();
        let mut text = format!("UPDATE {}", self.schema.table());
        let mut params = Vec::new();
        if let Some(ttl) = opts.ttl {
            text.push_str(" USING TTL ?");
            params.push(StoreValue::Int(ttl as i64));
        }
        text.push_str(" SET ");
        for (i, (column, value)) in changes.iter().enumerate() {
            self.check_column(column)?;
            if column == pk {
                return Err(MapperError::ImmutableField {
                    column: column.clone(),
                });
            }
            if i > 0 {
                text.push_str(", ");
            }
            text.push_str(&format!("{} = ?", column));
            params.push(value.clone());
        }
        text.push_str(&format!(" WHERE {} = ?", pk));
        params.push(key.clone());
        Ok(Statement { text, params })
    }

    /// Delete bounded by the primary key only
    pub fn delete(&self, key: &StoreValue) -> MapperResult<Statement> {
        let text = format!(
            "DELETE FROM {} WHERE {} = ?",
            self.schema.table(),
            self.schema.primary_key()
        );
        Ok(Statement {
            text,
            params: vec![key.clone()],
        })
    }

    fn check_column(&self, column: &str) -> MapperResult<()> {
        if self.schema.has_column(column) {
            Ok(())
        } else {
            Err(MapperError::UnknownColumn {
                table: self.schema.table().to_string(),
                column: column.to_string(),
            })
        }
    }

    fn reject_cursor(&self, clauses: &ClauseSet) -> MapperResult<()> {
        if clauses.cursor.is_some() {
            return Err(MapperError::InvalidQueryShape(
                "continuation cursors apply to paginate only".to_string(),
            ));
        }
        Ok(())
    }

    /// Ordering is only executable on a clustering column and only when
    /// the partition key is bound by an AND-joined equality predicate.
    fn validate_ordering(&self, clauses: &ClauseSet) -> MapperResult<()> {
        let Some(term) = &clauses.ordering else {
            return Ok(());
        };
        self.check_column(&term.column)?;
        if !self.schema.is_clustering(&term.column) {
            return Err(MapperError::InvalidQueryShape(format!(
                "ordering on '{}' requires a clustering column",
                term.column
            )));
        }
        let key_bound = clauses.predicates.iter().any(|p| {
            p.column == self.schema.primary_key()
                && p.cmp == Comparator::Eq
                && p.boolean == BoolOp::And
        });
        if !key_bound {
            return Err(MapperError::InvalidQueryShape(
                "ordering requires an equality predicate on the partition key".to_string(),
            ));
        }
        Ok(())
    }

    fn render_where(
        &self,
        clauses: &ClauseSet,
        text: &mut String,
        params: &mut Vec<StoreValue>,
    ) -> MapperResult<()> {
        let group = self.render_predicates(clauses, params)?;
        if !group.is_empty() {
            text.push_str(" WHERE ");
            text.push_str(&group);
        }
        Ok(())
    }

    /// Renders the predicate group without the `WHERE` keyword, so the
    /// paged select can parenthesize it before appending the token bound.
    fn render_predicates(
        &self,
        clauses: &ClauseSet,
        params: &mut Vec<StoreValue>,
    ) -> MapperResult<String> {
        let mut group = String::new();
        for (i, predicate) in clauses.predicates.iter().enumerate() {
            self.check_column(&predicate.column)?;
            if i > 0 {
                match predicate.boolean {
                    BoolOp::And => group.push_str(" AND "),
                    BoolOp::Or => group.push_str(" OR "),
                }
            }
            match predicate.cmp {
                Comparator::In => {
                    if predicate.values.is_empty() {
                        return Err(MapperError::InvalidQueryShape(format!(
                            "IN predicate on '{}' requires at least one value",
                            predicate.column
                        )));
                    }
                    let placeholders = vec!["?"; predicate.values.len()].join(", ");
                    group.push_str(&format!("{} IN ({})", predicate.column, placeholders));
                    params.extend(predicate.values.iter().cloned());
                }
                cmp => {
                    // builder construction guarantees exactly one value
                    group.push_str(&format!("{} {} ?", predicate.column, cmp));
                    params.push(predicate.values.first().cloned().unwrap_or(StoreValue::Null));
                }
            }
        }
        Ok(group)
    }

    fn render_ordering(&self, clauses: &ClauseSet, text: &mut String) {
        if let Some(term) = &clauses.ordering {
            text.push_str(&format!(" ORDER BY {} {}", term.column, term.order));
        }
    }

    fn render_limit(&self, limit: Option<u32>, text: &mut String) -> MapperResult<()> {
        if let Some(n) = limit {
            if n == 0 {
                return Err(MapperError::InvalidQueryShape(
                    "limit must be greater than zero".to_string(),
                ));
            }
            text.push_str(&format!(" LIMIT {}", n));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::builder::QueryBuilder;
    use crate::query::page::PageCursor;
    use crate::schema::SortOrder;
    use std::sync::Arc;

    fn users() -> TableSchema {
        TableSchema::new("users", "id", &["id", "name", "email"]).unwrap()
    }

    fn events() -> TableSchema {
        TableSchema::new("events", "sensor_id", &["sensor_id", "recorded_at", "reading"])
            .unwrap()
            .with_clustering("recorded_at", SortOrder::Asc)
            .unwrap()
    }

    fn clauses_for(schema: &TableSchema) -> QueryBuilder {
        QueryBuilder::new(Arc::new(schema.clone()))
    }

    #[test]
    fn bare_select_lists_schema_columns() {
        let schema = users();
        let stmt = StatementCompiler::new(&schema)
            .select(&ClauseSet::default())
            .unwrap();
        assert_eq!(stmt.text, "SELECT id, name, email FROM users");
        assert!(stmt.params.is_empty());
    }

    #[test]
    fn predicates_render_in_call_order_with_their_connectives() {
        let schema = users();
        let builder = clauses_for(&schema)
            .where_eq("id", 1i64)
            .or_where_eq("name", "ada")
            .where_gt("email", "a");
        let stmt = StatementCompiler::new(&schema)
            .select(builder.clauses())
            .unwrap();
        assert_eq!(
            stmt.text,
            "SELECT id, name, email FROM users WHERE id = ? OR name = ? AND email > ?"
        );
        assert_eq!(
            stmt.params,
            vec![
                StoreValue::Int(1),
                StoreValue::Text("ada".to_string()),
                StoreValue::Text("a".to_string()),
            ]
        );
    }

    #[test]
    fn in_predicate_expands_one_placeholder_per_value() {
        let schema = users();
        let builder = clauses_for(&schema).where_in("id", vec![1i64, 2, 3]);
        let stmt = StatementCompiler::new(&schema)
            .select(builder.clauses())
            .unwrap();
        assert_eq!(stmt.text, "SELECT id, name, email FROM users WHERE id IN (?, ?, ?)");
        assert_eq!(stmt.params.len(), 3);
    }

    #[test]
    fn empty_in_predicate_is_rejected() {
        let schema = users();
        let builder = clauses_for(&schema).where_in("id", Vec::<i64>::new());
        let err = StatementCompiler::new(&schema)
            .select(builder.clauses())
            .unwrap_err();
        assert!(matches!(err, MapperError::InvalidQueryShape(_)));
    }

    #[test]
    fn unknown_predicate_column_is_rejected() {
        let schema = users();
        let builder = clauses_for(&schema).where_eq("nickname", "ada");
        let err = StatementCompiler::new(&schema)
            .select(builder.clauses())
            .unwrap_err();
        assert_eq!(
            err,
            MapperError::UnknownColumn {
                table: "users".to_string(),
                column: "nickname".to_string(),
            }
        );
    }

    #[test]
    fn ordering_renders_after_the_key_is_bound() {
        let schema = events();
        let builder = clauses_for(&schema)
            .where_eq("sensor_id", 7i64)
            .order_by("recorded_at", SortOrder::Desc)
            .limit(50);
        let stmt = StatementCompiler::new(&schema)
            .select(builder.clauses())
            .unwrap();
        assert_eq!(
            stmt.text,
            "SELECT sensor_id, recorded_at, reading FROM events \
             WHERE sensor_id = ? ORDER BY recorded_at DESC LIMIT 50"
        );
        assert_eq!(stmt.params, vec![StoreValue::Int(7)]);
    }

    #[test]
    fn ordering_without_bound_key_is_rejected() {
        let schema = events();
        let builder = clauses_for(&schema).order_by("recorded_at", SortOrder::Asc);
        let err = StatementCompiler::new(&schema)
            .select(builder.clauses())
            .unwrap_err();
        assert!(matches!(err, MapperError::InvalidQueryShape(_)));

        // a range predicate on the key does not count as binding it
        let builder = clauses_for(&schema)
            .where_gt("sensor_id", 1i64)
            .order_by("recorded_at", SortOrder::Asc);
        assert!(StatementCompiler::new(&schema).select(builder.clauses()).is_err());
    }

    #[test]
    fn ordering_on_non_clustering_column_is_rejected() {
        let schema = events();
        let builder = clauses_for(&schema)
            .where_eq("sensor_id", 7i64)
            .order_by("reading", SortOrder::Asc);
        let err = StatementCompiler::new(&schema)
            .select(builder.clauses())
            .unwrap_err();
        assert!(matches!(err, MapperError::InvalidQueryShape(_)));
    }

    #[test]
    fn zero_limit_is_rejected() {
        let schema = users();
        let builder = clauses_for(&schema).limit(0);
        assert!(StatementCompiler::new(&schema).select(builder.clauses()).is_err());
    }

    #[test]
    fn cursor_outside_paginate_is_rejected() {
        let schema = users();
        let builder = clauses_for(&schema).after(PageCursor::new(42));
        let compiler = StatementCompiler::new(&schema);
        assert!(compiler.select(builder.clauses()).is_err());
        assert!(compiler.count(builder.clauses()).is_err());
        assert!(compiler.exists(builder.clauses()).is_err());
        assert!(compiler.pluck(builder.clauses(), "name").is_err());
    }

    #[test]
    fn count_strips_ordering_and_limit() {
        let schema = users();
        let builder = clauses_for(&schema).where_eq("name", "ada").limit(5);
        let stmt = StatementCompiler::new(&schema)
            .count(builder.clauses())
            .unwrap();
        assert_eq!(stmt.text, "SELECT COUNT(*) FROM users WHERE name = ?");
    }

    #[test]
    fn exists_probes_the_key_column_with_limit_one() {
        let schema = users();
        let builder = clauses_for(&schema).where_eq("name", "ada");
        let stmt = StatementCompiler::new(&schema)
            .exists(builder.clauses())
            .unwrap();
        assert_eq!(stmt.text, "SELECT id FROM users WHERE name = ? LIMIT 1");
    }

    #[test]
    fn pluck_selects_one_validated_column() {
        let schema = users();
        let builder = clauses_for(&schema).where_eq("id", 1i64);
        let compiler = StatementCompiler::new(&schema);
        let stmt = compiler.pluck(builder.clauses(), "email").unwrap();
        assert_eq!(stmt.text, "SELECT email FROM users WHERE id = ?");
        assert!(compiler.pluck(builder.clauses(), "secret").is_err());
    }

    #[test]
    fn paged_select_aliases_the_row_token() {
        let schema = users();
        let stmt = StatementCompiler::new(&schema)
            .select_page(&ClauseSet::default(), 100)
            .unwrap();
        assert_eq!(
            stmt.text,
            "SELECT id, name, email, TOKEN(id) AS row_token FROM users LIMIT 100"
        );
        assert!(stmt.params.is_empty());
    }

    #[test]
    fn resuming_page_adds_a_strict_token_predicate() {
        let schema = users();
        let builder = clauses_for(&schema).after(PageCursor::new(-9000));
        let stmt = StatementCompiler::new(&schema)
            .select_page(builder.clauses(), 2)
            .unwrap();
        assert_eq!(
            stmt.text,
            "SELECT id, name, email, TOKEN(id) AS row_token FROM users \
             WHERE TOKEN(id) > ? LIMIT 2"
        );
        assert_eq!(stmt.params, vec![StoreValue::Int(-9000)]);
    }

    #[test]
    fn paged_select_joins_token_predicate_to_existing_predicates() {
        let schema = users();
        let builder = clauses_for(&schema)
            .where_eq("name", "ada")
            .after(PageCursor::new(5));
        let stmt = StatementCompiler::new(&schema)
            .select_page(builder.clauses(), 10)
            .unwrap();
        assert_eq!(
            stmt.text,
            "SELECT id, name, email, TOKEN(id) AS row_token FROM users \
             WHERE name = ? AND TOKEN(id) > ? LIMIT 10"
        );
        assert_eq!(
            stmt.params,
            vec![StoreValue::Text("ada".to_string()), StoreValue::Int(5)]
        );
    }

    #[test]
    fn paged_select_parenthesizes_or_joined_predicates() {
        let schema = users();
        let compiler = StatementCompiler::new(&schema);

        let first = clauses_for(&schema)
            .where_eq("name", "ada")
            .or_where_eq("email", "ada@example.com");
        let stmt = compiler.select_page(first.clauses(), 2).unwrap();
        assert_eq!(
            stmt.text,
            "SELECT id, name, email, TOKEN(id) AS row_token FROM users \
             WHERE (name = ? OR email = ?) LIMIT 2"
        );

        let resumed = clauses_for(&schema)
            .where_eq("name", "ada")
            .or_where_eq("email", "ada@example.com")
            .after(PageCursor::new(20));
        let stmt = compiler.select_page(resumed.clauses(), 2).unwrap();
        assert_eq!(
            stmt.text,
            "SELECT id, name, email, TOKEN(id) AS row_token FROM users \
             WHERE (name = ? OR email = ?) AND TOKEN(id) > ? LIMIT 2"
        );
        assert_eq!(
            stmt.params,
            vec![
                StoreValue::Text("ada".to_string()),
                StoreValue::Text("ada@example.com".to_string()),
                StoreValue::Int(20),
            ]
        );
    }

    #[test]
    fn paginate_rejects_conflicting_clauses() {
        let schema = users();
        let compiler = StatementCompiler::new(&schema);
        assert!(compiler.select_page(&ClauseSet::default(), 0).is_err());

        let with_limit = clauses_for(&schema).limit(10);
        assert!(compiler.select_page(with_limit.clauses(), 5).is_err());

        let ordered_schema = events();
        let with_order = clauses_for(&ordered_schema)
            .where_eq("sensor_id", 1i64)
            .order_by("recorded_at", SortOrder::Asc);
        assert!(StatementCompiler::new(&ordered_schema)
            .select_page(with_order.clauses(), 5)
            .is_err());
    }

    #[test]
    fn insert_renders_bag_columns_in_schema_order() {
        let schema = users();
        let mut bag = AttributeBag::new();
        bag.set("email", "ada@example.com");
        bag.set("id", 1i64);
        let stmt = StatementCompiler::new(&schema)
            .insert(&bag, &WriteOptions::default())
            .unwrap();
        assert_eq!(stmt.text, "INSERT INTO users (id, email) VALUES (?, ?)");
        assert_eq!(
            stmt.params,
            vec![StoreValue::Int(1), StoreValue::Text("ada@example.com".to_string())]
        );
    }

    #[test]
    fn insert_with_ttl_binds_the_ttl_last() {
        let schema = users();
        let mut bag = AttributeBag::new();
        bag.set("id", 1i64);
        let stmt = StatementCompiler::new(&schema)
            .insert(&bag, &WriteOptions::ttl(600))
            .unwrap();
        assert_eq!(stmt.text, "INSERT INTO users (id) VALUES (?) USING TTL ?");
        assert_eq!(stmt.params, vec![StoreValue::Int(1), StoreValue::Int(600)]);
    }

    #[test]
    fn insert_rejects_empty_bags_and_stray_columns() {
        let schema = users();
        let compiler = StatementCompiler::new(&schema);
        assert!(compiler
            .insert(&AttributeBag::new(), &WriteOptions::default())
            .is_err());

        let mut bag = AttributeBag::new();
        bag.set("id", 1i64);
        bag.set("shoe_size", 43i64);
        assert!(matches!(
            compiler.insert(&bag, &WriteOptions::default()),
            Err(MapperError::UnknownColumn { .. })
        ));
    }

    #[test]
    fn update_writes_the_changed_subset_keyed_by_primary_key() {
        let schema = users();
        let changes = vec![
            ("name".to_string(), StoreValue::Text("grace".to_string())),
            ("email".to_string(), StoreValue::Null),
        ];
        let stmt = StatementCompiler::new(&schema)
            .update(&StoreValue::Int(1), &changes, &WriteOptions::default())
            .unwrap();
        assert_eq!(stmt.text, "UPDATE users SET name = ?, email = ? WHERE id = ?");
        assert_eq!(
            stmt.params,
            vec![
                StoreValue::Text("grace".to_string()),
                StoreValue::Null,
                StoreValue::Int(1),
            ]
        );
    }

    #[test]
    fn update_with_ttl_binds_the_ttl_first() {
        let schema = users();
        let changes = vec![("name".to_string(), StoreValue::Text("g".to_string()))];
        let stmt = StatementCompiler::new(&schema)
            .update(&StoreValue::Int(1), &changes, &WriteOptions::ttl(60))
            .unwrap();
        assert_eq!(stmt.text, "UPDATE users USING TTL ? SET name = ? WHERE id = ?");
        assert_eq!(
            stmt.params,
            vec![
                StoreValue::Int(60),
                StoreValue::Text("g".to_string()),
                StoreValue::Int(1),
            ]
        );
    }

    #[test]
    fn update_refuses_primary_key_changes_and_empty_sets() {
        let schema = users();
        let compiler = StatementCompiler::new(&schema);
        let key_change = vec![("id".to_string(), StoreValue::Int(2))];
        assert_eq!(
            compiler.update(&StoreValue::Int(1), &key_change, &WriteOptions::default()),
            Err(MapperError::ImmutableField {
                column: "id".to_string()
            })
        );
        assert!(compiler
            .update(&StoreValue::Int(1), &[], &WriteOptions::default())
            .is_err());
    }

    #[test]
    fn delete_is_bounded_by_the_key_alone() {
        let schema = users();
        let stmt = StatementCompiler::new(&schema)
            .delete(&StoreValue::Int(9))
            .unwrap();
        assert_eq!(stmt.text, "DELETE FROM users WHERE id = ?");
        assert_eq!(stmt.params, vec![StoreValue::Int(9)]);
    }

    #[test]
    fn hostile_values_never_reach_statement_text() {
        let schema = users();
        let hostile = "'; DROP TABLE users; --";
        let compiler = StatementCompiler::new(&schema);

        let builder = clauses_for(&schema).where_eq("name", hostile);
        let select = compiler.select(builder.clauses()).unwrap();
        assert!(!select.text.contains("DROP"));
        assert_eq!(select.params, vec![StoreValue::Text(hostile.to_string())]);

        let mut bag = AttributeBag::new();
        bag.set("id", 1i64);
        bag.set("name", hostile);
        let insert = compiler.insert(&bag, &WriteOptions::default()).unwrap();
        assert!(!insert.text.contains("DROP"));

        let changes = vec![("name".to_string(), StoreValue::Text(hostile.to_string()))];
        let update = compiler
            .update(&StoreValue::Text(hostile.to_string()), &changes, &WriteOptions::default())
            .unwrap();
        assert!(!update.text.contains("DROP"));

        let delete = compiler.delete(&StoreValue::Text(hostile.to_string())).unwrap();
        assert!(!delete.text.contains("DROP"));
        assert_eq!(delete.text.matches('?').count(), 1);
    }
}
