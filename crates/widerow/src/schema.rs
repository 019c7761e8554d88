//! Table schema metadata
//!
//! The schema is the single trusted source of identifiers that may appear
//! in statement text. Every name the compiler renders, tables, columns,
//! and the paging token alias, is validated here at construction time.
//! Runtime values never become identifiers and identifiers never come from
//! runtime input.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{MapperError, MapperResult};

/// Result-column alias reserved for the partition-ordering token in paged
/// selects. Schemas may not declare a column with this name.
pub const ROW_TOKEN_COLUMN: &str = "row_token";

pub(crate) const CREATED_AT_COLUMN: &str = "created_at";
pub(crate) const UPDATED_AT_COLUMN: &str = "updated_at";

const IDENTIFIER_MAX_LEN: usize = 48;

/// Words the store's grammar claims for itself. Checked case-insensitively.
const RESERVED_WORDS: &[&str] = &[
    "SELECT", "INSERT", "UPDATE", "DELETE", "FROM", "WHERE", "AND", "OR",
    "ORDER", "BY", "LIMIT", "IN", "SET", "USING", "TTL", "TOKEN", "VALUES",
    "TABLE", "KEYSPACE", "PRIMARY", "KEY", "CREATE", "DROP", "ALTER",
    "TRUNCATE", "BATCH", "APPLY", "IF", "NOT", "EXISTS", "COUNT", "ALLOW",
    "FILTERING",
];

/// Validate one identifier against the store's lexical rules: ASCII
/// letters, digits, and underscore, starting with a letter, bounded
/// length, and not a reserved word.
pub fn validate_identifier(identifier: &str) -> MapperResult<()> {
    if identifier.is_empty() {
        return Err(MapperError::Schema("identifier cannot be empty".to_string()));
    }
    if identifier.len() > IDENTIFIER_MAX_LEN {
        return Err(MapperError::Schema(format!(
            "identifier '{}' exceeds {} characters",
            identifier, IDENTIFIER_MAX_LEN
        )));
    }
    for (i, c) in identifier.chars().enumerate() {
        if i == 0 && !c.is_ascii_alphabetic() {
            return Err(MapperError::Schema(format!(
                "identifier '{}' must start with a letter",
                identifier
            )));
        }
        if !(c.is_ascii_alphanumeric() || c == '_') {
            return Err(MapperError::Schema(format!(
                "identifier '{}' contains invalid character '{}'",
                identifier, c
            )));
        }
    }
    let upper = identifier.to_ascii_uppercase();
    if RESERVED_WORDS.contains(&upper.as_str()) {
        return Err(MapperError::Schema(format!(
            "identifier '{}' is a reserved word",
            identifier
        )));
    }
    Ok(())
}

/// Sort direction of a clustering column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Asc => write!(f, "ASC"),
            SortOrder::Desc => write!(f, "DESC"),
        }
    }
}

/// A clustering column together with its on-disk sort order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusteringKey {
    pub column: String,
    pub order: SortOrder,
}

/// Trusted metadata for one table.
///
/// Names are lowercased once at construction; lookups against the schema
/// afterwards are exact. The partition key must appear in the column list,
/// and clustering columns are declared separately via
/// [`TableSchema::with_clustering`].
#[derive(Debug, Clone, PartialEq)]
pub struct TableSchema {
    table: String,
    primary_key: String,
    clustering: Vec<ClusteringKey>,
    columns: Vec<String>,
    timestamps: bool,
}

impl TableSchema {
    pub fn new(table: &str, primary_key: &str, columns: &[&str]) -> MapperResult<Self> {
        let table = table.to_ascii_lowercase();
        validate_identifier(&table)?;
        let primary_key = primary_key.to_ascii_lowercase();
        let mut normalized: Vec<String> = Vec::with_capacity(columns.len());
        for column in columns {
            let column = column.to_ascii_lowercase();
            validate_identifier(&column)?;
            if column == ROW_TOKEN_COLUMN {
                return Err(MapperError::Schema(format!(
                    "column name '{}' is reserved for paged selects",
                    ROW_TOKEN_COLUMN
                )));
            }
            if normalized.contains(&column) {
                return Err(MapperError::Schema(format!("duplicate column '{}'", column)));
            }
            normalized.push(column);
        }
        if !normalized.contains(&primary_key) {
            return Err(MapperError::Schema(format!(
                "primary key '{}' is not in the column list",
                primary_key
            )));
        }
        Ok(Self {
            table,
            primary_key,
            clustering: Vec::new(),
            columns: normalized,
            timestamps: false,
        })
    }

    /// Declare an existing column as a clustering column. Order matters:
    /// rows within a partition are stored sorted by these, in declaration
    /// order.
    pub fn with_clustering(mut self, column: &str, order: SortOrder) -> MapperResult<Self> {
        let column = column.to_ascii_lowercase();
        if !self.has_column(&column) {
            return Err(MapperError::Schema(format!(
                "clustering column '{}' is not in the column list",
                column
            )));
        }
        if column == self.primary_key {
            return Err(MapperError::Schema(
                "the partition key cannot also be a clustering column".to_string(),
            ));
        }
        if self.is_clustering(&column) {
            return Err(MapperError::Schema(format!(
                "duplicate clustering column '{}'",
                column
            )));
        }
        self.clustering.push(ClusteringKey { column, order });
        Ok(self)
    }

    /// Opt in to row timestamps. The `created_at` and `updated_at` columns
    /// are appended if the table does not already declare them.
    pub fn with_timestamps(mut self) -> Self {
        for column in [CREATED_AT_COLUMN, UPDATED_AT_COLUMN] {
            if !self.columns.iter().any(|c| c == column) {
                self.columns.push(column.to_string());
            }
        }
        self.timestamps = true;
        self
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn primary_key(&self) -> &str {
        &self.primary_key
    }

    /// Declared columns, in the order statements render them
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn clustering(&self) -> &[ClusteringKey] {
        &self.clustering
    }

    pub fn uses_timestamps(&self) -> bool {
        self.timestamps
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    pub fn is_clustering(&self, column: &str) -> bool {
        self.clustering.iter().any(|c| c.column == column)
    }
}

/// Serde-facing schema definition, as loaded from configuration.
///
/// Converts into a validated [`TableSchema`] via `TryFrom`; nothing is
/// trusted until that conversion succeeds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaDef {
    pub table: String,
    pub primary_key: String,
    pub columns: Vec<String>,
    #[serde(default)]
    pub clustering: Vec<ClusteringKey>,
    #[serde(default)]
    pub timestamps: bool,
}

impl TryFrom<SchemaDef> for TableSchema {
    type Error = MapperError;

    fn try_from(def: SchemaDef) -> MapperResult<Self> {
        let columns: Vec<&str> = def.columns.iter().map(String::as_str).collect();
        let mut schema = TableSchema::new(&def.table, &def.primary_key, &columns)?;
        for key in def.clustering {
            schema = schema.with_clustering(&key.column, key.order)?;
        }
        if def.timestamps {
            schema = schema.with_timestamps();
        }
        Ok(schema)
    }
}
