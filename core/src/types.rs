//! Change-set type definitions for additive schema migrations.
//!
//! This module defines the data model for a declared set of additive schema
//! changes: columns to add, indexes to create, and comments to attach. The
//! types are designed for serialization with [`serde`] and round-trip through
//! JSON, so change sets can be authored as files and applied by a backend.

use serde::{Deserialize, Serialize};

/// Semantic type of a declared column.
///
/// Backends map these to their native column types. SQLite, for instance,
/// stores both as `TEXT` (timestamps as RFC 3339 strings); the distinction
/// is preserved here for authoring and reporting.
///
/// # Examples
///
/// ```
/// use embedding_migrate_core::ColumnType;
///
/// let ty = ColumnType::default();
/// assert_eq!(ty, ColumnType::Text);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    /// Free-form text (the default).
    #[default]
    Text,
    /// Timestamp with timezone, stored as RFC 3339 text.
    TimestampTz,
}

/// One column addition in a change set.
///
/// Use the constructors [`text`](Self::text) and
/// [`timestamp_tz`](Self::timestamp_tz), then chain builder methods like
/// [`with_default`](Self::with_default) and [`with_comment`](Self::with_comment).
///
/// # Examples
///
/// ```
/// use embedding_migrate_core::{ColumnChange, ColumnType};
///
/// let column = ColumnChange::text("embedding_status")
///     .with_default("pending")
///     .with_comment("Processing state of the row");
/// assert_eq!(column.column_type, ColumnType::Text);
/// assert!(column.nullable);
/// assert_eq!(column.default_value.as_deref(), Some("pending"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnChange {
    /// Column name, unique within the change set.
    pub name: String,
    /// Semantic column type.
    pub column_type: ColumnType,
    /// Optional default literal applied to existing and future rows.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    /// Whether the column accepts NULL (additive changes almost always do).
    #[serde(default = "default_nullable")]
    pub nullable: bool,
    /// Human-readable documentation attached to the column.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

fn default_nullable() -> bool {
    true
}

impl ColumnChange {
    /// Creates a nullable text column with no default.
    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, ColumnType::Text)
    }

    /// Creates a nullable timestamp-with-timezone column with no default.
    pub fn timestamp_tz(name: impl Into<String>) -> Self {
        Self::new(name, ColumnType::TimestampTz)
    }

    fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            default_value: None,
            nullable: true,
            comment: None,
        }
    }

    /// Sets the default literal for the column.
    pub fn with_default(mut self, literal: impl Into<String>) -> Self {
        self.default_value = Some(literal.into());
        self
    }

    /// Attaches a documentation comment to the column.
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

/// One index creation in a change set.
///
/// Indexes are applied after all columns, so they may target any column
/// declared in the same change set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexChange {
    /// Index name, unique within the change set.
    pub name: String,
    /// Target columns, in index order.
    pub columns: Vec<String>,
}

impl IndexChange {
    /// Creates an index over the given columns.
    pub fn new(name: impl Into<String>, columns: &[&str]) -> Self {
        Self {
            name: name.into(),
            columns: columns.iter().map(|c| (*c).to_string()).collect(),
        }
    }
}

/// An ordered set of additive changes against a single table.
///
/// Columns apply before indexes. Applying a change set twice converges to
/// the same schema as applying it once; each change is guarded by an
/// existence check in the backend.
///
/// # Examples
///
/// ```
/// use embedding_migrate_core::{ChangeSet, ColumnChange, IndexChange};
///
/// let mut set = ChangeSet::new("news_items");
/// set.columns.push(ColumnChange::text("embedding_status").with_default("pending"));
/// set.indexes.push(IndexChange::new("idx_news_items_embedding_status", &["embedding_status"]));
///
/// let json = set.to_json_string_pretty().unwrap();
/// let restored = ChangeSet::from_json_str(&json).unwrap();
/// assert_eq!(set, restored);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSet {
    /// Name of the existing table the changes target.
    pub table: String,
    /// Columns to add, in application order.
    #[serde(default)]
    pub columns: Vec<ColumnChange>,
    /// Indexes to create, in application order.
    #[serde(default)]
    pub indexes: Vec<IndexChange>,
}

impl ChangeSet {
    /// Creates an empty change set for the given table.
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: Vec::new(),
            indexes: Vec::new(),
        }
    }

    /// Parses a change set from a JSON string.
    pub fn from_json_str(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Serializes the change set to pretty-printed JSON.
    pub fn to_json_string_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
