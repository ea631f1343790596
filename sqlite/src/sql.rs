//! Guarded DDL generation for additive change sets.
//!
//! Renders the statements a change set needs against SQLite: `ALTER TABLE
//! … ADD COLUMN` for new columns, `CREATE INDEX IF NOT EXISTS` for
//! supporting indexes, and the side table that stands in for `COMMENT ON`
//! (which SQLite does not have). Identifiers are validated upstream and
//! default literals are quoted here; nothing user-controlled is spliced
//! into SQL unescaped.

use std::fmt;

use embedding_migrate_core::{ColumnChange, ColumnType, IndexChange};

/// Name of the side table that stores column comments.
pub const COMMENTS_TABLE: &str = "schema_comments";

/// DDL for the comments side table.
pub const COMMENTS_TABLE_SQL: &str = "\
CREATE TABLE IF NOT EXISTS schema_comments (
    table_name TEXT NOT NULL,
    column_name TEXT NOT NULL,
    comment TEXT NOT NULL,
    PRIMARY KEY (table_name, column_name)
);";

/// Parameterized lookup of a stored column comment.
pub(crate) const SELECT_COMMENT_SQL: &str =
    "SELECT comment FROM schema_comments WHERE table_name = ?1 AND column_name = ?2";

/// SQLite column type affinity, derived from a declared type per the
/// affinity rules in the SQLite documentation.
///
/// Two declared types are considered compatible when they share an
/// affinity: an existing `VARCHAR(80)` column satisfies a declared `TEXT`
/// column, while an `INTEGER` one conflicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeAffinity {
    /// `INTEGER` affinity.
    Integer,
    /// `TEXT` affinity.
    Text,
    /// `BLOB` affinity (no declared type, or contains "BLOB").
    Blob,
    /// `REAL` affinity.
    Real,
    /// `NUMERIC` affinity (the fallback).
    Numeric,
}

impl TypeAffinity {
    /// Computes the affinity of a declared column type.
    pub fn from_declared(declared: &str) -> Self {
        let upper = declared.to_ascii_uppercase();
        if upper.contains("INT") {
            TypeAffinity::Integer
        } else if upper.contains("CHAR") || upper.contains("CLOB") || upper.contains("TEXT") {
            TypeAffinity::Text
        } else if upper.is_empty() || upper.contains("BLOB") {
            TypeAffinity::Blob
        } else if upper.contains("REAL") || upper.contains("FLOA") || upper.contains("DOUB") {
            TypeAffinity::Real
        } else {
            TypeAffinity::Numeric
        }
    }
}

impl fmt::Display for TypeAffinity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TypeAffinity::Integer => "INTEGER",
            TypeAffinity::Text => "TEXT",
            TypeAffinity::Blob => "BLOB",
            TypeAffinity::Real => "REAL",
            TypeAffinity::Numeric => "NUMERIC",
        };
        f.write_str(name)
    }
}

/// SQLite declared type for a semantic column type.
///
/// Timestamps are stored as RFC 3339 text, so both variants render `TEXT`.
pub(crate) fn declared_type(column_type: ColumnType) -> &'static str {
    match column_type {
        ColumnType::Text | ColumnType::TimestampTz => "TEXT",
    }
}

/// Quotes a string as a SQL literal, doubling embedded single quotes.
pub(crate) fn quote_literal(raw: &str) -> String {
    format!("'{}'", raw.replace('\'', "''"))
}

/// Renders the `ALTER TABLE … ADD COLUMN` statement for one column.
pub(crate) fn add_column_sql(table: &str, column: &ColumnChange) -> String {
    let mut sql = format!(
        "ALTER TABLE {table} ADD COLUMN {name} {ty}",
        name = column.name,
        ty = declared_type(column.column_type),
    );
    if !column.nullable {
        sql.push_str(" NOT NULL");
    }
    if let Some(default) = &column.default_value {
        sql.push_str(" DEFAULT ");
        sql.push_str(&quote_literal(default));
    }
    sql.push(';');
    sql
}

/// Renders the guarded `CREATE INDEX` statement for one index.
pub(crate) fn create_index_sql(table: &str, index: &IndexChange) -> String {
    format!(
        "CREATE INDEX IF NOT EXISTS {name} ON {table}({columns});",
        name = index.name,
        columns = index.columns.join(", "),
    )
}

/// Renders the comment upsert for one column, with literals inlined.
pub(crate) fn upsert_comment_sql(table: &str, column: &str, comment: &str) -> String {
    format!(
        "INSERT INTO {COMMENTS_TABLE} (table_name, column_name, comment) \
         VALUES ({t}, {c}, {m}) \
         ON CONFLICT(table_name, column_name) DO UPDATE SET comment = excluded.comment;",
        t = quote_literal(table),
        c = quote_literal(column),
        m = quote_literal(comment),
    )
}
