//! Live-schema introspection.
//!
//! Reads the current state of a SQLite database — which tables, columns,
//! and indexes exist — so the migrator can decide which declared changes
//! are still pending. Everything here is read-only.

use rusqlite::{Connection, OptionalExtension};

use crate::error::Result;
use crate::sql::{COMMENTS_TABLE, SELECT_COMMENT_SQL};

/// A column as reported by `PRAGMA table_info`.
#[derive(Debug, Clone)]
pub struct ExistingColumn {
    /// Column name.
    pub name: String,
    /// Declared type, verbatim (e.g. `TEXT`, `VARCHAR(80)`).
    pub declared_type: String,
    /// Whether the column carries a NOT NULL constraint.
    pub notnull: bool,
    /// Default expression, verbatim, if any.
    pub default_value: Option<String>,
}

/// Checks whether a table of the given name exists.
pub fn table_exists(conn: &Connection, table: &str) -> Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
        [table],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// Checks whether an index of the given name exists.
pub fn index_exists(conn: &Connection, name: &str) -> Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'index' AND name = ?1",
        [name],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// Returns the columns of a table in declaration order.
///
/// Empty when the table does not exist; callers that care use
/// [`table_exists`] first.
pub fn table_columns(conn: &Connection, table: &str) -> Result<Vec<ExistingColumn>> {
    let mut stmt = conn.prepare(
        "SELECT name, type, \"notnull\", dflt_value FROM pragma_table_info(?1) ORDER BY cid",
    )?;
    let rows = stmt.query_map([table], |row| {
        Ok(ExistingColumn {
            name: row.get(0)?,
            declared_type: row.get(1)?,
            notnull: row.get::<_, i64>(2)? != 0,
            default_value: row.get(3)?,
        })
    })?;

    let mut columns = Vec::new();
    for row in rows {
        columns.push(row?);
    }
    Ok(columns)
}

/// Reads back a stored column comment, if any.
///
/// Returns `None` when the comments side table has not been created yet.
pub fn column_comment(conn: &Connection, table: &str, column: &str) -> Result<Option<String>> {
    if !table_exists(conn, COMMENTS_TABLE)? {
        return Ok(None);
    }
    let comment = conn
        .query_row(SELECT_COMMENT_SQL, [table, column], |row| row.get(0))
        .optional()?;
    Ok(comment)
}
