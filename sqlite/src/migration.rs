//! Migration lifecycle operations.
//!
//! Provides [`Migrator`] for applying a declared change set to a live
//! SQLite database. All pending work is computed up front against the
//! current schema and executed inside a single transaction, so a run
//! either applies every remaining change or none of them.
//!
//! # Example
//!
//! ```no_run
//! use embedding_migrate_core::ChangeSet;
//! use embedding_migrate_sqlite::Migrator;
//!
//! let mut migrator = Migrator::open("news.db", ChangeSet::news_items_embedding()).unwrap();
//!
//! // Idempotent: the second run reports zero changes.
//! let report = migrator.apply().unwrap();
//! println!("{} column(s), {} index(es)", report.columns_added, report.indexes_created);
//! assert!(migrator.apply().unwrap().is_noop());
//! ```

use std::path::Path;

use embedding_migrate_core::{ChangeSet, validate_change_set};
use rusqlite::Connection;
use tracing::{debug, info};

use crate::error::{MigrateError, Result};
use crate::inspect::{self, ExistingColumn};
use crate::sql::{self, TypeAffinity};

/// What a single pending statement does, for report accounting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StepKind {
    AddColumn,
    CreateIndex,
    EnsureCommentsTable,
    WriteComment,
}

/// One statement the migrator would execute, with its accounting category.
#[derive(Debug, Clone)]
struct PlanStep {
    kind: StepKind,
    sql: String,
}

/// Applies a change set to a SQLite database, idempotently.
///
/// Construct with [`new`](Self::new) around an existing connection or
/// [`open`](Self::open) for a file-backed database. The change set is
/// validated on construction; structural problems surface as
/// [`MigrateError::InvalidChangeSet`] before any SQL runs.
///
/// # Examples
///
/// ```no_run
/// use embedding_migrate_core::ChangeSet;
/// use embedding_migrate_sqlite::Migrator;
/// use rusqlite::Connection;
///
/// let conn = Connection::open("news.db").unwrap();
/// let mut migrator = Migrator::new(conn, ChangeSet::news_items_embedding()).unwrap();
///
/// for statement in migrator.plan().unwrap() {
///     println!("{statement}");
/// }
/// migrator.apply().unwrap();
///
/// let status = migrator.status().unwrap();
/// assert!(status.fully_applied());
/// ```
#[derive(Debug)]
pub struct Migrator {
    conn: Connection,
    set: ChangeSet,
}

impl Migrator {
    /// Creates a migrator for the given connection and change set.
    ///
    /// # Errors
    ///
    /// Returns [`MigrateError::InvalidChangeSet`] if the change set fails
    /// structural validation.
    pub fn new(conn: Connection, set: ChangeSet) -> Result<Self> {
        let errors = validate_change_set(&set);
        if !errors.is_empty() {
            let joined = errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ");
            return Err(MigrateError::InvalidChangeSet(joined));
        }
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(Self { conn, set })
    }

    /// Opens a file-backed database and wraps it in a migrator.
    ///
    /// # Errors
    ///
    /// Returns [`MigrateError::ConnectionError`] when the database cannot
    /// be opened, in addition to the errors [`new`](Self::new) reports.
    pub fn open(path: impl AsRef<Path>, set: ChangeSet) -> Result<Self> {
        let conn = Connection::open(path)?;
        Self::new(conn, set)
    }

    /// Applies every pending change inside a single transaction.
    ///
    /// Columns are added before indexes; comments are written last into the
    /// `schema_comments` side table. Changes already present are skipped,
    /// so a second run performs no mutations and reports all zeros.
    ///
    /// # Errors
    ///
    /// Returns [`MigrateError::TableNotFound`] if the target table is
    /// missing, [`MigrateError::SchemaConflict`] if an existing column of a
    /// declared name has an incompatible type (detected before any DDL
    /// executes, so the schema is left untouched), and
    /// [`MigrateError::PermissionDenied`] / [`MigrateError::ConnectionError`]
    /// for privilege and transport failures — in which case the transaction
    /// rolls back entirely.
    pub fn apply(&mut self) -> Result<ApplyReport> {
        let tx = self.conn.transaction()?;
        let steps = build_steps(&tx, &self.set)?;

        let mut report = ApplyReport::default();
        for step in &steps {
            debug!(statement = %step.sql, "executing");
            tx.execute_batch(&step.sql)?;
            match step.kind {
                StepKind::AddColumn => report.columns_added += 1,
                StepKind::CreateIndex => report.indexes_created += 1,
                StepKind::WriteComment => report.comments_written += 1,
                StepKind::EnsureCommentsTable => {}
            }
        }
        tx.commit()?;

        info!(
            table = %self.set.table,
            columns = report.columns_added,
            indexes = report.indexes_created,
            comments = report.comments_written,
            "change set applied"
        );
        Ok(report)
    }

    /// Returns the SQL statements [`apply`](Self::apply) would execute.
    ///
    /// A read-only dry run against the current schema; empty when the
    /// change set is fully applied. Surfaces [`MigrateError::SchemaConflict`]
    /// and [`MigrateError::TableNotFound`] the same way `apply` does.
    pub fn plan(&self) -> Result<Vec<String>> {
        let steps = build_steps(&self.conn, &self.set)?;
        Ok(steps.into_iter().map(|step| step.sql).collect())
    }

    /// Reports which declared columns and indexes are present.
    pub fn status(&self) -> Result<MigrationStatus> {
        let table_exists = inspect::table_exists(&self.conn, &self.set.table)?;
        if !table_exists {
            return Ok(MigrationStatus {
                table_exists: false,
                columns_present: Vec::new(),
                columns_missing: declared_names(&self.set.columns),
                indexes_present: Vec::new(),
                indexes_missing: self.set.indexes.iter().map(|i| i.name.clone()).collect(),
            });
        }

        let existing = inspect::table_columns(&self.conn, &self.set.table)?;
        let mut columns_present = Vec::new();
        let mut columns_missing = Vec::new();
        for column in &self.set.columns {
            if find_column(&existing, &column.name).is_some() {
                columns_present.push(column.name.clone());
            } else {
                columns_missing.push(column.name.clone());
            }
        }

        let mut indexes_present = Vec::new();
        let mut indexes_missing = Vec::new();
        for index in &self.set.indexes {
            if inspect::index_exists(&self.conn, &index.name)? {
                indexes_present.push(index.name.clone());
            } else {
                indexes_missing.push(index.name.clone());
            }
        }

        Ok(MigrationStatus {
            table_exists,
            columns_present,
            columns_missing,
            indexes_present,
            indexes_missing,
        })
    }

    /// Reads back the stored comment for a column of the target table.
    pub fn comment_for(&self, column: &str) -> Result<Option<String>> {
        inspect::column_comment(&self.conn, &self.set.table, column)
    }

    /// Returns the change set this migrator applies.
    pub fn change_set(&self) -> &ChangeSet {
        &self.set
    }

    /// Returns a reference to the underlying connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Consumes the migrator and returns the underlying connection.
    pub fn into_connection(self) -> Connection {
        self.conn
    }
}

fn declared_names(columns: &[embedding_migrate_core::ColumnChange]) -> Vec<String> {
    columns.iter().map(|c| c.name.clone()).collect()
}

fn find_column<'a>(existing: &'a [ExistingColumn], name: &str) -> Option<&'a ExistingColumn> {
    // SQLite identifiers are case-insensitive.
    existing.iter().find(|c| c.name.eq_ignore_ascii_case(name))
}

/// Computes the pending statements for a change set against the live schema.
///
/// Conflict detection happens here, before anything executes: a declared
/// column whose existing counterpart has a different type affinity aborts
/// the whole run with no DDL issued.
fn build_steps(conn: &Connection, set: &ChangeSet) -> Result<Vec<PlanStep>> {
    if !inspect::table_exists(conn, &set.table)? {
        return Err(MigrateError::TableNotFound(set.table.clone()));
    }

    let existing = inspect::table_columns(conn, &set.table)?;
    let mut steps = Vec::new();

    for column in &set.columns {
        match find_column(&existing, &column.name) {
            Some(found) => {
                let expected = TypeAffinity::from_declared(sql::declared_type(column.column_type));
                let actual = TypeAffinity::from_declared(&found.declared_type);
                if expected != actual {
                    return Err(MigrateError::SchemaConflict {
                        column: column.name.clone(),
                        expected: expected.to_string(),
                        found: actual.to_string(),
                    });
                }
                debug!(column = %column.name, "column already present");
            }
            None => steps.push(PlanStep {
                kind: StepKind::AddColumn,
                sql: sql::add_column_sql(&set.table, column),
            }),
        }
    }

    for index in &set.indexes {
        if inspect::index_exists(conn, &index.name)? {
            debug!(index = %index.name, "index already present");
        } else {
            steps.push(PlanStep {
                kind: StepKind::CreateIndex,
                sql: sql::create_index_sql(&set.table, index),
            });
        }
    }

    let mut comment_steps = Vec::new();
    for column in &set.columns {
        let Some(comment) = &column.comment else {
            continue;
        };
        let current = inspect::column_comment(conn, &set.table, &column.name)?;
        if current.as_deref() != Some(comment.as_str()) {
            comment_steps.push(PlanStep {
                kind: StepKind::WriteComment,
                sql: sql::upsert_comment_sql(&set.table, &column.name, comment),
            });
        }
    }
    if !comment_steps.is_empty() && !inspect::table_exists(conn, sql::COMMENTS_TABLE)? {
        steps.push(PlanStep {
            kind: StepKind::EnsureCommentsTable,
            sql: sql::COMMENTS_TABLE_SQL.to_string(),
        });
    }
    steps.extend(comment_steps);

    Ok(steps)
}

/// Counts of the mutations one [`Migrator::apply`] run performed.
///
/// All zeros on a re-run of a fully applied change set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyReport {
    /// Number of columns added.
    pub columns_added: usize,
    /// Number of indexes created.
    pub indexes_created: usize,
    /// Number of column comments written or updated.
    pub comments_written: usize,
}

impl ApplyReport {
    /// Whether the run performed no mutations at all.
    pub fn is_noop(&self) -> bool {
        self.columns_added == 0 && self.indexes_created == 0 && self.comments_written == 0
    }
}

/// Presence of the declared changes in the live schema.
///
/// Returned by [`Migrator::status`].
#[derive(Debug, Clone)]
pub struct MigrationStatus {
    /// Whether the target table exists.
    pub table_exists: bool,
    /// Declared columns present on the table.
    pub columns_present: Vec<String>,
    /// Declared columns not yet added.
    pub columns_missing: Vec<String>,
    /// Declared indexes present.
    pub indexes_present: Vec<String>,
    /// Declared indexes not yet created.
    pub indexes_missing: Vec<String>,
}

impl MigrationStatus {
    /// Whether every declared column and index is present.
    pub fn fully_applied(&self) -> bool {
        self.table_exists && self.columns_missing.is_empty() && self.indexes_missing.is_empty()
    }
}
