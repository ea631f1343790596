//! SQLite backend for additive schema change sets.
//!
//! This crate applies a declared
//! [`ChangeSet`](embedding_migrate_core::ChangeSet) — column additions,
//! supporting indexes, and column comments — to a live SQLite database.
//! Every change is guarded by an existence check and the whole run executes
//! inside one transaction, so applying a change set any number of times
//! converges to the same schema, and a failed run leaves no partial state.
//!
//! # Architecture
//!
//! - **`sql`** — guarded DDL generation and type-affinity classification
//! - **`inspect`** — read-only introspection of the live schema
//! - **`migration`** — the [`Migrator`] lifecycle (apply/plan/status)
//! - **`error`** — the [`MigrateError`] taxonomy
//!
//! # Quick start
//!
//! ```no_run
//! use embedding_migrate_core::ChangeSet;
//! use embedding_migrate_sqlite::Migrator;
//!
//! let mut migrator = Migrator::open("news.db", ChangeSet::news_items_embedding()).unwrap();
//! let report = migrator.apply().unwrap();
//! println!(
//!     "{} column(s), {} index(es), {} comment(s)",
//!     report.columns_added, report.indexes_created, report.comments_written
//! );
//! ```
//!
//! # Column comments
//!
//! SQLite has no `COMMENT ON`, so comments are persisted in a
//! `schema_comments` side table keyed by table and column name, created on
//! first use and readable back via [`Migrator::comment_for`].

mod error;
mod inspect;
mod migration;
mod sql;

pub use error::{MigrateError, Result};
pub use inspect::ExistingColumn;
pub use migration::{ApplyReport, MigrationStatus, Migrator};
pub use sql::{COMMENTS_TABLE, COMMENTS_TABLE_SQL, TypeAffinity};
