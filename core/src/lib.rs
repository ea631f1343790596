//! Core types and validation for additive schema change sets.
//!
//! A [`ChangeSet`] declares an ordered list of column additions and index
//! creations against a single existing table, plus documentation comments
//! for the new columns. Change sets are serializable with [`serde`], so
//! they can be authored as JSON files, validated with
//! [`validate_change_set`], and handed to a database backend for
//! idempotent application.
//!
//! The built-in [`ChangeSet::news_items_embedding`] set adds the
//! embedding-tracking columns (`embedding_status`, `embedding_vector_id`,
//! `embedded_at`, `embedding_model`) to a `news_items` table.
//!
//! # Quick start
//!
//! ```
//! use embedding_migrate_core::{ChangeSet, validate_change_set};
//!
//! let set = ChangeSet::news_items_embedding();
//! assert!(validate_change_set(&set).is_empty());
//!
//! let json = set.to_json_string_pretty().unwrap();
//! let restored = ChangeSet::from_json_str(&json).unwrap();
//! assert_eq!(set, restored);
//! ```

mod builtin;
mod types;
mod validate;

pub use builtin::{DEFAULT_EMBEDDING_MODEL, EMBEDDING_STATUS_VALUES};
pub use types::{ChangeSet, ColumnChange, ColumnType, IndexChange};
pub use validate::{ValidationError, is_valid_identifier, validate_change_set};
