//! Change-set validation.
//!
//! Validates structural invariants of a change set before it reaches a
//! database backend, catching errors such as invalid identifiers, duplicate
//! column or index names, and indexes targeting undeclared columns.
//!
//! # Examples
//!
//! ```
//! use embedding_migrate_core::*;
//!
//! let mut set = ChangeSet::new("news_items");
//! set.columns.push(ColumnChange::text("embedding_status"));
//! assert!(validate_change_set(&set).is_empty());
//!
//! // Invalid: identifier with embedded SQL
//! let mut bad = ChangeSet::new("news_items");
//! bad.columns.push(ColumnChange::text("status; DROP TABLE news_items"));
//! assert!(!validate_change_set(&bad).is_empty());
//! ```

use std::collections::HashSet;

use thiserror::Error;

use crate::ChangeSet;

/// Change-set validation errors.
///
/// Each variant describes a specific structural problem found during
/// validation. The `Display` impl provides a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Target table name is empty or whitespace-only.
    #[error("change set table name cannot be empty")]
    EmptyTableName,
    /// Change set declares no columns and no indexes.
    #[error("change set declares no changes")]
    EmptyChangeSet,
    /// Identifier contains characters other than alphanumerics and
    /// underscores, or starts with a digit.
    #[error("invalid identifier: '{0}'")]
    InvalidIdentifier(String),
    /// Two columns in the change set share a name.
    #[error("duplicate column in change set: {0}")]
    DuplicateColumn(String),
    /// Two indexes in the change set share a name.
    #[error("duplicate index in change set: {0}")]
    DuplicateIndex(String),
    /// Index declares no target columns.
    #[error("index '{0}' has no columns")]
    EmptyIndexColumns(String),
    /// Index targets a column the change set does not declare.
    #[error("index '{index}' targets undeclared column: {column}")]
    UnknownIndexColumn {
        /// Name of the offending index.
        index: String,
        /// The undeclared column it references.
        column: String,
    },
}

/// Checks whether a string is a safe SQL identifier.
///
/// Identifiers must be non-empty, start with a letter or underscore, and
/// contain only alphanumerics and underscores. Everything destined for a
/// DDL statement goes through this check, since identifiers cannot be
/// bound as statement parameters.
pub fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Validates a full change set, returning all problems found.
///
/// An empty result means the change set is structurally sound and safe to
/// hand to a backend.
pub fn validate_change_set(set: &ChangeSet) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if set.table.trim().is_empty() {
        errors.push(ValidationError::EmptyTableName);
    } else if !is_valid_identifier(&set.table) {
        errors.push(ValidationError::InvalidIdentifier(set.table.clone()));
    }

    if set.columns.is_empty() && set.indexes.is_empty() {
        errors.push(ValidationError::EmptyChangeSet);
        return errors;
    }

    let mut declared_columns: HashSet<&str> = HashSet::new();
    for column in &set.columns {
        if !is_valid_identifier(&column.name) {
            errors.push(ValidationError::InvalidIdentifier(column.name.clone()));
            continue;
        }
        if !declared_columns.insert(column.name.as_str()) {
            errors.push(ValidationError::DuplicateColumn(column.name.clone()));
        }
    }

    let mut seen_indexes: HashSet<&str> = HashSet::new();
    for index in &set.indexes {
        if !is_valid_identifier(&index.name) {
            errors.push(ValidationError::InvalidIdentifier(index.name.clone()));
            continue;
        }
        if !seen_indexes.insert(index.name.as_str()) {
            errors.push(ValidationError::DuplicateIndex(index.name.clone()));
        }
        if index.columns.is_empty() {
            errors.push(ValidationError::EmptyIndexColumns(index.name.clone()));
        }
        for column in &index.columns {
            if !declared_columns.contains(column.as_str()) {
                errors.push(ValidationError::UnknownIndexColumn {
                    index: index.name.clone(),
                    column: column.clone(),
                });
            }
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ColumnChange, IndexChange};

    fn minimal_set() -> ChangeSet {
        let mut set = ChangeSet::new("news_items");
        set.columns.push(ColumnChange::text("embedding_status"));
        set
    }

    #[test]
    fn test_valid_identifiers() {
        assert!(is_valid_identifier("news_items"));
        assert!(is_valid_identifier("_private"));
        assert!(is_valid_identifier("col2"));
    }

    #[test]
    fn test_invalid_identifiers() {
        assert!(!is_valid_identifier(""));
        assert!(!is_valid_identifier("2col"));
        assert!(!is_valid_identifier("drop;--"));
        assert!(!is_valid_identifier("hello world"));
        assert!(!is_valid_identifier("semi-colon"));
    }

    #[test]
    fn test_minimal_set_is_valid() {
        assert!(validate_change_set(&minimal_set()).is_empty());
    }

    #[test]
    fn test_empty_table_name() {
        let mut set = minimal_set();
        set.table = "  ".to_string();
        let errors = validate_change_set(&set);
        assert!(errors.contains(&ValidationError::EmptyTableName));
    }

    #[test]
    fn test_empty_change_set() {
        let set = ChangeSet::new("news_items");
        let errors = validate_change_set(&set);
        assert_eq!(errors, vec![ValidationError::EmptyChangeSet]);
    }

    #[test]
    fn test_duplicate_column() {
        let mut set = minimal_set();
        set.columns.push(ColumnChange::text("embedding_status"));
        let errors = validate_change_set(&set);
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::DuplicateColumn(_))));
    }

    #[test]
    fn test_duplicate_index() {
        let mut set = minimal_set();
        set.indexes
            .push(IndexChange::new("idx_status", &["embedding_status"]));
        set.indexes
            .push(IndexChange::new("idx_status", &["embedding_status"]));
        let errors = validate_change_set(&set);
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::DuplicateIndex(_))));
    }

    #[test]
    fn test_index_with_no_columns() {
        let mut set = minimal_set();
        set.indexes.push(IndexChange::new("idx_empty", &[]));
        let errors = validate_change_set(&set);
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::EmptyIndexColumns(_))));
    }

    #[test]
    fn test_index_on_undeclared_column() {
        let mut set = minimal_set();
        set.indexes.push(IndexChange::new("idx_ghost", &["ghost"]));
        let errors = validate_change_set(&set);
        assert!(errors.iter().any(|e| matches!(
            e,
            ValidationError::UnknownIndexColumn { column, .. } if column == "ghost"
        )));
    }

    #[test]
    fn test_injection_attempt_rejected() {
        let mut set = ChangeSet::new("news_items");
        set.columns
            .push(ColumnChange::text("x TEXT; DROP TABLE news_items"));
        let errors = validate_change_set(&set);
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::InvalidIdentifier(_))));
    }
}
