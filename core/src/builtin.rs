//! The built-in `news_items` embedding change set.
//!
//! Adds the columns and indexes used to track per-row embedding state:
//! which rows still need an embedding, which vector-store entry holds it,
//! when it was generated, and by which model.

use crate::{ChangeSet, ColumnChange, IndexChange};

/// Valid values for the `embedding_status` column.
pub const EMBEDDING_STATUS_VALUES: [&str; 4] = ["pending", "processing", "completed", "failed"];

/// Default embedding model recorded for newly embedded rows.
pub const DEFAULT_EMBEDDING_MODEL: &str = "models/embedding-001";

impl ChangeSet {
    /// Returns the built-in change set for embedding tracking on `news_items`.
    ///
    /// Four nullable columns and three single-column indexes:
    ///
    /// | Column | Type | Default |
    /// |---|---|---|
    /// | `embedding_status` | text | `'pending'` |
    /// | `embedding_vector_id` | text | none |
    /// | `embedded_at` | timestamp-with-timezone | none |
    /// | `embedding_model` | text | `'models/embedding-001'` |
    ///
    /// # Examples
    ///
    /// ```
    /// use embedding_migrate_core::{ChangeSet, validate_change_set};
    ///
    /// let set = ChangeSet::news_items_embedding();
    /// assert_eq!(set.table, "news_items");
    /// assert!(validate_change_set(&set).is_empty());
    /// ```
    pub fn news_items_embedding() -> Self {
        let mut set = ChangeSet::new("news_items");

        set.columns.push(
            ColumnChange::text("embedding_status")
                .with_default("pending")
                .with_comment(format!(
                    "Embedding processing status: {}",
                    EMBEDDING_STATUS_VALUES.join(", ")
                )),
        );
        set.columns.push(
            ColumnChange::text("embedding_vector_id")
                .with_comment("Identifier of the row's vector in the vector store"),
        );
        set.columns.push(
            ColumnChange::timestamp_tz("embedded_at")
                .with_comment("When the embedding was generated"),
        );
        set.columns.push(
            ColumnChange::text("embedding_model")
                .with_default(DEFAULT_EMBEDDING_MODEL)
                .with_comment("Model used to generate the embedding"),
        );

        set.indexes.push(IndexChange::new(
            "idx_news_items_embedding_status",
            &["embedding_status"],
        ));
        set.indexes.push(IndexChange::new(
            "idx_news_items_embedding_vector_id",
            &["embedding_vector_id"],
        ));
        set.indexes.push(IndexChange::new(
            "idx_news_items_embedded_at",
            &["embedded_at"],
        ));

        set
    }
}

#[cfg(test)]
mod tests {
    use crate::{ChangeSet, ColumnType, validate_change_set};

    #[test]
    fn test_builtin_set_shape() {
        let set = ChangeSet::news_items_embedding();
        assert_eq!(set.table, "news_items");
        assert_eq!(set.columns.len(), 4);
        assert_eq!(set.indexes.len(), 3);
        assert!(validate_change_set(&set).is_empty());
    }

    #[test]
    fn test_builtin_defaults() {
        let set = ChangeSet::news_items_embedding();
        let status = &set.columns[0];
        assert_eq!(status.name, "embedding_status");
        assert_eq!(status.default_value.as_deref(), Some("pending"));

        let model = &set.columns[3];
        assert_eq!(model.name, "embedding_model");
        assert_eq!(model.default_value.as_deref(), Some("models/embedding-001"));

        let vector_id = &set.columns[1];
        assert!(vector_id.default_value.is_none());
        let embedded_at = &set.columns[2];
        assert!(embedded_at.default_value.is_none());
        assert_eq!(embedded_at.column_type, ColumnType::TimestampTz);
    }

    #[test]
    fn test_builtin_columns_all_nullable() {
        let set = ChangeSet::news_items_embedding();
        assert!(set.columns.iter().all(|c| c.nullable));
    }

    #[test]
    fn test_builtin_status_comment_lists_vocabulary() {
        let set = ChangeSet::news_items_embedding();
        let comment = set.columns[0].comment.as_deref().unwrap();
        for value in ["pending", "processing", "completed", "failed"] {
            assert!(comment.contains(value), "missing status value: {value}");
        }
    }

    #[test]
    fn test_builtin_index_targets_are_declared_columns() {
        let set = ChangeSet::news_items_embedding();
        for index in &set.indexes {
            assert_eq!(index.columns.len(), 1);
            assert!(set.columns.iter().any(|c| c.name == index.columns[0]));
        }
    }
}
