//! Category repository.

use std::sync::Arc;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use shiftedblog_common::{AppError, AppResult};

use crate::entities::{Category, category};

/// Repository for category operations.
#[derive(Clone)]
pub struct CategoryRepository {
    db: Arc<DatabaseConnection>,
}

impl CategoryRepository {
    /// Create a new category repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find category by ID.
    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<category::Model>> {
        Category::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find categories by name. Names are not unique.
    pub async fn find_by_name(&self, name: &str) -> AppResult<Vec<category::Model>> {
        Category::find()
            .filter(category::Column::Name.eq(name))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List categories by name.
    pub async fn list(&self) -> AppResult<Vec<category::Model>> {
        Category::find()
            .order_by_asc(category::Column::Name)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a category.
    pub async fn create(&self, name: String) -> AppResult<category::Model> {
        category::ActiveModel {
            name: Set(name),
            ..Default::default()
        }
        .insert(self.db.as_ref())
        .await
        .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a category and, by cascade, its posts.
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let result = Category::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound(format!("Category not found: {id}")));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    #[tokio::test]
    async fn test_create() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[category::Model {
                    id: 1,
                    name: "Rust".to_string(),
                }]])
                .into_connection(),
        );

        let repo = CategoryRepository::new(db);
        let category = repo.create("Rust".to_string()).await.unwrap();

        assert_eq!(category.name, "Rust");
    }

    #[tokio::test]
    async fn test_delete_missing() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );

        let repo = CategoryRepository::new(db);
        assert!(matches!(repo.delete(5).await, Err(AppError::NotFound(_))));
    }
}
