//! Content type repository.

use std::sync::Arc;

use sea_orm::sea_query::{Query, SelectStatement};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use shiftedblog_common::{AppError, AppResult};

use crate::entities::{ContentType, content_type};

/// App label and model name of posts in the type registry.
pub const POST_CONTENT_TYPE: (&str, &str) = ("editor", "post");

/// Subquery selecting the id of a registered content type.
#[must_use]
pub fn id_subquery(app_label: &str, model: &str) -> SelectStatement {
    Query::select()
        .column(content_type::Column::Id)
        .from(content_type::Entity)
        .and_where(content_type::Column::AppLabel.eq(app_label))
        .and_where(content_type::Column::Model.eq(model))
        .to_owned()
}

/// Repository for the content type registry.
#[derive(Clone)]
pub struct ContentTypeRepository {
    db: Arc<DatabaseConnection>,
}

impl ContentTypeRepository {
    /// Create a new content type repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a content type by app label and model.
    pub async fn find(&self, app_label: &str, model: &str) -> AppResult<Option<content_type::Model>> {
        ContentType::find()
            .filter(content_type::Column::AppLabel.eq(app_label))
            .filter(content_type::Column::Model.eq(model))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a content type, registering it when missing.
    pub async fn get_or_create(&self, app_label: &str, model: &str) -> AppResult<content_type::Model> {
        if let Some(existing) = self.find(app_label, model).await? {
            return Ok(existing);
        }

        content_type::ActiveModel {
            app_label: Set(app_label.to_string()),
            model: Set(model.to_string()),
            ..Default::default()
        }
        .insert(self.db.as_ref())
        .await
        .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn post_type() -> content_type::Model {
        content_type::Model {
            id: 7,
            app_label: "editor".to_string(),
            model: "post".to_string(),
        }
    }

    #[tokio::test]
    async fn test_get_or_create_returns_existing() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[post_type()]])
                .into_connection(),
        );

        let repo = ContentTypeRepository::new(db);
        let ct = repo.get_or_create("editor", "post").await.unwrap();

        assert_eq!(ct.id, 7);
    }

    #[tokio::test]
    async fn test_get_or_create_inserts_missing() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<content_type::Model>::new()])
                .append_query_results([[post_type()]])
                .into_connection(),
        );

        let repo = ContentTypeRepository::new(db);
        let ct = repo.get_or_create("editor", "post").await.unwrap();

        assert_eq!(ct.model, "post");
    }
}
