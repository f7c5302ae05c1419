//! Tag repository.

use std::sync::Arc;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use shiftedblog_common::{AppError, AppResult};

use super::content_type::{POST_CONTENT_TYPE, id_subquery};
use crate::entities::{Tag, TaggedItem, tag, tagged_item};

/// Repository for tags and tag assignments.
#[derive(Clone)]
pub struct TagRepository {
    db: Arc<DatabaseConnection>,
}

impl TagRepository {
    /// Create a new tag repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find tag by slug.
    pub async fn find_by_slug(&self, slug: &str) -> AppResult<Option<tag::Model>> {
        Tag::find()
            .filter(tag::Column::Slug.eq(slug))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a tag by slug, creating it when missing.
    pub async fn get_or_create(&self, name: &str, slug: &str) -> AppResult<tag::Model> {
        if let Some(existing) = self.find_by_slug(slug).await? {
            return Ok(existing);
        }

        tag::ActiveModel {
            name: Set(name.to_string()),
            slug: Set(slug.to_string()),
            ..Default::default()
        }
        .insert(self.db.as_ref())
        .await
        .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Tags attached to a post, by name.
    pub async fn find_for_post(&self, post_id: i64) -> AppResult<Vec<tag::Model>> {
        let (app_label, model) = POST_CONTENT_TYPE;
        Tag::find()
            .inner_join(TaggedItem)
            .filter(tagged_item::Column::ObjectId.eq(post_id))
            .filter(tagged_item::Column::ContentTypeId.in_subquery(id_subquery(app_label, model)))
            .order_by_asc(tag::Column::Name)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Attach a tag to an object.
    pub async fn attach(
        &self,
        tag_id: i64,
        content_type_id: i32,
        object_id: i64,
    ) -> AppResult<tagged_item::Model> {
        tagged_item::ActiveModel {
            tag_id: Set(tag_id),
            content_type_id: Set(content_type_id),
            object_id: Set(object_id),
            ..Default::default()
        }
        .insert(self.db.as_ref())
        .await
        .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Remove every tag from an object.
    pub async fn clear(&self, content_type_id: i32, object_id: i64) -> AppResult<()> {
        TaggedItem::delete_many()
            .filter(tagged_item::Column::ContentTypeId.eq(content_type_id))
            .filter(tagged_item::Column::ObjectId.eq(object_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}
