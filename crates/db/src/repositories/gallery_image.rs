//! Post gallery image repository.

use std::sync::Arc;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use shiftedblog_common::{AppError, AppResult};

use crate::entities::{PostGalleryImage, post_gallery_image};

/// Fields for a new gallery image.
#[derive(Debug, Clone)]
pub struct NewGalleryImage {
    /// Owning post.
    pub post_id: i64,
    /// Storage key of the image.
    pub image: String,
    /// Caption shown under the image.
    pub caption: String,
    /// Order within the gallery.
    pub order: i32,
    /// Gallery the image belongs to.
    pub gallery_key: i32,
}

/// Repository for gallery image operations.
#[derive(Clone)]
pub struct GalleryImageRepository {
    db: Arc<DatabaseConnection>,
}

impl GalleryImageRepository {
    /// Create a new gallery image repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find image by ID.
    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<post_gallery_image::Model>> {
        PostGalleryImage::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// All images of a post ordered by gallery key, order, then id.
    pub async fn find_by_post(&self, post_id: i64) -> AppResult<Vec<post_gallery_image::Model>> {
        PostGalleryImage::find()
            .filter(post_gallery_image::Column::PostId.eq(post_id))
            .order_by_asc(post_gallery_image::Column::GalleryKey)
            .order_by_asc(post_gallery_image::Column::Order)
            .order_by_asc(post_gallery_image::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Add an image.
    pub async fn create(&self, new: NewGalleryImage) -> AppResult<post_gallery_image::Model> {
        post_gallery_image::ActiveModel {
            post_id: Set(new.post_id),
            image: Set(new.image),
            caption: Set(new.caption),
            order: Set(new.order),
            gallery_key: Set(new.gallery_key),
            ..Default::default()
        }
        .insert(self.db.as_ref())
        .await
        .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Remove an image.
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let result = PostGalleryImage::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound(format!("Gallery image not found: {id}")));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, Transaction};

    fn transaction_log(db: Arc<DatabaseConnection>) -> Vec<Transaction> {
        let Ok(db) = Arc::try_unwrap(db) else {
            panic!("connection is still shared");
        };
        db.into_transaction_log()
    }

    fn image(id: i64, key: i32, order: i32) -> post_gallery_image::Model {
        post_gallery_image::Model {
            id,
            post_id: 1,
            image: format!("img/post/{id}.png"),
            caption: String::new(),
            order,
            gallery_key: key,
        }
    }

    #[tokio::test]
    async fn test_find_by_post_orders_by_key_then_order() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[image(1, 1, 0), image(2, 1, 1), image(3, 2, 0)]])
                .into_connection(),
        );

        let repo = GalleryImageRepository::new(db.clone());
        let images = repo.find_by_post(1).await.unwrap();
        assert_eq!(images.len(), 3);

        drop(repo);
        let log = format!("{:?}", transaction_log(db));
        assert!(log.contains(
            "ORDER BY \\\"editor_postgalleryimage\\\".\\\"gallery_key\\\" ASC, \
             \\\"editor_postgalleryimage\\\".\\\"order\\\" ASC, \
             \\\"editor_postgalleryimage\\\".\\\"id\\\" ASC"
        ));
    }
}
