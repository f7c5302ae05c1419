//! Post repository.

use std::sync::Arc;

use chrono::Utc;
use sea_orm::sea_query::{Expr, Query};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, DbBackend,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, Statement,
};
use shiftedblog_common::{AppError, AppResult};
use uuid::Uuid;

use super::content_type::{POST_CONTENT_TYPE, id_subquery};
use crate::entities::{Category, Post, TaggedItem, category, post, tagged_item};

/// Weighted document used by full-text search.
///
/// Must stay in sync with the `idx_editor_post_search` index expression.
const SEARCH_VECTOR: &str = "(setweight(to_tsvector('english', COALESCE(title, '')), 'A') || \
     setweight(to_tsvector('english', COALESCE(body, '')), 'B'))";

/// Minimum rank for a post to count as a search hit.
pub const SEARCH_MIN_RANK: f32 = 0.3;

/// Restriction applied to the published post listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostFilter {
    /// Every published post.
    All,
    /// Posts in categories with this name.
    CategoryName(String),
    /// Posts tagged with this tag id.
    Tag(i64),
}

/// Fields for a new post.
#[derive(Debug, Clone)]
pub struct NewPost {
    /// Post title.
    pub title: String,
    /// Unique URL slug.
    pub slug: String,
    /// Author user id.
    pub author_id: i64,
    /// Category id.
    pub category_id: i64,
    /// Short description.
    pub description: String,
    /// Body with optional `[gallery:N]` placeholders.
    pub body: String,
    /// Cover image storage key.
    pub cover_image: Option<String>,
    /// Cover image credits.
    pub cover_image_credits: Option<String>,
    /// Cover image alt text.
    pub cover_description: Option<String>,
    /// Initial status.
    pub status: post::PostStatus,
}

/// Repository for post operations.
#[derive(Clone)]
pub struct PostRepository {
    db: Arc<DatabaseConnection>,
}

impl PostRepository {
    /// Create a new post repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find post by ID.
    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<post::Model>> {
        Post::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find post by ID, failing when missing.
    pub async fn get_by_id(&self, id: i64) -> AppResult<post::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::PostNotFound(id.to_string()))
    }

    /// Find a published post by slug.
    pub async fn find_published_by_slug(&self, slug: &str) -> AppResult<Option<post::Model>> {
        Post::find()
            .filter(post::Column::Slug.eq(slug))
            .filter(post::Column::Status.eq(post::PostStatus::Published))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a post of any status by its preview uuid.
    pub async fn find_by_uuid(&self, uuid: Uuid) -> AppResult<Option<post::Model>> {
        Post::find()
            .filter(post::Column::Uuid.eq(uuid))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Check if a slug is taken.
    pub async fn slug_exists(&self, slug: &str) -> AppResult<bool> {
        let count = Post::find()
            .filter(post::Column::Slug.eq(slug))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(count > 0)
    }

    fn published_condition(filter: &PostFilter) -> Condition {
        let mut condition =
            Condition::all().add(post::Column::Status.eq(post::PostStatus::Published));

        match filter {
            PostFilter::All => {}
            PostFilter::CategoryName(name) => {
                condition = condition.add(
                    post::Column::CategoryId.in_subquery(
                        Query::select()
                            .column(category::Column::Id)
                            .from(Category)
                            .and_where(category::Column::Name.eq(name.as_str()))
                            .to_owned(),
                    ),
                );
            }
            PostFilter::Tag(tag_id) => {
                let (app_label, model) = POST_CONTENT_TYPE;
                condition = condition.add(
                    post::Column::Id.in_subquery(
                        Query::select()
                            .column(tagged_item::Column::ObjectId)
                            .from(TaggedItem)
                            .and_where(tagged_item::Column::TagId.eq(*tag_id))
                            .and_where(
                                tagged_item::Column::ContentTypeId
                                    .in_subquery(id_subquery(app_label, model)),
                            )
                            .to_owned(),
                    ),
                );
            }
        }

        condition
    }

    /// Published posts, newest first.
    pub async fn find_published(
        &self,
        filter: &PostFilter,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<post::Model>> {
        Post::find()
            .filter(Self::published_condition(filter))
            .order_by_desc(post::Column::Published)
            .order_by_desc(post::Column::Created)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count published posts.
    pub async fn count_published(&self, filter: &PostFilter) -> AppResult<u64> {
        Post::find()
            .filter(Self::published_condition(filter))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Every published post, for the sitemap.
    pub async fn find_all_published(&self) -> AppResult<Vec<post::Model>> {
        Post::find()
            .filter(post::Column::Status.eq(post::PostStatus::Published))
            .order_by_desc(post::Column::Published)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Published posts from a set of ids, in no particular order.
    pub async fn find_published_by_ids(&self, ids: &[i64]) -> AppResult<Vec<post::Model>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        Post::find()
            .filter(post::Column::Id.is_in(ids.iter().copied()))
            .filter(post::Column::Status.eq(post::PostStatus::Published))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Published posts sharing tags with `post_id`, most shared tags first.
    pub async fn find_similar(&self, post_id: i64, limit: u64) -> AppResult<Vec<post::Model>> {
        let sql = r"
            SELECT p.*
            FROM editor_post p
            JOIN tagged_item ti ON ti.object_id = p.id
            WHERE ti.content_type_id = (
                    SELECT id FROM content_type WHERE app_label = $1 AND model = $2
                )
                AND ti.tag_id IN (
                    SELECT own.tag_id FROM tagged_item own
                    WHERE own.object_id = $3 AND own.content_type_id = ti.content_type_id
                )
                AND p.id <> $3
                AND p.status = 'published'
            GROUP BY p.id
            ORDER BY COUNT(ti.id) DESC, p.published DESC
            LIMIT $4
        ";
        let (app_label, model) = POST_CONTENT_TYPE;

        Post::find()
            .from_raw_sql(Statement::from_sql_and_values(
                DbBackend::Postgres,
                sql,
                [
                    app_label.into(),
                    model.into(),
                    post_id.into(),
                    (limit as i64).into(),
                ],
            ))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Newest published posts, skipping `exclude`.
    pub async fn find_newest_excluding(
        &self,
        exclude: &[i64],
        limit: u64,
    ) -> AppResult<Vec<post::Model>> {
        Post::find()
            .filter(post::Column::Status.eq(post::PostStatus::Published))
            .filter(post::Column::Id.is_not_in(exclude.iter().copied()))
            .order_by_desc(post::Column::Published)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Full-text search over published posts, best match first.
    pub async fn search(&self, query: &str, limit: u64, offset: u64) -> AppResult<Vec<post::Model>> {
        let sql = format!(
            r"
            SELECT *
            FROM editor_post
            WHERE status = 'published'
                AND ts_rank({SEARCH_VECTOR}, plainto_tsquery('english', $1)) >= $2
            ORDER BY
                ts_rank({SEARCH_VECTOR}, plainto_tsquery('english', $1)) DESC,
                published DESC
            LIMIT $3 OFFSET $4
            "
        );

        Post::find()
            .from_raw_sql(Statement::from_sql_and_values(
                DbBackend::Postgres,
                &sql,
                [
                    query.into(),
                    SEARCH_MIN_RANK.into(),
                    (limit as i64).into(),
                    (offset as i64).into(),
                ],
            ))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count full-text search hits.
    pub async fn count_search(&self, query: &str) -> AppResult<u64> {
        let sql = format!(
            r"
            SELECT COUNT(*) AS num_items
            FROM editor_post
            WHERE status = 'published'
                AND ts_rank({SEARCH_VECTOR}, plainto_tsquery('english', $1)) >= $2
            "
        );

        let row = self
            .db
            .query_one(Statement::from_sql_and_values(
                DbBackend::Postgres,
                &sql,
                [query.into(), SEARCH_MIN_RANK.into()],
            ))
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let count = match row {
            Some(row) => row
                .try_get::<i64>("", "num_items")
                .map_err(|e| AppError::Database(e.to_string()))?,
            None => 0,
        };
        Ok(count.max(0) as u64)
    }

    /// Increment the view counter.
    ///
    /// Not guarded against concurrent updates.
    pub async fn increment_views(&self, id: i64) -> AppResult<()> {
        Post::update_many()
            .col_expr(post::Column::Views, Expr::col(post::Column::Views).add(1))
            .filter(post::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Create a post.
    pub async fn create(&self, new: NewPost) -> AppResult<post::Model> {
        let now = Utc::now();
        let published = (new.status == post::PostStatus::Published).then(|| now.into());

        let model = post::ActiveModel {
            title: Set(new.title),
            slug: Set(new.slug),
            uuid: Set(Uuid::new_v4()),
            author_id: Set(new.author_id),
            category_id: Set(new.category_id),
            description: Set(new.description),
            body: Set(new.body),
            cover_image: Set(new.cover_image),
            cover_image_credits: Set(new.cover_image_credits),
            cover_description: Set(new.cover_description),
            status: Set(new.status),
            published: Set(published),
            created: Set(now.into()),
            updated: Set(now.into()),
            views: Set(0),
            ..Default::default()
        };

        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Persist changes to a post.
    pub async fn update(&self, model: post::ActiveModel) -> AppResult<post::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a post. Placements and gallery images go with it.
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let result = Post::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected == 0 {
            return Err(AppError::PostNotFound(id.to_string()));
        }
        Ok(())
    }
}
