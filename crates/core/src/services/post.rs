//! Post service.

use chrono::Utc;
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use shiftedblog_common::{AppError, AppResult};
use shiftedblog_db::entities::{category, post, tag};
use shiftedblog_db::repositories::{
    CategoryRepository, ContentTypeRepository, NewPost, PostFilter, PostRepository, TagRepository,
    UserRepository, content_type::POST_CONTENT_TYPE,
};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use super::gallery::{BodySegment, GalleryService};
use super::pagination::{Page, PageRequest, PAGE_SIZE, num_pages};
use super::series::{SeriesNavigation, SeriesService};

/// Similar posts shown under a post.
const MAX_SIMILAR_POSTS: u64 = 3;

/// Similar and newest posts shown under a post, together.
const MAX_RELATED_POSTS: u64 = 5;

/// Which published posts to list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListFilter {
    All,
    /// Category name as it appears in the URL.
    Category(String),
    /// Tag slug.
    Tag(String),
}

/// A listing page.
#[derive(Debug, Clone, Serialize)]
pub struct PostListing {
    /// Tag being listed, for tag listings.
    pub tag: Option<tag::Model>,
    /// Posts. `None` for a category without posts.
    pub page: Option<Page<post::Model>>,
}

/// Everything shown on a post page.
#[derive(Debug, Clone, Serialize)]
pub struct PostDetail {
    pub post: post::Model,
    pub tags: Vec<tag::Model>,
    pub segments: Vec<BodySegment>,
    pub navigation: Option<SeriesNavigation>,
    pub similar_posts: Vec<post::Model>,
    pub newest_posts: Vec<post::Model>,
}

/// Input for creating a post.
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePostInput {
    #[validate(length(min = 1, max = 250))]
    pub title: String,
    #[validate(length(min = 1, max = 250))]
    pub slug: String,
    pub author_id: i64,
    pub category_id: i64,
    #[validate(length(max = 500))]
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub body: String,
    #[validate(length(max = 255))]
    pub cover_image: Option<String>,
    #[validate(length(max = 250))]
    pub cover_image_credits: Option<String>,
    #[validate(length(max = 250))]
    pub cover_description: Option<String>,
    #[serde(default)]
    pub status: post::PostStatus,
    /// Tag names.
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Input for updating a post.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdatePostInput {
    #[validate(length(min = 1, max = 250))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 250))]
    pub slug: Option<String>,
    pub category_id: Option<i64>,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    pub body: Option<String>,
    pub cover_image: Option<Option<String>>,
    pub cover_image_credits: Option<Option<String>>,
    pub cover_description: Option<Option<String>>,
    pub status: Option<post::PostStatus>,
    /// Replaces every tag of the post when present.
    pub tags: Option<Vec<String>>,
}

/// Input for creating a category.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCategoryInput {
    #[validate(length(min = 1, max = 250))]
    pub name: String,
}

/// Service for posts.
#[derive(Clone)]
pub struct PostService {
    post_repo: PostRepository,
    category_repo: CategoryRepository,
    tag_repo: TagRepository,
    content_type_repo: ContentTypeRepository,
    user_repo: UserRepository,
    series_service: SeriesService,
    gallery_service: GalleryService,
}

impl PostService {
    /// Create a new post service.
    #[must_use]
    pub const fn new(
        post_repo: PostRepository,
        category_repo: CategoryRepository,
        tag_repo: TagRepository,
        content_type_repo: ContentTypeRepository,
        user_repo: UserRepository,
        series_service: SeriesService,
        gallery_service: GalleryService,
    ) -> Self {
        Self {
            post_repo,
            category_repo,
            tag_repo,
            content_type_repo,
            user_repo,
            series_service,
            gallery_service,
        }
    }

    // ==================== Reader Operations ====================

    /// List published posts, newest first.
    pub async fn list_published(
        &self,
        filter: ListFilter,
        page: PageRequest,
    ) -> AppResult<PostListing> {
        let (filter, tag, empty_is_none) = match filter {
            ListFilter::All => (PostFilter::All, None, false),
            ListFilter::Category(name) => (PostFilter::CategoryName(name), None, true),
            ListFilter::Tag(slug) => {
                let tag = self
                    .tag_repo
                    .find_by_slug(&slug)
                    .await?
                    .ok_or_else(|| AppError::NotFound(format!("Tag not found: {slug}")))?;
                (PostFilter::Tag(tag.id), Some(tag), false)
            }
        };

        let total = self.post_repo.count_published(&filter).await?;
        if total == 0 && empty_is_none {
            return Ok(PostListing { tag, page: None });
        }

        let pages = num_pages(total, PAGE_SIZE);
        let number = page.resolve(pages);
        let items = self
            .post_repo
            .find_published(&filter, PAGE_SIZE, Page::<post::Model>::offset(number))
            .await?;

        Ok(PostListing {
            tag,
            page: Some(Page::new(items, number, pages, total)),
        })
    }

    /// A published post page. Counts a view.
    pub async fn detail_by_slug(&self, slug: &str) -> AppResult<PostDetail> {
        let mut post = self
            .post_repo
            .find_published_by_slug(slug)
            .await?
            .ok_or_else(|| AppError::PostNotFound(slug.to_string()))?;

        self.post_repo.increment_views(post.id).await?;
        post.views += 1;

        let similar_posts = self
            .post_repo
            .find_similar(post.id, MAX_SIMILAR_POSTS)
            .await?;

        let mut exclude: Vec<i64> = similar_posts.iter().map(|p| p.id).collect();
        exclude.push(post.id);
        let newest_limit = MAX_RELATED_POSTS.saturating_sub(similar_posts.len() as u64);
        let newest_posts = if newest_limit == 0 {
            Vec::new()
        } else {
            self.post_repo
                .find_newest_excluding(&exclude, newest_limit)
                .await?
        };

        let tags = self.tag_repo.find_for_post(post.id).await?;
        let segments = self
            .gallery_service
            .body_segments(post.id, &post.body)
            .await?;
        let navigation = self.series_service.navigation_for(&post).await;

        Ok(PostDetail {
            post,
            tags,
            segments,
            navigation,
            similar_posts,
            newest_posts,
        })
    }

    /// Preview a post of any status by its secret uuid. Does not count a view.
    pub async fn preview_by_uuid(&self, uuid: Uuid) -> AppResult<PostDetail> {
        let post = self
            .post_repo
            .find_by_uuid(uuid)
            .await?
            .ok_or_else(|| AppError::PostNotFound(uuid.to_string()))?;

        let tags = self.tag_repo.find_for_post(post.id).await?;
        let segments = self
            .gallery_service
            .body_segments(post.id, &post.body)
            .await?;
        let navigation = self.series_service.navigation_for(&post).await;

        Ok(PostDetail {
            post,
            tags,
            segments,
            navigation,
            similar_posts: Vec::new(),
            newest_posts: Vec::new(),
        })
    }

    /// Categories, by name.
    pub async fn categories(&self) -> AppResult<Vec<category::Model>> {
        self.category_repo.list().await
    }

    // ==================== Editor Operations ====================

    /// Create a category.
    pub async fn create_category(&self, input: CreateCategoryInput) -> AppResult<category::Model> {
        input.validate()?;
        let name = input.name.trim().to_string();
        if !self.category_repo.find_by_name(&name).await?.is_empty() {
            return Err(AppError::Conflict(format!("Category exists: {name}")));
        }
        self.category_repo.create(name).await
    }

    /// Delete a category together with its posts.
    pub async fn delete_category(&self, category_id: i64) -> AppResult<()> {
        self.category_repo.delete(category_id).await?;
        info!(category_id, "Category deleted");
        Ok(())
    }

    /// Create a post.
    pub async fn create(&self, input: CreatePostInput) -> AppResult<post::Model> {
        input.validate()?;
        validate_slug(&input.slug)?;

        if self.post_repo.slug_exists(&input.slug).await? {
            return Err(AppError::Conflict(format!("Slug is taken: {}", input.slug)));
        }

        let author = self
            .user_repo
            .find_by_id(input.author_id)
            .await?
            .filter(|user| user.is_active)
            .ok_or_else(|| AppError::Validation(format!("Unknown author: {}", input.author_id)))?;

        self.category_repo
            .find_by_id(input.category_id)
            .await?
            .ok_or_else(|| {
                AppError::Validation(format!("Unknown category: {}", input.category_id))
            })?;

        let post = self
            .post_repo
            .create(NewPost {
                title: input.title,
                slug: input.slug,
                author_id: author.id,
                category_id: input.category_id,
                description: input.description,
                body: input.body,
                cover_image: input.cover_image,
                cover_image_credits: input.cover_image_credits,
                cover_description: input.cover_description,
                status: input.status,
            })
            .await?;

        if !input.tags.is_empty() {
            self.replace_tags(post.id, &input.tags).await?;
        }

        info!(post_id = post.id, slug = %post.slug, status = ?post.status, "Post created");
        Ok(post)
    }

    /// Update a post.
    ///
    /// The publication date is set the first time the post becomes published
    /// and kept from then on.
    pub async fn update(&self, post_id: i64, input: UpdatePostInput) -> AppResult<post::Model> {
        input.validate()?;
        let current = self.post_repo.get_by_id(post_id).await?;

        let mut active: post::ActiveModel = current.clone().into();

        if let Some(title) = input.title {
            active.title = Set(title);
        }
        if let Some(slug) = input.slug {
            if slug != current.slug {
                validate_slug(&slug)?;
                if self.post_repo.slug_exists(&slug).await? {
                    return Err(AppError::Conflict(format!("Slug is taken: {slug}")));
                }
            }
            active.slug = Set(slug);
        }
        if let Some(category_id) = input.category_id {
            self.category_repo
                .find_by_id(category_id)
                .await?
                .ok_or_else(|| AppError::Validation(format!("Unknown category: {category_id}")))?;
            active.category_id = Set(category_id);
        }
        if let Some(description) = input.description {
            active.description = Set(description);
        }
        if let Some(body) = input.body {
            active.body = Set(body);
        }
        if let Some(cover_image) = input.cover_image {
            active.cover_image = Set(cover_image);
        }
        if let Some(credits) = input.cover_image_credits {
            active.cover_image_credits = Set(credits);
        }
        if let Some(cover_description) = input.cover_description {
            active.cover_description = Set(cover_description);
        }

        let now = Utc::now();
        if let Some(status) = input.status {
            active.status = Set(status);
            if status == post::PostStatus::Published && current.published.is_none() {
                active.published = Set(Some(now.into()));
            }
        }
        active.updated = Set(now.into());

        let post = self.post_repo.update(active).await?;

        if let Some(tags) = input.tags {
            self.replace_tags(post.id, &tags).await?;
        }

        if post.is_published() && !current.is_published() {
            info!(post_id = post.id, slug = %post.slug, "Post published");
        }
        Ok(post)
    }

    /// Delete a post with its tags.
    pub async fn delete(&self, post_id: i64) -> AppResult<()> {
        let post = self.post_repo.get_by_id(post_id).await?;

        let (app_label, model) = POST_CONTENT_TYPE;
        if let Some(content_type) = self.content_type_repo.find(app_label, model).await? {
            self.tag_repo.clear(content_type.id, post.id).await?;
        }

        self.post_repo.delete(post.id).await?;
        info!(post_id = post.id, slug = %post.slug, "Post deleted");
        Ok(())
    }

    async fn replace_tags(&self, post_id: i64, names: &[String]) -> AppResult<()> {
        let (app_label, model) = POST_CONTENT_TYPE;
        let content_type = self
            .content_type_repo
            .get_or_create(app_label, model)
            .await?;

        self.tag_repo.clear(content_type.id, post_id).await?;

        let mut attached = Vec::new();
        for name in names {
            let name = name.trim();
            let slug = slugify(name);
            if slug.is_empty() || attached.contains(&slug) {
                continue;
            }
            let tag = self.tag_repo.get_or_create(name, &slug).await?;
            self.tag_repo.attach(tag.id, content_type.id, post_id).await?;
            attached.push(slug);
        }
        Ok(())
    }
}

fn validate_slug(slug: &str) -> AppResult<()> {
    let valid = !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(AppError::Validation(format!("Invalid slug: {slug}")))
    }
}

/// URL slug of a tag name.
#[must_use]
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if (c.is_whitespace() || c == '-' || c == '_') && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_matches('-').to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{
        DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult, Transaction, Value,
    };
    use shiftedblog_db::entities::{post_series, user};
    use shiftedblog_db::repositories::{GalleryImageRepository, SeriesRepository};
    use std::sync::Arc;

    fn transaction_log(db: Arc<DatabaseConnection>) -> Vec<Transaction> {
        let Ok(db) = Arc::try_unwrap(db) else {
            panic!("connection is still shared");
        };
        db.into_transaction_log()
    }

    fn test_post(id: i64, status: post::PostStatus) -> post::Model {
        let now = Utc::now();
        post::Model {
            id,
            title: format!("Post {id}"),
            slug: format!("post-{id}"),
            uuid: Uuid::new_v4(),
            author_id: 1,
            category_id: 1,
            description: String::new(),
            body: "Hello".to_string(),
            cover_image: None,
            cover_image_credits: None,
            cover_description: None,
            status,
            published: (status == post::PostStatus::Published).then(|| now.into()),
            created: now.into(),
            updated: now.into(),
            views: 7,
        }
    }

    fn count_row(n: i64) -> std::collections::BTreeMap<&'static str, Value> {
        maplit::btreemap! { "num_items" => Value::BigInt(Some(n)) }
    }

    fn service(db: MockDatabase) -> (PostService, Arc<DatabaseConnection>) {
        let db = Arc::new(db.into_connection());
        let post_repo = PostRepository::new(db.clone());
        let service = PostService::new(
            post_repo.clone(),
            CategoryRepository::new(db.clone()),
            TagRepository::new(db.clone()),
            ContentTypeRepository::new(db.clone()),
            UserRepository::new(db.clone()),
            SeriesService::new(SeriesRepository::new(db.clone()), post_repo.clone()),
            GalleryService::new(GalleryImageRepository::new(db.clone()), post_repo),
        );
        (service, db)
    }

    #[tokio::test]
    async fn test_unknown_tag_is_not_found() {
        let (service, _) = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<tag::Model>::new()]),
        );

        let result = service
            .list_published(ListFilter::Tag("nope".to_string()), PageRequest::Invalid)
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_empty_category_has_no_page() {
        let (service, _) = service(
            MockDatabase::new(DatabaseBackend::Postgres).append_query_results([[count_row(0)]]),
        );

        let listing = service
            .list_published(ListFilter::Category("Empty".to_string()), PageRequest::Invalid)
            .await
            .unwrap();
        assert!(listing.page.is_none());
    }

    #[tokio::test]
    async fn test_out_of_range_page_shows_last() {
        let (service, db) = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[count_row(13)]])
                .append_query_results([[test_post(1, post::PostStatus::Published)]]),
        );

        let listing = service
            .list_published(ListFilter::All, PageRequest::Number(99))
            .await
            .unwrap();
        let page = listing.page.unwrap();
        assert_eq!(page.number, 2);
        assert_eq!(page.num_pages, 2);
        assert!(!page.has_next);

        drop(service);
        let log = format!("{:?}", transaction_log(db));
        assert!(log.contains("OFFSET"));
    }

    #[tokio::test]
    async fn test_detail_of_unpublished_slug_is_not_found() {
        let (service, _) = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<post::Model>::new()]),
        );

        let result = service.detail_by_slug("draft").await;
        assert!(matches!(result, Err(AppError::PostNotFound(_))));
    }

    #[tokio::test]
    async fn test_detail_fills_related_posts() {
        let (service, _) = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                // post
                .append_query_results([[test_post(1, post::PostStatus::Published)]])
                // similar
                .append_query_results([[
                    test_post(2, post::PostStatus::Published),
                    test_post(3, post::PostStatus::Published),
                ]])
                // newest
                .append_query_results([[
                    test_post(4, post::PostStatus::Published),
                    test_post(5, post::PostStatus::Published),
                    test_post(6, post::PostStatus::Published),
                ]])
                // tags
                .append_query_results([Vec::<tag::Model>::new()])
                // series placement
                .append_query_results([Vec::<post_series::Model>::new()])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }]),
        );

        let detail = service.detail_by_slug("post-1").await.unwrap();
        assert_eq!(detail.post.views, 8);
        assert_eq!(detail.similar_posts.len(), 2);
        assert_eq!(detail.newest_posts.len(), 3);
        assert!(detail.navigation.is_none());
        assert_eq!(
            detail.segments,
            vec![BodySegment::Html {
                content: "Hello".to_string()
            }]
        );
    }

    #[tokio::test]
    async fn test_create_rejects_taken_slug() {
        let (service, _) = service(
            MockDatabase::new(DatabaseBackend::Postgres).append_query_results([[count_row(1)]]),
        );

        let result = service
            .create(CreatePostInput {
                title: "Hello".to_string(),
                slug: "hello".to_string(),
                author_id: 1,
                category_id: 1,
                description: String::new(),
                body: String::new(),
                cover_image: None,
                cover_image_credits: None,
                cover_description: None,
                status: post::PostStatus::Draft,
                tags: vec![],
            })
            .await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_create_rejects_inactive_author() {
        let (service, _) = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[count_row(0)]])
                .append_query_results([[user::Model {
                    id: 1,
                    username: "gone".to_string(),
                    display_name: None,
                    email: String::new(),
                    is_active: false,
                    is_staff: false,
                    date_joined: Utc::now().into(),
                }]]),
        );

        let result = service
            .create(CreatePostInput {
                title: "Hello".to_string(),
                slug: "hello".to_string(),
                author_id: 1,
                category_id: 1,
                description: String::new(),
                body: String::new(),
                cover_image: None,
                cover_image_credits: None,
                cover_description: None,
                status: post::PostStatus::Draft,
                tags: vec![],
            })
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_publishing_sets_date_once() {
        let draft = test_post(1, post::PostStatus::ReadyToPublish);
        let mut published = draft.clone();
        published.status = post::PostStatus::Published;
        published.published = Some(Utc::now().into());

        let (service, db) = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[draft]])
                .append_query_results([[published]]),
        );

        let post = service
            .update(
                1,
                UpdatePostInput {
                    status: Some(post::PostStatus::Published),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(post.published.is_some());

        drop(service);
        let log = format!("{:?}", transaction_log(db));
        assert!(log.contains("\\\"published\\\" = "));
    }

    #[tokio::test]
    async fn test_republishing_keeps_date() {
        let current = test_post(1, post::PostStatus::Published);

        let (service, db) = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[current.clone()]])
                .append_query_results([[current]]),
        );

        service
            .update(
                1,
                UpdatePostInput {
                    status: Some(post::PostStatus::Published),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        drop(service);
        let log = format!("{:?}", transaction_log(db));
        assert!(!log.contains("\\\"published\\\" = "));
    }

    #[tokio::test]
    async fn test_create_duplicate_category() {
        let (service, _) = service(
            MockDatabase::new(DatabaseBackend::Postgres).append_query_results([[
                category::Model {
                    id: 1,
                    name: "Rust".to_string(),
                },
            ]]),
        );

        let result = service
            .create_category(CreateCategoryInput {
                name: " Rust ".to_string(),
            })
            .await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Rust Programming"), "rust-programming");
        assert_eq!(slugify("  C++ / Rust  "), "c-rust");
        assert_eq!(slugify("日本語"), "");
    }

    #[test]
    fn test_validate_slug() {
        assert!(validate_slug("hello-world_2").is_ok());
        assert!(validate_slug("hello world").is_err());
        assert!(validate_slug("").is_err());
    }
}
