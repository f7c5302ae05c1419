//! Full-text post search.

use serde::Serialize;
use shiftedblog_common::AppResult;
use shiftedblog_db::entities::post;
use shiftedblog_db::repositories::PostRepository;
use tracing::debug;

use super::pagination::{Page, PageRequest, PAGE_SIZE, num_pages};

/// Longest query that is searched for; longer ones are cut.
pub const MAX_QUERY_CHARS: usize = 200;

/// Search results page.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResults {
    /// The query that was searched for, after trimming. `None` when blank.
    pub query: Option<String>,
    pub page: Option<Page<post::Model>>,
}

/// Normalize a raw search query. Blank queries are `None`.
#[must_use]
pub fn normalize_query(raw: Option<&str>) -> Option<String> {
    let trimmed = raw?.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.chars().take(MAX_QUERY_CHARS).collect())
}

/// Service for searching posts.
#[derive(Clone)]
pub struct SearchService {
    post_repo: PostRepository,
}

impl SearchService {
    /// Create a new search service.
    #[must_use]
    pub const fn new(post_repo: PostRepository) -> Self {
        Self { post_repo }
    }

    /// Search published posts by title and body, title weighted higher.
    pub async fn search(&self, raw: Option<&str>, page: PageRequest) -> AppResult<SearchResults> {
        let Some(query) = normalize_query(raw) else {
            return Ok(SearchResults {
                query: None,
                page: None,
            });
        };

        let total = self.post_repo.count_search(&query).await?;
        let pages = num_pages(total, PAGE_SIZE);
        let number = page.resolve(pages);
        let items = self
            .post_repo
            .search(&query, PAGE_SIZE, Page::<post::Model>::offset(number))
            .await?;

        debug!(query = %query, total, page = number, "Search");

        Ok(SearchResults {
            query: Some(query),
            page: Some(Page::new(items, number, pages, total)),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, Transaction, Value};
    use std::sync::Arc;

    fn transaction_log(db: Arc<DatabaseConnection>) -> Vec<Transaction> {
        let Ok(db) = Arc::try_unwrap(db) else {
            panic!("connection is still shared");
        };
        db.into_transaction_log()
    }

    #[test]
    fn test_normalize_query() {
        assert_eq!(normalize_query(None), None);
        assert_eq!(normalize_query(Some("   ")), None);
        assert_eq!(normalize_query(Some("  rust  ")), Some("rust".to_string()));
    }

    #[test]
    fn test_long_query_is_cut_by_chars() {
        let raw = "ä".repeat(250);
        let query = normalize_query(Some(&raw)).unwrap();
        assert_eq!(query.chars().count(), MAX_QUERY_CHARS);
    }

    #[tokio::test]
    async fn test_blank_query_does_not_hit_database() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let service = SearchService::new(PostRepository::new(db));

        let results = service.search(Some(" "), PageRequest::Invalid).await.unwrap();
        assert!(results.query.is_none());
        assert!(results.page.is_none());
    }

    #[tokio::test]
    async fn test_search_without_hits() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[maplit::btreemap! {
                    "num_items" => Value::BigInt(Some(0)),
                }]])
                .append_query_results([Vec::<post::Model>::new()])
                .into_connection(),
        );
        let service = SearchService::new(PostRepository::new(db.clone()));

        let results = service
            .search(Some("nothing"), PageRequest::Number(3))
            .await
            .unwrap();
        let page = results.page.unwrap();
        assert_eq!(page.number, 1);
        assert!(page.items.is_empty());

        drop(service);
        let log = format!("{:?}", transaction_log(db));
        assert!(log.contains("plainto_tsquery"));
    }
}
