//! Sitemap and robots.txt.

use quick_xml::se::to_string;
use serde::Serialize;
use shiftedblog_common::{AppError, AppResult};
use shiftedblog_db::entities::post;
use shiftedblog_db::repositories::PostRepository;

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;
const SITEMAP_NAMESPACE: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

#[derive(Serialize)]
#[serde(rename = "urlset")]
struct UrlSet {
    #[serde(rename = "@xmlns")]
    xmlns: &'static str,
    #[serde(rename = "url")]
    urls: Vec<UrlEntry>,
}

#[derive(Serialize)]
struct UrlEntry {
    loc: String,
    lastmod: String,
    changefreq: &'static str,
    priority: &'static str,
}

/// Public URL of a post page.
#[must_use]
pub fn post_url(site_url: &str, slug: &str) -> String {
    format!(
        "{}/{}/",
        site_url.trim_end_matches('/'),
        urlencoding::encode(slug)
    )
}

/// Render a sitemap for posts.
pub fn render_sitemap(site_url: &str, posts: &[post::Model]) -> AppResult<String> {
    let urlset = UrlSet {
        xmlns: SITEMAP_NAMESPACE,
        urls: posts
            .iter()
            .map(|post| UrlEntry {
                loc: post_url(site_url, &post.slug),
                lastmod: post.updated.format("%Y-%m-%d").to_string(),
                changefreq: "weekly",
                priority: "0.9",
            })
            .collect(),
    };

    let xml = to_string(&urlset).map_err(|e| AppError::Internal(format!("sitemap: {e}")))?;
    Ok(format!("{XML_DECLARATION}\n{xml}\n"))
}

/// Render robots.txt. Keeps crawlers out of the editor, accounts and drafts.
#[must_use]
pub fn render_robots(site_url: &str, admin_url: &str) -> String {
    format!(
        "User-agent: *\n\
         Allow: /\n\
         Disallow: /{}/\n\
         Disallow: /account/\n\
         Disallow: /drafts/\n\
         \n\
         Sitemap: {}/sitemap.xml\n",
        admin_url.trim_matches('/'),
        site_url.trim_end_matches('/'),
    )
}

/// Service for crawler-facing documents.
#[derive(Clone)]
pub struct SitemapService {
    post_repo: PostRepository,
}

impl SitemapService {
    /// Create a new sitemap service.
    #[must_use]
    pub const fn new(post_repo: PostRepository) -> Self {
        Self { post_repo }
    }

    /// Sitemap of every published post.
    pub async fn sitemap(&self, site_url: &str) -> AppResult<String> {
        let posts = self.post_repo.find_all_published().await?;
        render_sitemap(site_url, &posts)
    }
}
