//! Gallery placeholders in post bodies.
//!
//! A body may contain `[gallery:N]` tokens. Rendering splits the body on
//! those tokens and replaces each one with the images of gallery `N`.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use shiftedblog_common::{AppError, AppResult};
use shiftedblog_db::entities::post_gallery_image;
use shiftedblog_db::repositories::{GalleryImageRepository, NewGalleryImage, PostRepository};
use validator::Validate;

#[allow(clippy::expect_used)]
static GALLERY_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[gallery:(\d+)\]").expect("valid gallery token regex"));

/// A piece of a rendered post body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BodySegment {
    /// Raw body content between placeholders.
    Html {
        /// Content, passed through unchanged.
        content: String,
    },
    /// A resolved `[gallery:N]` placeholder.
    Gallery {
        /// The `N` of the placeholder.
        gallery_key: i64,
        /// Images of the gallery in display order. Empty for unknown keys.
        images: Vec<post_gallery_image::Model>,
        /// Element id unique to this occurrence within the page.
        carousel_id: String,
    },
}

/// Split a post body into content and gallery segments.
///
/// `images` may be in any order; each gallery is sorted by `order`, then id.
/// Every placeholder occurrence gets its own carousel id
/// `postgallery-{post_id}-{key}-{n}`, where `n` counts placeholders from 1,
/// even when the same key appears twice. Empty content between placeholders
/// is dropped. Keys too large to store are left in the body as text.
#[must_use]
pub fn resolve_body_segments(
    post_id: i64,
    body: &str,
    images: &[post_gallery_image::Model],
) -> Vec<BodySegment> {
    let mut by_key: HashMap<i64, Vec<post_gallery_image::Model>> = HashMap::new();
    for image in images {
        by_key
            .entry(i64::from(image.gallery_key))
            .or_default()
            .push(image.clone());
    }
    for gallery in by_key.values_mut() {
        gallery.sort_by_key(|image| (image.order, image.id));
    }

    let mut segments = Vec::new();
    let mut pending = String::new();
    let mut last = 0;
    let mut occurrence = 0;

    for caps in GALLERY_TOKEN.captures_iter(body) {
        let (Some(token), Some(digits)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let Ok(gallery_key) = digits.as_str().parse::<i64>() else {
            continue;
        };

        pending.push_str(&body[last..token.start()]);
        last = token.end();
        if !pending.is_empty() {
            segments.push(BodySegment::Html {
                content: std::mem::take(&mut pending),
            });
        }

        occurrence += 1;
        segments.push(BodySegment::Gallery {
            gallery_key,
            images: by_key.get(&gallery_key).cloned().unwrap_or_default(),
            carousel_id: format!("postgallery-{post_id}-{gallery_key}-{occurrence}"),
        });
    }

    pending.push_str(&body[last..]);
    if !pending.is_empty() {
        segments.push(BodySegment::Html { content: pending });
    }

    segments
}

/// Input for adding a gallery image.
#[derive(Debug, Deserialize, Validate)]
pub struct AddGalleryImageInput {
    /// Storage key of an uploaded image.
    #[validate(length(min = 1, max = 255))]
    pub image: String,
    /// Caption under the image.
    #[validate(length(max = 255))]
    #[serde(default)]
    pub caption: String,
    /// Order within the gallery.
    #[validate(range(min = 0))]
    #[serde(default)]
    pub order: i32,
    /// Gallery the image belongs to.
    #[validate(range(min = 1))]
    #[serde(default = "default_gallery_key")]
    pub gallery_key: i32,
}

const fn default_gallery_key() -> i32 {
    1
}

/// Service for post galleries.
#[derive(Clone)]
pub struct GalleryService {
    image_repo: GalleryImageRepository,
    post_repo: PostRepository,
}

impl GalleryService {
    /// Create a new gallery service.
    #[must_use]
    pub const fn new(image_repo: GalleryImageRepository, post_repo: PostRepository) -> Self {
        Self {
            image_repo,
            post_repo,
        }
    }

    /// Images of a post, grouped and ordered for rendering.
    pub async fn images_for_post(&self, post_id: i64) -> AppResult<Vec<post_gallery_image::Model>> {
        self.image_repo.find_by_post(post_id).await
    }

    /// Body segments of a post.
    pub async fn body_segments(&self, post_id: i64, body: &str) -> AppResult<Vec<BodySegment>> {
        if !GALLERY_TOKEN.is_match(body) {
            return Ok(resolve_body_segments(post_id, body, &[]));
        }
        let images = self.image_repo.find_by_post(post_id).await?;
        Ok(resolve_body_segments(post_id, body, &images))
    }

    /// Add an image to a post gallery.
    pub async fn add_image(
        &self,
        post_id: i64,
        input: AddGalleryImageInput,
    ) -> AppResult<post_gallery_image::Model> {
        input.validate()?;
        self.post_repo.get_by_id(post_id).await?;

        self.image_repo
            .create(NewGalleryImage {
                post_id,
                image: input.image,
                caption: input.caption,
                order: input.order,
                gallery_key: input.gallery_key,
            })
            .await
    }

    /// Remove an image from a post gallery.
    pub async fn remove_image(&self, post_id: i64, image_id: i64) -> AppResult<()> {
        let image = self
            .image_repo
            .find_by_id(image_id)
            .await?
            .filter(|image| image.post_id == post_id)
            .ok_or_else(|| AppError::NotFound(format!("Gallery image not found: {image_id}")))?;

        self.image_repo.delete(image.id).await
    }
}
