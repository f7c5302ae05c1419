//! Business logic services.

#![allow(missing_docs)]

pub mod gallery;
pub mod media;
pub mod pagination;
pub mod post;
pub mod search;
pub mod series;
pub mod sitemap;
pub mod team;

pub use gallery::{AddGalleryImageInput, BodySegment, GalleryService, resolve_body_segments};
pub use media::{MediaService, UploadedImage};
pub use pagination::{PAGE_SIZE, Page, PageRequest};
pub use post::{
    CreateCategoryInput, CreatePostInput, ListFilter, PostDetail, PostListing, PostService,
    UpdatePostInput,
};
pub use search::{SearchResults, SearchService};
pub use series::{
    CreateSeriesInput, PlacePostInput, SeriesNavigation, SeriesService, SetPositionInput,
};
pub use sitemap::{SitemapService, render_robots};
pub use team::{AboutPage, AccountGroup, TeamService};
