//! Repositories.

pub mod category;
pub mod content_type;
pub mod gallery_image;
pub mod post;
pub mod series;
pub mod tag;
pub mod team;
pub mod user;

pub use category::CategoryRepository;
pub use content_type::ContentTypeRepository;
pub use gallery_image::{GalleryImageRepository, NewGalleryImage};
pub use post::{NewPost, PostFilter, PostRepository};
pub use series::{Adjacent, SeriesRepository};
pub use tag::TagRepository;
pub use team::TeamRepository;
pub use user::UserRepository;
