//! Database entities.

#![allow(missing_docs)]

pub mod account;
pub mod account_group;
pub mod category;
pub mod content_type;
pub mod person;
pub mod post;
pub mod post_gallery_image;
pub mod post_series;
pub mod series;
pub mod skill;
pub mod skill_group;
pub mod tag;
pub mod tagged_item;
pub mod user;

pub use account::Entity as Account;
pub use account_group::Entity as AccountGroup;
pub use category::Entity as Category;
pub use content_type::Entity as ContentType;
pub use person::Entity as Person;
pub use post::Entity as Post;
pub use post_gallery_image::Entity as PostGalleryImage;
pub use post_series::Entity as PostSeries;
pub use series::Entity as Series;
pub use skill::Entity as Skill;
pub use skill_group::Entity as SkillGroup;
pub use tag::Entity as Tag;
pub use tagged_item::Entity as TaggedItem;
pub use user::Entity as User;
