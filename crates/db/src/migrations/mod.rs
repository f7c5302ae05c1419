//! Database migrations.
//!
//! The blog started with every table under the `blog_` prefix. Later steps
//! relocate tables into the `core`, `editor` and `team` namespaces.

#![allow(missing_docs)]

use sea_orm_migration::prelude::*;

mod m20250101_000001_create_content_type_table;
mod m20250101_000002_create_blog_tables;
mod m20250101_000003_move_user_to_core;
mod m20250101_000004_move_posts_to_editor;
mod m20250101_000005_move_team_to_team;
mod m20250101_000006_create_post_gallery_image_table;
mod m20250101_000007_add_post_uuid;
mod m20250101_000008_add_post_search_index;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_content_type_table::Migration),
            Box::new(m20250101_000002_create_blog_tables::Migration),
            Box::new(m20250101_000003_move_user_to_core::Migration),
            Box::new(m20250101_000004_move_posts_to_editor::Migration),
            Box::new(m20250101_000005_move_team_to_team::Migration),
            Box::new(m20250101_000006_create_post_gallery_image_table::Migration),
            Box::new(m20250101_000007_add_post_uuid::Migration),
            Box::new(m20250101_000008_add_post_search_index::Migration),
        ]
    }
}
