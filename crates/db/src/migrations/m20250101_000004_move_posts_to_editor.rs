//! Move categories, series and posts from `blog_*` to `editor_*`.

use sea_orm_migration::prelude::*;

use crate::relocation::{OnDelete, TableRelocation, relocate};

#[derive(DeriveMigrationName)]
pub struct Migration;

fn relocation() -> TableRelocation {
    TableRelocation::new()
        .content_types("blog", "editor", &["category", "series", "post", "postseries"])
        .move_table("blog_category", "editor_category")
        .move_table("blog_series", "editor_series")
        .move_table("blog_post", "editor_post")
        .move_table("blog_postseries", "editor_postseries")
        .foreign_key("editor_post", "author_id", "core_user", OnDelete::Restrict)
        .foreign_key("editor_post", "category_id", "editor_category", OnDelete::Cascade)
        .foreign_key("editor_postseries", "post_id", "editor_post", OnDelete::Cascade)
        .foreign_key("editor_postseries", "series_id", "editor_series", OnDelete::Cascade)
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        relocate(manager, relocation()).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        relocate(manager, relocation().reversed()).await
    }
}
