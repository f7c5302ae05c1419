//! Move users from `blog_user` to `core_user`.

use sea_orm_migration::prelude::*;

use crate::relocation::{TableRelocation, relocate};

#[derive(DeriveMigrationName)]
pub struct Migration;

fn relocation() -> TableRelocation {
    TableRelocation::new()
        .content_types("blog", "core", &["user"])
        .move_table("blog_user", "core_user")
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
