//! Move the about page tables from `blog_*` to `team_*`.

use sea_orm_migration::prelude::*;

use crate::relocation::{OnDelete, TableRelocation, relocate};

#[derive(DeriveMigrationName)]
pub struct Migration;

fn relocation() -> TableRelocation {
    TableRelocation::new()
        .content_types(
            "blog",
            "team",
            &["person", "accountgroup", "account", "skillgroup", "skill"],
        )
        .move_table("blog_person", "team_person")
        .move_table("blog_accountgroup", "team_accountgroup")
        .move_table("blog_account", "team_account")
        .move_table("blog_skillgroup", "team_skillgroup")
        .move_table("blog_skill", "team_skill")
        .foreign_key("team_account", "group_id", "team_accountgroup", OnDelete::SetNull)
        .foreign_key("team_account", "person_id", "team_person", OnDelete::Cascade)
        .foreign_key("team_skill", "person_id", "team_person", OnDelete::Cascade)
        .foreign_key("team_skill", "group_id", "team_skillgroup", OnDelete::SetNull)
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
