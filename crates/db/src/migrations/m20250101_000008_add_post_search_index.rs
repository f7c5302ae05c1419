//! Add the weighted full-text search index for posts.
//!
//! The indexed expression must match the one used by the post search
//! query, otherwise the planner will not use it.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Title ranks above body (weights A and B)
        manager
            .get_connection()
            .execute_unprepared(
                r"
                CREATE INDEX IF NOT EXISTS idx_editor_post_search
                ON editor_post
                USING GIN (
                    (setweight(to_tsvector('english', COALESCE(title, '')), 'A') ||
                     setweight(to_tsvector('english', COALESCE(body, '')), 'B'))
                )
                WHERE status = 'published';
                ",
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP INDEX IF EXISTS idx_editor_post_search;")
            .await?;

        Ok(())
    }
}
