//! Add the secret preview uuid to posts.
//!
//! Existing rows get a random value from the column default, so the column
//! can be created `NOT NULL` in one statement.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(EditorPost::Table)
                    .add_column(
                        ColumnDef::new(EditorPost::Uuid)
                            .uuid()
                            .not_null()
                            .default(Expr::cust("gen_random_uuid()")),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_editor_post_uuid")
                    .table(EditorPost::Table)
                    .col(EditorPost::Uuid)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(EditorPost::Table)
                    .drop_column(EditorPost::Uuid)
                    .to_owned(),
            )
            .await
    }
}

#[derive(Iden)]
enum EditorPost {
    Table,
    Uuid,
}
