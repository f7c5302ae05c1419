//! Create the content type registry.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ContentType::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ContentType::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ContentType::AppLabel).string_len(100).not_null())
                    .col(ColumnDef::new(ContentType::Model).string_len(100).not_null())
                    .to_owned(),
            )
            .await?;

        // Unique: (app_label, model)
        manager
            .create_index(
                Index::create()
                    .name("idx_content_type_app_label_model")
                    .table(ContentType::Table)
                    .col(ContentType::AppLabel)
                    .col(ContentType::Model)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ContentType::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ContentType {
    Table,
    Id,
    AppLabel,
    Model,
}
