//! Create the post gallery image table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(EditorPostGalleryImage::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EditorPostGalleryImage::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(EditorPostGalleryImage::PostId).big_integer().not_null())
                    .col(ColumnDef::new(EditorPostGalleryImage::Image).string_len(255).not_null())
                    .col(
                        ColumnDef::new(EditorPostGalleryImage::Caption)
                            .string_len(255)
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(EditorPostGalleryImage::Order)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(EditorPostGalleryImage::GalleryKey)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_editor_postgalleryimage_post")
                            .from(EditorPostGalleryImage::Table, EditorPostGalleryImage::PostId)
                            .to(EditorPost::Table, EditorPost::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: (post_id, gallery_key, order) matches the render ordering
        manager
            .create_index(
                Index::create()
                    .name("idx_editor_postgalleryimage_post_key_order")
                    .table(EditorPostGalleryImage::Table)
                    .col(EditorPostGalleryImage::PostId)
                    .col(EditorPostGalleryImage::GalleryKey)
                    .col(EditorPostGalleryImage::Order)
                    .to_owned(),
            )
            .await?;

        let mut insert = Query::insert()
            .into_table(ContentType::Table)
            .columns([ContentType::AppLabel, ContentType::Model])
            .to_owned();
        insert
            .values(["editor".into(), "postgalleryimage".into()])
            .map_err(|e| DbErr::Migration(e.to_string()))?;
        manager.exec_stmt(insert).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .exec_stmt(
                Query::delete()
                    .from_table(ContentType::Table)
                    .and_where(Expr::col(ContentType::AppLabel).eq("editor"))
                    .and_where(Expr::col(ContentType::Model).eq("postgalleryimage"))
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(EditorPostGalleryImage::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum EditorPostGalleryImage {
    #[iden = "editor_postgalleryimage"]
    Table,
    Id,
    PostId,
    Image,
    Caption,
    Order,
    GalleryKey,
}

#[derive(Iden)]
enum EditorPost {
    Table,
    Id,
}

#[derive(Iden)]
enum ContentType {
    Table,
    AppLabel,
    Model,
}
