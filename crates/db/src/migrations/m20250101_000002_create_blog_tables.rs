//! Create the original `blog_*` tables, tagging and the tables that
//! reference users from outside the blog.
//!
//! Ids are identity columns so that a structural clone gets its own
//! sequence.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Models registered under the `blog` app label.
const BLOG_MODELS: &[&str] = &[
    "user",
    "category",
    "series",
    "post",
    "postseries",
    "person",
    "accountgroup",
    "account",
    "skillgroup",
    "skill",
];

fn id<T: IntoIden>(name: T) -> ColumnDef {
    ColumnDef::new(name)
        .big_integer()
        .not_null()
        .extra("GENERATED BY DEFAULT AS IDENTITY")
        .primary_key()
        .to_owned()
}

fn created_now<T: IntoIden>(name: T) -> ColumnDef {
    ColumnDef::new(name)
        .timestamp_with_time_zone()
        .not_null()
        .default(Expr::current_timestamp())
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(BlogUser::Table)
                    .if_not_exists()
                    .col(id(BlogUser::Id))
                    .col(ColumnDef::new(BlogUser::Username).string_len(150).not_null().unique_key())
                    .col(ColumnDef::new(BlogUser::DisplayName).string_len(150))
                    .col(ColumnDef::new(BlogUser::Email).string_len(254).not_null().default(""))
                    .col(ColumnDef::new(BlogUser::IsActive).boolean().not_null().default(true))
                    .col(ColumnDef::new(BlogUser::IsStaff).boolean().not_null().default(false))
                    .col(created_now(BlogUser::DateJoined))
                    .to_owned(),
            )
            .await?;

        for table in [BlogCategory::Table, BlogCategory::SeriesTable] {
            manager
                .create_table(
                    Table::create()
                        .table(table)
                        .if_not_exists()
                        .col(id(BlogCategory::Id))
                        .col(ColumnDef::new(BlogCategory::Name).string_len(255).not_null())
                        .to_owned(),
                )
                .await?;
        }

        manager
            .create_table(
                Table::create()
                    .table(BlogPost::Table)
                    .if_not_exists()
                    .col(id(BlogPost::Id))
                    .col(ColumnDef::new(BlogPost::Title).string_len(255).not_null())
                    .col(ColumnDef::new(BlogPost::Slug).string_len(255).not_null().unique_key())
                    .col(ColumnDef::new(BlogPost::AuthorId).big_integer().not_null())
                    .col(ColumnDef::new(BlogPost::CategoryId).big_integer().not_null())
                    .col(ColumnDef::new(BlogPost::Description).string_len(500).not_null().default(""))
                    .col(ColumnDef::new(BlogPost::Body).text().not_null().default(""))
                    .col(ColumnDef::new(BlogPost::CoverImage).string_len(255))
                    .col(ColumnDef::new(BlogPost::CoverImageCredits).string_len(255))
                    .col(ColumnDef::new(BlogPost::CoverDescription).string_len(255))
                    .col(ColumnDef::new(BlogPost::Status).string_len(32).not_null().default("draft"))
                    .col(ColumnDef::new(BlogPost::Published).timestamp_with_time_zone())
                    .col(created_now(BlogPost::Created))
                    .col(created_now(BlogPost::Updated))
                    .col(ColumnDef::new(BlogPost::Views).big_integer().not_null().default(0))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_blog_post_author")
                            .from(BlogPost::Table, BlogPost::AuthorId)
                            .to(BlogUser::Table, BlogUser::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_blog_post_category")
                            .from(BlogPost::Table, BlogPost::CategoryId)
                            .to(BlogCategory::Table, BlogCategory::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: (status, published) for the public listing
        manager
            .create_index(
                Index::create()
                    .name("idx_blog_post_status_published")
                    .table(BlogPost::Table)
                    .col(BlogPost::Status)
                    .col(BlogPost::Published)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(BlogPostSeries::Table)
                    .if_not_exists()
                    .col(id(BlogPostSeries::Id))
                    .col(ColumnDef::new(BlogPostSeries::PostId).big_integer().not_null())
                    .col(ColumnDef::new(BlogPostSeries::SeriesId).big_integer().not_null())
                    .col(ColumnDef::new(BlogPostSeries::OrderPosition).integer())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_blog_postseries_post")
                            .from(BlogPostSeries::Table, BlogPostSeries::PostId)
                            .to(BlogPost::Table, BlogPost::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_blog_postseries_series")
                            .from(BlogPostSeries::Table, BlogPostSeries::SeriesId)
                            .to(BlogCategory::SeriesTable, BlogCategory::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique: one post per position within a series
        manager
            .create_index(
                Index::create()
                    .name("idx_blog_postseries_series_position")
                    .table(BlogPostSeries::Table)
                    .col(BlogPostSeries::SeriesId)
                    .col(BlogPostSeries::OrderPosition)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_blog_postseries_post_id")
                    .table(BlogPostSeries::Table)
                    .col(BlogPostSeries::PostId)
                    .to_owned(),
            )
            .await?;

        self.create_team_tables(manager).await?;
        self.create_tagging_tables(manager).await?;
        self.create_user_reference_tables(manager).await?;

        let mut insert = Query::insert()
            .into_table(ContentType::Table)
            .columns([ContentType::AppLabel, ContentType::Model])
            .to_owned();
        let rows = BLOG_MODELS
            .iter()
            .map(|model| ("blog", *model))
            .chain([("tagging", "tag"), ("tagging", "taggeditem")]);
        for (app_label, model) in rows {
            insert
                .values([app_label.into(), model.into()])
                .map_err(|e| DbErr::Migration(e.to_string()))?;
        }
        manager.exec_stmt(insert).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for table in [
            "otp_device",
            "admin_log",
            "tagged_item",
            "tag",
            "blog_skill",
            "blog_skillgroup",
            "blog_account",
            "blog_accountgroup",
            "blog_person",
            "blog_postseries",
            "blog_post",
            "blog_series",
            "blog_category",
            "blog_user",
        ] {
            manager
                .drop_table(Table::drop().table(Alias::new(table)).if_exists().to_owned())
                .await?;
        }

        manager
            .exec_stmt(
                Query::delete()
                    .from_table(ContentType::Table)
                    .and_where(Expr::col(ContentType::AppLabel).is_in(["blog", "tagging"]))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}

impl Migration {
    async fn create_team_tables(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(BlogPerson::Table)
                    .if_not_exists()
                    .col(id(BlogPerson::Id))
                    .col(ColumnDef::new(BlogPerson::Name).string_len(255).not_null())
                    .col(ColumnDef::new(BlogPerson::Avatar).string_len(255))
                    .col(ColumnDef::new(BlogPerson::Greeting).string_len(255).not_null().default(""))
                    .col(ColumnDef::new(BlogPerson::Biography).text().not_null().default(""))
                    .to_owned(),
            )
            .await?;

        for table in [BlogPerson::AccountGroupTable, BlogPerson::SkillGroupTable] {
            manager
                .create_table(
                    Table::create()
                        .table(table)
                        .if_not_exists()
                        .col(id(BlogPerson::Id))
                        .col(ColumnDef::new(BlogPerson::Name).string_len(255).not_null())
                        .to_owned(),
                )
                .await?;
        }

        manager
            .create_table(
                Table::create()
                    .table(BlogAccount::Table)
                    .if_not_exists()
                    .col(id(BlogAccount::Id))
                    .col(ColumnDef::new(BlogAccount::Name).string_len(255).not_null())
                    .col(ColumnDef::new(BlogAccount::Url).string_len(500).not_null())
                    .col(ColumnDef::new(BlogAccount::Icon).string_len(100).not_null().default(""))
                    .col(ColumnDef::new(BlogAccount::GroupId).big_integer())
                    .col(ColumnDef::new(BlogAccount::PersonId).big_integer())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_blog_account_group")
                            .from(BlogAccount::Table, BlogAccount::GroupId)
                            .to(BlogPerson::AccountGroupTable, BlogPerson::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_blog_account_person")
                            .from(BlogAccount::Table, BlogAccount::PersonId)
                            .to(BlogPerson::Table, BlogPerson::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(BlogSkill::Table)
                    .if_not_exists()
                    .col(id(BlogSkill::Id))
                    .col(ColumnDef::new(BlogSkill::Name).string_len(255).not_null())
                    .col(ColumnDef::new(BlogSkill::Rating).integer().not_null().default(0))
                    .col(ColumnDef::new(BlogSkill::PersonId).big_integer())
                    .col(ColumnDef::new(BlogSkill::GroupId).big_integer())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_blog_skill_person")
                            .from(BlogSkill::Table, BlogSkill::PersonId)
                            .to(BlogPerson::Table, BlogPerson::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_blog_skill_group")
                            .from(BlogSkill::Table, BlogSkill::GroupId)
                            .to(BlogPerson::SkillGroupTable, BlogPerson::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn create_tagging_tables(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Tag::Table)
                    .if_not_exists()
                    .col(id(Tag::Id))
                    .col(ColumnDef::new(Tag::Name).string_len(100).not_null())
                    .col(ColumnDef::new(Tag::Slug).string_len(100).not_null().unique_key())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TaggedItem::Table)
                    .if_not_exists()
                    .col(id(TaggedItem::Id))
                    .col(ColumnDef::new(TaggedItem::TagId).big_integer().not_null())
                    .col(ColumnDef::new(TaggedItem::ContentTypeId).integer().not_null())
                    .col(ColumnDef::new(TaggedItem::ObjectId).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tagged_item_tag")
                            .from(TaggedItem::Table, TaggedItem::TagId)
                            .to(Tag::Table, Tag::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tagged_item_content_type")
                            .from(TaggedItem::Table, TaggedItem::ContentTypeId)
                            .to(ContentType::Table, ContentType::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: (content_type_id, object_id) for tags of one object
        manager
            .create_index(
                Index::create()
                    .name("idx_tagged_item_object")
                    .table(TaggedItem::Table)
                    .col(TaggedItem::ContentTypeId)
                    .col(TaggedItem::ObjectId)
                    .to_owned(),
            )
            .await?;

        // Unique: a tag is attached to an object once
        manager
            .create_index(
                Index::create()
                    .name("idx_tagged_item_unique")
                    .table(TaggedItem::Table)
                    .col(TaggedItem::TagId)
                    .col(TaggedItem::ContentTypeId)
                    .col(TaggedItem::ObjectId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn create_user_reference_tables(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AdminLog::Table)
                    .if_not_exists()
                    .col(id(AdminLog::Id))
                    .col(created_now(AdminLog::ActionTime))
                    .col(ColumnDef::new(AdminLog::UserId).big_integer().not_null())
                    .col(ColumnDef::new(AdminLog::ContentTypeId).integer())
                    .col(ColumnDef::new(AdminLog::ObjectId).text())
                    .col(ColumnDef::new(AdminLog::ObjectRepr).string_len(200).not_null())
                    .col(ColumnDef::new(AdminLog::ActionFlag).small_integer().not_null())
                    .col(ColumnDef::new(AdminLog::ChangeMessage).text().not_null().default(""))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_admin_log_user")
                            .from(AdminLog::Table, AdminLog::UserId)
                            .to(BlogUser::Table, BlogUser::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_admin_log_content_type")
                            .from(AdminLog::Table, AdminLog::ContentTypeId)
                            .to(ContentType::Table, ContentType::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(OtpDevice::Table)
                    .if_not_exists()
                    .col(id(OtpDevice::Id))
                    .col(ColumnDef::new(OtpDevice::UserId).big_integer().not_null())
                    .col(ColumnDef::new(OtpDevice::Name).string_len(64).not_null())
                    .col(ColumnDef::new(OtpDevice::Confirmed).boolean().not_null().default(true))
                    .col(ColumnDef::new(OtpDevice::Key).string_len(80).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_otp_device_user")
                            .from(OtpDevice::Table, OtpDevice::UserId)
                            .to(BlogUser::Table, BlogUser::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}

#[derive(Iden)]
enum ContentType {
    Table,
    Id,
    AppLabel,
    Model,
}

#[derive(Iden)]
enum BlogUser {
    Table,
    Id,
    Username,
    DisplayName,
    Email,
    IsActive,
    IsStaff,
    DateJoined,
}

#[derive(Iden)]
enum BlogCategory {
    Table,
    #[iden = "blog_series"]
    SeriesTable,
    Id,
    Name,
}

#[derive(Iden)]
enum BlogPost {
    Table,
    Id,
    Title,
    Slug,
    AuthorId,
    CategoryId,
    Description,
    Body,
    CoverImage,
    CoverImageCredits,
    CoverDescription,
    Status,
    Published,
    Created,
    Updated,
    Views,
}

#[derive(Iden)]
enum BlogPostSeries {
    #[iden = "blog_postseries"]
    Table,
    Id,
    PostId,
    SeriesId,
    OrderPosition,
}

#[derive(Iden)]
enum BlogPerson {
    Table,
    #[iden = "blog_accountgroup"]
    AccountGroupTable,
    #[iden = "blog_skillgroup"]
    SkillGroupTable,
    Id,
    Name,
    Avatar,
    Greeting,
    Biography,
}

#[derive(Iden)]
enum BlogAccount {
    Table,
    Id,
    Name,
    Url,
    Icon,
    GroupId,
    PersonId,
}

#[derive(Iden)]
enum BlogSkill {
    Table,
    Id,
    Name,
    Rating,
    PersonId,
    GroupId,
}

#[derive(Iden)]
enum Tag {
    Table,
    Id,
    Name,
    Slug,
}

#[derive(Iden)]
enum TaggedItem {
    Table,
    Id,
    TagId,
    ContentTypeId,
    ObjectId,
}

#[derive(Iden)]
enum AdminLog {
    Table,
    Id,
    ActionTime,
    UserId,
    ContentTypeId,
    ObjectId,
    ObjectRepr,
    ActionFlag,
    ChangeMessage,
}

#[derive(Iden)]
enum OtpDevice {
    Table,
    Id,
    UserId,
    Name,
    Confirmed,
    Key,
}
