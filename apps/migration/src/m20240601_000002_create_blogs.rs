use sea_orm_migration::{prelude::*, schema::*};

use crate::m20240601_000001_create_users::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Blogs::Table)
                    .if_not_exists()
                    .col(uuid(Blogs::Id).primary_key())
                    .col(uuid(Blogs::AuthorId))
                    .col(string_len(Blogs::Title, 150))
                    .col(text(Blogs::Content))
                    .col(string(Blogs::Category))
                    .col(json_binary(Blogs::Tags).default(Expr::cust("'[]'::jsonb")))
                    .col(string_null(Blogs::CoverImage))
                    .col(json_binary(Blogs::LikedBy).default(Expr::cust("'[]'::jsonb")))
                    .col(big_integer(Blogs::Likes).default(0))
                    .col(big_integer(Blogs::Views).default(0))
                    .col(json_binary(Blogs::Comments).default(Expr::cust("'[]'::jsonb")))
                    .col(timestamp_with_time_zone(Blogs::CreatedAt))
                    .col(timestamp_with_time_zone(Blogs::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_blogs_author")
                            .from(Blogs::Table, Blogs::AuthorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_blogs_created_at")
                    .table(Blogs::Table)
                    .col(Blogs::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_blogs_category")
                    .table(Blogs::Table)
                    .col(Blogs::Category)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Blogs::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Blogs {
    Table,
    Id,
    AuthorId,
    Title,
    Content,
    Category,
    Tags,
    CoverImage,
    LikedBy,
    Likes,
    Views,
    Comments,
    CreatedAt,
    UpdatedAt,
}
