//! Create story table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Story::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Story::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Story::UserId).string_len(32).not_null())
                    .col(ColumnDef::new(Story::ImageUrl).string_len(1024).not_null())
                    .col(
                        ColumnDef::new(Story::ExpiresAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Story::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_story_user")
                            .from(Story::Table, Story::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: user_id - at most one story per user
        manager
            .create_index(
                Index::create()
                    .name("idx_story_user_id")
                    .table(Story::Table)
                    .col(Story::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: expires_at (expiry is filtered at read time)
        manager
            .create_index(
                Index::create()
                    .name("idx_story_expires_at")
                    .table(Story::Table)
                    .col(Story::ExpiresAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Story::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Story {
    Table,
    Id,
    UserId,
    ImageUrl,
    ExpiresAt,
    CreatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
