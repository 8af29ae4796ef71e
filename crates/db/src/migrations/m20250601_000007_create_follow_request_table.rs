//! Create follow request table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(FollowRequest::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FollowRequest::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(FollowRequest::SenderId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FollowRequest::ReceiverId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FollowRequest::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_follow_request_sender")
                            .from(FollowRequest::Table, FollowRequest::SenderId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_follow_request_receiver")
                            .from(FollowRequest::Table, FollowRequest::ReceiverId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: (sender_id, receiver_id) - one pending request per pair
        manager
            .create_index(
                Index::create()
                    .name("idx_follow_request_sender_receiver")
                    .table(FollowRequest::Table)
                    .col(FollowRequest::SenderId)
                    .col(FollowRequest::ReceiverId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: receiver_id (for listing received requests)
        manager
            .create_index(
                Index::create()
                    .name("idx_follow_request_receiver_id")
                    .table(FollowRequest::Table)
                    .col(FollowRequest::ReceiverId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(FollowRequest::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum FollowRequest {
    Table,
    Id,
    SenderId,
    ReceiverId,
    CreatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
