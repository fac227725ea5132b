//! Migration: quote requests, conversations, messages and notifications.

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_accounts::Companies;
use super::m20240101_000002_create_catalog::Products;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(QuoteRequests::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(QuoteRequests::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(QuoteRequests::ProductId).uuid().not_null())
                    .col(ColumnDef::new(QuoteRequests::RequesterId).uuid().not_null())
                    .col(ColumnDef::new(QuoteRequests::SupplierId).uuid().not_null())
                    .col(ColumnDef::new(QuoteRequests::Message).text().not_null())
                    .col(ColumnDef::new(QuoteRequests::Quantity).string_len(100).not_null().default(""))
                    .col(ColumnDef::new(QuoteRequests::TargetPriceMinor).big_integer().null())
                    .col(
                        ColumnDef::new(QuoteRequests::DeliveryLocation)
                            .string_len(200)
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(QuoteRequests::ExpectedDelivery)
                            .string_len(100)
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(QuoteRequests::ContactName).string_len(100).not_null())
                    .col(ColumnDef::new(QuoteRequests::ContactEmail).string().not_null())
                    .col(ColumnDef::new(QuoteRequests::ContactPhone).string_len(20).not_null().default(""))
                    .col(
                        ColumnDef::new(QuoteRequests::Status)
                            .string_len(20)
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(QuoteRequests::CreatedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(QuoteRequests::UpdatedAt).timestamp_with_time_zone().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_quote_requests_product")
                            .from(QuoteRequests::Table, QuoteRequests::ProductId)
                            .to(Products::Table, Products::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_quote_requests_requester")
                            .from(QuoteRequests::Table, QuoteRequests::RequesterId)
                            .to(Companies::Table, Companies::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_quote_requests_supplier")
                            .from(QuoteRequests::Table, QuoteRequests::SupplierId)
                            .to(Companies::Table, Companies::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_quote_requests_supplier_created_at")
                    .table(QuoteRequests::Table)
                    .col(QuoteRequests::SupplierId)
                    .col(QuoteRequests::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_quote_requests_requester_created_at")
                    .table(QuoteRequests::Table)
                    .col(QuoteRequests::RequesterId)
                    .col(QuoteRequests::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Conversations::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Conversations::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Conversations::QuoteRequestId)
                            .uuid()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Conversations::CreatedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(Conversations::UpdatedAt).timestamp_with_time_zone().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_conversations_quote_request")
                            .from(Conversations::Table, Conversations::QuoteRequestId)
                            .to(QuoteRequests::Table, QuoteRequests::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ConversationParticipants::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(ConversationParticipants::ConversationId).uuid().not_null())
                    .col(ColumnDef::new(ConversationParticipants::CompanyId).uuid().not_null())
                    .primary_key(
                        Index::create()
                            .col(ConversationParticipants::ConversationId)
                            .col(ConversationParticipants::CompanyId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_conversation_participants_conversation")
                            .from(
                                ConversationParticipants::Table,
                                ConversationParticipants::ConversationId,
                            )
                            .to(Conversations::Table, Conversations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_conversation_participants_company")
                            .from(
                                ConversationParticipants::Table,
                                ConversationParticipants::CompanyId,
                            )
                            .to(Companies::Table, Companies::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Messages::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Messages::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Messages::ConversationId).uuid().not_null())
                    .col(ColumnDef::new(Messages::SenderId).uuid().not_null())
                    .col(ColumnDef::new(Messages::Content).text().not_null())
                    .col(
                        ColumnDef::new(Messages::IsRead)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Messages::CreatedAt).timestamp_with_time_zone().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_messages_conversation")
                            .from(Messages::Table, Messages::ConversationId)
                            .to(Conversations::Table, Conversations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_messages_sender")
                            .from(Messages::Table, Messages::SenderId)
                            .to(Companies::Table, Companies::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Notifications::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Notifications::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Notifications::RecipientId).uuid().not_null())
                    .col(ColumnDef::new(Notifications::NotificationType).string_len(20).not_null())
                    .col(ColumnDef::new(Notifications::Title).string_len(200).not_null())
                    .col(ColumnDef::new(Notifications::Message).text().not_null())
                    .col(ColumnDef::new(Notifications::QuoteRequestId).uuid().null())
                    .col(ColumnDef::new(Notifications::ConversationId).uuid().null())
                    .col(
                        ColumnDef::new(Notifications::IsRead)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Notifications::CreatedAt).timestamp_with_time_zone().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_notifications_recipient")
                            .from(Notifications::Table, Notifications::RecipientId)
                            .to(Companies::Table, Companies::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_notifications_recipient_is_read")
                    .table(Notifications::Table)
                    .col(Notifications::RecipientId)
                    .col(Notifications::IsRead)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Notifications::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Messages::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ConversationParticipants::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Conversations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(QuoteRequests::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum QuoteRequests {
    Table,
    Id,
    ProductId,
    RequesterId,
    SupplierId,
    Message,
    Quantity,
    TargetPriceMinor,
    DeliveryLocation,
    ExpectedDelivery,
    ContactName,
    ContactEmail,
    ContactPhone,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Conversations {
    Table,
    Id,
    QuoteRequestId,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum ConversationParticipants {
    Table,
    ConversationId,
    CompanyId,
}

#[derive(Iden)]
enum Messages {
    Table,
    Id,
    ConversationId,
    SenderId,
    Content,
    IsRead,
    CreatedAt,
}

#[derive(Iden)]
enum Notifications {
    Table,
    Id,
    RecipientId,
    NotificationType,
    Title,
    Message,
    QuoteRequestId,
    ConversationId,
    IsRead,
    CreatedAt,
}
