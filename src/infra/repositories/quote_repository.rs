//! Quote requests, their conversations and messages.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, QueryFilter, QueryOrder, QuerySelect, QueryTrait, Set,
};
use uuid::Uuid;

use super::base;
use super::entities::{
    conversation::{self, Entity as ConversationEntity},
    conversation_participant::{self, Entity as ParticipantEntity},
    message::{self, Entity as MessageEntity},
    quote_request::{self, Entity as QuoteEntity},
};
use crate::domain::media::to_minor_units;
use crate::domain::{Conversation, Message, NewQuoteRequest, QuoteRequest, QuoteStatus};
use crate::errors::{AppError, AppResult};
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Read side of the quote workflow.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait QuoteRepository: Send + Sync {
    async fn find_quote(&self, id: Uuid) -> AppResult<Option<QuoteRequest>>;

    /// Quotes where the company is the supplier, newest first
    async fn received_quotes(
        &self,
        company_id: Uuid,
        params: PaginationParams,
    ) -> AppResult<(Vec<QuoteRequest>, u64)>;

    /// Quotes where the company is the requester, newest first
    async fn sent_quotes(
        &self,
        company_id: Uuid,
        params: PaginationParams,
    ) -> AppResult<(Vec<QuoteRequest>, u64)>;

    async fn find_conversation(&self, id: Uuid) -> AppResult<Option<Conversation>>;

    async fn find_conversation_by_quote(&self, quote_id: Uuid) -> AppResult<Option<Conversation>>;

    /// Conversations the company takes part in, most recently active first
    async fn company_conversations(
        &self,
        company_id: Uuid,
        params: PaginationParams,
    ) -> AppResult<(Vec<Conversation>, u64)>;

    /// Messages of a conversation, oldest first
    async fn conversation_messages(&self, conversation_id: Uuid) -> AppResult<Vec<Message>>;

    /// Mark every message not sent by `viewer` as read; returns rows updated
    async fn mark_messages_read(&self, conversation_id: Uuid, viewer: Uuid) -> AppResult<u64>;

    /// Unread messages from others in the company's conversations
    async fn count_unread_messages(&self, company_id: Uuid) -> AppResult<u64>;
}

/// Concrete implementation of QuoteRepository
pub struct QuoteStore {
    db: DatabaseConnection,
}

impl QuoteStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn quote_page(
        &self,
        column: quote_request::Column,
        company_id: Uuid,
        params: PaginationParams,
    ) -> AppResult<(Vec<QuoteRequest>, u64)> {
        let query = QuoteEntity::find()
            .filter(column.eq(company_id))
            .order_by_desc(quote_request::Column::CreatedAt);
        let (models, total) = base::fetch_page(&self.db, query, &params).await?;
        Ok((models.into_iter().map(QuoteRequest::from).collect(), total))
    }
}

#[async_trait]
impl QuoteRepository for QuoteStore {
    async fn find_quote(&self, id: Uuid) -> AppResult<Option<QuoteRequest>> {
        find_quote(&self.db, id).await
    }

    async fn received_quotes(
        &self,
        company_id: Uuid,
        params: PaginationParams,
    ) -> AppResult<(Vec<QuoteRequest>, u64)> {
        self.quote_page(quote_request::Column::SupplierId, company_id, params)
            .await
    }

    async fn sent_quotes(
        &self,
        company_id: Uuid,
        params: PaginationParams,
    ) -> AppResult<(Vec<QuoteRequest>, u64)> {
        self.quote_page(quote_request::Column::RequesterId, company_id, params)
            .await
    }

    async fn find_conversation(&self, id: Uuid) -> AppResult<Option<Conversation>> {
        find_conversation(&self.db, id).await
    }

    async fn find_conversation_by_quote(&self, quote_id: Uuid) -> AppResult<Option<Conversation>> {
        let model = ConversationEntity::find()
            .filter(conversation::Column::QuoteRequestId.eq(quote_id))
            .one(&self.db)
            .await?;
        match model {
            Some(model) => Ok(Some(with_participants(&self.db, model).await?)),
            None => Ok(None),
        }
    }

    async fn company_conversations(
        &self,
        company_id: Uuid,
        params: PaginationParams,
    ) -> AppResult<(Vec<Conversation>, u64)> {
        let query = ConversationEntity::find()
            .filter(conversation::Column::Id.in_subquery(participations(company_id)))
            .order_by_desc(conversation::Column::UpdatedAt);
        let (models, total) = base::fetch_page(&self.db, query, &params).await?;

        let ids: Vec<Uuid> = models.iter().map(|m| m.id).collect();
        let mut participants: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
        if !ids.is_empty() {
            let rows = ParticipantEntity::find()
                .filter(conversation_participant::Column::ConversationId.is_in(ids))
                .all(&self.db)
                .await?;
            for row in rows {
                participants
                    .entry(row.conversation_id)
                    .or_default()
                    .push(row.company_id);
            }
        }

        let conversations = models
            .into_iter()
            .map(|m| {
                let members = participants.remove(&m.id).unwrap_or_default();
                m.into_domain(members)
            })
            .collect();
        Ok((conversations, total))
    }

    async fn conversation_messages(&self, conversation_id: Uuid) -> AppResult<Vec<Message>> {
        let models = MessageEntity::find()
            .filter(message::Column::ConversationId.eq(conversation_id))
            .order_by_asc(message::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Message::from).collect())
    }

    async fn mark_messages_read(&self, conversation_id: Uuid, viewer: Uuid) -> AppResult<u64> {
        let result = MessageEntity::update_many()
            .col_expr(message::Column::IsRead, Expr::value(true))
            .filter(message::Column::ConversationId.eq(conversation_id))
            .filter(message::Column::SenderId.ne(viewer))
            .filter(message::Column::IsRead.eq(false))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected)
    }

    async fn count_unread_messages(&self, company_id: Uuid) -> AppResult<u64> {
        base::count(
            &self.db,
            MessageEntity::find()
                .filter(message::Column::ConversationId.in_subquery(participations(company_id)))
                .filter(message::Column::SenderId.ne(company_id))
                .filter(message::Column::IsRead.eq(false)),
        )
        .await
    }
}

/// Transaction-aware quote repository: every workflow write goes through here.
pub struct TxQuoteRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxQuoteRepository<'a> {
    pub(crate) fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    pub async fn find_quote(&self, id: Uuid) -> AppResult<Option<QuoteRequest>> {
        find_quote(self.txn, id).await
    }

    pub async fn find_conversation(&self, id: Uuid) -> AppResult<Option<Conversation>> {
        find_conversation(self.txn, id).await
    }

    /// Insert a pending quote request
    pub async fn create_quote(
        &self,
        product_id: Uuid,
        requester_id: Uuid,
        supplier_id: Uuid,
        input: NewQuoteRequest,
    ) -> AppResult<QuoteRequest> {
        let target_price_minor = input.target_price.map(to_minor_units).transpose()?;
        let now = Utc::now();
        let model = quote_request::ActiveModel {
            id: Set(Uuid::new_v4()),
            product_id: Set(product_id),
            requester_id: Set(requester_id),
            supplier_id: Set(supplier_id),
            message: Set(input.message),
            quantity: Set(input.quantity),
            target_price_minor: Set(target_price_minor),
            delivery_location: Set(input.delivery_location),
            expected_delivery: Set(input.expected_delivery),
            contact_name: Set(input.contact_name),
            contact_email: Set(input.contact_email),
            contact_phone: Set(input.contact_phone),
            status: Set(QuoteStatus::Pending.as_str().to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(self.txn)
        .await?;

        Ok(QuoteRequest::from(model))
    }

    pub async fn set_quote_status(&self, id: Uuid, status: QuoteStatus) -> AppResult<QuoteRequest> {
        let model = QuoteEntity::find_by_id(id)
            .one(self.txn)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: quote_request::ActiveModel = model.into();
        active.status = Set(status.as_str().to_string());
        active.updated_at = Set(Utc::now());

        let model = active.update(self.txn).await?;
        Ok(QuoteRequest::from(model))
    }

    /// Open the conversation of a quote with both companies as participants
    pub async fn create_conversation(
        &self,
        quote_request_id: Uuid,
        participants: [Uuid; 2],
    ) -> AppResult<Conversation> {
        let now = Utc::now();
        let model = conversation::ActiveModel {
            id: Set(Uuid::new_v4()),
            quote_request_id: Set(quote_request_id),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(self.txn)
        .await?;

        let rows = participants.map(|company_id| conversation_participant::ActiveModel {
            conversation_id: Set(model.id),
            company_id: Set(company_id),
        });
        ParticipantEntity::insert_many(rows)
            .exec_without_returning(self.txn)
            .await?;

        Ok(model.into_domain(participants.to_vec()))
    }

    /// Append a message and bump the conversation's `updated_at`
    pub async fn add_message(
        &self,
        conversation_id: Uuid,
        sender_id: Uuid,
        content: String,
    ) -> AppResult<Message> {
        let now = Utc::now();
        let model = message::ActiveModel {
            id: Set(Uuid::new_v4()),
            conversation_id: Set(conversation_id),
            sender_id: Set(sender_id),
            content: Set(content),
            is_read: Set(false),
            created_at: Set(now),
        }
        .insert(self.txn)
        .await?;

        ConversationEntity::update_many()
            .col_expr(conversation::Column::UpdatedAt, Expr::value(now))
            .filter(conversation::Column::Id.eq(conversation_id))
            .exec(self.txn)
            .await?;

        Ok(Message::from(model))
    }
}

fn participations(company_id: Uuid) -> sea_orm::sea_query::SelectStatement {
    ParticipantEntity::find()
        .select_only()
        .column(conversation_participant::Column::ConversationId)
        .filter(conversation_participant::Column::CompanyId.eq(company_id))
        .into_query()
}

async fn find_quote<C: ConnectionTrait>(conn: &C, id: Uuid) -> AppResult<Option<QuoteRequest>> {
    let model = QuoteEntity::find_by_id(id).one(conn).await?;
    Ok(model.map(QuoteRequest::from))
}

async fn find_conversation<C: ConnectionTrait>(conn: &C, id: Uuid) -> AppResult<Option<Conversation>> {
    match ConversationEntity::find_by_id(id).one(conn).await? {
        Some(model) => Ok(Some(with_participants(conn, model).await?)),
        None => Ok(None),
    }
}

async fn with_participants<C: ConnectionTrait>(
    conn: &C,
    model: conversation::Model,
) -> AppResult<Conversation> {
    let participants: Vec<Uuid> = ParticipantEntity::find()
        .select_only()
        .column(conversation_participant::Column::CompanyId)
        .filter(conversation_participant::Column::ConversationId.eq(model.id))
        .into_tuple()
        .all(conn)
        .await?;
    Ok(model.into_domain(participants))
}
