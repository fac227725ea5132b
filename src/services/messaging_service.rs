//! Conversation inbox, conversation view and message posting.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use super::container::parallel;
use crate::config::DEFAULT_PAGE_SIZE;
use crate::domain::{
    Conversation, ConversationDetail, ConversationSummary, Message, NewMessage, NewNotification,
    Principal,
};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;
use crate::types::{Paginated, PaginationParams};
use crate::with_transaction;

const QUOTE_LOOKUP_CONCURRENCY: usize = 8;

#[async_trait]
pub trait MessagingService: Send + Sync {
    /// The caller's conversations, most recently active first
    async fn conversations(&self, principal: &Principal, page: u64) -> AppResult<Paginated<ConversationSummary>>;

    /// Open a conversation: marks the other side's messages read, then returns them oldest first
    async fn conversation(&self, principal: &Principal, conversation_id: Uuid) -> AppResult<ConversationDetail>;

    /// Append a message and notify the other participant
    async fn send_message(
        &self,
        principal: &Principal,
        conversation_id: Uuid,
        input: NewMessage,
    ) -> AppResult<Message>;
}

pub struct MessagingManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> MessagingManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn participant_conversation(
        &self,
        principal: &Principal,
        conversation_id: Uuid,
    ) -> AppResult<Conversation> {
        let conversation = self
            .uow
            .quotes()
            .find_conversation(conversation_id)
            .await?
            .ok_or(AppError::NotFound)?;
        if !conversation.is_participant(principal.company_id) {
            return Err(AppError::forbidden(
                "You are not a participant in this conversation.",
            ));
        }
        Ok(conversation)
    }

    async fn company_name(&self, company_id: Option<Uuid>) -> AppResult<String> {
        let Some(company_id) = company_id else {
            return Ok(String::new());
        };
        Ok(self
            .uow
            .accounts()
            .company_names(vec![company_id])
            .await?
            .remove(&company_id)
            .unwrap_or_default())
    }
}

#[async_trait]
impl<U: UnitOfWork> MessagingService for MessagingManager<U> {
    async fn conversations(&self, principal: &Principal, page: u64) -> AppResult<Paginated<ConversationSummary>> {
        let params = PaginationParams::new(page, DEFAULT_PAGE_SIZE);
        let quote_repo = self.uow.quotes();
        let (conversations, total) = quote_repo
            .company_conversations(principal.company_id, params.clone())
            .await?;

        let quotes = parallel::join_all_limited(
            conversations
                .iter()
                .map(|c| quote_repo.find_quote(c.quote_request_id))
                .collect::<Vec<_>>(),
            QUOTE_LOOKUP_CONCURRENCY,
        )
        .await?;

        let product_ids = quotes.iter().flatten().map(|q| q.product_id).collect();
        let other_ids = conversations
            .iter()
            .filter_map(|c| c.other_participant(principal.company_id))
            .collect();
        let (products, companies) = parallel::join2(
            self.uow.catalog().product_names(product_ids),
            self.uow.accounts().company_names(other_ids),
        )
        .await?;

        let mut summaries = Vec::with_capacity(conversations.len());
        for (conversation, quote) in conversations.into_iter().zip(quotes) {
            let quote = quote.ok_or_else(|| AppError::internal("Conversation without quote"))?;
            let other_participant_name = conversation
                .other_participant(principal.company_id)
                .and_then(|id| companies.get(&id).cloned())
                .unwrap_or_default();
            summaries.push(ConversationSummary {
                conversation,
                quote_status: quote.status,
                product_name: products.get(&quote.product_id).cloned().unwrap_or_default(),
                other_participant_name,
            });
        }
        Ok(Paginated::new(summaries, &params, total))
    }

    async fn conversation(&self, principal: &Principal, conversation_id: Uuid) -> AppResult<ConversationDetail> {
        let conversation = self.participant_conversation(principal, conversation_id).await?;
        let quotes = self.uow.quotes();

        let marked = quotes
            .mark_messages_read(conversation.id, principal.company_id)
            .await?;
        if marked > 0 {
            tracing::debug!(%conversation_id, marked, "Messages marked read");
        }

        let quote = quotes
            .find_quote(conversation.quote_request_id)
            .await?
            .ok_or(AppError::NotFound)?;
        let messages = quotes.conversation_messages(conversation.id).await?;
        let product_name = self
            .uow
            .catalog()
            .product_names(vec![quote.product_id])
            .await?
            .remove(&quote.product_id)
            .unwrap_or_default();
        let other_participant_id = conversation.other_participant(principal.company_id);
        let other_participant_name = self.company_name(other_participant_id).await?;

        Ok(ConversationDetail {
            conversation,
            quote,
            product_name,
            other_participant_id,
            other_participant_name,
            messages,
        })
    }

    async fn send_message(
        &self,
        principal: &Principal,
        conversation_id: Uuid,
        input: NewMessage,
    ) -> AppResult<Message> {
        let conversation = self.participant_conversation(principal, conversation_id).await?;

        let sender_id = principal.company_id;
        let sender_name = principal.company_name.clone();
        let recipient = conversation.other_participant(sender_id);
        let content = input.content;

        let message = with_transaction!(self.uow, |ctx| {
            let message = ctx
                .quotes()
                .add_message(conversation_id, sender_id, content)
                .await?;
            if let Some(recipient) = recipient {
                ctx.notifications()
                    .create(NewNotification::new_message(
                        recipient,
                        &sender_name,
                        &message.content,
                        conversation_id,
                    ))
                    .await?;
            }
            Ok(message)
        })?;

        tracing::info!(%conversation_id, sender = %sender_id, "Message sent");
        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::account::fixtures::principal;
    use crate::domain::{CompanyRole, SubscriptionStatus};
    use crate::infra::MockQuoteRepository;
    use crate::services::test_support::TestUnitOfWork;
    use chrono::Utc;

    fn conversation(participants: Vec<Uuid>) -> Conversation {
        Conversation {
            id: Uuid::new_v4(),
            quote_request_id: Uuid::new_v4(),
            participants,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_outsider_cannot_read_or_post() {
        let outsider = principal(CompanyRole::BusinessBuyer, SubscriptionStatus::Active);
        let conv = conversation(vec![Uuid::new_v4(), Uuid::new_v4()]);
        let id = conv.id;

        let mut quotes = MockQuoteRepository::new();
        quotes
            .expect_find_conversation()
            .returning(move |_| Ok(Some(conv.clone())));
        quotes.expect_mark_messages_read().never();

        let service = MessagingManager::new(Arc::new(TestUnitOfWork::default().with_quotes(quotes)));
        assert!(matches!(
            service.conversation(&outsider, id).await,
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(
            service
                .send_message(&outsider, id, NewMessage { content: "hi".into() })
                .await,
            Err(AppError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_conversation_is_not_found() {
        let buyer = principal(CompanyRole::BusinessBuyer, SubscriptionStatus::Active);
        let mut quotes = MockQuoteRepository::new();
        quotes.expect_find_conversation().returning(|_| Ok(None));

        let service = MessagingManager::new(Arc::new(TestUnitOfWork::default().with_quotes(quotes)));
        assert!(matches!(
            service.conversation(&buyer, Uuid::new_v4()).await,
            Err(AppError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_empty_inbox() {
        let buyer = principal(CompanyRole::BusinessBuyer, SubscriptionStatus::Active);
        let mut quotes = MockQuoteRepository::new();
        quotes
            .expect_company_conversations()
            .returning(|_, _| Ok((vec![], 0)));
        let mut catalog = crate::infra::MockCatalogRepository::new();
        catalog
            .expect_product_names()
            .returning(|_| Ok(Default::default()));
        let mut accounts = crate::infra::MockAccountRepository::new();
        accounts
            .expect_company_names()
            .returning(|_| Ok(Default::default()));

        let uow = TestUnitOfWork::default()
            .with_quotes(quotes)
            .with_catalog(catalog)
            .with_accounts(accounts);
        let page = MessagingManager::new(Arc::new(uow))
            .conversations(&buyer, 1)
            .await
            .unwrap();
        assert!(page.data.is_empty());
        assert_eq!(page.meta.total_pages, 0);
    }
}
