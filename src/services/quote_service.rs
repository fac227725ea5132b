//! Quote service - the quote request -> conversation -> notification workflow.
//!
//! Every multi-row write runs in one Unit of Work transaction. The supplier
//! email goes out only after commit and never fails the request.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::DEFAULT_PAGE_SIZE;
use crate::domain::{
    NewNotification, NewQuoteRequest, Principal, Product, QuoteRequest, QuoteResponseInput,
    QuoteSummary,
};
use crate::errors::{AppError, AppResult};
use crate::infra::{Mailer, UnitOfWork};
use crate::jobs::QuoteRequestEmail;
use crate::types::{Paginated, PaginationParams};
use crate::with_transaction;

#[async_trait]
pub trait QuoteService: Send + Sync {
    /// Open a quote request on an active product owned by another company
    async fn request_quote(
        &self,
        principal: &Principal,
        product_id: Uuid,
        input: NewQuoteRequest,
    ) -> AppResult<QuoteRequest>;

    /// Quotes the caller's company received as supplier
    async fn received_quotes(&self, principal: &Principal, page: u64) -> AppResult<Paginated<QuoteSummary>>;

    /// Quotes the caller's company sent as requester
    async fn sent_quotes(&self, principal: &Principal, page: u64) -> AppResult<Paginated<QuoteSummary>>;

    /// Supplier-only status change plus response message
    async fn respond(
        &self,
        principal: &Principal,
        quote_id: Uuid,
        input: QuoteResponseInput,
    ) -> AppResult<QuoteRequest>;

    /// Either participant may close a quote that is not closed yet
    async fn close(&self, principal: &Principal, quote_id: Uuid) -> AppResult<QuoteRequest>;
}

pub struct QuoteManager<U: UnitOfWork> {
    uow: Arc<U>,
    mailer: Arc<dyn Mailer>,
    dashboard_url: String,
}

impl<U: UnitOfWork> QuoteManager<U> {
    /// `dashboard_url` is the absolute link put into supplier emails
    pub fn new(uow: Arc<U>, mailer: Arc<dyn Mailer>, dashboard_url: impl Into<String>) -> Self {
        Self {
            uow,
            mailer,
            dashboard_url: dashboard_url.into(),
        }
    }

    async fn summaries(
        &self,
        principal: &Principal,
        quotes: Vec<QuoteRequest>,
        params: &PaginationParams,
        total: u64,
    ) -> AppResult<Paginated<QuoteSummary>> {
        let product_ids = quotes.iter().map(|q| q.product_id).collect();
        let company_ids = quotes
            .iter()
            .map(|q| q.counterpart_of(principal.company_id))
            .collect();
        let products = self.uow.catalog().product_names(product_ids).await?;
        let companies = self.uow.accounts().company_names(company_ids).await?;

        let summaries = quotes
            .into_iter()
            .map(|quote| {
                let counterpart = quote.counterpart_of(principal.company_id);
                QuoteSummary {
                    product_name: products.get(&quote.product_id).cloned().unwrap_or_default(),
                    counterpart_name: companies.get(&counterpart).cloned().unwrap_or_default(),
                    quote,
                }
            })
            .collect();
        Ok(Paginated::new(summaries, params, total))
    }

    /// Best effort: any failure is logged and swallowed.
    async fn email_supplier(&self, quote: &QuoteRequest, product: &Product, requester_name: &str) {
        if let Err(e) = self.try_email_supplier(quote, product, requester_name).await {
            tracing::warn!(quote_id = %quote.id, error = %e, "Quote request email not sent");
        }
    }

    async fn try_email_supplier(
        &self,
        quote: &QuoteRequest,
        product: &Product,
        requester_name: &str,
    ) -> AppResult<()> {
        let accounts = self.uow.accounts();
        let supplier = accounts
            .find_company(quote.supplier_id)
            .await?
            .ok_or(AppError::NotFound)?;

        let recipient = if supplier.contact_email.trim().is_empty() {
            accounts
                .find_company_owner(supplier.id)
                .await?
                .map(|owner| owner.email)
                .ok_or_else(|| AppError::internal("Supplier has no email address"))?
        } else {
            supplier.contact_email.clone()
        };

        let job = QuoteRequestEmail {
            recipient: &recipient,
            supplier_name: &supplier.company_name,
            product_name: &product.name,
            requester_name,
            contact_name: &quote.contact_name,
            contact_email: &quote.contact_email,
            quantity: &quote.quantity,
            target_price: quote.target_price,
            delivery_location: &quote.delivery_location,
            expected_delivery: &quote.expected_delivery,
            message: &quote.message,
            dashboard_url: &self.dashboard_url,
        }
        .into_job();

        self.mailer.send(job).await
    }
}

/// Where the self-quote rejection sends the caller back to
fn product_path(product_id: Uuid) -> String {
    format!("/products/{}", product_id)
}

#[async_trait]
impl<U: UnitOfWork> QuoteService for QuoteManager<U> {
    async fn request_quote(
        &self,
        principal: &Principal,
        product_id: Uuid,
        input: NewQuoteRequest,
    ) -> AppResult<QuoteRequest> {
        principal.require_active_subscription(
            "Your subscription is not active. Please renew to request quotes.",
        )?;

        let product = self
            .uow
            .catalog()
            .find_product(product_id)
            .await?
            .filter(Product::is_active)
            .ok_or(AppError::NotFound)?;

        if product.company_id == principal.company_id {
            return Err(AppError::rejected(
                "You cannot request a quote for your own product.",
                product_path(product.id),
            ));
        }

        let requester_id = principal.company_id;
        let supplier_id = product.company_id;
        let product_name = product.name.clone();
        let requester_name = principal.company_name.clone();

        let quote = with_transaction!(self.uow, |ctx| {
            let quotes = ctx.quotes();
            let quote = quotes
                .create_quote(product_id, requester_id, supplier_id, input)
                .await?;
            quotes
                .create_conversation(quote.id, [requester_id, supplier_id])
                .await?;
            ctx.notifications()
                .create(NewNotification::quote_request(
                    &quote,
                    &product_name,
                    &requester_name,
                ))
                .await?;
            Ok(quote)
        })?;

        tracing::info!(
            quote_id = %quote.id,
            %product_id,
            requester = %requester_id,
            supplier = %supplier_id,
            "Quote request created"
        );

        self.email_supplier(&quote, &product, &principal.company_name)
            .await;
        Ok(quote)
    }

    async fn received_quotes(&self, principal: &Principal, page: u64) -> AppResult<Paginated<QuoteSummary>> {
        let params = PaginationParams::new(page, DEFAULT_PAGE_SIZE);
        let (quotes, total) = self
            .uow
            .quotes()
            .received_quotes(principal.company_id, params.clone())
            .await?;
        self.summaries(principal, quotes, &params, total).await
    }

    async fn sent_quotes(&self, principal: &Principal, page: u64) -> AppResult<Paginated<QuoteSummary>> {
        let params = PaginationParams::new(page, DEFAULT_PAGE_SIZE);
        let (quotes, total) = self
            .uow
            .quotes()
            .sent_quotes(principal.company_id, params.clone())
            .await?;
        self.summaries(principal, quotes, &params, total).await
    }

    async fn respond(
        &self,
        principal: &Principal,
        quote_id: Uuid,
        input: QuoteResponseInput,
    ) -> AppResult<QuoteRequest> {
        let quote = self
            .uow
            .quotes()
            .find_quote(quote_id)
            .await?
            .ok_or(AppError::NotFound)?;
        if quote.supplier_id != principal.company_id {
            return Err(AppError::forbidden(
                "Only the supplier can respond to this quote.",
            ));
        }
        quote.status.respond(input.status)?;

        let conversation = self
            .uow
            .quotes()
            .find_conversation_by_quote(quote.id)
            .await?
            .ok_or_else(|| AppError::internal("Quote request has no conversation"))?;
        let product_name = self
            .uow
            .catalog()
            .product_names(vec![quote.product_id])
            .await?
            .remove(&quote.product_id)
            .unwrap_or_default();

        let supplier_id = principal.company_id;
        let supplier_name = principal.company_name.clone();
        let next = input.status;
        let content = input.response_message;
        let conversation_id = conversation.id;

        let updated = self
            .uow
            .transaction_serializable(|ctx| {
                Box::pin(async move {
                    let quotes = ctx.quotes();
                    // Re-check against the row as seen inside the transaction
                    let current = quotes.find_quote(quote_id).await?.ok_or(AppError::NotFound)?;
                    let status = current.status.respond(next)?;
                    let updated = quotes.set_quote_status(quote_id, status).await?;
                    quotes
                        .add_message(conversation_id, supplier_id, content.clone())
                        .await?;

                    let notifications = ctx.notifications();
                    notifications
                        .create(NewNotification::quote_status_change(
                            &updated,
                            &product_name,
                            conversation_id,
                        ))
                        .await?;
                    notifications
                        .create(NewNotification::quote_response(
                            &updated,
                            &supplier_name,
                            &content,
                            conversation_id,
                        ))
                        .await?;
                    Ok(updated)
                })
            })
            .await?;

        tracing::info!(%quote_id, status = %updated.status, "Quote responded");
        Ok(updated)
    }

    async fn close(&self, principal: &Principal, quote_id: Uuid) -> AppResult<QuoteRequest> {
        let company_id = principal.company_id;

        let updated = self
            .uow
            .transaction_serializable(|ctx| {
                Box::pin(async move {
                    let quotes = ctx.quotes();
                    let quote = quotes.find_quote(quote_id).await?.ok_or(AppError::NotFound)?;
                    if !quote.is_participant(company_id) {
                        return Err(AppError::forbidden(
                            "You are not a participant of this quote.",
                        ));
                    }
                    let status = quote.status.close()?;
                    quotes.set_quote_status(quote_id, status).await
                })
            })
            .await?;

        tracing::info!(%quote_id, closed_by = %company_id, "Quote closed");
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::account::fixtures::principal;
    use crate::domain::{CompanyRole, ProductStatus, QuoteStatus, SubscriptionStatus};
    use crate::infra::{MockCatalogRepository, MockMailer, MockQuoteRepository};
    use crate::services::test_support::TestUnitOfWork;
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn product(company_id: Uuid, status: ProductStatus) -> Product {
        Product {
            id: Uuid::new_v4(),
            company_id,
            category_id: Uuid::new_v4(),
            name: "Steel pipe".into(),
            description: String::new(),
            price: Decimal::new(10000, 2),
            currency: "USD".into(),
            minimum_order_quantity: String::new(),
            lead_time: String::new(),
            images: vec![],
            tags: String::new(),
            status,
            featured: false,
            views_count: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn quote(requester_id: Uuid, supplier_id: Uuid, status: QuoteStatus) -> QuoteRequest {
        QuoteRequest {
            id: Uuid::new_v4(),
            product_id: Uuid::new_v4(),
            requester_id,
            supplier_id,
            message: "Need 50".into(),
            quantity: "50 units".into(),
            target_price: None,
            delivery_location: String::new(),
            expected_delivery: String::new(),
            contact_name: "Jo".into(),
            contact_email: "jo@buyer.com".into(),
            contact_phone: String::new(),
            status,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn request() -> NewQuoteRequest {
        NewQuoteRequest {
            message: "Need a bulk price".into(),
            quantity: "50 units".into(),
            target_price: None,
            delivery_location: "Dubai".into(),
            expected_delivery: "2 weeks".into(),
            contact_name: "Jo".into(),
            contact_email: "jo@buyer.com".into(),
            contact_phone: String::new(),
        }
    }

    fn service(uow: TestUnitOfWork) -> QuoteManager<TestUnitOfWork> {
        let mut mailer = MockMailer::new();
        mailer.expect_send().never();
        QuoteManager::new(Arc::new(uow), Arc::new(mailer), "http://localhost/dashboard")
    }

    #[tokio::test]
    async fn test_inactive_requester_is_sent_to_pricing() {
        let buyer = principal(CompanyRole::BusinessBuyer, SubscriptionStatus::Expired);
        let err = service(TestUnitOfWork::default())
            .request_quote(&buyer, Uuid::new_v4(), request())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::SubscriptionInactive(_)));
        assert_eq!(err.redirect_to().as_deref(), Some("/pricing"));
    }

    #[tokio::test]
    async fn test_self_quote_is_rejected_back_to_product_page() {
        let vendor = principal(CompanyRole::Vendor, SubscriptionStatus::Active);
        let own = product(vendor.company_id, ProductStatus::Active);
        let own_id = own.id;

        let mut catalog = MockCatalogRepository::new();
        catalog
            .expect_find_product()
            .returning(move |_| Ok(Some(own.clone())));

        let err = service(TestUnitOfWork::default().with_catalog(catalog))
            .request_quote(&vendor, own_id, request())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Rejected { .. }));
        assert_eq!(err.redirect_to(), Some(format!("/products/{}", own_id)));
    }

    #[tokio::test]
    async fn test_draft_products_cannot_be_quoted() {
        let buyer = principal(CompanyRole::BusinessBuyer, SubscriptionStatus::Active);
        let draft = product(Uuid::new_v4(), ProductStatus::Draft);
        let id = draft.id;

        let mut catalog = MockCatalogRepository::new();
        catalog
            .expect_find_product()
            .returning(move |_| Ok(Some(draft.clone())));

        let result = service(TestUnitOfWork::default().with_catalog(catalog))
            .request_quote(&buyer, id, request())
            .await;
        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_only_supplier_may_respond() {
        let buyer = principal(CompanyRole::BusinessBuyer, SubscriptionStatus::Active);
        let q = quote(buyer.company_id, Uuid::new_v4(), QuoteStatus::Pending);
        let id = q.id;

        let mut quotes = MockQuoteRepository::new();
        quotes
            .expect_find_quote()
            .returning(move |_| Ok(Some(q.clone())));

        let result = service(TestUnitOfWork::default().with_quotes(quotes))
            .respond(
                &buyer,
                id,
                QuoteResponseInput {
                    status: QuoteStatus::Accepted,
                    response_message: "ok".into(),
                },
            )
            .await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_respond_rejects_finished_quotes_before_writing() {
        let vendor = principal(CompanyRole::Vendor, SubscriptionStatus::Active);
        let q = quote(Uuid::new_v4(), vendor.company_id, QuoteStatus::Declined);
        let id = q.id;

        let mut quotes = MockQuoteRepository::new();
        quotes
            .expect_find_quote()
            .returning(move |_| Ok(Some(q.clone())));
        quotes.expect_find_conversation_by_quote().never();

        let result = service(TestUnitOfWork::default().with_quotes(quotes))
            .respond(
                &vendor,
                id,
                QuoteResponseInput {
                    status: QuoteStatus::Accepted,
                    response_message: "ok".into(),
                },
            )
            .await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_received_quotes_resolve_names() {
        let vendor = principal(CompanyRole::Vendor, SubscriptionStatus::Active);
        let buyer_id = Uuid::new_v4();
        let q = quote(buyer_id, vendor.company_id, QuoteStatus::Pending);
        let product_id = q.product_id;

        let mut quotes = MockQuoteRepository::new();
        quotes
            .expect_received_quotes()
            .returning(move |_, _| Ok((vec![q.clone()], 1)));
        let mut catalog = MockCatalogRepository::new();
        catalog.expect_product_names().returning(move |_| {
            Ok([(product_id, "Steel pipe".to_string())].into_iter().collect())
        });
        let mut accounts = crate::infra::MockAccountRepository::new();
        accounts.expect_company_names().returning(move |ids| {
            assert_eq!(ids, vec![buyer_id]);
            Ok([(buyer_id, "Buyer Co".to_string())].into_iter().collect())
        });

        let uow = TestUnitOfWork::default()
            .with_quotes(quotes)
            .with_catalog(catalog)
            .with_accounts(accounts);
        let page = service(uow).received_quotes(&vendor, 1).await.unwrap();
        assert_eq!(page.meta.total, 1);
        assert_eq!(page.data[0].product_name, "Steel pipe");
        assert_eq!(page.data[0].counterpart_name, "Buyer Co");
    }
}
