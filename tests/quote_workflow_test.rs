//! Quote -> conversation -> notification workflow against SQLite.

mod common;

use rust_decimal::Decimal;

use b2b_marketplace::domain::{
    CompanyRole, NewMessage, NotificationType, QuoteResponseInput, QuoteStatus,
};
use b2b_marketplace::errors::{AppError, AppResult};
use b2b_marketplace::infra::UnitOfWork;
use b2b_marketplace::services::{MessagingService, NotificationService, QuoteService};
use b2b_marketplace::with_transaction;

use common::{quote_form, TestApp};

#[tokio::test]
async fn test_quote_opens_conversation_and_notifies_supplier() {
    let app = TestApp::new().await;
    let vendor = app.active_vendor("sales@acme.test", "Acme Metals").await;
    let buyer = app
        .register("buyer@buyer.test", CompanyRole::BusinessBuyer, "Buyer Co")
        .await;
    let (_, category) = app.seed_category(&TestApp::staff(&vendor)).await;
    let product = app
        .product(&vendor, category.id, "Steel Rods", Decimal::new(10000, 2), false)
        .await;

    let quote = app
        .quotes
        .request_quote(&buyer, product.id, quote_form("Need a bulk price"))
        .await
        .unwrap();
    assert_eq!(quote.status, QuoteStatus::Pending);
    assert_eq!(quote.requester_id, buyer.company_id);
    assert_eq!(quote.supplier_id, vendor.company_id);

    // Exactly one conversation, visible to both sides
    let buyer_inbox = app.messaging.conversations(&buyer, 1).await.unwrap();
    let vendor_inbox = app.messaging.conversations(&vendor, 1).await.unwrap();
    assert_eq!(buyer_inbox.meta.total, 1);
    assert_eq!(vendor_inbox.meta.total, 1);
    assert_eq!(buyer_inbox.data[0].product_name, "Steel Rods");
    assert_eq!(buyer_inbox.data[0].other_participant_name, "Acme Metals");

    // Exactly one notification, addressed to the supplier
    let supplier_notes = app.notifications.list(&vendor, 1).await.unwrap();
    assert_eq!(supplier_notes.meta.total, 1);
    assert_eq!(
        supplier_notes.data[0].notification_type,
        NotificationType::QuoteRequest
    );
    assert_eq!(supplier_notes.data[0].quote_request_id, Some(quote.id));
    assert_eq!(app.notifications.list(&buyer, 1).await.unwrap().meta.total, 0);

    let received = app.quotes.received_quotes(&vendor, 1).await.unwrap();
    assert_eq!(received.meta.total, 1);
    assert_eq!(received.data[0].counterpart_name, "Buyer Co");
}

#[tokio::test]
async fn test_self_quote_is_rejected_without_side_effects() {
    let app = TestApp::new().await;
    let vendor = app.active_vendor("sales@acme.test", "Acme Metals").await;
    let (_, category) = app.seed_category(&TestApp::staff(&vendor)).await;
    let product = app
        .product(&vendor, category.id, "Steel Rods", Decimal::new(10000, 2), false)
        .await;

    let err = app
        .quotes
        .request_quote(&vendor, product.id, quote_form("Quote myself"))
        .await
        .unwrap_err();
    match &err {
        AppError::Rejected { redirect_to, .. } => {
            assert_eq!(redirect_to, &format!("/products/{}", product.id))
        }
        other => panic!("expected rejection, got {:?}", other),
    }

    assert_eq!(app.quotes.sent_quotes(&vendor, 1).await.unwrap().meta.total, 0);
    assert_eq!(app.messaging.conversations(&vendor, 1).await.unwrap().meta.total, 0);
    assert_eq!(app.notifications.list(&vendor, 1).await.unwrap().meta.total, 0);
}

#[tokio::test]
async fn test_failed_step_rolls_back_the_whole_quote() {
    let app = TestApp::new().await;
    let vendor = app.active_vendor("sales@acme.test", "Acme Metals").await;
    let buyer = app
        .register("buyer@buyer.test", CompanyRole::BusinessBuyer, "Buyer Co")
        .await;
    let (_, category) = app.seed_category(&TestApp::staff(&vendor)).await;
    let product = app
        .product(&vendor, category.id, "Steel Rods", Decimal::new(10000, 2), false)
        .await;

    let product_id = product.id;
    let requester = buyer.company_id;
    let supplier = vendor.company_id;
    let result: AppResult<()> = with_transaction!(app.uow, |ctx| {
        let quotes = ctx.quotes();
        let quote = quotes
            .create_quote(product_id, requester, supplier, quote_form("Need a bulk price"))
            .await?;
        quotes.create_conversation(quote.id, [requester, supplier]).await?;
        // One conversation per quote: the second insert fails
        quotes.create_conversation(quote.id, [requester, supplier]).await?;
        Ok(())
    });
    assert!(matches!(result, Err(AppError::Database(_))));

    assert_eq!(app.quotes.sent_quotes(&buyer, 1).await.unwrap().meta.total, 0);
    assert_eq!(app.quotes.received_quotes(&vendor, 1).await.unwrap().meta.total, 0);
    assert_eq!(app.messaging.conversations(&buyer, 1).await.unwrap().meta.total, 0);
}

#[tokio::test]
async fn test_inactive_requester_and_draft_products_cannot_be_quoted() {
    let app = TestApp::new().await;
    let vendor = app.active_vendor("sales@acme.test", "Acme Metals").await;
    let pending_vendor = app
        .register("new@vendor.test", CompanyRole::Vendor, "New Vendor")
        .await;
    let buyer = app
        .register("buyer@buyer.test", CompanyRole::ConsumerBuyer, "Jo Consumer")
        .await;
    let (_, category) = app.seed_category(&TestApp::staff(&vendor)).await;
    let active = app
        .product(&vendor, category.id, "Steel Rods", Decimal::new(10000, 2), false)
        .await;
    let draft = app
        .product(&vendor, category.id, "Prototype", Decimal::new(5000, 2), true)
        .await;

    let err = app
        .quotes
        .request_quote(&pending_vendor, active.id, quote_form("Hello"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::SubscriptionInactive(_)));

    let err = app
        .quotes
        .request_quote(&buyer, draft.id, quote_form("Hello"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound));
}

#[tokio::test]
async fn test_duplicate_quotes_open_separate_conversations() {
    let app = TestApp::new().await;
    let vendor = app.active_vendor("sales@acme.test", "Acme Metals").await;
    let buyer = app
        .register("buyer@buyer.test", CompanyRole::BusinessBuyer, "Buyer Co")
        .await;
    let (_, category) = app.seed_category(&TestApp::staff(&vendor)).await;
    let product = app
        .product(&vendor, category.id, "Steel Rods", Decimal::new(10000, 2), false)
        .await;

    for message in ["First ask", "Second ask"] {
        app.quotes
            .request_quote(&buyer, product.id, quote_form(message))
            .await
            .unwrap();
    }

    assert_eq!(app.quotes.sent_quotes(&buyer, 1).await.unwrap().meta.total, 2);
    assert_eq!(app.messaging.conversations(&buyer, 1).await.unwrap().meta.total, 2);
    assert_eq!(app.notifications.list(&vendor, 1).await.unwrap().meta.total, 2);
}

#[tokio::test]
async fn test_message_notifies_only_the_other_participant() {
    let app = TestApp::new().await;
    let vendor = app.active_vendor("sales@acme.test", "Acme Metals").await;
    let buyer = app
        .register("buyer@buyer.test", CompanyRole::BusinessBuyer, "Buyer Co")
        .await;
    let (_, category) = app.seed_category(&TestApp::staff(&vendor)).await;
    let product = app
        .product(&vendor, category.id, "Steel Rods", Decimal::new(10000, 2), false)
        .await;
    app.quotes
        .request_quote(&buyer, product.id, quote_form("Need a bulk price"))
        .await
        .unwrap();
    let conversation_id = app.messaging.conversations(&buyer, 1).await.unwrap().data[0]
        .conversation
        .id;

    app.messaging
        .send_message(
            &buyer,
            conversation_id,
            NewMessage {
                content: "Any update?".to_string(),
            },
        )
        .await
        .unwrap();

    let supplier_notes = app.notifications.list(&vendor, 1).await.unwrap();
    assert_eq!(supplier_notes.meta.total, 2);
    assert_eq!(
        supplier_notes.data[0].notification_type,
        NotificationType::NewMessage
    );
    assert_eq!(supplier_notes.data[0].conversation_id, Some(conversation_id));
    assert_eq!(app.notifications.list(&buyer, 1).await.unwrap().meta.total, 0);
}

#[tokio::test]
async fn test_opening_conversation_marks_only_incoming_messages_read() {
    let app = TestApp::new().await;
    let vendor = app.active_vendor("sales@acme.test", "Acme Metals").await;
    let buyer = app
        .register("buyer@buyer.test", CompanyRole::BusinessBuyer, "Buyer Co")
        .await;
    let (_, category) = app.seed_category(&TestApp::staff(&vendor)).await;
    let product = app
        .product(&vendor, category.id, "Steel Rods", Decimal::new(10000, 2), false)
        .await;
    app.quotes
        .request_quote(&buyer, product.id, quote_form("Need a bulk price"))
        .await
        .unwrap();
    let conversation_id = app.messaging.conversations(&buyer, 1).await.unwrap().data[0]
        .conversation
        .id;

    for (sender, text) in [(&buyer, "From buyer"), (&vendor, "From vendor")] {
        app.messaging
            .send_message(
                sender,
                conversation_id,
                NewMessage {
                    content: text.to_string(),
                },
            )
            .await
            .unwrap();
    }
    assert_eq!(app.notifications.unread_counts(&vendor).await.unwrap().messages, 1);
    assert_eq!(app.notifications.unread_counts(&buyer).await.unwrap().messages, 1);

    let detail = app
        .messaging
        .conversation(&vendor, conversation_id)
        .await
        .unwrap();
    assert_eq!(detail.messages.len(), 2);
    assert_eq!(detail.messages[0].content, "From buyer");
    assert_eq!(detail.other_participant_id, Some(buyer.company_id));

    // The vendor's own message stays unread for the buyer
    assert_eq!(app.notifications.unread_counts(&vendor).await.unwrap().messages, 0);
    assert_eq!(app.notifications.unread_counts(&buyer).await.unwrap().messages, 1);

    // Viewing does not touch notifications; marking them is explicit
    let counts = app.notifications.unread_counts(&vendor).await.unwrap();
    assert_eq!(counts.notifications, 2);
    assert_eq!(app.notifications.mark_all_read(&vendor).await.unwrap(), 2);
    assert_eq!(app.notifications.unread_counts(&vendor).await.unwrap().total, 0);
}

#[tokio::test]
async fn test_outsider_cannot_open_conversation() {
    let app = TestApp::new().await;
    let vendor = app.active_vendor("sales@acme.test", "Acme Metals").await;
    let buyer = app
        .register("buyer@buyer.test", CompanyRole::BusinessBuyer, "Buyer Co")
        .await;
    let outsider = app
        .register("other@other.test", CompanyRole::BusinessBuyer, "Other Co")
        .await;
    let (_, category) = app.seed_category(&TestApp::staff(&vendor)).await;
    let product = app
        .product(&vendor, category.id, "Steel Rods", Decimal::new(10000, 2), false)
        .await;
    app.quotes
        .request_quote(&buyer, product.id, quote_form("Need a bulk price"))
        .await
        .unwrap();
    let conversation_id = app.messaging.conversations(&buyer, 1).await.unwrap().data[0]
        .conversation
        .id;

    let err = app
        .messaging
        .conversation(&outsider, conversation_id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));
}

#[tokio::test]
async fn test_supplier_response_and_close() {
    let app = TestApp::new().await;
    let vendor = app.active_vendor("sales@acme.test", "Acme Metals").await;
    let buyer = app
        .register("buyer@buyer.test", CompanyRole::BusinessBuyer, "Buyer Co")
        .await;
    let (_, category) = app.seed_category(&TestApp::staff(&vendor)).await;
    let product = app
        .product(&vendor, category.id, "Steel Rods", Decimal::new(10000, 2), false)
        .await;
    let quote = app
        .quotes
        .request_quote(&buyer, product.id, quote_form("Need a bulk price"))
        .await
        .unwrap();

    let response = || QuoteResponseInput {
        status: QuoteStatus::Accepted,
        response_message: "We can do 92.00 per unit".to_string(),
    };

    let err = app.quotes.respond(&buyer, quote.id, response()).await.unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    let updated = app.quotes.respond(&vendor, quote.id, response()).await.unwrap();
    assert_eq!(updated.status, QuoteStatus::Accepted);

    let buyer_notes = app.notifications.list(&buyer, 1).await.unwrap();
    let kinds: Vec<_> = buyer_notes.data.iter().map(|n| n.notification_type).collect();
    assert_eq!(buyer_notes.meta.total, 2);
    assert!(kinds.contains(&NotificationType::QuoteStatusChange));
    assert!(kinds.contains(&NotificationType::QuoteResponse));

    let conversation_id = app.messaging.conversations(&buyer, 1).await.unwrap().data[0]
        .conversation
        .id;
    let detail = app.messaging.conversation(&buyer, conversation_id).await.unwrap();
    assert_eq!(detail.messages.len(), 1);
    assert_eq!(detail.messages[0].sender_id, vendor.company_id);

    let closed = app.quotes.close(&buyer, quote.id).await.unwrap();
    assert_eq!(closed.status, QuoteStatus::Closed);
    let err = app.quotes.close(&vendor, quote.id).await.unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));
    let err = app.quotes.respond(&vendor, quote.id, response()).await.unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));
}
