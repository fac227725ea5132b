//! Conversations, messages and in-app notifications.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::quote::{QuoteRequest, QuoteStatus};
use crate::config::NOTIFICATION_PREVIEW_CHARS;

/// Two-party thread bound 1:1 to a quote request
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Conversation {
    pub id: Uuid,
    pub quote_request_id: Uuid,
    pub participants: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    pub fn is_participant(&self, company_id: Uuid) -> bool {
        self.participants.contains(&company_id)
    }

    pub fn other_participant(&self, company_id: Uuid) -> Option<Uuid> {
        self.participants.iter().copied().find(|id| *id != company_id)
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Message {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub sender_id: Uuid,
    pub content: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct NewMessage {
    #[validate(length(min = 1, message = "Message cannot be empty"))]
    pub content: String,
}

/// Inbox row
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ConversationSummary {
    pub conversation: Conversation,
    pub quote_status: QuoteStatus,
    pub product_name: String,
    pub other_participant_name: String,
}

/// Conversation page payload; messages are oldest first
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ConversationDetail {
    pub conversation: Conversation,
    pub quote: QuoteRequest,
    pub product_name: String,
    pub other_participant_id: Option<Uuid>,
    pub other_participant_name: String,
    pub messages: Vec<Message>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    QuoteRequest,
    QuoteResponse,
    NewMessage,
    QuoteStatusChange,
}

impl NotificationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationType::QuoteRequest => "quote_request",
            NotificationType::QuoteResponse => "quote_response",
            NotificationType::NewMessage => "new_message",
            NotificationType::QuoteStatusChange => "quote_status_change",
        }
    }
}

impl From<&str> for NotificationType {
    fn from(s: &str) -> Self {
        match s {
            "quote_response" => NotificationType::QuoteResponse,
            "new_message" => NotificationType::NewMessage,
            "quote_status_change" => NotificationType::QuoteStatusChange,
            _ => NotificationType::QuoteRequest,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Notification {
    pub id: Uuid,
    pub recipient_id: Uuid,
    pub notification_type: NotificationType,
    pub title: String,
    pub message: String,
    pub quote_request_id: Option<Uuid>,
    pub conversation_id: Option<Uuid>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

/// Notification row to insert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNotification {
    pub recipient_id: Uuid,
    pub notification_type: NotificationType,
    pub title: String,
    pub message: String,
    pub quote_request_id: Option<Uuid>,
    pub conversation_id: Option<Uuid>,
}

impl NewNotification {
    /// Supplier is told about a new quote request.
    pub fn quote_request(quote: &QuoteRequest, product_name: &str, requester_name: &str) -> Self {
        Self {
            recipient_id: quote.supplier_id,
            notification_type: NotificationType::QuoteRequest,
            title: format!("New Quote Request for {}", product_name),
            message: format!(
                "{} has requested a quote for your product.",
                requester_name
            ),
            quote_request_id: Some(quote.id),
            conversation_id: None,
        }
    }

    /// Requester is told the supplier changed the quote status.
    pub fn quote_status_change(
        quote: &QuoteRequest,
        product_name: &str,
        conversation_id: Uuid,
    ) -> Self {
        Self {
            recipient_id: quote.requester_id,
            notification_type: NotificationType::QuoteStatusChange,
            title: format!("Quote for {} is now {}", product_name, quote.status.label()),
            message: format!(
                "The supplier updated your quote request for {} to {}.",
                product_name,
                quote.status.label()
            ),
            quote_request_id: Some(quote.id),
            conversation_id: Some(conversation_id),
        }
    }

    /// Requester receives the supplier's response text.
    pub fn quote_response(
        quote: &QuoteRequest,
        supplier_name: &str,
        content: &str,
        conversation_id: Uuid,
    ) -> Self {
        Self {
            recipient_id: quote.requester_id,
            notification_type: NotificationType::QuoteResponse,
            title: format!("Quote response from {}", supplier_name),
            message: preview(content),
            quote_request_id: Some(quote.id),
            conversation_id: Some(conversation_id),
        }
    }

    /// The other participant is told about a new message.
    pub fn new_message(
        recipient_id: Uuid,
        sender_name: &str,
        content: &str,
        conversation_id: Uuid,
    ) -> Self {
        Self {
            recipient_id,
            notification_type: NotificationType::NewMessage,
            title: format!("New message from {}", sender_name),
            message: preview(content),
            quote_request_id: None,
            conversation_id: Some(conversation_id),
        }
    }
}

/// First 100 characters, with "..." appended when truncated.
pub fn preview(content: &str) -> String {
    if content.chars().count() > NOTIFICATION_PREVIEW_CHARS {
        let cut: String = content.chars().take(NOTIFICATION_PREVIEW_CHARS).collect();
        format!("{}...", cut)
    } else {
        content.to_string()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct UnreadCounts {
    pub messages: u64,
    pub notifications: u64,
    pub total: u64,
}

impl UnreadCounts {
    pub fn new(messages: u64, notifications: u64) -> Self {
        Self {
            messages,
            notifications,
            total: messages + notifications,
        }
    }
}

/// Badge payload: full counts when signed in, `{"count": 0}` otherwise
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(untagged)]
pub enum UnreadCountResponse {
    Counts(UnreadCounts),
    Anonymous { count: u64 },
}

impl UnreadCountResponse {
    pub fn anonymous() -> Self {
        UnreadCountResponse::Anonymous { count: 0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_truncates_long_content() {
        let long = "x".repeat(150);
        let p = preview(&long);
        assert_eq!(p.len(), 103);
        assert!(p.ends_with("..."));
        assert_eq!(preview("short"), "short");
        assert_eq!(preview(&"y".repeat(100)), "y".repeat(100));
    }

    #[test]
    fn test_preview_counts_characters_not_bytes() {
        let text = "é".repeat(101);
        assert_eq!(preview(&text).chars().count(), 103);
    }

    #[test]
    fn test_other_participant() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let conv = Conversation {
            id: Uuid::new_v4(),
            quote_request_id: Uuid::new_v4(),
            participants: vec![a, b],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert_eq!(conv.other_participant(a), Some(b));
        assert_eq!(conv.other_participant(b), Some(a));
        assert!(!conv.is_participant(Uuid::new_v4()));
    }

    #[test]
    fn test_unread_count_shapes() {
        let counts = serde_json::to_value(UnreadCountResponse::Counts(UnreadCounts::new(2, 3)))
            .unwrap();
        assert_eq!(
            counts,
            serde_json::json!({"messages": 2, "notifications": 3, "total": 5})
        );
        let anon = serde_json::to_value(UnreadCountResponse::anonymous()).unwrap();
        assert_eq!(anon, serde_json::json!({"count": 0}));
    }
}
