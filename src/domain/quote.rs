//! Quote requests and their status rules.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::errors::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum QuoteStatus {
    Pending,
    Responded,
    Accepted,
    Declined,
    Closed,
}

impl QuoteStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuoteStatus::Pending => "pending",
            QuoteStatus::Responded => "responded",
            QuoteStatus::Accepted => "accepted",
            QuoteStatus::Declined => "declined",
            QuoteStatus::Closed => "closed",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            QuoteStatus::Pending => "Pending",
            QuoteStatus::Responded => "Responded",
            QuoteStatus::Accepted => "Accepted",
            QuoteStatus::Declined => "Declined",
            QuoteStatus::Closed => "Closed",
        }
    }

    /// Statuses a supplier may choose when responding
    pub fn is_response_choice(&self) -> bool {
        matches!(
            self,
            QuoteStatus::Responded | QuoteStatus::Accepted | QuoteStatus::Declined
        )
    }

    /// Supplier response: only while the negotiation is still open.
    pub fn respond(self, next: QuoteStatus) -> AppResult<QuoteStatus> {
        if !next.is_response_choice() {
            return Err(AppError::validation(format!(
                "'{}' is not a valid response status",
                next.as_str()
            )));
        }
        match self {
            QuoteStatus::Pending | QuoteStatus::Responded => Ok(next),
            other => Err(AppError::BadRequest(format!(
                "Quote is already {}",
                other.as_str()
            ))),
        }
    }

    /// Closing is allowed from every state except `Closed` itself.
    pub fn close(self) -> AppResult<QuoteStatus> {
        match self {
            QuoteStatus::Closed => Err(AppError::BadRequest("Quote is already closed".into())),
            _ => Ok(QuoteStatus::Closed),
        }
    }
}

impl From<&str> for QuoteStatus {
    fn from(s: &str) -> Self {
        match s {
            "responded" => QuoteStatus::Responded,
            "accepted" => QuoteStatus::Accepted,
            "declined" => QuoteStatus::Declined,
            "closed" => QuoteStatus::Closed,
            _ => QuoteStatus::Pending,
        }
    }
}

impl std::fmt::Display for QuoteStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct QuoteRequest {
    pub id: Uuid,
    pub product_id: Uuid,
    pub requester_id: Uuid,
    pub supplier_id: Uuid,
    pub message: String,
    pub quantity: String,
    #[schema(value_type = Option<String>)]
    pub target_price: Option<Decimal>,
    pub delivery_location: String,
    pub expected_delivery: String,
    pub contact_name: String,
    pub contact_email: String,
    pub contact_phone: String,
    pub status: QuoteStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl QuoteRequest {
    pub fn is_participant(&self, company_id: Uuid) -> bool {
        self.requester_id == company_id || self.supplier_id == company_id
    }

    pub fn counterpart_of(&self, company_id: Uuid) -> Uuid {
        if self.requester_id == company_id {
            self.supplier_id
        } else {
            self.requester_id
        }
    }
}

/// Buyer's quote form
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct NewQuoteRequest {
    #[validate(length(min = 1, message = "Message is required"))]
    pub message: String,
    #[serde(default)]
    #[validate(length(max = 100))]
    #[schema(example = "50 units")]
    pub quantity: String,
    #[schema(value_type = Option<String>, example = "95.00")]
    pub target_price: Option<Decimal>,
    #[serde(default)]
    #[validate(length(max = 200))]
    pub delivery_location: String,
    #[serde(default)]
    #[validate(length(max = 100))]
    pub expected_delivery: String,
    #[validate(length(min = 1, max = 100, message = "Contact name is required"))]
    pub contact_name: String,
    #[validate(email(message = "Invalid contact email"))]
    pub contact_email: String,
    #[serde(default)]
    #[validate(length(max = 20))]
    pub contact_phone: String,
}

/// Supplier's status change plus response text
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct QuoteResponseInput {
    pub status: QuoteStatus,
    #[validate(length(min = 1, message = "Response message is required"))]
    pub response_message: String,
}

/// Quote with the names a list row needs
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct QuoteSummary {
    pub quote: QuoteRequest,
    pub product_name: String,
    /// Requester on the received list, supplier on the sent list
    pub counterpart_name: String,
}
