//! Email background job.
//!
//! Jobs are queued by the web process and drained by the worker. Actual
//! transport (SMTP relay, provider API) sits outside this service; the
//! worker hands the message off and logs it.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::PLATFORM_TEAM_SIGNATURE;
use crate::errors::AppError;

/// Email job payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailJob {
    /// Recipient email address
    pub to: String,
    pub subject: String,
    /// Plain-text body
    pub body: String,
    /// Sender override (defaults to `MAIL_FROM`)
    #[serde(default)]
    pub from: Option<String>,
}

impl EmailJob {
    pub fn new(to: impl Into<String>, subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            body: body.into(),
            from: None,
        }
    }

    pub fn with_from(mut self, from: impl Into<String>) -> Self {
        self.from = Some(from.into());
        self
    }
}

/// Everything the supplier is told about a new quote request.
#[derive(Debug, Clone)]
pub struct QuoteRequestEmail<'a> {
    pub recipient: &'a str,
    pub supplier_name: &'a str,
    pub product_name: &'a str,
    pub requester_name: &'a str,
    pub contact_name: &'a str,
    pub contact_email: &'a str,
    pub quantity: &'a str,
    pub target_price: Option<Decimal>,
    pub delivery_location: &'a str,
    pub expected_delivery: &'a str,
    pub message: &'a str,
    /// Absolute dashboard link
    pub dashboard_url: &'a str,
}

impl QuoteRequestEmail<'_> {
    pub fn into_job(self) -> EmailJob {
        let subject = format!("New Quote Request for {}", self.product_name);
        let target_price = self
            .target_price
            .map(|p| format!("${}", p))
            .unwrap_or_else(|| "Not specified".to_string());

        let body = format!(
            "Dear {supplier},\n\n\
             You have received a new quote request for your product: {product}\n\n\
             From: {requester}\n\
             Contact: {contact_name} ({contact_email})\n\n\
             Quote Details:\n\
             - Quantity: {quantity}\n\
             - Target Price: {target_price}\n\
             - Delivery Location: {location}\n\
             - Expected Delivery: {delivery}\n\n\
             Message:\n{message}\n\n\
             Please log in to your dashboard to respond: {dashboard}\n\n\
             Best regards,\n{signature}\n",
            supplier = self.supplier_name,
            product = self.product_name,
            requester = self.requester_name,
            contact_name = self.contact_name,
            contact_email = self.contact_email,
            quantity = self.quantity,
            target_price = target_price,
            location = self.delivery_location,
            delivery = self.expected_delivery,
            message = self.message,
            dashboard = self.dashboard_url,
            signature = PLATFORM_TEAM_SIGNATURE,
        );

        EmailJob::new(self.recipient, subject, body)
    }
}

/// Email job handler - processes email sending jobs
pub async fn email_job_handler(job: EmailJob) -> Result<(), AppError> {
    if job.to.trim().is_empty() {
        return Err(AppError::validation("Email job has no recipient"));
    }

    tracing::info!(
        to = %job.to,
        from = job.from.as_deref().unwrap_or("default"),
        subject = %job.subject,
        "Delivering email"
    );
    tracing::debug!(body = %job.body, "Email body");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn sample(target_price: Option<Decimal>) -> EmailJob {
        QuoteRequestEmail {
            recipient: "sales@acme.com",
            supplier_name: "Acme Metals",
            product_name: "Steel Rods",
            requester_name: "Buyer Co",
            contact_name: "Jo",
            contact_email: "jo@buyer.com",
            quantity: "50 units",
            target_price,
            delivery_location: "Dubai",
            expected_delivery: "2 weeks",
            message: "Need a bulk price",
            dashboard_url: "https://market.example.com/dashboard",
        }
        .into_job()
    }

    #[test]
    fn test_quote_email_lists_request_details() {
        let job = sample(Some(Decimal::from_str("95.00").unwrap()));
        assert_eq!(job.to, "sales@acme.com");
        assert_eq!(job.subject, "New Quote Request for Steel Rods");
        assert!(job.body.contains("Dear Acme Metals"));
        assert!(job.body.contains("Contact: Jo (jo@buyer.com)"));
        assert!(job.body.contains("- Quantity: 50 units"));
        assert!(job.body.contains("- Target Price: $95.00"));
        assert!(job.body.contains("https://market.example.com/dashboard"));
        assert!(job.body.ends_with("MWPUAE Platform Team\n"));
    }

    #[test]
    fn test_missing_target_price() {
        let job = sample(None);
        assert!(job.body.contains("- Target Price: Not specified"));
    }

    #[tokio::test]
    async fn test_handler_rejects_blank_recipient() {
        let job = EmailJob::new(" ", "s", "b");
        assert!(email_job_handler(job).await.is_err());
        assert!(email_job_handler(EmailJob::new("a@b.c", "s", "b")).await.is_ok());
    }
}
