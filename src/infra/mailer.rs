//! Outbound email hand-off.
//!
//! Callers treat every error from a [`Mailer`] as non-fatal: it is logged
//! and the triggering request still succeeds.

use apalis::prelude::Storage;
use apalis_sql::postgres::PostgresStorage;
use async_trait::async_trait;

use crate::errors::{AppError, AppResult};
use crate::jobs::EmailJob;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Hand the message off for delivery.
    async fn send(&self, job: EmailJob) -> AppResult<()>;
}

/// Pushes email jobs onto the apalis Postgres queue.
pub struct QueueMailer {
    storage: PostgresStorage<EmailJob>,
    from: String,
}

impl QueueMailer {
    pub fn new(storage: PostgresStorage<EmailJob>, from: impl Into<String>) -> Self {
        Self {
            storage,
            from: from.into(),
        }
    }
}

#[async_trait]
impl Mailer for QueueMailer {
    async fn send(&self, job: EmailJob) -> AppResult<()> {
        let job = match job.from {
            Some(_) => job,
            None => job.with_from(self.from.clone()),
        };
        let mut storage = self.storage.clone();
        storage
            .push(job)
            .await
            .map_err(|e| AppError::internal(format!("Failed to enqueue email: {}", e)))?;
        Ok(())
    }
}

/// Logs messages instead of delivering them (development, tests).
pub struct LogMailer {
    from: String,
}

impl LogMailer {
    pub fn new(from: impl Into<String>) -> Self {
        Self { from: from.into() }
    }
}

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, job: EmailJob) -> AppResult<()> {
        tracing::info!(
            from = job.from.as_deref().unwrap_or(&self.from),
            to = %job.to,
            subject = %job.subject,
            "Email not delivered (log delivery mode)"
        );
        tracing::debug!(body = %job.body, "Email body");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_log_mailer_accepts_everything() {
        let mailer = LogMailer::new("noreply@example.com");
        assert!(mailer
            .send(EmailJob::new("a@example.com", "Hi", "Body"))
            .await
            .is_ok());
    }
}
