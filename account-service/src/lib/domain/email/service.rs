use std::sync::Arc;

use async_trait::async_trait;
use auth::SharedClock;
use chrono::Duration;

use crate::account::models::EmailAddress;
use crate::email::errors::EmailError;
use crate::email::models::EmailMessage;
use crate::email::models::EmailRecord;
use crate::email::ports::EmailHistoryStore;
use crate::email::ports::EmailServicePort;
use crate::email::ports::MailRelay;

/// Domain service implementation for outbound email.
///
/// Delivers through the injected relay and keeps a history of accepted
/// messages. Failed deliveries are reported to the caller and never reach
/// the history.
pub struct EmailService<MR, HS>
where
    MR: MailRelay,
    HS: EmailHistoryStore,
{
    relay: Arc<MR>,
    history: Arc<HS>,
    sender: EmailAddress,
    clock: SharedClock,
}

impl<MR, HS> EmailService<MR, HS>
where
    MR: MailRelay,
    HS: EmailHistoryStore,
{
    /// Create a new email service with injected dependencies.
    ///
    /// # Arguments
    /// * `relay` - Delivery transport implementation
    /// * `history` - Send history persistence implementation
    /// * `sender` - From address stamped on every outbound message
    /// * `clock` - Time source for send timestamps and history cutoffs
    ///
    /// # Returns
    /// Configured email service instance
    pub fn new(relay: Arc<MR>, history: Arc<HS>, sender: EmailAddress, clock: SharedClock) -> Self {
        Self {
            relay,
            history,
            sender,
            clock,
        }
    }
}

#[async_trait]
impl<MR, HS> EmailServicePort for EmailService<MR, HS>
where
    MR: MailRelay,
    HS: EmailHistoryStore,
{
    async fn send(&self, message: EmailMessage) -> Result<EmailRecord, EmailError> {
        if message.to.is_empty() {
            return Err(EmailError::NoRecipients);
        }

        self.relay.deliver(&self.sender, &message).await?;

        let record = EmailRecord::from_message(&self.sender, &message, self.clock.now());

        // The message already left through the relay; a history write
        // failure must not turn the send into an error.
        if let Err(e) = self.history.record(&record).await {
            tracing::error!("Failed to record sent email {}: {}", record.id, e);
        }

        Ok(record)
    }

    async fn history(&self, days: Option<i64>) -> Result<Vec<EmailRecord>, EmailError> {
        let cutoff = days
            .and_then(Duration::try_days)
            .map(|window| self.clock.now() - window);

        self.history.list_since(cutoff).await
    }
}
