use async_trait::async_trait;

use chrono::DateTime;
use chrono::Utc;

use crate::account::models::EmailAddress;
use crate::email::errors::EmailError;
use crate::email::models::EmailMessage;
use crate::email::models::EmailRecord;

/// Port for email domain service operations.
#[async_trait]
pub trait EmailServicePort: Send + Sync + 'static {
    /// Deliver a message and record it in the send history.
    ///
    /// History only ever contains messages the relay accepted; a failed
    /// delivery leaves no record.
    ///
    /// # Arguments
    /// * `message` - Message with at least one `to` recipient
    ///
    /// # Returns
    /// History record for the delivered message
    ///
    /// # Errors
    /// * `NoRecipients` - The `to` list is empty
    /// * `Relay` - The relay refused or failed to deliver
    async fn send(&self, message: EmailMessage) -> Result<EmailRecord, EmailError>;

    /// List previously sent messages, newest first.
    ///
    /// # Arguments
    /// * `days` - Optional look-back window in days; `None` returns everything
    ///
    /// # Returns
    /// Records ordered by send time descending
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn history(&self, days: Option<i64>) -> Result<Vec<EmailRecord>, EmailError>;
}

/// Transport that actually delivers messages.
#[async_trait]
pub trait MailRelay: Send + Sync + 'static {
    /// Hand the message to the underlying transport.
    ///
    /// # Arguments
    /// * `sender` - From address
    /// * `message` - Message to deliver
    ///
    /// # Returns
    /// Unit once the transport accepted the message
    ///
    /// # Errors
    /// * `Relay` - Connection, authentication, or submission failed
    async fn deliver(&self, sender: &EmailAddress, message: &EmailMessage)
        -> Result<(), EmailError>;
}

/// Persistence for the send history.
#[async_trait]
pub trait EmailHistoryStore: Send + Sync + 'static {
    /// Append a delivered message to the history.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn record(&self, record: &EmailRecord) -> Result<(), EmailError>;

    /// List records sent at or after the cutoff, newest first.
    ///
    /// # Arguments
    /// * `cutoff` - Oldest send time to include; `None` returns everything
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn list_since(
        &self,
        cutoff: Option<DateTime<Utc>>,
    ) -> Result<Vec<EmailRecord>, EmailError>;
}
