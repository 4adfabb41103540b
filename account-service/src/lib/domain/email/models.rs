use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::account::errors::EmailAddressError;
use crate::account::models::EmailAddress;

/// Outbound email message with validated recipients.
#[derive(Debug, Clone)]
pub struct EmailMessage {
    pub to: Vec<EmailAddress>,
    pub cc: Vec<EmailAddress>,
    pub bcc: Vec<EmailAddress>,
    pub subject: String,
    pub body: String,
}

/// Record of a successfully delivered message.
///
/// Recipient lists are stored comma-joined, mirroring how they arrive on
/// the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct EmailRecord {
    pub id: Uuid,
    pub sender: EmailAddress,
    pub to_recipients: String,
    pub cc_recipients: Option<String>,
    pub bcc_recipients: Option<String>,
    pub subject: String,
    pub body: String,
    pub sent_at: DateTime<Utc>,
}

impl EmailRecord {
    /// Build the history record for a delivered message.
    ///
    /// # Arguments
    /// * `sender` - Address the message was sent from
    /// * `message` - Message as handed to the relay
    /// * `sent_at` - Delivery timestamp
    ///
    /// # Returns
    /// EmailRecord with a fresh random ID
    pub fn from_message(
        sender: &EmailAddress,
        message: &EmailMessage,
        sent_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            sender: sender.clone(),
            to_recipients: join_addresses(&message.to),
            cc_recipients: join_addresses_opt(&message.cc),
            bcc_recipients: join_addresses_opt(&message.bcc),
            subject: message.subject.clone(),
            body: message.body.clone(),
            sent_at,
        }
    }
}

/// Parse a comma-separated address list, validating each entry.
///
/// Blank entries are skipped, so trailing commas and stray whitespace are
/// tolerated. An empty input parses to an empty list.
///
/// # Errors
/// * `InvalidFormat` - An entry is not a valid email address
pub fn parse_address_list(raw: &str) -> Result<Vec<EmailAddress>, EmailAddressError> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| EmailAddress::new(part.to_string()))
        .collect()
}

/// Join addresses back into the comma-separated storage form.
pub fn join_addresses(addresses: &[EmailAddress]) -> String {
    addresses
        .iter()
        .map(EmailAddress::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

fn join_addresses_opt(addresses: &[EmailAddress]) -> Option<String> {
    if addresses.is_empty() {
        None
    } else {
        Some(join_addresses(addresses))
    }
}
