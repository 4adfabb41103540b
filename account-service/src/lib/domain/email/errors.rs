use thiserror::Error;

use crate::account::errors::EmailAddressError;

/// Top-level error for email sending and history operations
#[derive(Debug, Clone, Error)]
pub enum EmailError {
    #[error("Invalid recipient address: {0}")]
    InvalidRecipient(#[from] EmailAddressError),

    #[error("At least one recipient email address is required")]
    NoRecipients,

    // Infrastructure errors
    #[error("Mail relay error: {0}")]
    Relay(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}
