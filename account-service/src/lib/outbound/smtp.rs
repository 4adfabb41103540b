use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::AsyncSmtpTransport;
use lettre::AsyncTransport;
use lettre::Message;
use lettre::Tokio1Executor;

use crate::account::models::EmailAddress;
use crate::config::SmtpConfig;
use crate::email::errors::EmailError;
use crate::email::models::EmailMessage;
use crate::email::ports::MailRelay;

/// [MailRelay] backed by an SMTP server reached over STARTTLS.
pub struct SmtpMailRelay {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailRelay {
    pub fn new(config: &SmtpConfig) -> Result<Self, EmailError> {
        let credentials = Credentials::new(config.username.clone(), config.password.clone());

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| EmailError::Relay(e.to_string()))?
            .port(config.port)
            .credentials(credentials)
            .build();

        Ok(Self { transport })
    }
}

#[async_trait]
impl MailRelay for SmtpMailRelay {
    async fn deliver(
        &self,
        sender: &EmailAddress,
        message: &EmailMessage,
    ) -> Result<(), EmailError> {
        let mut builder = Message::builder()
            .from(parse_mailbox(sender)?)
            .subject(message.subject.clone());

        for to in &message.to {
            builder = builder.to(parse_mailbox(to)?);
        }
        for cc in &message.cc {
            builder = builder.cc(parse_mailbox(cc)?);
        }
        for bcc in &message.bcc {
            builder = builder.bcc(parse_mailbox(bcc)?);
        }

        let email = builder
            .body(message.body.clone())
            .map_err(|e| EmailError::Relay(e.to_string()))?;

        self.transport
            .send(email)
            .await
            .map_err(|e| EmailError::Relay(e.to_string()))?;

        Ok(())
    }
}

fn parse_mailbox(address: &EmailAddress) -> Result<Mailbox, EmailError> {
    address
        .as_str()
        .parse::<Mailbox>()
        .map_err(|e| EmailError::Relay(format!("Invalid mailbox {}: {}", address, e)))
}
