use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::account::models::EmailAddress;
use crate::email::errors::EmailError;
use crate::email::models::EmailRecord;
use crate::email::ports::EmailHistoryStore;

pub struct PostgresEmailHistoryStore {
    pool: PgPool,
}

impl PostgresEmailHistoryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct EmailRecordRow {
    id: Uuid,
    sender: String,
    to_recipients: String,
    cc_recipients: Option<String>,
    bcc_recipients: Option<String>,
    subject: String,
    body: String,
    sent_at: DateTime<Utc>,
}

impl TryFrom<EmailRecordRow> for EmailRecord {
    type Error = EmailError;

    fn try_from(row: EmailRecordRow) -> Result<Self, Self::Error> {
        let sender = EmailAddress::new(row.sender)
            .map_err(|e| EmailError::DatabaseError(format!("Invalid sender address in history: {}", e)))?;

        Ok(EmailRecord {
            id: row.id,
            sender,
            to_recipients: row.to_recipients,
            cc_recipients: row.cc_recipients,
            bcc_recipients: row.bcc_recipients,
            subject: row.subject,
            body: row.body,
            sent_at: row.sent_at,
        })
    }
}

#[async_trait]
impl EmailHistoryStore for PostgresEmailHistoryStore {
    async fn record(&self, record: &EmailRecord) -> Result<(), EmailError> {
        sqlx::query(
            r#"
            INSERT INTO email_history (id, sender, to_recipients, cc_recipients, bcc_recipients, subject, body, sent_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(record.id)
        .bind(record.sender.as_str())
        .bind(&record.to_recipients)
        .bind(record.cc_recipients.as_deref())
        .bind(record.bcc_recipients.as_deref())
        .bind(&record.subject)
        .bind(&record.body)
        .bind(record.sent_at)
        .execute(&self.pool)
        .await
        .map_err(|e| EmailError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    async fn list_since(
        &self,
        cutoff: Option<DateTime<Utc>>,
    ) -> Result<Vec<EmailRecord>, EmailError> {
        let rows = match cutoff {
            Some(cutoff) => {
                sqlx::query_as::<_, EmailRecordRow>(
                    r#"
                    SELECT id, sender, to_recipients, cc_recipients, bcc_recipients, subject, body, sent_at
                    FROM email_history
                    WHERE sent_at >= $1
                    ORDER BY sent_at DESC
                    "#,
                )
                .bind(cutoff)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as::<_, EmailRecordRow>(
                    r#"
                    SELECT id, sender, to_recipients, cc_recipients, bcc_recipients, subject, body, sent_at
                    FROM email_history
                    ORDER BY sent_at DESC
                    "#,
                )
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(|e| EmailError::DatabaseError(e.to_string()))?;

        rows.into_iter().map(EmailRecord::try_from).collect()
    }
}
