use async_trait::async_trait;
use auth::ResetTokenState;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::account::errors::AccountError;
use crate::account::models::Account;
use crate::account::models::AccountId;
use crate::account::models::DisplayName;
use crate::account::models::EmailAddress;
use crate::account::ports::AccountStore;

pub struct PostgresAccountStore {
    pool: PgPool,
}

impl PostgresAccountStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct AccountRow {
    id: Uuid,
    email: String,
    display_name: String,
    password_hash: String,
    reset_token: Option<String>,
    reset_token_expires_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl TryFrom<AccountRow> for Account {
    type Error = AccountError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        Ok(Account {
            id: AccountId(row.id),
            email: EmailAddress::new(row.email)?,
            display_name: DisplayName::new(row.display_name)?,
            password_hash: row.password_hash,
            reset_token: ResetTokenState {
                token: row.reset_token,
                expires_at: row.reset_token_expires_at,
            },
            created_at: row.created_at,
        })
    }
}

fn map_unique_violation(e: sqlx::Error, account: &Account) -> AccountError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            if db_err.constraint() == Some("accounts_email_key") {
                return AccountError::EmailAlreadyRegistered(account.email.as_str().to_string());
            }
            if db_err.constraint() == Some("accounts_display_name_key") {
                return AccountError::DisplayNameTaken(account.display_name.as_str().to_string());
            }
        }
    }
    AccountError::DatabaseError(e.to_string())
}

#[async_trait]
impl AccountStore for PostgresAccountStore {
    async fn create(&self, account: Account) -> Result<Account, AccountError> {
        sqlx::query(
            r#"
            INSERT INTO accounts (id, email, display_name, password_hash, reset_token, reset_token_expires_at, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(account.id.0)
        .bind(account.email.as_str())
        .bind(account.display_name.as_str())
        .bind(&account.password_hash)
        .bind(account.reset_token.token.as_deref())
        .bind(account.reset_token.expires_at)
        .bind(account.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, &account))?;

        Ok(account)
    }

    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<Account>, AccountError> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT id, email, display_name, password_hash, reset_token, reset_token_expires_at, created_at
            FROM accounts
            WHERE email = $1 OR display_name = $1
            "#,
        )
        .bind(identifier)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AccountError::DatabaseError(e.to_string()))?;

        row.map(Account::try_from).transpose()
    }

    async fn find_by_email_and_reset_token(
        &self,
        email: &str,
        token: &str,
    ) -> Result<Option<Account>, AccountError> {
        // Expiry is enforced in the domain against the injected clock, so
        // the lookup only matches on the stored pair.
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT id, email, display_name, password_hash, reset_token, reset_token_expires_at, created_at
            FROM accounts
            WHERE email = $1 AND reset_token = $2
            "#,
        )
        .bind(email)
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AccountError::DatabaseError(e.to_string()))?;

        row.map(Account::try_from).transpose()
    }

    async fn save(&self, account: &Account) -> Result<(), AccountError> {
        let result = sqlx::query(
            r#"
            UPDATE accounts
            SET email = $2, display_name = $3, password_hash = $4, reset_token = $5, reset_token_expires_at = $6
            WHERE id = $1
            "#,
        )
        .bind(account.id.0)
        .bind(account.email.as_str())
        .bind(account.display_name.as_str())
        .bind(&account.password_hash)
        .bind(account.reset_token.token.as_deref())
        .bind(account.reset_token.expires_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, account))?;

        if result.rows_affected() == 0 {
            return Err(AccountError::NotFound(account.id.to_string()));
        }

        Ok(())
    }
}
