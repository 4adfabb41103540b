use std::sync::Arc;

use async_trait::async_trait;
use auth::Authenticator;
use auth::AuthenticationError;
use auth::IssuedResetToken;
use auth::ResetTokenManager;
use auth::ResetTokenState;
use auth::SharedClock;

use crate::account::errors::AccountError;
use crate::account::models::Account;
use crate::account::models::AccountId;
use crate::account::models::AuthenticatedSession;
use crate::account::models::Password;
use crate::account::models::PasswordResetIssued;
use crate::account::models::SignupCommand;
use crate::account::ports::AccountServicePort;
use crate::account::ports::AccountStore;
use crate::email::models::EmailMessage;
use crate::email::ports::EmailServicePort;

/// Domain service implementation for account operations.
///
/// Concrete implementation of AccountServicePort with dependency injection.
pub struct AccountService<AS, ES>
where
    AS: AccountStore,
    ES: EmailServicePort,
{
    store: Arc<AS>,
    email: Arc<ES>,
    authenticator: Arc<Authenticator>,
    resets: ResetTokenManager,
    clock: SharedClock,
}

impl<AS, ES> AccountService<AS, ES>
where
    AS: AccountStore,
    ES: EmailServicePort,
{
    /// Create a new account service with injected dependencies.
    ///
    /// # Arguments
    /// * `store` - Account persistence implementation
    /// * `email` - Outbound email implementation
    /// * `authenticator` - Password hashing and session issuance
    /// * `resets` - Password-reset token issuance and redemption
    /// * `clock` - Time source for creation timestamps
    ///
    /// # Returns
    /// Configured account service instance
    pub fn new(
        store: Arc<AS>,
        email: Arc<ES>,
        authenticator: Arc<Authenticator>,
        resets: ResetTokenManager,
        clock: SharedClock,
    ) -> Self {
        Self {
            store,
            email,
            authenticator,
            resets,
            clock,
        }
    }

    fn reset_email(account: &Account, issued: &IssuedResetToken) -> EmailMessage {
        EmailMessage {
            to: vec![account.email.clone()],
            cc: vec![],
            bcc: vec![],
            subject: "Password Reset Request".to_string(),
            body: format!(
                "Hello {},\n\n\
                 A password reset was requested for your account. Use the token below \
                 to set a new password. It expires at {}.\n\n\
                 {}\n\n\
                 If you did not request this, you can ignore this message.",
                account.display_name, issued.expires_at, issued.token
            ),
        }
    }
}

#[async_trait]
impl<AS, ES> AccountServicePort for AccountService<AS, ES>
where
    AS: AccountStore,
    ES: EmailServicePort,
{
    async fn signup(&self, command: SignupCommand) -> Result<Account, AccountError> {
        let password_hash = self.authenticator.hash_password(command.password.as_str())?;

        let account = Account {
            id: AccountId::new(),
            email: command.email,
            display_name: command.display_name,
            password_hash,
            reset_token: ResetTokenState::none(),
            created_at: self.clock.now(),
        };

        self.store.create(account).await
    }

    async fn login(
        &self,
        identifier: &str,
        password: &str,
    ) -> Result<AuthenticatedSession, AccountError> {
        // A missing account and a wrong password must come out as the
        // same error value.
        let account = self
            .store
            .find_by_identifier(identifier)
            .await?
            .ok_or(AccountError::InvalidCredentials)?;

        let result = self
            .authenticator
            .authenticate(
                password,
                &account.password_hash,
                account.email.as_str(),
                account.display_name.as_str(),
            )
            .map_err(|e| match e {
                AuthenticationError::InvalidCredentials => AccountError::InvalidCredentials,
                AuthenticationError::PasswordError(e) => AccountError::Password(e),
                AuthenticationError::TokenError(e) => AccountError::Token(e),
            })?;

        Ok(AuthenticatedSession {
            account,
            access_token: result.access_token,
        })
    }

    async fn request_password_reset(
        &self,
        identifier: &str,
    ) -> Result<PasswordResetIssued, AccountError> {
        let mut account = self
            .store
            .find_by_identifier(identifier)
            .await?
            .ok_or_else(|| AccountError::NotFound(identifier.to_string()))?;

        let issued = self.resets.issue(account.email.as_str())?;

        // Storing the pair arms the token and supersedes any earlier one.
        account.reset_token = ResetTokenState::issued(issued.token.clone(), issued.expires_at);
        self.store.save(&account).await?;

        let message = Self::reset_email(&account, &issued);
        if let Err(e) = self.email.send(message).await {
            tracing::error!(
                "Failed to send password reset email to {}: {}",
                account.email,
                e
            );
        }

        Ok(PasswordResetIssued {
            email: account.email,
            token: issued.token,
            expires_at: issued.expires_at,
        })
    }

    async fn redeem_password_reset(
        &self,
        token: &str,
        new_password: Password,
    ) -> Result<(), AccountError> {
        let subject = self
            .resets
            .verify(token)
            .map_err(|_| AccountError::InvalidOrExpiredResetToken)?;

        let mut account = self
            .store
            .find_by_email_and_reset_token(&subject, token)
            .await?
            .ok_or(AccountError::InvalidOrExpiredResetToken)?;

        self.resets
            .redeem(token, account.email.as_str(), &account.reset_token)
            .map_err(|_| AccountError::InvalidOrExpiredResetToken)?;

        account.password_hash = self.authenticator.hash_password(new_password.as_str())?;
        account.reset_token.clear();

        // One write lands the new credential and spends the token together.
        self.store.save(&account).await
    }
}
