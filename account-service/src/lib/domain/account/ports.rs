use async_trait::async_trait;

use crate::account::errors::AccountError;
use crate::account::models::Account;
use crate::account::models::AuthenticatedSession;
use crate::account::models::Password;
use crate::account::models::PasswordResetIssued;
use crate::account::models::SignupCommand;

/// Port for account domain service operations.
#[async_trait]
pub trait AccountServicePort: Send + Sync + 'static {
    /// Register a new account with validated credentials.
    ///
    /// # Arguments
    /// * `command` - Validated command containing email, display name, and password
    ///
    /// # Returns
    /// Created account entity
    ///
    /// # Errors
    /// * `EmailAlreadyRegistered` - Email is already registered
    /// * `DisplayNameTaken` - Display name is already taken
    /// * `DatabaseError` - Database operation failed
    async fn signup(&self, command: SignupCommand) -> Result<Account, AccountError>;

    /// Authenticate by email or display name and mint a session token.
    ///
    /// An unknown identifier and a wrong password both fail with the same
    /// error so callers cannot probe which accounts exist.
    ///
    /// # Arguments
    /// * `identifier` - Email address or display name
    /// * `password` - Plain text password to check
    ///
    /// # Returns
    /// The account together with a signed session token
    ///
    /// # Errors
    /// * `InvalidCredentials` - Identifier unknown or password wrong
    /// * `DatabaseError` - Database operation failed
    async fn login(
        &self,
        identifier: &str,
        password: &str,
    ) -> Result<AuthenticatedSession, AccountError>;

    /// Issue a password-reset token for the account and email it out.
    ///
    /// Any token issued earlier for the same account stops working the
    /// moment a new one is stored.
    ///
    /// # Arguments
    /// * `identifier` - Email address or display name
    ///
    /// # Returns
    /// The issued token and its expiry
    ///
    /// # Errors
    /// * `NotFound` - No account matches the identifier
    /// * `DatabaseError` - Database operation failed
    async fn request_password_reset(
        &self,
        identifier: &str,
    ) -> Result<PasswordResetIssued, AccountError>;

    /// Redeem a reset token and install a new password.
    ///
    /// The token is single use: a successful redemption clears the stored
    /// state, so presenting the same token again fails.
    ///
    /// # Arguments
    /// * `token` - Reset token exactly as issued
    /// * `new_password` - Policy-checked replacement password
    ///
    /// # Returns
    /// Unit on success
    ///
    /// # Errors
    /// * `InvalidOrExpiredResetToken` - Token is malformed, forged, expired,
    ///   superseded, or already spent
    /// * `DatabaseError` - Database operation failed
    async fn redeem_password_reset(
        &self,
        token: &str,
        new_password: Password,
    ) -> Result<(), AccountError>;
}

/// Persistence operations for the account aggregate.
#[async_trait]
pub trait AccountStore: Send + Sync + 'static {
    /// Persist new account to storage.
    ///
    /// # Arguments
    /// * `account` - Account entity to create
    ///
    /// # Returns
    /// Created account entity
    ///
    /// # Errors
    /// * `EmailAlreadyRegistered` - Email is already registered
    /// * `DisplayNameTaken` - Display name is already taken
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, account: Account) -> Result<Account, AccountError>;

    /// Retrieve account by email or display name.
    ///
    /// # Arguments
    /// * `identifier` - Value matched against both the email and the
    ///   display name column
    ///
    /// # Returns
    /// Optional account entity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<Account>, AccountError>;

    /// Retrieve account by email with a matching stored reset token.
    ///
    /// Only returns an account whose stored reset token is byte-identical
    /// to `token`; a superseded or cleared token matches nothing.
    ///
    /// # Arguments
    /// * `email` - Email address the token was issued for
    /// * `token` - Candidate reset token
    ///
    /// # Returns
    /// Optional account entity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_email_and_reset_token(
        &self,
        email: &str,
        token: &str,
    ) -> Result<Option<Account>, AccountError>;

    /// Write the account back to storage.
    ///
    /// # Arguments
    /// * `account` - Account entity with updated fields
    ///
    /// # Returns
    /// Unit on success
    ///
    /// # Errors
    /// * `NotFound` - Account does not exist
    /// * `EmailAlreadyRegistered` - New email is already registered
    /// * `DisplayNameTaken` - New display name is already taken
    /// * `DatabaseError` - Database operation failed
    async fn save(&self, account: &Account) -> Result<(), AccountError>;
}
