use chrono::Duration;

use crate::clock::SharedClock;
use crate::password::PasswordError;
use crate::password::PasswordHasher;
use crate::token::Claims;
use crate::token::SessionIssuer;
use crate::token::TokenError;

/// Credential verification coordinator.
///
/// Combines password verification with session issuance: a caller resolves
/// an identifier to a stored digest, and the authenticator turns digest plus
/// candidate password into a session token, or into `InvalidCredentials`.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    sessions: SessionIssuer,
}

/// Result of successful authentication.
pub struct AuthenticationResult {
    /// Bearer session token.
    pub access_token: String,
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    /// Password did not match the stored digest. Callers that also perform
    /// the identifier lookup must report a failed lookup with this same
    /// value, so the two cases cannot be told apart from outside.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("Token error: {0}")]
    TokenError(#[from] TokenError),
}

impl Authenticator {
    /// Authenticator with the default session lifetime.
    ///
    /// # Arguments
    /// * `secret` - signing secret for session tokens, from configuration
    /// * `clock` - time source for expiry stamping and checks
    pub fn new(secret: &[u8], clock: SharedClock) -> Self {
        Self {
            password_hasher: PasswordHasher::new(),
            sessions: SessionIssuer::new(secret, clock),
        }
    }

    /// Override the session lifetime.
    pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.sessions = self.sessions.with_ttl(ttl);
        self
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - hashing failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Verify a password against a stored digest and mint a session token.
    ///
    /// # Arguments
    /// * `password` - candidate plaintext
    /// * `stored_hash` - digest on record for the account
    /// * `subject` - identifier to stamp into the session (email address)
    /// * `label` - display label to stamp into the session
    ///
    /// # Errors
    /// * `InvalidCredentials` - password does not match
    /// * `PasswordError` - the stored digest could not be used
    /// * `TokenError` - session signing failed
    pub fn authenticate(
        &self,
        password: &str,
        stored_hash: &str,
        subject: &str,
        label: &str,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        let is_valid = self.password_hasher.verify(password, stored_hash)?;

        if !is_valid {
            return Err(AuthenticationError::InvalidCredentials);
        }

        let access_token = self.sessions.issue(subject, label)?;

        Ok(AuthenticationResult { access_token })
    }

    /// Verify a bearer token presented as a session credential.
    ///
    /// Rejects reset-kind tokens; see [`SessionIssuer::verify`].
    ///
    /// # Errors
    /// * `TokenError` - decoding failed or the token is not a session token
    pub fn verify_session(&self, token: &str) -> Result<Claims, TokenError> {
        self.sessions.verify(token)
    }
}
