//! Credential and token lifecycle library.
//!
//! The I/O-free core of the account service:
//! - Password hashing and verification (Argon2id)
//! - Signed expiring tokens (HS256) with a closed, typed claim set
//! - Password-reset token policy: single-use, enforced against stored state
//! - Session token issuance and verification
//!
//! Nothing here touches a database or the network. Callers inject a
//! [`clock::Clock`] and the signing secret; persistence of reset-token
//! state and credentials stays with the caller. All types are safe to
//! share across threads.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let digest = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &digest).unwrap());
//! ```
//!
//! ## Login and Sessions
//! ```
//! use auth::clock::SystemClock;
//! use auth::Authenticator;
//!
//! let auth = Authenticator::new(b"secret_key_at_least_32_bytes_long!", SystemClock::shared());
//!
//! // Signup: hash the password for storage
//! let digest = auth.hash_password("my_password").unwrap();
//!
//! // Login: verify and mint a session token
//! let session = auth
//!     .authenticate("my_password", &digest, "alice@example.com", "Alice")
//!     .unwrap();
//!
//! // Later: verify the bearer token
//! let claims = auth.verify_session(&session.access_token).unwrap();
//! assert_eq!(claims.sub, "alice@example.com");
//! ```
//!
//! ## Password Reset Tokens
//! ```
//! use auth::clock::SystemClock;
//! use auth::ResetTokenManager;
//! use auth::ResetTokenState;
//!
//! let resets = ResetTokenManager::new(b"secret_key_at_least_32_bytes_long!", SystemClock::shared());
//!
//! // Issue, then persist token + expiry on the account record
//! let issued = resets.issue("alice@example.com").unwrap();
//! let state = ResetTokenState::issued(issued.token.clone(), issued.expires_at);
//!
//! // Redeemable while the stored state still matches
//! assert!(resets.redeem(&issued.token, "alice@example.com", &state).is_ok());
//!
//! // Once the stored state is cleared the token is spent
//! let spent = ResetTokenState::none();
//! assert!(resets.redeem(&issued.token, "alice@example.com", &spent).is_err());
//! ```

pub mod authenticator;
pub mod clock;
pub mod password;
pub mod token;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::AuthenticationResult;
pub use authenticator::Authenticator;
pub use clock::Clock;
pub use clock::ManualClock;
pub use clock::SharedClock;
pub use clock::SystemClock;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use token::Claims;
pub use token::IssuedResetToken;
pub use token::ResetTokenError;
pub use token::ResetTokenManager;
pub use token::ResetTokenState;
pub use token::SessionIssuer;
pub use token::TokenCodec;
pub use token::TokenError;
pub use token::TokenKind;
