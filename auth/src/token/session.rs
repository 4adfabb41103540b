use chrono::Duration;

use crate::clock::SharedClock;

use super::claims::Claims;
use super::codec::TokenCodec;
use super::errors::TokenError;

/// Default session lifetime.
pub const DEFAULT_SESSION_TTL_MINUTES: i64 = 30;

/// Issues and verifies session (access) tokens.
///
/// Session claims carry the subject and a display label and no kind;
/// absence of a kind is what marks a token as a session.
pub struct SessionIssuer {
    codec: TokenCodec,
    ttl: Duration,
}

impl SessionIssuer {
    /// Issuer with the default 30 minute lifetime.
    pub fn new(secret: &[u8], clock: SharedClock) -> Self {
        Self {
            codec: TokenCodec::new(secret, clock),
            ttl: Duration::minutes(DEFAULT_SESSION_TTL_MINUTES),
        }
    }

    /// Override the session lifetime.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Issue a session token for an authenticated subject.
    ///
    /// # Errors
    /// * `EncodingFailed` - signing failed
    pub fn issue(&self, subject: &str, label: &str) -> Result<String, TokenError> {
        let claims = Claims::for_subject(subject).with_label(label);
        self.codec.encode(&claims, self.ttl)
    }

    /// Verify a bearer token presented as a session credential.
    ///
    /// Single-purpose tokens are rejected here even when otherwise valid:
    /// a password-reset token must never double as a session.
    ///
    /// # Errors
    /// * `WrongKind` - the token carries a purpose discriminator
    /// * `BadSignature` / `Expired` / `Malformed` - from decoding
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let claims = self.codec.decode(token)?;

        if claims.kind.is_some() {
            return Err(TokenError::WrongKind);
        }

        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use chrono::Utc;

    use crate::clock::ManualClock;
    use crate::token::reset::ResetTokenManager;

    use super::*;

    const SECRET: &[u8] = b"test_secret_key_at_least_32_bytes!";

    #[test]
    fn test_issue_and_verify() {
        let clock = ManualClock::shared(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap());
        let sessions = SessionIssuer::new(SECRET, clock);

        let token = sessions.issue("alice@example.com", "Alice").unwrap();
        let claims = sessions.verify(&token).unwrap();

        assert_eq!(claims.sub, "alice@example.com");
        assert_eq!(claims.name.as_deref(), Some("Alice"));
        assert_eq!(claims.kind, None);
    }

    #[test]
    fn test_session_expires_after_default_ttl() {
        let clock = ManualClock::shared(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap());
        let sessions = SessionIssuer::new(SECRET, clock.clone());

        let token = sessions.issue("alice@example.com", "Alice").unwrap();

        clock.advance(Duration::minutes(29));
        assert!(sessions.verify(&token).is_ok());

        clock.advance(Duration::minutes(2));
        assert_eq!(sessions.verify(&token), Err(TokenError::Expired));
    }

    #[test]
    fn test_reset_token_is_rejected_as_session() {
        let clock = ManualClock::shared(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap());
        let sessions = SessionIssuer::new(SECRET, clock.clone());
        let resets = ResetTokenManager::new(SECRET, clock);

        let issued = resets.issue("alice@example.com").unwrap();

        // Unexpired and correctly signed, but the wrong kind of token.
        assert_eq!(sessions.verify(&issued.token), Err(TokenError::WrongKind));
    }

    #[test]
    fn test_custom_ttl() {
        let clock = ManualClock::shared(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap());
        let sessions = SessionIssuer::new(SECRET, clock.clone()).with_ttl(Duration::hours(8));

        let token = sessions.issue("alice@example.com", "Alice").unwrap();

        clock.advance(Duration::hours(7));
        assert!(sessions.verify(&token).is_ok());

        clock.advance(Duration::hours(2));
        assert_eq!(sessions.verify(&token), Err(TokenError::Expired));
    }
}
