use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;

use crate::clock::SharedClock;

use super::claims::Claims;
use super::claims::TokenKind;
use super::codec::TokenCodec;
use super::errors::ResetTokenError;
use super::errors::TokenError;

/// Default reset-token lifetime.
pub const DEFAULT_RESET_TTL_HOURS: i64 = 24;

/// A freshly issued reset token, together with the expiry the caller must
/// persist alongside it.
#[derive(Debug, Clone, PartialEq)]
pub struct IssuedResetToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Reset-token state persisted on an account record.
///
/// Holds the last-issued token and its expiry, or nothing. The pair is the
/// revocation mechanism: a signed token is only redeemable while the stored
/// copy still matches it, so clearing the pair after a successful reset
/// makes the token single-use, and overwriting it supersedes any earlier
/// token immediately.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResetTokenState {
    pub token: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl ResetTokenState {
    /// No reset in flight.
    pub fn none() -> Self {
        Self::default()
    }

    /// State recording a just-issued token.
    pub fn issued(token: String, expires_at: DateTime<Utc>) -> Self {
        Self {
            token: Some(token),
            expires_at: Some(expires_at),
        }
    }

    /// Drop any recorded token, spending it.
    pub fn clear(&mut self) {
        self.token = None;
        self.expires_at = None;
    }
}

/// Issues password-reset tokens and decides whether a candidate token may
/// be redeemed against the state stored for an account.
pub struct ResetTokenManager {
    codec: TokenCodec,
    ttl: Duration,
    clock: SharedClock,
}

impl ResetTokenManager {
    /// Manager with the default 24 hour lifetime.
    pub fn new(secret: &[u8], clock: SharedClock) -> Self {
        Self {
            codec: TokenCodec::new(secret, clock.clone()),
            ttl: Duration::hours(DEFAULT_RESET_TTL_HOURS),
            clock,
        }
    }

    /// Override the token lifetime.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Lifetime stamped into issued tokens.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a reset token for `subject`.
    ///
    /// Returns the token plus its expiry for the caller to persist. The
    /// token only becomes redeemable once the caller has stored the pair;
    /// storing a later pair supersedes this one.
    ///
    /// # Errors
    /// * `EncodingFailed` - signing failed
    pub fn issue(&self, subject: &str) -> Result<IssuedResetToken, TokenError> {
        let claims = Claims::for_subject(subject).with_kind(TokenKind::PasswordReset);
        let token = self.codec.encode(&claims, self.ttl)?;
        let expires_at = self.clock.now() + self.ttl;

        Ok(IssuedResetToken { token, expires_at })
    }

    /// Check a candidate token cryptographically and return its subject.
    ///
    /// This is the lookup half of redemption: the returned subject tells
    /// the caller which account's stored state to fetch. It deliberately
    /// says nothing about whether the token is still the stored one; only
    /// [`redeem`](Self::redeem) decides that.
    ///
    /// # Errors
    /// * `InvalidOrExpired` - the token does not verify, is expired, or is
    ///   not a reset token
    pub fn verify(&self, candidate: &str) -> Result<String, ResetTokenError> {
        let claims = self
            .codec
            .decode(candidate)
            .map_err(|_| ResetTokenError::InvalidOrExpired)?;

        if !claims.is_password_reset() {
            return Err(ResetTokenError::InvalidOrExpired);
        }

        Ok(claims.sub)
    }

    /// Decide whether `candidate` may reset the password of `subject`.
    ///
    /// Requires a verifiable, unexpired token of the reset kind, issued for
    /// `subject`, matching the stored token exactly, with the stored expiry
    /// still in the future. On success the caller must clear the stored
    /// state and persist the new credential in the same write.
    ///
    /// # Errors
    /// * `InvalidOrExpired` - any requirement failed; forged, expired,
    ///   superseded, already-used and wrong-subject candidates are
    ///   indistinguishable to the caller
    pub fn redeem(
        &self,
        candidate: &str,
        subject: &str,
        stored: &ResetTokenState,
    ) -> Result<(), ResetTokenError> {
        let decoded_subject = self.verify(candidate)?;

        if decoded_subject != subject {
            return Err(ResetTokenError::InvalidOrExpired);
        }

        if stored.token.as_deref() != Some(candidate) {
            return Err(ResetTokenError::InvalidOrExpired);
        }

        match stored.expires_at {
            Some(expires_at) if self.clock.now() < expires_at => Ok(()),
            _ => Err(ResetTokenError::InvalidOrExpired),
        }
    }
}
