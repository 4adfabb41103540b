use chrono::Duration;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use crate::clock::SharedClock;

use super::claims::Claims;
use super::errors::TokenError;

/// Signs and verifies compact expiring tokens.
///
/// Tokens are JWTs signed with HS256 over a process-wide secret. Every
/// token the codec emits carries an expiry; decoding checks the signature
/// before the expiry, so a forged token reports as forged even when its
/// claimed lifetime has also passed.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    clock: SharedClock,
}

impl TokenCodec {
    /// Create a codec over a shared secret.
    ///
    /// The secret comes from configuration, never from code, and should be
    /// at least 32 bytes for HS256. Rotating it invalidates every
    /// outstanding token.
    pub fn new(secret: &[u8], clock: SharedClock) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
            clock,
        }
    }

    /// Sign `claims` into a token that expires `ttl` from now.
    ///
    /// Stamps `iat` and `exp` from the injected clock; whatever the caller
    /// left in those fields is overwritten.
    ///
    /// # Errors
    /// * `EncodingFailed` - serialization or signing failed
    pub fn encode(&self, claims: &Claims, ttl: Duration) -> Result<String, TokenError> {
        let now = self.clock.now();
        let mut claims = claims.clone();
        claims.iat = Some(now.timestamp());
        claims.exp = Some((now + ttl).timestamp());

        let header = Header::new(self.algorithm);

        encode(&header, &claims, &self.encoding_key)
            .map_err(|e| TokenError::EncodingFailed(e.to_string()))
    }

    /// Verify a token and return its claims.
    ///
    /// # Errors
    /// * `BadSignature` - the signature does not match the payload
    /// * `Expired` - `exp` is at or before the current clock reading
    /// * `Malformed` - anything structural: segment count, base64, claim
    ///   shape, missing `exp`, foreign algorithm
    pub fn decode(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(self.algorithm);
        // Expiry is checked below against the injected clock, not against
        // the library's reading of system time.
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        let token_data =
            decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => TokenError::BadSignature,
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Malformed,
            })?;

        let claims = token_data.claims;
        let exp = claims.exp.ok_or(TokenError::Malformed)?;
        if exp <= self.clock.now().timestamp() {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}
