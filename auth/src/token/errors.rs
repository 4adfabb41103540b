use thiserror::Error;

/// Error type for token encode/decode operations.
///
/// Decode failures are deliberately coarse. Callers learn whether a token
/// was malformed, forged, or expired, and nothing more; the variants carry
/// no detail about what exactly failed inside the payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    /// Not a structurally valid token: wrong segment count, bad base64,
    /// invalid JSON, a claim shape that does not fit, a missing required
    /// claim, or a foreign algorithm header.
    #[error("Token is malformed")]
    Malformed,

    /// Structurally valid, but the signature does not match the payload.
    #[error("Token signature is invalid")]
    BadSignature,

    /// Signature checks out but the expiry has passed.
    #[error("Token is expired")]
    Expired,

    /// Valid token of a kind this boundary does not accept.
    #[error("Token kind is not accepted here")]
    WrongKind,
}

/// Collapsed failure for the password-reset flow.
///
/// Expired, forged, superseded, already-used and wrong-subject tokens are
/// all reported identically; callers cannot probe which case they hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ResetTokenError {
    #[error("Invalid or expired reset token")]
    InvalidOrExpired,
}
