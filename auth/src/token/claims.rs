use serde::Deserialize;
use serde::Serialize;

/// Purpose discriminator carried by single-purpose tokens.
///
/// Session tokens carry no kind at all. A kind value the deserializer does
/// not recognize fails decoding, so such tokens are rejected as malformed
/// rather than silently accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    /// Authorizes a password reset for the token's subject.
    PasswordReset,
}

/// Claim set carried by every issued token.
///
/// A closed record: each claim is an explicit typed field. There is no
/// open map for arbitrary extras, so a payload that does not fit this
/// shape cannot sneak claims past the type system.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    /// Subject identifier (the account's email address).
    pub sub: String,

    /// Human-readable label for the subject (display name).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Purpose discriminator; absent on session tokens.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<TokenKind>,

    /// Expiration (Unix timestamp). Stamped by the codec on every issued
    /// token; a token without it does not decode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,

    /// Issued at (Unix timestamp). Stamped by the codec.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
}

impl Claims {
    /// Claims for `subject`, with no label and no kind.
    pub fn for_subject(subject: impl Into<String>) -> Self {
        Self {
            sub: subject.into(),
            name: None,
            kind: None,
            exp: None,
            iat: None,
        }
    }

    /// Attach a display label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.name = Some(label.into());
        self
    }

    /// Mark the claims as belonging to a single-purpose token.
    pub fn with_kind(mut self, kind: TokenKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Whether these claims belong to a password-reset token.
    pub fn is_password_reset(&self) -> bool {
        self.kind == Some(TokenKind::PasswordReset)
    }
}
