use std::fmt;
use std::str::FromStr;

use auth::ResetTokenState;
use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::account::errors::DisplayNameError;
use crate::account::errors::EmailAddressError;
use crate::account::errors::PasswordPolicyError;

/// Account aggregate entity.
///
/// Represents a registered account, including its credential hash and any
/// outstanding password-reset state.
#[derive(Debug, Clone)]
pub struct Account {
    pub id: AccountId,
    pub email: EmailAddress,
    pub display_name: DisplayName,
    pub password_hash: String,
    pub reset_token: ResetTokenState,
    pub created_at: DateTime<Utc>,
}

/// Account unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AccountId(pub Uuid);

impl AccountId {
    /// Generate a new random account ID.
    ///
    /// # Returns
    /// AccountId with random UUID v4
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Display name value type
///
/// Ensures the name is 3-64 characters of alphanumerics, underscore, hyphen,
/// and space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayName(String);

impl DisplayName {
    const MIN_LENGTH: usize = 3;
    const MAX_LENGTH: usize = 64;

    /// Create a new valid display name.
    ///
    /// # Arguments
    /// * `name` - Raw display name string
    ///
    /// # Returns
    /// Validated DisplayName value object
    ///
    /// # Errors
    /// * `TooShort` - Name shorter than 3 characters
    /// * `TooLong` - Name longer than 64 characters
    /// * `InvalidCharacters` - Contains characters outside the allowed set
    pub fn new(name: String) -> Result<Self, DisplayNameError> {
        let name = Self::with_valid_length(name)?;
        let name = Self::with_valid_chars(name)?;
        Ok(Self(name))
    }

    fn with_valid_length(name: String) -> Result<String, DisplayNameError> {
        let length = name.len();
        if length < Self::MIN_LENGTH {
            Err(DisplayNameError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            })
        } else if length > Self::MAX_LENGTH {
            Err(DisplayNameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(name)
        }
    }

    fn with_valid_chars(name: String) -> Result<String, DisplayNameError> {
        if name
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '-' || c == ' ')
        {
            Ok(name)
        } else {
            Err(DisplayNameError::InvalidCharacters)
        }
    }

    /// Get display name as string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Validates email format using RFC 5322 compliant parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated email address.
    ///
    /// # Arguments
    /// * `email` - Raw email string
    ///
    /// # Returns
    /// Validated EmailAddress value object
    ///
    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailAddressError> {
        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email))
            .map_err(|e| EmailAddressError::InvalidFormat(e.to_string()))
    }

    /// Get email as string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Plain-text password that satisfies the account password policy.
///
/// The policy requires at least 8 characters with one uppercase letter, one
/// lowercase letter, one digit, and one special character. The wrapped value
/// only lives long enough to be hashed.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    const MIN_LENGTH: usize = 8;
    const SPECIAL_CHARS: &'static str = "!@#$%^&*(),.?\":{}|<>";

    /// Validate a candidate password against the policy.
    ///
    /// # Arguments
    /// * `password` - Raw password string
    ///
    /// # Returns
    /// Validated Password value object
    ///
    /// # Errors
    /// * `TooShort` - Fewer than 8 characters
    /// * `MissingUppercase` - No uppercase letter
    /// * `MissingLowercase` - No lowercase letter
    /// * `MissingDigit` - No digit
    /// * `MissingSpecialChar` - No character from the special set
    pub fn new(password: String) -> Result<Self, PasswordPolicyError> {
        if password.len() < Self::MIN_LENGTH {
            return Err(PasswordPolicyError::TooShort {
                min: Self::MIN_LENGTH,
                actual: password.len(),
            });
        }
        if !password.chars().any(|c| c.is_ascii_uppercase()) {
            return Err(PasswordPolicyError::MissingUppercase);
        }
        if !password.chars().any(|c| c.is_ascii_lowercase()) {
            return Err(PasswordPolicyError::MissingLowercase);
        }
        if !password.chars().any(|c| c.is_ascii_digit()) {
            return Err(PasswordPolicyError::MissingDigit);
        }
        if !password.chars().any(|c| Self::SPECIAL_CHARS.contains(c)) {
            return Err(PasswordPolicyError::MissingSpecialChar);
        }
        Ok(Self(password))
    }

    /// Get the plain text for hashing.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Keep the plain text out of logs and panic messages.
impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(redacted)")
    }
}

/// Command to register a new account with domain types
#[derive(Debug)]
pub struct SignupCommand {
    pub email: EmailAddress,
    pub display_name: DisplayName,
    pub password: Password,
}

impl SignupCommand {
    /// Construct a new signup command.
    ///
    /// # Arguments
    /// * `email` - Validated email address
    /// * `display_name` - Validated display name
    /// * `password` - Policy-checked password (will be hashed by service)
    ///
    /// # Returns
    /// SignupCommand with validated fields
    pub fn new(email: EmailAddress, display_name: DisplayName, password: Password) -> Self {
        Self {
            email,
            display_name,
            password,
        }
    }
}

/// Result of a successful login: the account plus a bearer token for it.
#[derive(Debug)]
pub struct AuthenticatedSession {
    pub account: Account,
    pub access_token: String,
}

/// Result of a password-reset request.
///
/// Carries the issued token and its expiry alongside the address the reset
/// email was sent to.
#[derive(Debug)]
pub struct PasswordResetIssued {
    pub email: EmailAddress,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}
