pub mod claims;
pub mod codec;
pub mod errors;
pub mod reset;
pub mod session;

pub use claims::Claims;
pub use claims::TokenKind;
pub use codec::TokenCodec;
pub use errors::ResetTokenError;
pub use errors::TokenError;
pub use reset::IssuedResetToken;
pub use reset::ResetTokenManager;
pub use reset::ResetTokenState;
pub use session::SessionIssuer;
