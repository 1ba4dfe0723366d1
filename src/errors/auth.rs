//! Session verification errors
//!
//! Raised while turning an `Authorization` header into an [`AdminSession`].
//! Every variant maps to `401 Unauthorized` at the HTTP boundary.
//!
//! [`AdminSession`]: crate::auth::AdminSession

use thiserror::Error;

use super::CoreError;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No `Authorization: Bearer` header on the request
    #[error("Missing session token")]
    MissingToken,

    /// Signature, audience or structure check failed
    #[error("Invalid session token: {0}")]
    InvalidToken(String),

    /// `exp` is in the past
    #[error("Session token has expired")]
    TokenExpired,

    /// `nbf` is in the future
    #[error("Session token is not yet valid")]
    TokenNotYetValid,

    /// `iss` and `dest` name different shops
    #[error("Session token issuer does not match destination")]
    ShopMismatch,
}

impl From<AuthError> for CoreError {
    fn from(err: AuthError) -> Self {
        CoreError::unauthorized(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::CoreErrorKind;

    #[test]
    fn auth_errors_are_unauthorized() {
        let err: CoreError = AuthError::TokenExpired.into();
        assert_eq!(err.kind(), CoreErrorKind::Unauthorized);
        assert_eq!(err.message(), "Session token has expired");
    }
}
