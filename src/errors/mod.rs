//! Error types for the size chart service
//!
//! [`CoreError`] is the single error that crosses module boundaries. Its
//! [`CoreErrorKind`] decides the HTTP status once the error reaches a handler.
//! [`AuthError`] describes why a session token was rejected and folds into
//! `CoreError::unauthorized`.

pub mod auth;
pub mod core_error;

pub use auth::AuthError;
pub use core_error::{CoreError, CoreErrorKind};

/// Result type alias for repository and handler operations
pub type CoreResult<T> = Result<T, CoreError>;
