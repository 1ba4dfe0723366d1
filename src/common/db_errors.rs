//! Database error categorization and message formatting
//!
//! Storage failures are sorted into a handful of kinds before they are folded
//! into [`CoreError`](crate::errors::CoreError), so the HTTP layer can pick a
//! status code without inspecting driver text.
//!
//! ```
//! use sizechart::common::db_errors::{format_db_error, DbErrorKind};
//! use sea_orm::DbErr;
//!
//! let err = DbErr::RecordNotFound("size chart".to_string());
//! let (kind, message) = format_db_error("find size chart", &err);
//! assert_eq!(kind, DbErrorKind::NotFound);
//! assert_eq!(message, "find size chart: record not found");
//! ```

use sea_orm::DbErr;

/// Categories of database errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbErrorKind {
    /// Query returned no results
    NotFound,

    /// Unique constraint violation
    UniqueViolation,

    /// Foreign key constraint violation
    ForeignKeyViolation,

    /// Connection could not be made or was lost
    ConnectionError,

    /// Query or pool acquire timed out
    Timeout,

    /// Database reported a lock conflict; SQLite reports these as "locked"
    Deadlock,

    /// Anything else
    Unknown,
}

impl DbErrorKind {
    /// Categorize a sea_orm database error
    pub fn from_db_err(err: &DbErr) -> Self {
        match err {
            DbErr::RecordNotFound(_) => Self::NotFound,
            DbErr::Conn(inner) => {
                if inner.to_string().to_lowercase().contains("timeout") {
                    Self::Timeout
                } else {
                    Self::ConnectionError
                }
            }
            DbErr::Exec(inner) | DbErr::Query(inner) => {
                Self::from_message(&inner.to_string().to_lowercase())
            }
            other => {
                let msg = other.to_string().to_lowercase();
                if msg.contains("timed out") || msg.contains("timeout") {
                    Self::Timeout
                } else {
                    Self::Unknown
                }
            }
        }
    }

    fn from_message(msg_lower: &str) -> Self {
        if msg_lower.contains("unique") || msg_lower.contains("duplicate") {
            Self::UniqueViolation
        } else if msg_lower.contains("foreign key") || msg_lower.contains("fk_") {
            Self::ForeignKeyViolation
        } else if msg_lower.contains("deadlock") || msg_lower.contains("database is locked") {
            Self::Deadlock
        } else if msg_lower.contains("timeout") {
            Self::Timeout
        } else {
            Self::Unknown
        }
    }

    /// Transient errors that might succeed on retry
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ConnectionError | Self::Timeout | Self::Deadlock)
    }
}

/// Format a database error with the operation that failed.
///
/// Unknown errors keep the driver message so it reaches the logs; callers must
/// not forward it to HTTP clients.
pub fn format_db_error(operation: &str, err: &DbErr) -> (DbErrorKind, String) {
    let kind = DbErrorKind::from_db_err(err);

    let message = match kind {
        DbErrorKind::NotFound => format!("{}: record not found", operation),
        DbErrorKind::UniqueViolation => format!("{}: duplicate key violation", operation),
        DbErrorKind::ForeignKeyViolation => {
            format!("{}: foreign key constraint violation", operation)
        }
        DbErrorKind::ConnectionError => format!("{}: database connection failed", operation),
        DbErrorKind::Timeout => format!("{}: query timeout", operation),
        DbErrorKind::Deadlock => format!("{}: database is locked", operation),
        DbErrorKind::Unknown => format!("{}: database error - {}", operation, err),
    };

    (kind, message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::RuntimeErr;

    fn exec(msg: &str) -> DbErr {
        DbErr::Exec(RuntimeErr::Internal(msg.to_string()))
    }

    #[test]
    fn test_categorize_record_not_found() {
        let kind = DbErrorKind::from_db_err(&DbErr::RecordNotFound("chart".to_string()));
        assert_eq!(kind, DbErrorKind::NotFound);
        assert!(!kind.is_retryable());
    }

    #[test]
    fn test_categorize_connection_errors() {
        let refused = DbErr::Conn(RuntimeErr::Internal("Connection refused".to_string()));
        assert_eq!(DbErrorKind::from_db_err(&refused), DbErrorKind::ConnectionError);

        let slow = DbErr::Conn(RuntimeErr::Internal("connect timeout".to_string()));
        assert_eq!(DbErrorKind::from_db_err(&slow), DbErrorKind::Timeout);
    }

    #[test]
    fn test_categorize_sqlite_constraint_messages() {
        assert_eq!(
            DbErrorKind::from_db_err(&exec("UNIQUE constraint failed: products.id")),
            DbErrorKind::UniqueViolation
        );
        assert_eq!(
            DbErrorKind::from_db_err(&exec("FOREIGN KEY constraint failed")),
            DbErrorKind::ForeignKeyViolation
        );
        assert_eq!(
            DbErrorKind::from_db_err(&exec("database is locked")),
            DbErrorKind::Deadlock
        );
    }

    #[test]
    fn test_retryable_kinds() {
        assert!(DbErrorKind::Deadlock.is_retryable());
        assert!(DbErrorKind::Timeout.is_retryable());
        assert!(!DbErrorKind::UniqueViolation.is_retryable());
        assert!(!DbErrorKind::Unknown.is_retryable());
    }

    #[test]
    fn test_format_db_error_unique_violation() {
        let (kind, message) = format_db_error("link product", &exec("UNIQUE constraint failed"));
        assert_eq!(kind, DbErrorKind::UniqueViolation);
        assert_eq!(message, "link product: duplicate key violation");
    }
}
