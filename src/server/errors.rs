use std::collections::BTreeMap;
use std::error::Error as _;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;

use crate::errors::{CoreError, CoreErrorKind};

/// JSON body of every error response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<BTreeMap<String, String>>,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }
}

pub fn status_for(kind: CoreErrorKind) -> StatusCode {
    match kind {
        CoreErrorKind::Validation => StatusCode::BAD_REQUEST,
        CoreErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
        CoreErrorKind::NotFound => StatusCode::NOT_FOUND,
        CoreErrorKind::Conflict => StatusCode::CONFLICT,
        CoreErrorKind::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
        CoreErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for CoreError {
    fn into_response(self) -> Response {
        let status = status_for(self.kind());

        let body = match self.kind() {
            CoreErrorKind::Internal | CoreErrorKind::Unavailable => {
                error!(error = %self, cause = ?self.source(), "Request failed");
                ErrorBody::new(if status == StatusCode::SERVICE_UNAVAILABLE {
                    "Service temporarily unavailable"
                } else {
                    "Internal server error"
                })
            }
            _ => ErrorBody {
                error: self.message().to_string(),
                details: self.fields().cloned(),
            },
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::DbErr;

    #[test]
    fn kinds_map_to_statuses() {
        assert_eq!(status_for(CoreErrorKind::Validation), StatusCode::BAD_REQUEST);
        assert_eq!(status_for(CoreErrorKind::Unauthorized), StatusCode::UNAUTHORIZED);
        assert_eq!(status_for(CoreErrorKind::NotFound), StatusCode::NOT_FOUND);
        assert_eq!(status_for(CoreErrorKind::Conflict), StatusCode::CONFLICT);
        assert_eq!(
            status_for(CoreErrorKind::Unavailable),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            status_for(CoreErrorKind::Internal),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn not_found_response_keeps_details() {
        let response = CoreError::not_found("SizeChart", "abc").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn internal_response_hides_driver_text() {
        let err: CoreError = DbErr::Custom("secret table layout".to_string()).into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
