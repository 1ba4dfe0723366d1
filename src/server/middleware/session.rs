use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use tracing::warn;

use crate::auth::{bearer_token, AdminSession};
use crate::errors::CoreError;
use crate::server::app::AppState;

/// Admin handlers take an `AdminSession` argument; the request never reaches
/// them unless the injected verifier accepts the bearer token.
#[async_trait]
impl FromRequestParts<AppState> for AdminSession {
    type Rejection = CoreError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok());

        let session = bearer_token(header).and_then(|token| state.sessions.verify(token));

        session.map_err(|err| {
            warn!(path = %parts.uri.path(), error = %err, "Rejected admin request");
            err.into()
        })
    }
}
