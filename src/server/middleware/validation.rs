use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::errors::{CoreError, CoreResult};

pub trait Validate {
    fn validate(&self) -> CoreResult<()>;

    /// Error for a JSON body whose shape does not match `Self`.
    fn malformed(_body: &Value) -> CoreError
    where
        Self: Sized,
    {
        CoreError::validation("Request body does not match the expected format")
    }
}

/// JSON body extractor that answers `400` (not axum's `422`) when the body is
/// malformed or fails [`Validate`].
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = CoreError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| CoreError::validation(format!("Failed to read request body: {}", e)))?;

        let body: Value = serde_json::from_slice(&bytes).map_err(|e| {
            debug!(error = %e, "Request body is not JSON");
            CoreError::validation("Request body must be valid JSON")
        })?;

        let data: T = serde_json::from_value(body.clone()).map_err(|e| {
            debug!(error = %e, "Request body has the wrong shape");
            T::malformed(&body)
        })?;

        data.validate()?;
        Ok(Self(data))
    }
}
