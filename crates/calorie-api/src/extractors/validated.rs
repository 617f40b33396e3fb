//! JSON body extractor that runs `validator` rules

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::response::ApiError;

/// Request body that parsed and passed its `Validate` rules
///
/// Parse failures become `INVALID_REQUEST_BODY`, rule failures
/// `VALIDATION_ERROR` with per-field details.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(body) = Json::<T>::from_request(req, state)
            .await
            .map_err(body_rejection)?;
        body.validate()?;
        Ok(Self(body))
    }
}

fn body_rejection(rejection: JsonRejection) -> ApiError {
    ApiError::InvalidBody(rejection.body_text())
}
