//! Path parameter extractors
//!
//! Type-safe extraction of UUID ids from path parameters.

use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use uuid::Uuid;

use crate::response::ApiError;

/// Path extractor that rejects malformed ids with `INVALID_PATH_PARAMETER`
#[derive(Debug, Clone)]
pub struct IdPath<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for IdPath<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(inner) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_path(e.body_text()))?;

        Ok(IdPath(inner))
    }
}

#[derive(Debug, Deserialize)]
pub struct AccountIdPath {
    pub account_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct UserIdPath {
    pub user_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct MealIdPath {
    pub meal_id: Uuid,
}

/// `/users/{user_id}/meals/{meal_id}`
#[derive(Debug, Deserialize)]
pub struct UserMealPath {
    pub user_id: Uuid,
    pub meal_id: Uuid,
}
