//! Signed access tokens
//!
//! Tokens are HS256 JWTs scoped to one user of one account. They carry no
//! role: the caller's role is read from storage on every request.

use chrono::{Duration, Utc};
use jsonwebtoken::{errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User the token was issued to
    pub sub: Uuid,
    pub account_id: Uuid,
    pub iat: i64,
    pub exp: i64,
}

/// Token handed out by signin
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessToken {
    pub token: String,
    pub token_type: String,
    /// Lifetime in seconds
    pub expires_in: i64,
}

#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    expiry_secs: i64,
}

impl JwtService {
    #[must_use]
    pub fn new(secret: &str, expiry_secs: i64) -> Self {
        let mut validation = Validation::default();
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            expiry_secs,
        }
    }

    /// Issue an access token for `user_id` in `account_id`
    pub fn issue(&self, user_id: Uuid, account_id: Uuid) -> Result<AccessToken, AppError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id,
            account_id,
            iat: now.timestamp(),
            exp: (now + Duration::seconds(self.expiry_secs)).timestamp(),
        };

        let token = jsonwebtoken::encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(AppError::internal)?;

        Ok(AccessToken {
            token,
            token_type: "Bearer".to_string(),
            expires_in: self.expiry_secs,
        })
    }

    /// Check the signature and expiry of `token` and return its claims
    ///
    /// Claims whose ids are not UUIDs fail to deserialize and count as an
    /// invalid token.
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AppError::TokenExpired,
                _ => AppError::InvalidToken,
            })
    }
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("expiry_secs", &self.expiry_secs)
            .finish_non_exhaustive()
    }
}
