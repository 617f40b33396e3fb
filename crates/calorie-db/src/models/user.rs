//! User database model

use sqlx::FromRow;
use uuid::Uuid;

/// Database model for users table (without the credential)
#[derive(Debug, Clone, FromRow)]
pub struct UserModel {
    pub id: Uuid,
    pub account_id: Uuid,
    pub username: String,
    pub role_id: i16,
}

/// User row together with its password hash, used only by signin
#[derive(Debug, Clone, FromRow)]
pub struct UserCredentialsModel {
    #[sqlx(flatten)]
    pub user: UserModel,
    pub password: String,
}
