//! User entity <-> model mapper

use calorie_core::entities::User;
use calorie_core::error::DomainError;
use calorie_core::value_objects::Role;

use crate::models::UserModel;

/// Convert UserModel to User entity
///
/// Fails only if the stored role id is outside the known roles.
impl TryFrom<UserModel> for User {
    type Error = DomainError;

    fn try_from(model: UserModel) -> Result<Self, Self::Error> {
        let role = Role::from_id(model.role_id).map_err(|_| {
            DomainError::InternalError(format!(
                "user {} has unknown role id {}",
                model.id, model.role_id
            ))
        })?;

        Ok(User {
            id: model.id,
            account_id: model.account_id,
            username: model.username,
            role,
        })
    }
}
