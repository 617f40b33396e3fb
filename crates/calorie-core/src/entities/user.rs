//! User entity - a member of an account

use uuid::Uuid;

use crate::authorization::Identity;
use crate::value_objects::Role;

/// User entity
///
/// The credential hash never leaves the directory, so it is not part of
/// the entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub account_id: Uuid,
    pub username: String,
    pub role: Role,
}

impl User {
    /// Create a new user with a fresh identifier
    pub fn new(account_id: Uuid, username: impl Into<String>, role: Role) -> Self {
        Self {
            id: Uuid::new_v4(),
            account_id,
            username: username.into(),
            role,
        }
    }

    /// Identity used by the authorization evaluator
    #[inline]
    pub fn identity(&self) -> Identity {
        Identity::new(self.id, self.account_id, self.role)
    }

    #[inline]
    pub fn is_owner(&self) -> bool {
        self.role == Role::Owner
    }

    /// Update the username
    pub fn set_username(&mut self, username: String) {
        self.username = username;
    }

    /// Update the role
    pub fn set_role(&mut self, role: Role) {
        self.role = role;
    }
}

/// User about to be inserted, carrying its credential hash
#[derive(Debug, Clone)]
pub struct NewUser {
    pub user: User,
    pub password_hash: String,
}

impl NewUser {
    /// Owner of a brand new account
    pub fn owner(username: impl Into<String>, password_hash: String) -> Self {
        Self {
            user: User::new(Uuid::new_v4(), username, Role::Owner),
            password_hash,
        }
    }

    /// Member of an existing account
    pub fn member(
        account_id: Uuid,
        username: impl Into<String>,
        role: Role,
        password_hash: String,
    ) -> Self {
        Self {
            user: User::new(account_id, username, role),
            password_hash,
        }
    }
}
