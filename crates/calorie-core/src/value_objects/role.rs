//! Account role - ordered privilege level of a user inside an account

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Capabilities;
use crate::error::DomainError;

/// Role of a user inside its account
///
/// Stored as a small integer `role_id`. The derived ordering follows the
/// discriminants: `User < UserManager < Admin < Owner`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "i16", try_from = "i16")]
#[repr(i16)]
pub enum Role {
    User = 0,
    UserManager = 1,
    Admin = 2,
    Owner = 3,
}

impl Role {
    /// Every role, lowest first
    pub const ALL: [Role; 4] = [Role::User, Role::UserManager, Role::Admin, Role::Owner];

    /// Numeric id used in storage and on the wire
    #[inline]
    pub fn id(self) -> i16 {
        self as i16
    }

    /// Resolve any stored role id, including the owner
    pub fn from_id(id: i16) -> Result<Self, DomainError> {
        match id {
            0 => Ok(Role::User),
            1 => Ok(Role::UserManager),
            2 => Ok(Role::Admin),
            3 => Ok(Role::Owner),
            other => Err(DomainError::InvalidRoleId(other)),
        }
    }

    /// Resolve a role id supplied by an API caller
    ///
    /// The owner role is only ever created by signup, so it is rejected here.
    pub fn assignable(id: i16) -> Result<Self, DomainError> {
        match Self::from_id(id)? {
            Role::Owner => Err(DomainError::InvalidRoleId(id)),
            role => Ok(role),
        }
    }

    /// Capability set carried by this role
    pub fn capabilities(self) -> Capabilities {
        match self {
            Role::User => Capabilities::MANAGE_OWN_DATA,
            Role::UserManager => Capabilities::USER_MANAGER,
            Role::Admin => Capabilities::ADMIN,
            Role::Owner => Capabilities::OWNER,
        }
    }

    /// Check if this role carries a capability
    #[inline]
    pub fn can(self, capability: Capabilities) -> bool {
        self.capabilities().has(capability)
    }

    /// Standard users are the only ones a user-manager may manage
    #[inline]
    pub fn is_standard(self) -> bool {
        self == Role::User
    }

    pub fn name(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::UserManager => "user_manager",
            Role::Admin => "admin",
            Role::Owner => "owner",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<Role> for i16 {
    fn from(role: Role) -> Self {
        role.id()
    }
}

impl TryFrom<i16> for Role {
    type Error = DomainError;

    fn try_from(id: i16) -> Result<Self, Self::Error> {
        Role::from_id(id)
    }
}
