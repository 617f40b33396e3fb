//! Authorization evaluator
//!
//! A pure predicate over `(caller, acting_as, action)`. Callers resolve the
//! target user first, build an [`ExecutionContext`], then ask [`authorize`]
//! before touching any data.

use uuid::Uuid;

use crate::error::DomainError;
use crate::value_objects::{Capabilities, Role};

/// Who someone is inside the system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Identity {
    pub user_id: Uuid,
    pub account_id: Uuid,
    pub role: Role,
}

impl Identity {
    pub fn new(user_id: Uuid, account_id: Uuid, role: Role) -> Self {
        Self {
            user_id,
            account_id,
            role,
        }
    }
}

/// The caller and the user whose data the operation touches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutionContext {
    pub caller: Identity,
    pub acting_as: Identity,
}

impl ExecutionContext {
    /// Caller operating on their own data
    pub fn for_self(caller: Identity) -> Self {
        Self {
            caller,
            acting_as: caller,
        }
    }

    /// Caller operating on another user's data
    pub fn on_behalf_of(caller: Identity, target: Identity) -> Self {
        Self {
            caller,
            acting_as: target,
        }
    }

    #[inline]
    pub fn is_self(&self) -> bool {
        self.caller.user_id == self.acting_as.user_id
    }

    /// User whose records are read or written
    #[inline]
    pub fn target_user_id(&self) -> Uuid {
        self.acting_as.user_id
    }
}

/// Requested operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ListUsers,
    CreateUser { role: Role },
    ReadUser,
    UpdateUser { role_change: Option<Role> },
    DeleteUser,
    /// Read meals or settings
    ReadLedger,
    /// Create, update or delete meals, or change settings
    WriteLedger,
}

impl Action {
    fn describe(self) -> String {
        match self {
            Action::ListUsers => "list users".to_string(),
            Action::CreateUser { role } => format!("create a user with role {role}"),
            Action::ReadUser => "read another user".to_string(),
            Action::UpdateUser {
                role_change: Some(role),
            } => format!("assign role {role}"),
            Action::UpdateUser { role_change: None } => "update this user".to_string(),
            Action::DeleteUser => "delete this user".to_string(),
            Action::ReadLedger => "read another user's meals or settings".to_string(),
            Action::WriteLedger => "change another user's meals or settings".to_string(),
        }
    }
}

/// Decide whether `ctx.caller` may perform `action` on `ctx.acting_as`
///
/// Targets outside the caller's account are reported as `UserNotFound`.
/// Only signup creates owners, so any attempt to create or assign the owner
/// role fails with `InvalidRoleId`.
pub fn authorize(ctx: &ExecutionContext, action: Action) -> Result<(), DomainError> {
    let caller = ctx.caller;
    let target = ctx.acting_as;

    if caller.account_id != target.account_id {
        return Err(DomainError::UserNotFound(target.user_id));
    }

    let require = |capability: Capabilities| {
        if caller.role.can(capability) {
            Ok(())
        } else {
            Err(DomainError::InsufficientPermissions(format!(
                "role {} cannot {}",
                caller.role,
                action.describe()
            )))
        }
    };

    // Capability needed to modify a user with the given current role
    let manage = |role: Role| {
        if role.is_standard() {
            Capabilities::MANAGE_STANDARD_USERS
        } else {
            Capabilities::MANAGE_PRIVILEGED_USERS
        }
    };

    match action {
        Action::ReadLedger | Action::WriteLedger => {
            if ctx.is_self() {
                require(Capabilities::MANAGE_OWN_DATA)
            } else {
                require(Capabilities::ACT_ON_BEHALF)
            }
        }
        Action::ListUsers => require(Capabilities::LIST_USERS),
        Action::CreateUser { role } => match role {
            Role::Owner => Err(DomainError::InvalidRoleId(role.id())),
            role if role.is_standard() => require(Capabilities::CREATE_STANDARD_USERS),
            _ => require(Capabilities::MANAGE_PRIVILEGED_USERS),
        },
        Action::ReadUser => {
            if ctx.is_self() {
                require(Capabilities::MANAGE_OWN_DATA)
            } else {
                require(Capabilities::LIST_USERS)
            }
        }
        Action::UpdateUser { role_change } => {
            if let Some(role) = role_change {
                if role == Role::Owner {
                    return Err(DomainError::InvalidRoleId(role.id()));
                }
                require(Capabilities::ASSIGN_ROLES)?;
            }
            if ctx.is_self() {
                require(Capabilities::MANAGE_OWN_DATA)
            } else {
                require(manage(target.role))
            }
        }
        Action::DeleteUser => require(manage(target.role)),
    }
}
