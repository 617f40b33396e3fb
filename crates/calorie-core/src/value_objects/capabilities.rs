//! Capability bitflags for the account role model
//!
//! Each role maps to a fixed capability set; the authorization evaluator
//! only ever asks "does the caller's role carry capability X".

use bitflags::bitflags;

bitflags! {
    /// What a role is allowed to do inside its own account
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Capabilities: u32 {
        /// Read and rename the caller's own record, manage own meals and settings
        const MANAGE_OWN_DATA         = 1 << 0;
        /// List and read other users of the account
        const LIST_USERS              = 1 << 1;
        /// Create users with the standard role
        const CREATE_STANDARD_USERS   = 1 << 2;
        /// Update and delete users with the standard role
        const MANAGE_STANDARD_USERS   = 1 << 3;
        /// Create, update and delete users with a non-standard role
        const MANAGE_PRIVILEGED_USERS = 1 << 4;
        /// Change the role of a user
        const ASSIGN_ROLES            = 1 << 5;
        /// Read and write meals and settings of another user
        const ACT_ON_BEHALF           = 1 << 6;

        /// Everything a user-manager may do
        const USER_MANAGER = Self::MANAGE_OWN_DATA.bits()
            | Self::LIST_USERS.bits()
            | Self::CREATE_STANDARD_USERS.bits()
            | Self::MANAGE_STANDARD_USERS.bits();

        /// Everything an account owner may do
        const OWNER = Self::USER_MANAGER.bits()
            | Self::MANAGE_PRIVILEGED_USERS.bits()
            | Self::ASSIGN_ROLES.bits();

        /// Everything an admin may do
        const ADMIN = Self::OWNER.bits() | Self::ACT_ON_BEHALF.bits();
    }
}

impl Capabilities {
    /// Check if the set carries a required capability
    #[inline]
    pub fn has(&self, capability: Capabilities) -> bool {
        self.contains(capability)
    }
}
