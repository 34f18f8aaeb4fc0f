//! Operating roles and the role gate.
//!
//! Role names must match the `chk_users_role` constraint in
//! `20260301000001_create_users.sql`. There is no hierarchy: a SuperAdmin
//! cannot act as, say, the Finance Manager.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

pub const ROLE_SUPER_ADMIN: &str = "SuperAdmin";
pub const ROLE_OPS_MANAGER: &str = "OpsManager";
pub const ROLE_HR: &str = "HR";
pub const ROLE_OPS_SUPERVISOR: &str = "OpsSupervisor";
pub const ROLE_FLEET_MANAGER: &str = "FleetManager";
pub const ROLE_FINANCE_MANAGER: &str = "FinanceManager";

/// Closed set of roles a user account can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "SuperAdmin")]
    SuperAdmin,
    #[serde(rename = "OpsManager")]
    OpsManager,
    #[serde(rename = "HR")]
    Hr,
    #[serde(rename = "OpsSupervisor")]
    OpsSupervisor,
    #[serde(rename = "FleetManager")]
    FleetManager,
    #[serde(rename = "FinanceManager")]
    FinanceManager,
}

impl Role {
    pub const ALL: [Role; 6] = [
        Role::SuperAdmin,
        Role::OpsManager,
        Role::Hr,
        Role::OpsSupervisor,
        Role::FleetManager,
        Role::FinanceManager,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::SuperAdmin => ROLE_SUPER_ADMIN,
            Role::OpsManager => ROLE_OPS_MANAGER,
            Role::Hr => ROLE_HR,
            Role::OpsSupervisor => ROLE_OPS_SUPERVISOR,
            Role::FleetManager => ROLE_FLEET_MANAGER,
            Role::FinanceManager => ROLE_FINANCE_MANAGER,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| CoreError::Validation(format!("Unknown role '{s}'")))
    }
}

/// The authenticated user performing a workflow action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub user_id: DbId,
    /// Role name as carried by the session (e.g. the JWT `role` claim).
    pub role: String,
}

impl Actor {
    pub fn new(user_id: DbId, role: impl Into<String>) -> Self {
        Self {
            user_id,
            role: role.into(),
        }
    }
}

/// Exact-match capability check. No side effects.
pub fn authorize(actor_role: &str, required: Role) -> bool {
    actor_role == required.as_str()
}

/// Like [`authorize`] but yields [`CoreError::Forbidden`] on mismatch.
pub fn require_role(actor: &Actor, required: Role) -> Result<(), CoreError> {
    if authorize(&actor.role, required) {
        Ok(())
    } else {
        Err(CoreError::Forbidden(format!("{required} role required")))
    }
}
