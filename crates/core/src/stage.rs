//! Onboarding stages and offboarding statuses.
//!
//! Both are strictly linear. The stored text of each variant is fixed (it is
//! what the `drivers.onboarding_stage` and `offboardings.status` columns
//! hold), and any other value is rejected as a validation error.

use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;
use crate::roles::Role;

macro_rules! define_stage_enum {
    (
        $(#[$meta:meta])*
        $name:ident ($kind:literal) {
            $( $(#[$vmeta:meta])* $variant:ident = $label:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
            serde::Serialize, serde::Deserialize,
        )]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $label)] $variant ),+
        }

        impl $name {
            /// Every variant in workflow order.
            pub const ALL: &'static [$name] = &[ $( $name::$variant ),+ ];

            /// The stored text for this variant.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( $name::$variant => $label ),+
                }
            }

            /// The variant that follows this one, or `None` at the end.
            pub fn next(self) -> Option<Self> {
                let idx = Self::ALL.iter().position(|v| *v == self)?;
                Self::ALL.get(idx + 1).copied()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str() == s)
                    .ok_or_else(|| CoreError::Validation(format!("Unknown {} '{s}'", $kind)))
            }
        }
    };
}

define_stage_enum! {
    /// Position of a driver in the onboarding sequence.
    OnboardingStage ("onboarding stage") {
        OperationsManager = "Operations Manager",
        Hr = "HR",
        OperationsSupervisor = "Operations Supervisor",
        FleetManager = "Fleet Manager",
        Finance = "Finance",
        HrFinal = "HR Final",
        Completed = "Completed",
    }
}

define_stage_enum! {
    /// Position of an offboarding record in the exit sequence.
    OffboardingStatus ("offboarding status") {
        Requested = "Requested",
        OpsSupervisor = "OpsSupervisor",
        Fleet = "Fleet",
        Finance = "Finance",
        Hr = "HR",
        PendingTamm = "pending_tamm",
        Completed = "Completed",
    }
}

impl OnboardingStage {
    /// Role that acts on a driver sitting in this stage.
    pub fn owner(self) -> Option<Role> {
        match self {
            OnboardingStage::OperationsManager => Some(Role::OpsManager),
            OnboardingStage::Hr | OnboardingStage::HrFinal => Some(Role::Hr),
            OnboardingStage::OperationsSupervisor => Some(Role::OpsSupervisor),
            OnboardingStage::FleetManager => Some(Role::FleetManager),
            OnboardingStage::Finance => Some(Role::FinanceManager),
            OnboardingStage::Completed => None,
        }
    }

    /// Stages whose queue belongs to `role`.
    pub fn owned_by(role: Role) -> Vec<OnboardingStage> {
        Self::ALL
            .iter()
            .copied()
            .filter(|s| s.owner() == Some(role))
            .collect()
    }
}

impl OffboardingStatus {
    /// Statuses that count as an active (non-terminal) offboarding.
    ///
    /// This single set drives the duplicate-request check, the partial
    /// unique index on `offboardings`, and the dashboard counts.
    pub const ACTIVE: &'static [OffboardingStatus] = &[
        OffboardingStatus::Requested,
        OffboardingStatus::OpsSupervisor,
        OffboardingStatus::Fleet,
        OffboardingStatus::Finance,
        OffboardingStatus::Hr,
        OffboardingStatus::PendingTamm,
    ];

    pub fn is_active(self) -> bool {
        self != OffboardingStatus::Completed
    }

    /// Role that acts on an offboarding sitting in this status.
    pub fn owner(self) -> Option<Role> {
        match self {
            OffboardingStatus::Requested | OffboardingStatus::OpsSupervisor => {
                Some(Role::OpsSupervisor)
            }
            OffboardingStatus::Fleet | OffboardingStatus::PendingTamm => Some(Role::FleetManager),
            OffboardingStatus::Finance => Some(Role::FinanceManager),
            OffboardingStatus::Hr => Some(Role::Hr),
            OffboardingStatus::Completed => None,
        }
    }

    /// Statuses whose queue belongs to `role`.
    pub fn owned_by(role: Role) -> Vec<OffboardingStatus> {
        Self::ALL
            .iter()
            .copied()
            .filter(|s| s.owner() == Some(role))
            .collect()
    }
}
