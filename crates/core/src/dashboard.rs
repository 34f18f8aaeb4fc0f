//! Read-only dashboard projections.
//!
//! Role queues are loaded already filtered by stage or status. The full
//! driver and offboarding sets are only read for the views that need them
//! (offboarding eligibility and the summary), and partitioned by the pure
//! functions here.

use std::collections::{BTreeSet, HashMap, HashSet};

use serde::Serialize;

use crate::driver::Driver;
use crate::error::CoreError;
use crate::offboarding::Offboarding;
use crate::ports::WorkflowStore;
use crate::roles::Role;
use crate::stage::{OffboardingStatus, OnboardingStage};
use crate::types::DbId;

// ---------------------------------------------------------------------------
// View types
// ---------------------------------------------------------------------------

/// Offboarding row joined with the driver's identifying fields.
#[derive(Debug, Clone, Serialize)]
pub struct OffboardingView {
    #[serde(flatten)]
    pub offboarding: Offboarding,
    pub driver_name: String,
    pub iqama_number: String,
}

/// Counts for the administrator overview.
///
/// Every driver lands in exactly one bucket, so the four buckets always
/// sum to `total_drivers`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    pub total_drivers: usize,
    /// Still moving through onboarding.
    pub pending_onboarding: usize,
    /// Onboarded and never offboarded.
    pub onboarded: usize,
    /// Has an active offboarding.
    pub in_offboarding: usize,
    /// Has a completed offboarding and no active one.
    pub offboarded: usize,
}

/// Everything one role's dashboard shows.
#[derive(Debug, Clone, Serialize)]
pub struct RoleDashboard {
    pub role: Role,
    pub onboarding_queue: Vec<Driver>,
    pub offboarding_queue: Vec<OffboardingView>,
    /// Only populated for the Operations Manager.
    pub eligible_for_offboarding: Vec<Driver>,
    /// Only populated for the SuperAdmin.
    pub summary: Option<DashboardSummary>,
}

// ---------------------------------------------------------------------------
// Projections
// ---------------------------------------------------------------------------

/// Offboardings waiting on `role`, joined with their drivers.
pub fn offboarding_queue(
    offboardings: &[Offboarding],
    drivers: &[Driver],
    role: Role,
) -> Vec<OffboardingView> {
    let statuses = OffboardingStatus::owned_by(role);
    let by_id: HashMap<DbId, &Driver> = drivers.iter().map(|d| (d.id, d)).collect();
    offboardings
        .iter()
        .filter(|o| statuses.contains(&o.status))
        .filter_map(|o| {
            by_id.get(&o.driver_id).map(|d| OffboardingView {
                offboarding: o.clone(),
                driver_name: d.full_name.clone(),
                iqama_number: d.iqama_number.clone(),
            })
        })
        .collect()
}

/// Completed drivers with no offboarding record at all, active or not.
pub fn eligible_for_offboarding(drivers: &[Driver], offboardings: &[Offboarding]) -> Vec<Driver> {
    let touched: HashSet<DbId> = offboardings.iter().map(|o| o.driver_id).collect();
    drivers
        .iter()
        .filter(|d| d.onboarding_stage == OnboardingStage::Completed && !touched.contains(&d.id))
        .cloned()
        .collect()
}

pub fn summarize(drivers: &[Driver], offboardings: &[Offboarding]) -> DashboardSummary {
    let active: HashSet<DbId> = offboardings
        .iter()
        .filter(|o| o.status.is_active())
        .map(|o| o.driver_id)
        .collect();
    let finished: HashSet<DbId> = offboardings
        .iter()
        .filter(|o| !o.status.is_active())
        .map(|o| o.driver_id)
        .collect();

    let mut summary = DashboardSummary {
        total_drivers: drivers.len(),
        ..Default::default()
    };
    for driver in drivers {
        if active.contains(&driver.id) {
            summary.in_offboarding += 1;
        } else if finished.contains(&driver.id) {
            summary.offboarded += 1;
        } else if driver.onboarding_stage == OnboardingStage::Completed {
            summary.onboarded += 1;
        } else {
            summary.pending_onboarding += 1;
        }
    }
    summary
}

// ---------------------------------------------------------------------------
// Loader
// ---------------------------------------------------------------------------

/// Assemble the dashboard for `role` from the store.
pub async fn build_dashboard(
    store: &dyn WorkflowStore,
    role: Role,
) -> Result<RoleDashboard, CoreError> {
    let stages = OnboardingStage::owned_by(role);
    let onboarding_queue = if stages.is_empty() {
        Vec::new()
    } else {
        store.list_drivers_in_stages(&stages).await?
    };

    let statuses = OffboardingStatus::owned_by(role);
    let offboarding_queue = if statuses.is_empty() {
        Vec::new()
    } else {
        let queued = store.list_offboardings_in_statuses(&statuses).await?;
        let drivers = drivers_of(store, &queued).await?;
        offboarding_queue(&queued, &drivers, role)
    };

    let (eligible_for_offboarding, summary) = match role {
        Role::OpsManager | Role::SuperAdmin => {
            let drivers = store.list_drivers().await?;
            let offboardings = store.list_offboardings().await?;
            if role == Role::OpsManager {
                (eligible_for_offboarding(&drivers, &offboardings), None)
            } else {
                (Vec::new(), Some(summarize(&drivers, &offboardings)))
            }
        }
        _ => (Vec::new(), None),
    };

    Ok(RoleDashboard {
        role,
        onboarding_queue,
        offboarding_queue,
        eligible_for_offboarding,
        summary,
    })
}

/// Load the distinct drivers the given offboardings belong to.
async fn drivers_of(
    store: &dyn WorkflowStore,
    offboardings: &[Offboarding],
) -> Result<Vec<Driver>, CoreError> {
    let ids: BTreeSet<DbId> = offboardings.iter().map(|o| o.driver_id).collect();
    let mut drivers = Vec::with_capacity(ids.len());
    for id in ids {
        if let Some(driver) = store.find_driver(id).await? {
            drivers.push(driver);
        }
    }
    Ok(drivers)
}
