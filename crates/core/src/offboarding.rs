//! Offboarding entity.

use serde::{Deserialize, Serialize};

use crate::stage::OffboardingStatus;
use crate::types::{DbId, Timestamp};

/// A driver's exit workflow. At most one per driver may be active.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Offboarding {
    pub id: DbId,
    pub driver_id: DbId,
    pub requested_by: DbId,
    pub requested_at: Timestamp,
    pub status: OffboardingStatus,

    // Operations Supervisor
    pub ops_supervisor_cleared: bool,
    pub ops_supervisor_cleared_at: Option<Timestamp>,
    pub ops_supervisor_id: Option<DbId>,
    pub ops_supervisor_note: Option<String>,
    pub company_mobile_returned: bool,
    pub company_sim_returned: bool,
    pub platform_returned: bool,

    // Fleet
    pub fleet_cleared: bool,
    pub fleet_cleared_at: Option<Timestamp>,
    pub fleet_damage_report: Option<String>,
    pub fleet_damage_cost: Option<f64>,

    // Finance
    pub finance_cleared: bool,
    pub finance_cleared_at: Option<Timestamp>,
    pub finance_adjustments: Option<f64>,
    pub finance_note: Option<String>,
    pub finance_invoice_file: Option<String>,

    // HR
    pub hr_cleared: bool,
    pub hr_cleared_at: Option<Timestamp>,
    pub hr_note: Option<String>,
    pub company_contract_cancelled: bool,
    pub qiwa_contract_cancelled: bool,
    pub salary_paid: bool,

    // TAMM
    pub tamm_revoked: bool,
    pub tamm_revoked_at: Option<Timestamp>,

    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Insert payload for a new offboarding record.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOffboarding {
    pub driver_id: DbId,
    pub requested_by: DbId,
    pub requested_at: Timestamp,
    pub status: OffboardingStatus,
}

/// A freshly requested offboarding at `status`, for unit tests.
#[cfg(test)]
pub(crate) fn test_offboarding(status: OffboardingStatus) -> Offboarding {
    use chrono::{TimeZone, Utc};

    let requested = Utc.with_ymd_and_hms(2026, 2, 1, 9, 0, 0).unwrap();
    Offboarding {
        id: 10,
        driver_id: 1,
        requested_by: 2,
        requested_at: requested,
        status,
        ops_supervisor_cleared: false,
        ops_supervisor_cleared_at: None,
        ops_supervisor_id: None,
        ops_supervisor_note: None,
        company_mobile_returned: false,
        company_sim_returned: false,
        platform_returned: false,
        fleet_cleared: false,
        fleet_cleared_at: None,
        fleet_damage_report: None,
        fleet_damage_cost: None,
        finance_cleared: false,
        finance_cleared_at: None,
        finance_adjustments: None,
        finance_note: None,
        finance_invoice_file: None,
        hr_cleared: false,
        hr_cleared_at: None,
        hr_note: None,
        company_contract_cancelled: false,
        qiwa_contract_cancelled: false,
        salary_paid: false,
        tamm_revoked: false,
        tamm_revoked_at: None,
        created_at: requested,
        updated_at: requested,
    }
}
