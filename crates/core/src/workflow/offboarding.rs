//! Offboarding transition rules.
//!
//! | From                     | Role           | To           |
//! |--------------------------|----------------|--------------|
//! | (creation)               | OpsManager     | Requested    |
//! | Requested, OpsSupervisor | OpsSupervisor  | Fleet        |
//! | Fleet                    | FleetManager   | Finance      |
//! | Finance                  | FinanceManager | HR           |
//! | HR                       | HR             | pending_tamm |
//! | pending_tamm             | FleetManager   | Completed    |

use serde::Deserialize;

use super::{non_negative_amount, optional_text};
use crate::driver::Driver;
use crate::error::CoreError;
use crate::offboarding::{NewOffboarding, Offboarding};
use crate::stage::{OffboardingStatus, OnboardingStage};
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OpsSupervisorClearance {
    pub company_mobile_returned: bool,
    pub company_sim_returned: bool,
    pub platform_returned: bool,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FleetClearance {
    pub damage_report: Option<String>,
    pub damage_cost: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FinanceClearance {
    pub adjustments: Option<f64>,
    pub note: Option<String>,
    /// Blob reference of the final invoice.
    pub invoice_file: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HrClearance {
    pub company_contract_cancelled: bool,
    pub qiwa_contract_cancelled: bool,
    pub salary_paid: bool,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TammRevocation {
    pub tamm_revoked: Option<bool>,
}

// ---------------------------------------------------------------------------
// Transitions
// ---------------------------------------------------------------------------

/// Build the insert payload for a new request.
///
/// Only checks the driver's own stage; the one-active-record rule is the
/// store's job since it must hold under concurrent requests.
pub fn new_request(
    driver: &Driver,
    requested_by: DbId,
    now: Timestamp,
) -> Result<NewOffboarding, CoreError> {
    if driver.onboarding_stage != OnboardingStage::Completed {
        return Err(CoreError::Validation(format!(
            "Driver {} has not completed onboarding (stage '{}')",
            driver.id, driver.onboarding_stage
        )));
    }
    Ok(NewOffboarding {
        driver_id: driver.id,
        requested_by,
        requested_at: now,
        status: OffboardingStatus::Requested,
    })
}

fn expect_status(record: &Offboarding, allowed: &[OffboardingStatus]) -> Result<(), CoreError> {
    if !allowed.contains(&record.status) {
        let expected: Vec<&str> = allowed.iter().map(|s| s.as_str()).collect();
        return Err(CoreError::Validation(format!(
            "Offboarding {} is in status '{}', expected {}",
            record.id,
            record.status,
            expected.join(" or ")
        )));
    }
    Ok(())
}

pub fn clear_ops_supervisor(
    record: &Offboarding,
    input: &OpsSupervisorClearance,
    supervisor: DbId,
    now: Timestamp,
) -> Result<Offboarding, CoreError> {
    expect_status(
        record,
        &[OffboardingStatus::Requested, OffboardingStatus::OpsSupervisor],
    )?;

    let mut next = record.clone();
    next.ops_supervisor_cleared = true;
    next.ops_supervisor_cleared_at = Some(now);
    next.ops_supervisor_id = Some(supervisor);
    next.ops_supervisor_note = optional_text(&input.note);
    next.company_mobile_returned = input.company_mobile_returned;
    next.company_sim_returned = input.company_sim_returned;
    next.platform_returned = input.platform_returned;
    next.status = OffboardingStatus::Fleet;
    next.updated_at = now;
    Ok(next)
}

pub fn clear_fleet(
    record: &Offboarding,
    input: &FleetClearance,
    now: Timestamp,
) -> Result<Offboarding, CoreError> {
    expect_status(record, &[OffboardingStatus::Fleet])?;
    let cost = non_negative_amount("damage_cost", input.damage_cost)?;

    let mut next = record.clone();
    next.fleet_cleared = true;
    next.fleet_cleared_at = Some(now);
    next.fleet_damage_report = optional_text(&input.damage_report);
    next.fleet_damage_cost = Some(cost);
    next.status = OffboardingStatus::Finance;
    next.updated_at = now;
    Ok(next)
}

pub fn clear_finance(
    record: &Offboarding,
    input: &FinanceClearance,
    now: Timestamp,
) -> Result<Offboarding, CoreError> {
    expect_status(record, &[OffboardingStatus::Finance])?;
    let adjustments = input.adjustments.unwrap_or(0.0);
    if !adjustments.is_finite() {
        return Err(CoreError::Validation("adjustments must be a number".into()));
    }

    let mut next = record.clone();
    next.finance_cleared = true;
    next.finance_cleared_at = Some(now);
    next.finance_adjustments = Some(adjustments);
    next.finance_note = optional_text(&input.note);
    next.finance_invoice_file = optional_text(&input.invoice_file);
    next.status = OffboardingStatus::Hr;
    next.updated_at = now;
    Ok(next)
}

/// All three confirmations are checked together; if any is missing the
/// error lists every missing one and nothing is recorded.
pub fn clear_hr(
    record: &Offboarding,
    input: &HrClearance,
    now: Timestamp,
) -> Result<Offboarding, CoreError> {
    expect_status(record, &[OffboardingStatus::Hr])?;

    let missing: Vec<&str> = [
        ("company_contract_cancelled", input.company_contract_cancelled),
        ("qiwa_contract_cancelled", input.qiwa_contract_cancelled),
        ("salary_paid", input.salary_paid),
    ]
    .into_iter()
    .filter(|(_, confirmed)| !confirmed)
    .map(|(field, _)| field)
    .collect();
    if !missing.is_empty() {
        return Err(CoreError::Validation(format!(
            "HR clearance requires confirmation of: {}",
            missing.join(", ")
        )));
    }

    let mut next = record.clone();
    next.company_contract_cancelled = true;
    next.qiwa_contract_cancelled = true;
    next.salary_paid = true;
    next.hr_cleared = true;
    next.hr_cleared_at = Some(now);
    next.hr_note = optional_text(&input.note);
    next.status = OffboardingStatus::PendingTamm;
    next.updated_at = now;
    Ok(next)
}

pub fn revoke_tamm(
    record: &Offboarding,
    input: &TammRevocation,
    now: Timestamp,
) -> Result<Offboarding, CoreError> {
    expect_status(record, &[OffboardingStatus::PendingTamm])?;
    if input.tamm_revoked != Some(true) {
        return Err(CoreError::Validation(
            "tamm_revoked must be confirmed".into(),
        ));
    }

    let mut next = record.clone();
    next.tamm_revoked = true;
    next.tamm_revoked_at = Some(now);
    next.fleet_cleared = true;
    next.fleet_cleared_at.get_or_insert(now);
    next.status = OffboardingStatus::Completed;
    next.updated_at = now;
    Ok(next)
}
