//! Onboarding transition rules.
//!
//! | From                  | Role           | To                    |
//! |-----------------------|----------------|-----------------------|
//! | Operations Manager    | OpsManager     | HR                    |
//! | HR                    | HR             | Operations Supervisor |
//! | Operations Supervisor | OpsSupervisor  | Fleet Manager         |
//! | Fleet Manager         | FleetManager   | Finance               |
//! | Finance               | FinanceManager | HR Final              |
//! | HR Final              | HR             | Completed             |

use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;

use super::{non_negative_amount, optional_text, require_text};
use crate::driver::{Driver, QIWA_STATUS_APPROVED, TRANSFER_STATUS_COMPLETED};
use crate::error::CoreError;
use crate::stage::OnboardingStage;
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HrApproval {
    pub company_contract_created: bool,
    pub qiwa_contract_created: bool,
    pub qiwa_contract_status: String,
    pub sponsorship_transfer_status: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OpsSupervisorApproval {
    pub platform: String,
    pub platform_id: String,
    pub issued_mobile_number: String,
    pub issued_device_id: Option<String>,
    pub mobile_issued: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FleetAssignment {
    pub vehicle_plate: String,
    pub vehicle_details: String,
    pub assignment_date: Option<NaiveDate>,
    pub tamm_authorized: bool,
    /// Blob reference of the TAMM authorization screenshot.
    pub tamm_authorization_ss: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FinanceApproval {
    pub transfer_fee_amount: Option<f64>,
    /// Payment date; defaults to the approval time when absent.
    pub transfer_fee_paid_at: Option<NaiveDate>,
    /// Blob reference of the payment receipt.
    pub transfer_fee_receipt: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TransferCompletion {
    /// Blob reference of the sponsorship transfer proof.
    pub sponsorship_transfer_proof: Option<String>,
}

// ---------------------------------------------------------------------------
// Transitions
// ---------------------------------------------------------------------------

fn expect_stage(driver: &Driver, expected: OnboardingStage) -> Result<(), CoreError> {
    if driver.onboarding_stage != expected {
        return Err(CoreError::Validation(format!(
            "Driver {} is in stage '{}', expected '{}'",
            driver.id, driver.onboarding_stage, expected
        )));
    }
    Ok(())
}

fn advance(driver: &mut Driver, now: Timestamp) -> Result<(), CoreError> {
    driver.onboarding_stage = driver.onboarding_stage.next().ok_or_else(|| {
        CoreError::Validation(format!("Driver {} has already completed onboarding", driver.id))
    })?;
    driver.updated_at = now;
    Ok(())
}

pub fn approve_ops_manager(driver: &Driver, now: Timestamp) -> Result<Driver, CoreError> {
    expect_stage(driver, OnboardingStage::OperationsManager)?;

    let mut next = driver.clone();
    next.ops_manager_approved = true;
    next.ops_manager_approved_at.get_or_insert(now);
    advance(&mut next, now)?;
    Ok(next)
}

pub fn approve_hr(
    driver: &Driver,
    input: &HrApproval,
    approver: DbId,
    now: Timestamp,
) -> Result<Driver, CoreError> {
    expect_stage(driver, OnboardingStage::Hr)?;

    if !input.company_contract_created {
        return Err(CoreError::Validation(
            "company_contract_created must be confirmed".into(),
        ));
    }
    if !input.qiwa_contract_created {
        return Err(CoreError::Validation(
            "qiwa_contract_created must be confirmed".into(),
        ));
    }
    let qiwa_status = input.qiwa_contract_status.trim();
    if qiwa_status != QIWA_STATUS_APPROVED {
        return Err(CoreError::Validation(format!(
            "qiwa_contract_status must be '{QIWA_STATUS_APPROVED}', got '{qiwa_status}'"
        )));
    }

    let mut next = driver.clone();
    next.company_contract_created = true;
    next.qiwa_contract_created = true;
    next.qiwa_contract_status = qiwa_status.to_string();
    if let Some(status) = optional_text(&input.sponsorship_transfer_status) {
        next.sponsorship_transfer_status = status;
    }
    next.hr_approved = true;
    next.hr_approved_at = Some(now);
    next.hr_approved_by = Some(approver);
    advance(&mut next, now)?;
    Ok(next)
}

pub fn approve_ops_supervisor(
    driver: &Driver,
    input: &OpsSupervisorApproval,
    now: Timestamp,
) -> Result<Driver, CoreError> {
    expect_stage(driver, OnboardingStage::OperationsSupervisor)?;

    let platform = require_text("platform", &input.platform)?;
    let platform_id = require_text("platform_id", &input.platform_id)?;
    let issued_mobile = require_text("issued_mobile_number", &input.issued_mobile_number)?;
    if !input.mobile_issued {
        return Err(CoreError::Validation(
            "mobile_issued must be confirmed".into(),
        ));
    }

    let mut next = driver.clone();
    next.platform = Some(platform);
    next.platform_id = Some(platform_id);
    next.issued_mobile_number = Some(issued_mobile);
    next.issued_device_id = optional_text(&input.issued_device_id);
    next.mobile_issued = true;
    next.ops_supervisor_approved = true;
    next.ops_supervisor_approved_at = Some(now);
    advance(&mut next, now)?;
    Ok(next)
}

pub fn assign_vehicle(
    driver: &Driver,
    input: &FleetAssignment,
    now: Timestamp,
) -> Result<Driver, CoreError> {
    expect_stage(driver, OnboardingStage::FleetManager)?;

    let plate = require_text("vehicle_plate", &input.vehicle_plate)?;
    let details = require_text("vehicle_details", &input.vehicle_details)?;
    let assignment_date = input
        .assignment_date
        .ok_or_else(|| CoreError::Validation("assignment_date is required".into()))?;
    if assignment_date > now.date_naive() {
        return Err(CoreError::Validation(format!(
            "assignment_date {assignment_date} is in the future"
        )));
    }
    if !input.tamm_authorized {
        return Err(CoreError::Validation(
            "tamm_authorized must be confirmed".into(),
        ));
    }
    let screenshot = optional_text(&input.tamm_authorization_ss).ok_or_else(|| {
        CoreError::Validation("tamm_authorization_ss screenshot is required".into())
    })?;

    let mut next = driver.clone();
    next.car_details = Some(format!("{plate} - {details}"));
    next.assignment_date = Some(assignment_date);
    next.tamm_authorized = true;
    next.tamm_authorization_ss = Some(screenshot);
    next.fleet_manager_approved = true;
    next.fleet_manager_approved_at = Some(now);
    advance(&mut next, now)?;
    Ok(next)
}

pub fn approve_finance(
    driver: &Driver,
    input: &FinanceApproval,
    now: Timestamp,
) -> Result<Driver, CoreError> {
    expect_stage(driver, OnboardingStage::Finance)?;

    let paid_at = match input.transfer_fee_paid_at {
        Some(date) if date > now.date_naive() => {
            return Err(CoreError::Validation(format!(
                "transfer_fee_paid_at {date} is later than today"
            )));
        }
        Some(date) => date.and_time(NaiveTime::MIN).and_utc(),
        None => now,
    };
    let amount = match input.transfer_fee_amount {
        Some(value) => Some(non_negative_amount("transfer_fee_amount", Some(value))?),
        None => None,
    };

    let mut next = driver.clone();
    next.transfer_fee_paid = true;
    next.transfer_fee_amount = amount;
    next.transfer_fee_paid_at = Some(paid_at);
    next.transfer_fee_receipt = optional_text(&input.transfer_fee_receipt);
    next.finance_approved = true;
    next.finance_approved_at = Some(now);
    advance(&mut next, now)?;
    Ok(next)
}

pub fn complete_transfer(
    driver: &Driver,
    input: &TransferCompletion,
    now: Timestamp,
) -> Result<Driver, CoreError> {
    expect_stage(driver, OnboardingStage::HrFinal)?;

    let mut next = driver.clone();
    if let Some(proof) = optional_text(&input.sponsorship_transfer_proof) {
        next.sponsorship_transfer_proof = Some(proof);
    }
    next.sponsorship_transfer_status = TRANSFER_STATUS_COMPLETED.to_string();
    next.sponsorship_transfer_completed_at = Some(now);
    advance(&mut next, now)?;
    Ok(next)
}
