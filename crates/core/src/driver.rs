//! Driver entity and the self-registration input.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::CoreError;
use crate::stage::OnboardingStage;
use crate::types::{DbId, Timestamp};

/// Default value of `qiwa_contract_status` and `sponsorship_transfer_status`.
pub const STATUS_PENDING: &str = "Pending";

/// The only `qiwa_contract_status` value HR may approve with.
pub const QIWA_STATUS_APPROVED: &str = "Approved";

/// `sponsorship_transfer_status` once HR Final is done.
pub const TRANSFER_STATUS_COMPLETED: &str = "Completed";

/// A driver moving through onboarding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Driver {
    pub id: DbId,

    // Personal / contact
    pub full_name: String,
    pub iqama_number: String,
    pub iqama_expiry_date: Option<NaiveDate>,
    pub saudi_driving_license: bool,
    pub nationality: Option<String>,
    pub mobile_number: Option<String>,
    pub previous_sponsor_number: Option<String>,
    pub city: Option<String>,
    pub iqama_card_upload: Option<String>,

    pub onboarding_stage: OnboardingStage,

    // Operations Manager
    pub ops_manager_approved: bool,
    pub ops_manager_approved_at: Option<Timestamp>,

    // HR
    pub company_contract_created: bool,
    pub qiwa_contract_created: bool,
    pub qiwa_contract_status: String,
    pub sponsorship_transfer_status: String,
    pub hr_approved: bool,
    pub hr_approved_at: Option<Timestamp>,
    pub hr_approved_by: Option<DbId>,

    // Operations Supervisor
    pub platform: Option<String>,
    pub platform_id: Option<String>,
    pub issued_mobile_number: Option<String>,
    pub issued_device_id: Option<String>,
    pub mobile_issued: bool,
    pub ops_supervisor_approved: bool,
    pub ops_supervisor_approved_at: Option<Timestamp>,

    // Fleet Manager
    pub car_details: Option<String>,
    pub assignment_date: Option<NaiveDate>,
    pub tamm_authorized: bool,
    pub tamm_authorization_ss: Option<String>,
    pub fleet_manager_approved: bool,
    pub fleet_manager_approved_at: Option<Timestamp>,

    // Finance
    pub transfer_fee_paid: bool,
    pub transfer_fee_amount: Option<f64>,
    pub transfer_fee_paid_at: Option<Timestamp>,
    pub transfer_fee_receipt: Option<String>,
    pub finance_approved: bool,
    pub finance_approved_at: Option<Timestamp>,

    // HR Final
    pub sponsorship_transfer_proof: Option<String>,
    pub sponsorship_transfer_completed_at: Option<Timestamp>,

    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Public self-registration form.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewDriver {
    #[validate(length(min = 1, max = 200, message = "full_name is required"))]
    pub full_name: String,
    #[validate(length(min = 1, max = 20, message = "iqama_number is required"))]
    pub iqama_number: String,
    pub iqama_expiry_date: Option<NaiveDate>,
    #[serde(default)]
    pub saudi_driving_license: bool,
    #[validate(length(max = 100))]
    pub nationality: Option<String>,
    #[validate(length(max = 20))]
    pub mobile_number: Option<String>,
    #[validate(length(max = 50))]
    pub previous_sponsor_number: Option<String>,
    #[validate(length(max = 100))]
    pub city: Option<String>,
    /// Blob reference of the uploaded iqama card, if any.
    pub iqama_card_upload: Option<String>,
}

impl NewDriver {
    /// Run field validation and normalise whitespace.
    pub fn validated(mut self) -> Result<Self, CoreError> {
        self.full_name = self.full_name.trim().to_string();
        self.iqama_number = self.iqama_number.trim().to_string();
        self.validate()
            .map_err(|e| CoreError::Validation(e.to_string()))?;
        Ok(self)
    }
}

/// Profile fields an administrator may correct on an existing driver.
///
/// Workflow fields only change through the workflow engine.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct DriverProfileUpdate {
    #[validate(length(min = 1, max = 200))]
    pub full_name: Option<String>,
    pub iqama_expiry_date: Option<NaiveDate>,
    pub saudi_driving_license: Option<bool>,
    #[validate(length(max = 100))]
    pub nationality: Option<String>,
    #[validate(length(max = 20))]
    pub mobile_number: Option<String>,
    #[validate(length(max = 50))]
    pub previous_sponsor_number: Option<String>,
    #[validate(length(max = 100))]
    pub city: Option<String>,
}

/// A freshly registered driver placed at `stage`, for unit tests.
#[cfg(test)]
pub(crate) fn test_driver(stage: OnboardingStage) -> Driver {
    use chrono::{TimeZone, Utc};

    let created = Utc.with_ymd_and_hms(2026, 1, 1, 8, 0, 0).unwrap();
    Driver {
        id: 1,
        full_name: "Ali Khan".into(),
        iqama_number: "2345678901".into(),
        iqama_expiry_date: None,
        saudi_driving_license: true,
        nationality: Some("Pakistan".into()),
        mobile_number: Some("0500000000".into()),
        previous_sponsor_number: None,
        city: Some("Riyadh".into()),
        iqama_card_upload: None,
        onboarding_stage: stage,
        ops_manager_approved: false,
        ops_manager_approved_at: None,
        company_contract_created: false,
        qiwa_contract_created: false,
        qiwa_contract_status: STATUS_PENDING.into(),
        sponsorship_transfer_status: STATUS_PENDING.into(),
        hr_approved: false,
        hr_approved_at: None,
        hr_approved_by: None,
        platform: None,
        platform_id: None,
        issued_mobile_number: None,
        issued_device_id: None,
        mobile_issued: false,
        ops_supervisor_approved: false,
        ops_supervisor_approved_at: None,
        car_details: None,
        assignment_date: None,
        tamm_authorized: false,
        tamm_authorization_ss: None,
        fleet_manager_approved: false,
        fleet_manager_approved_at: None,
        transfer_fee_paid: false,
        transfer_fee_amount: None,
        transfer_fee_paid_at: None,
        transfer_fee_receipt: None,
        finance_approved: false,
        finance_approved_at: None,
        sponsorship_transfer_proof: None,
        sponsorship_transfer_completed_at: None,
        created_at: created,
        updated_at: created,
    }
}
