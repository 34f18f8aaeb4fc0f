//! Row mapping for the `drivers` table.

use chrono::NaiveDate;
use driverflow_core::driver::Driver;
use driverflow_core::error::CoreError;
use driverflow_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// Raw `drivers` row. The stage is kept as text until [`Driver::try_from`].
#[derive(Debug, Clone, FromRow)]
pub struct DriverRow {
    pub id: DbId,
    pub full_name: String,
    pub iqama_number: String,
    pub iqama_expiry_date: Option<NaiveDate>,
    pub saudi_driving_license: bool,
    pub nationality: Option<String>,
    pub mobile_number: Option<String>,
    pub previous_sponsor_number: Option<String>,
    pub city: Option<String>,
    pub iqama_card_upload: Option<String>,
    pub onboarding_stage: String,
    pub ops_manager_approved: bool,
    pub ops_manager_approved_at: Option<Timestamp>,
    pub company_contract_created: bool,
    pub qiwa_contract_created: bool,
    pub qiwa_contract_status: String,
    pub sponsorship_transfer_status: String,
    pub hr_approved: bool,
    pub hr_approved_at: Option<Timestamp>,
    pub hr_approved_by: Option<DbId>,
    pub platform: Option<String>,
    pub platform_id: Option<String>,
    pub issued_mobile_number: Option<String>,
    pub issued_device_id: Option<String>,
    pub mobile_issued: bool,
    pub ops_supervisor_approved: bool,
    pub ops_supervisor_approved_at: Option<Timestamp>,
    pub car_details: Option<String>,
    pub assignment_date: Option<NaiveDate>,
    pub tamm_authorized: bool,
    pub tamm_authorization_ss: Option<String>,
    pub fleet_manager_approved: bool,
    pub fleet_manager_approved_at: Option<Timestamp>,
    pub transfer_fee_paid: bool,
    pub transfer_fee_amount: Option<f64>,
    pub transfer_fee_paid_at: Option<Timestamp>,
    pub transfer_fee_receipt: Option<String>,
    pub finance_approved: bool,
    pub finance_approved_at: Option<Timestamp>,
    pub sponsorship_transfer_proof: Option<String>,
    pub sponsorship_transfer_completed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TryFrom<DriverRow> for Driver {
    type Error = CoreError;

    fn try_from(row: DriverRow) -> Result<Self, Self::Error> {
        Ok(Driver {
            id: row.id,
            full_name: row.full_name,
            iqama_number: row.iqama_number,
            iqama_expiry_date: row.iqama_expiry_date,
            saudi_driving_license: row.saudi_driving_license,
            nationality: row.nationality,
            mobile_number: row.mobile_number,
            previous_sponsor_number: row.previous_sponsor_number,
            city: row.city,
            iqama_card_upload: row.iqama_card_upload,
            onboarding_stage: row.onboarding_stage.parse()?,
            ops_manager_approved: row.ops_manager_approved,
            ops_manager_approved_at: row.ops_manager_approved_at,
            company_contract_created: row.company_contract_created,
            qiwa_contract_created: row.qiwa_contract_created,
            qiwa_contract_status: row.qiwa_contract_status,
            sponsorship_transfer_status: row.sponsorship_transfer_status,
            hr_approved: row.hr_approved,
            hr_approved_at: row.hr_approved_at,
            hr_approved_by: row.hr_approved_by,
            platform: row.platform,
            platform_id: row.platform_id,
            issued_mobile_number: row.issued_mobile_number,
            issued_device_id: row.issued_device_id,
            mobile_issued: row.mobile_issued,
            ops_supervisor_approved: row.ops_supervisor_approved,
            ops_supervisor_approved_at: row.ops_supervisor_approved_at,
            car_details: row.car_details,
            assignment_date: row.assignment_date,
            tamm_authorized: row.tamm_authorized,
            tamm_authorization_ss: row.tamm_authorization_ss,
            fleet_manager_approved: row.fleet_manager_approved,
            fleet_manager_approved_at: row.fleet_manager_approved_at,
            transfer_fee_paid: row.transfer_fee_paid,
            transfer_fee_amount: row.transfer_fee_amount,
            transfer_fee_paid_at: row.transfer_fee_paid_at,
            transfer_fee_receipt: row.transfer_fee_receipt,
            finance_approved: row.finance_approved,
            finance_approved_at: row.finance_approved_at,
            sponsorship_transfer_proof: row.sponsorship_transfer_proof,
            sponsorship_transfer_completed_at: row.sponsorship_transfer_completed_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
