//! Row mapping for the `offboardings` table.

use driverflow_core::error::CoreError;
use driverflow_core::offboarding::Offboarding;
use driverflow_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// Raw `offboardings` row. The status is kept as text until converted.
#[derive(Debug, Clone, FromRow)]
pub struct OffboardingRow {
    pub id: DbId,
    pub driver_id: DbId,
    pub requested_by: DbId,
    pub requested_at: Timestamp,
    pub status: String,
    pub ops_supervisor_cleared: bool,
    pub ops_supervisor_cleared_at: Option<Timestamp>,
    pub ops_supervisor_id: Option<DbId>,
    pub ops_supervisor_note: Option<String>,
    pub company_mobile_returned: bool,
    pub company_sim_returned: bool,
    pub platform_returned: bool,
    pub fleet_cleared: bool,
    pub fleet_cleared_at: Option<Timestamp>,
    pub fleet_damage_report: Option<String>,
    pub fleet_damage_cost: Option<f64>,
    pub finance_cleared: bool,
    pub finance_cleared_at: Option<Timestamp>,
    pub finance_adjustments: Option<f64>,
    pub finance_note: Option<String>,
    pub finance_invoice_file: Option<String>,
    pub hr_cleared: bool,
    pub hr_cleared_at: Option<Timestamp>,
    pub hr_note: Option<String>,
    pub company_contract_cancelled: bool,
    pub qiwa_contract_cancelled: bool,
    pub salary_paid: bool,
    pub tamm_revoked: bool,
    pub tamm_revoked_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TryFrom<OffboardingRow> for Offboarding {
    type Error = CoreError;

    fn try_from(row: OffboardingRow) -> Result<Self, Self::Error> {
        Ok(Offboarding {
            id: row.id,
            driver_id: row.driver_id,
            requested_by: row.requested_by,
            requested_at: row.requested_at,
            status: row.status.parse()?,
            ops_supervisor_cleared: row.ops_supervisor_cleared,
            ops_supervisor_cleared_at: row.ops_supervisor_cleared_at,
            ops_supervisor_id: row.ops_supervisor_id,
            ops_supervisor_note: row.ops_supervisor_note,
            company_mobile_returned: row.company_mobile_returned,
            company_sim_returned: row.company_sim_returned,
            platform_returned: row.platform_returned,
            fleet_cleared: row.fleet_cleared,
            fleet_cleared_at: row.fleet_cleared_at,
            fleet_damage_report: row.fleet_damage_report,
            fleet_damage_cost: row.fleet_damage_cost,
            finance_cleared: row.finance_cleared,
            finance_cleared_at: row.finance_cleared_at,
            finance_adjustments: row.finance_adjustments,
            finance_note: row.finance_note,
            finance_invoice_file: row.finance_invoice_file,
            hr_cleared: row.hr_cleared,
            hr_cleared_at: row.hr_cleared_at,
            hr_note: row.hr_note,
            company_contract_cancelled: row.company_contract_cancelled,
            qiwa_contract_cancelled: row.qiwa_contract_cancelled,
            salary_paid: row.salary_paid,
            tamm_revoked: row.tamm_revoked,
            tamm_revoked_at: row.tamm_revoked_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
