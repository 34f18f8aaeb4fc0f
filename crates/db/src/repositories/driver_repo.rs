//! Repository for the `drivers` table.

use driverflow_core::driver::{Driver, DriverProfileUpdate, NewDriver};
use driverflow_core::types::DbId;
use sqlx::PgPool;

use crate::models::driver::DriverRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, full_name, iqama_number, iqama_expiry_date, saudi_driving_license, \
    nationality, mobile_number, previous_sponsor_number, city, iqama_card_upload, \
    onboarding_stage, ops_manager_approved, ops_manager_approved_at, \
    company_contract_created, qiwa_contract_created, qiwa_contract_status, \
    sponsorship_transfer_status, hr_approved, hr_approved_at, hr_approved_by, \
    platform, platform_id, issued_mobile_number, issued_device_id, mobile_issued, \
    ops_supervisor_approved, ops_supervisor_approved_at, \
    car_details, assignment_date, tamm_authorized, tamm_authorization_ss, \
    fleet_manager_approved, fleet_manager_approved_at, \
    transfer_fee_paid, transfer_fee_amount, transfer_fee_paid_at, transfer_fee_receipt, \
    finance_approved, finance_approved_at, \
    sponsorship_transfer_proof, sponsorship_transfer_completed_at, \
    created_at, updated_at";

/// Provides CRUD operations for drivers.
pub struct DriverRepo;

impl DriverRepo {
    /// Insert a newly registered driver at the first onboarding stage.
    pub async fn create(pool: &PgPool, input: &NewDriver) -> Result<DriverRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO drivers (full_name, iqama_number, iqama_expiry_date,
                saudi_driving_license, nationality, mobile_number,
                previous_sponsor_number, city, iqama_card_upload)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DriverRow>(&query)
            .bind(&input.full_name)
            .bind(&input.iqama_number)
            .bind(input.iqama_expiry_date)
            .bind(input.saudi_driving_license)
            .bind(&input.nationality)
            .bind(&input.mobile_number)
            .bind(&input.previous_sponsor_number)
            .bind(&input.city)
            .bind(&input.iqama_card_upload)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<DriverRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM drivers WHERE id = $1");
        sqlx::query_as::<_, DriverRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Check whether a driver row exists.
    pub async fn exists(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM drivers WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// List all drivers in registration order.
    pub async fn list(pool: &PgPool) -> Result<Vec<DriverRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM drivers ORDER BY created_at, id");
        sqlx::query_as::<_, DriverRow>(&query).fetch_all(pool).await
    }

    /// List drivers whose stage is one of `stages`, in registration order.
    pub async fn list_in_stages(
        pool: &PgPool,
        stages: &[String],
    ) -> Result<Vec<DriverRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM drivers
             WHERE onboarding_stage = ANY($1)
             ORDER BY created_at, id"
        );
        sqlx::query_as::<_, DriverRow>(&query)
            .bind(stages)
            .fetch_all(pool)
            .await
    }

    /// Write every workflow field of `driver`, but only while the stored
    /// stage still equals `expected_stage`.
    ///
    /// Returns `None` if the row is missing or its stage has moved on.
    pub async fn update_guarded(
        pool: &PgPool,
        driver: &Driver,
        expected_stage: &str,
    ) -> Result<Option<DriverRow>, sqlx::Error> {
        let query = format!(
            "UPDATE drivers SET
                onboarding_stage = $3,
                ops_manager_approved = $4,
                ops_manager_approved_at = $5,
                company_contract_created = $6,
                qiwa_contract_created = $7,
                qiwa_contract_status = $8,
                sponsorship_transfer_status = $9,
                hr_approved = $10,
                hr_approved_at = $11,
                hr_approved_by = $12,
                platform = $13,
                platform_id = $14,
                issued_mobile_number = $15,
                issued_device_id = $16,
                mobile_issued = $17,
                ops_supervisor_approved = $18,
                ops_supervisor_approved_at = $19,
                car_details = $20,
                assignment_date = $21,
                tamm_authorized = $22,
                tamm_authorization_ss = $23,
                fleet_manager_approved = $24,
                fleet_manager_approved_at = $25,
                transfer_fee_paid = $26,
                transfer_fee_amount = $27,
                transfer_fee_paid_at = $28,
                transfer_fee_receipt = $29,
                finance_approved = $30,
                finance_approved_at = $31,
                sponsorship_transfer_proof = $32,
                sponsorship_transfer_completed_at = $33
             WHERE id = $1 AND onboarding_stage = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DriverRow>(&query)
            .bind(driver.id)
            .bind(expected_stage)
            .bind(driver.onboarding_stage.as_str())
            .bind(driver.ops_manager_approved)
            .bind(driver.ops_manager_approved_at)
            .bind(driver.company_contract_created)
            .bind(driver.qiwa_contract_created)
            .bind(&driver.qiwa_contract_status)
            .bind(&driver.sponsorship_transfer_status)
            .bind(driver.hr_approved)
            .bind(driver.hr_approved_at)
            .bind(driver.hr_approved_by)
            .bind(&driver.platform)
            .bind(&driver.platform_id)
            .bind(&driver.issued_mobile_number)
            .bind(&driver.issued_device_id)
            .bind(driver.mobile_issued)
            .bind(driver.ops_supervisor_approved)
            .bind(driver.ops_supervisor_approved_at)
            .bind(&driver.car_details)
            .bind(driver.assignment_date)
            .bind(driver.tamm_authorized)
            .bind(&driver.tamm_authorization_ss)
            .bind(driver.fleet_manager_approved)
            .bind(driver.fleet_manager_approved_at)
            .bind(driver.transfer_fee_paid)
            .bind(driver.transfer_fee_amount)
            .bind(driver.transfer_fee_paid_at)
            .bind(&driver.transfer_fee_receipt)
            .bind(driver.finance_approved)
            .bind(driver.finance_approved_at)
            .bind(&driver.sponsorship_transfer_proof)
            .bind(driver.sponsorship_transfer_completed_at)
            .fetch_optional(pool)
            .await
    }

    /// Update profile fields. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update_profile(
        pool: &PgPool,
        id: DbId,
        input: &DriverProfileUpdate,
    ) -> Result<Option<DriverRow>, sqlx::Error> {
        let query = format!(
            "UPDATE drivers SET
                full_name = COALESCE($2, full_name),
                iqama_expiry_date = COALESCE($3, iqama_expiry_date),
                saudi_driving_license = COALESCE($4, saudi_driving_license),
                nationality = COALESCE($5, nationality),
                mobile_number = COALESCE($6, mobile_number),
                previous_sponsor_number = COALESCE($7, previous_sponsor_number),
                city = COALESCE($8, city)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DriverRow>(&query)
            .bind(id)
            .bind(&input.full_name)
            .bind(input.iqama_expiry_date)
            .bind(input.saudi_driving_license)
            .bind(&input.nationality)
            .bind(&input.mobile_number)
            .bind(&input.previous_sponsor_number)
            .bind(&input.city)
            .fetch_optional(pool)
            .await
    }

    /// Hard-delete a driver. Offboarding rows cascade.
    ///
    /// Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM drivers WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
