//! Repository for the `offboardings` table.

use driverflow_core::offboarding::{NewOffboarding, Offboarding};
use driverflow_core::stage::OffboardingStatus;
use driverflow_core::types::DbId;
use sqlx::PgPool;

use crate::models::offboarding::OffboardingRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, driver_id, requested_by, requested_at, status, \
    ops_supervisor_cleared, ops_supervisor_cleared_at, ops_supervisor_id, ops_supervisor_note, \
    company_mobile_returned, company_sim_returned, platform_returned, \
    fleet_cleared, fleet_cleared_at, fleet_damage_report, fleet_damage_cost, \
    finance_cleared, finance_cleared_at, finance_adjustments, finance_note, finance_invoice_file, \
    hr_cleared, hr_cleared_at, hr_note, \
    company_contract_cancelled, qiwa_contract_cancelled, salary_paid, \
    tamm_revoked, tamm_revoked_at, created_at, updated_at";

/// Result of [`OffboardingRepo::create_exclusive`].
#[derive(Debug)]
pub enum CreateOffboardingOutcome {
    Created(OffboardingRow),
    /// The driver already has an active record; nothing was inserted.
    AlreadyActive(OffboardingRow),
    DriverMissing,
}

/// Provides CRUD operations for offboarding records.
pub struct OffboardingRepo;

impl OffboardingRepo {
    /// Insert a record unless the driver already has an active one.
    ///
    /// The driver row is locked for the duration of the transaction so that
    /// concurrent requests for the same driver serialize on the check.
    pub async fn create_exclusive(
        pool: &PgPool,
        input: &NewOffboarding,
    ) -> Result<CreateOffboardingOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let locked: Option<DbId> =
            sqlx::query_scalar("SELECT id FROM drivers WHERE id = $1 FOR UPDATE")
                .bind(input.driver_id)
                .fetch_optional(&mut *tx)
                .await?;
        if locked.is_none() {
            return Ok(CreateOffboardingOutcome::DriverMissing);
        }

        let active_query = format!(
            "SELECT {COLUMNS} FROM offboardings
             WHERE driver_id = $1 AND status <> $2
             ORDER BY id DESC LIMIT 1"
        );
        let existing = sqlx::query_as::<_, OffboardingRow>(&active_query)
            .bind(input.driver_id)
            .bind(OffboardingStatus::Completed.as_str())
            .fetch_optional(&mut *tx)
            .await?;
        if let Some(existing) = existing {
            return Ok(CreateOffboardingOutcome::AlreadyActive(existing));
        }

        let insert_query = format!(
            "INSERT INTO offboardings (driver_id, requested_by, requested_at, status)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, OffboardingRow>(&insert_query)
            .bind(input.driver_id)
            .bind(input.requested_by)
            .bind(input.requested_at)
            .bind(input.status.as_str())
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(CreateOffboardingOutcome::Created(row))
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<OffboardingRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM offboardings WHERE id = $1");
        sqlx::query_as::<_, OffboardingRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Check whether an offboarding row exists.
    pub async fn exists(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM offboardings WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// The driver's active (non-`Completed`) record, if any.
    pub async fn find_active_for_driver(
        pool: &PgPool,
        driver_id: DbId,
    ) -> Result<Option<OffboardingRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM offboardings
             WHERE driver_id = $1 AND status <> $2
             ORDER BY id DESC LIMIT 1"
        );
        sqlx::query_as::<_, OffboardingRow>(&query)
            .bind(driver_id)
            .bind(OffboardingStatus::Completed.as_str())
            .fetch_optional(pool)
            .await
    }

    /// List all records in request order.
    pub async fn list(pool: &PgPool) -> Result<Vec<OffboardingRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM offboardings ORDER BY requested_at, id");
        sqlx::query_as::<_, OffboardingRow>(&query)
            .fetch_all(pool)
            .await
    }

    pub async fn list_in_statuses(
        pool: &PgPool,
        statuses: &[String],
    ) -> Result<Vec<OffboardingRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM offboardings
             WHERE status = ANY($1)
             ORDER BY requested_at, id"
        );
        sqlx::query_as::<_, OffboardingRow>(&query)
            .bind(statuses)
            .fetch_all(pool)
            .await
    }

    /// Write every clearance field of `record`, but only while the stored
    /// status still equals `expected_status`.
    ///
    /// Returns `None` if the row is missing or its status has moved on.
    pub async fn update_guarded(
        pool: &PgPool,
        record: &Offboarding,
        expected_status: &str,
    ) -> Result<Option<OffboardingRow>, sqlx::Error> {
        let query = format!(
            "UPDATE offboardings SET
                status = $3,
                ops_supervisor_cleared = $4,
                ops_supervisor_cleared_at = $5,
                ops_supervisor_id = $6,
                ops_supervisor_note = $7,
                company_mobile_returned = $8,
                company_sim_returned = $9,
                platform_returned = $10,
                fleet_cleared = $11,
                fleet_cleared_at = $12,
                fleet_damage_report = $13,
                fleet_damage_cost = $14,
                finance_cleared = $15,
                finance_cleared_at = $16,
                finance_adjustments = $17,
                finance_note = $18,
                finance_invoice_file = $19,
                hr_cleared = $20,
                hr_cleared_at = $21,
                hr_note = $22,
                company_contract_cancelled = $23,
                qiwa_contract_cancelled = $24,
                salary_paid = $25,
                tamm_revoked = $26,
                tamm_revoked_at = $27
             WHERE id = $1 AND status = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, OffboardingRow>(&query)
            .bind(record.id)
            .bind(expected_status)
            .bind(record.status.as_str())
            .bind(record.ops_supervisor_cleared)
            .bind(record.ops_supervisor_cleared_at)
            .bind(record.ops_supervisor_id)
            .bind(&record.ops_supervisor_note)
            .bind(record.company_mobile_returned)
            .bind(record.company_sim_returned)
            .bind(record.platform_returned)
            .bind(record.fleet_cleared)
            .bind(record.fleet_cleared_at)
            .bind(&record.fleet_damage_report)
            .bind(record.fleet_damage_cost)
            .bind(record.finance_cleared)
            .bind(record.finance_cleared_at)
            .bind(record.finance_adjustments)
            .bind(&record.finance_note)
            .bind(&record.finance_invoice_file)
            .bind(record.hr_cleared)
            .bind(record.hr_cleared_at)
            .bind(&record.hr_note)
            .bind(record.company_contract_cancelled)
            .bind(record.qiwa_contract_cancelled)
            .bind(record.salary_paid)
            .bind(record.tamm_revoked)
            .bind(record.tamm_revoked_at)
            .fetch_optional(pool)
            .await
    }
}
