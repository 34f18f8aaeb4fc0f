//! PostgreSQL implementation of [`WorkflowStore`].

use async_trait::async_trait;
use driverflow_core::driver::{Driver, DriverProfileUpdate, NewDriver};
use driverflow_core::error::CoreError;
use driverflow_core::offboarding::{NewOffboarding, Offboarding};
use driverflow_core::ports::WorkflowStore;
use driverflow_core::stage::{OffboardingStatus, OnboardingStage};
use driverflow_core::types::DbId;

use crate::error::to_core_error;
use crate::models::driver::DriverRow;
use crate::models::offboarding::OffboardingRow;
use crate::repositories::{CreateOffboardingOutcome, DriverRepo, OffboardingRepo};
use crate::DbPool;

/// Workflow persistence over the repository layer.
#[derive(Clone)]
pub struct PgWorkflowStore {
    pool: DbPool,
}

impl PgWorkflowStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

fn drivers(rows: Vec<DriverRow>) -> Result<Vec<Driver>, CoreError> {
    rows.into_iter().map(Driver::try_from).collect()
}

fn offboardings(rows: Vec<OffboardingRow>) -> Result<Vec<Offboarding>, CoreError> {
    rows.into_iter().map(Offboarding::try_from).collect()
}

#[async_trait]
impl WorkflowStore for PgWorkflowStore {
    async fn create_driver(&self, input: &NewDriver) -> Result<Driver, CoreError> {
        let row = DriverRepo::create(&self.pool, input)
            .await
            .map_err(to_core_error)?;
        row.try_into()
    }

    async fn find_driver(&self, id: DbId) -> Result<Option<Driver>, CoreError> {
        DriverRepo::find_by_id(&self.pool, id)
            .await
            .map_err(to_core_error)?
            .map(Driver::try_from)
            .transpose()
    }

    async fn update_driver(
        &self,
        driver: &Driver,
        expected_stage: OnboardingStage,
    ) -> Result<Driver, CoreError> {
        let updated = DriverRepo::update_guarded(&self.pool, driver, expected_stage.as_str())
            .await
            .map_err(to_core_error)?;
        if let Some(row) = updated {
            return row.try_into();
        }

        let exists = DriverRepo::exists(&self.pool, driver.id)
            .await
            .map_err(to_core_error)?;
        if !exists {
            return Err(CoreError::NotFound {
                entity: "Driver",
                id: driver.id,
            });
        }
        Err(CoreError::Validation(format!(
            "Driver {} is no longer in stage '{expected_stage}'",
            driver.id
        )))
    }

    async fn update_driver_profile(
        &self,
        id: DbId,
        input: &DriverProfileUpdate,
    ) -> Result<Option<Driver>, CoreError> {
        DriverRepo::update_profile(&self.pool, id, input)
            .await
            .map_err(to_core_error)?
            .map(Driver::try_from)
            .transpose()
    }

    async fn delete_driver(&self, id: DbId) -> Result<bool, CoreError> {
        DriverRepo::delete(&self.pool, id)
            .await
            .map_err(to_core_error)
    }

    async fn list_drivers(&self) -> Result<Vec<Driver>, CoreError> {
        drivers(DriverRepo::list(&self.pool).await.map_err(to_core_error)?)
    }

    async fn list_drivers_in_stages(
        &self,
        stages: &[OnboardingStage],
    ) -> Result<Vec<Driver>, CoreError> {
        let names: Vec<String> = stages.iter().map(|s| s.as_str().to_string()).collect();
        drivers(
            DriverRepo::list_in_stages(&self.pool, &names)
                .await
                .map_err(to_core_error)?,
        )
    }

    async fn create_offboarding(&self, input: &NewOffboarding) -> Result<Offboarding, CoreError> {
        let outcome = OffboardingRepo::create_exclusive(&self.pool, input)
            .await
            .map_err(to_core_error)?;
        match outcome {
            CreateOffboardingOutcome::Created(row) => row.try_into(),
            CreateOffboardingOutcome::AlreadyActive(existing) => Err(CoreError::Conflict(format!(
                "Offboarding already requested for driver {} (offboarding {})",
                input.driver_id, existing.id
            ))),
            CreateOffboardingOutcome::DriverMissing => Err(CoreError::NotFound {
                entity: "Driver",
                id: input.driver_id,
            }),
        }
    }

    async fn find_offboarding(&self, id: DbId) -> Result<Option<Offboarding>, CoreError> {
        OffboardingRepo::find_by_id(&self.pool, id)
            .await
            .map_err(to_core_error)?
            .map(Offboarding::try_from)
            .transpose()
    }

    async fn find_active_offboarding(
        &self,
        driver_id: DbId,
    ) -> Result<Option<Offboarding>, CoreError> {
        OffboardingRepo::find_active_for_driver(&self.pool, driver_id)
            .await
            .map_err(to_core_error)?
            .map(Offboarding::try_from)
            .transpose()
    }

    async fn update_offboarding(
        &self,
        record: &Offboarding,
        expected_status: OffboardingStatus,
    ) -> Result<Offboarding, CoreError> {
        let updated = OffboardingRepo::update_guarded(&self.pool, record, expected_status.as_str())
            .await
            .map_err(to_core_error)?;
        if let Some(row) = updated {
            return row.try_into();
        }

        let exists = OffboardingRepo::exists(&self.pool, record.id)
            .await
            .map_err(to_core_error)?;
        if !exists {
            return Err(CoreError::NotFound {
                entity: "Offboarding",
                id: record.id,
            });
        }
        Err(CoreError::Validation(format!(
            "Offboarding {} is no longer in status '{expected_status}'",
            record.id
        )))
    }

    async fn list_offboardings(&self) -> Result<Vec<Offboarding>, CoreError> {
        offboardings(OffboardingRepo::list(&self.pool).await.map_err(to_core_error)?)
    }

    async fn list_offboardings_in_statuses(
        &self,
        statuses: &[OffboardingStatus],
    ) -> Result<Vec<Offboarding>, CoreError> {
        let names: Vec<String> = statuses.iter().map(|s| s.as_str().to_string()).collect();
        offboardings(
            OffboardingRepo::list_in_statuses(&self.pool, &names)
                .await
                .map_err(to_core_error)?,
        )
    }
}
