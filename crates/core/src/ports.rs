//! Collaborator traits the workflow engine depends on.
//!
//! Implementations live elsewhere: PostgreSQL in `driverflow-db`, SMTP in
//! `driverflow-events`, and the local filesystem blob store in
//! `driverflow-api`.

use async_trait::async_trait;

use crate::driver::{Driver, DriverProfileUpdate, NewDriver};
use crate::error::{CoreError, NotificationError};
use crate::offboarding::{NewOffboarding, Offboarding};
use crate::roles::Role;
use crate::stage::{OffboardingStatus, OnboardingStage};
use crate::types::DbId;

/// Persistence for drivers and offboarding records.
///
/// Every write is atomic. The `update_*` methods are guarded by the stage or
/// status the caller read: if the stored value no longer matches, nothing is
/// written and a [`CoreError::Validation`] is returned.
#[async_trait]
pub trait WorkflowStore: Send + Sync {
    /// Insert a driver at the first onboarding stage.
    ///
    /// A duplicate `iqama_number` yields [`CoreError::Conflict`].
    async fn create_driver(&self, input: &NewDriver) -> Result<Driver, CoreError>;

    async fn find_driver(&self, id: DbId) -> Result<Option<Driver>, CoreError>;

    async fn update_driver(
        &self,
        driver: &Driver,
        expected_stage: OnboardingStage,
    ) -> Result<Driver, CoreError>;

    /// Apply an administrative profile correction (no workflow fields).
    async fn update_driver_profile(
        &self,
        id: DbId,
        input: &DriverProfileUpdate,
    ) -> Result<Option<Driver>, CoreError>;

    /// Hard-delete a driver and its offboarding history.
    async fn delete_driver(&self, id: DbId) -> Result<bool, CoreError>;

    async fn list_drivers(&self) -> Result<Vec<Driver>, CoreError>;

    async fn list_drivers_in_stages(
        &self,
        stages: &[OnboardingStage],
    ) -> Result<Vec<Driver>, CoreError>;

    /// Insert an offboarding record.
    ///
    /// The check for an existing active record for the same driver happens
    /// in the same atomic unit as the insert; a duplicate yields
    /// [`CoreError::Conflict`] and no row is created.
    async fn create_offboarding(&self, input: &NewOffboarding) -> Result<Offboarding, CoreError>;

    async fn find_offboarding(&self, id: DbId) -> Result<Option<Offboarding>, CoreError>;

    async fn find_active_offboarding(
        &self,
        driver_id: DbId,
    ) -> Result<Option<Offboarding>, CoreError>;

    async fn update_offboarding(
        &self,
        record: &Offboarding,
        expected_status: OffboardingStatus,
    ) -> Result<Offboarding, CoreError>;

    async fn list_offboardings(&self) -> Result<Vec<Offboarding>, CoreError>;

    async fn list_offboardings_in_statuses(
        &self,
        statuses: &[OffboardingStatus],
    ) -> Result<Vec<Offboarding>, CoreError>;
}

/// Resolves a role to the email addresses of its active holders.
#[async_trait]
pub trait RecipientDirectory: Send + Sync {
    async fn emails_for_role(&self, role: Role) -> Result<Vec<String>, NotificationError>;
}

/// Sends a message to every holder of a role.
///
/// Having zero recipients is not an error.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, role: Role, subject: &str, body: &str)
        -> Result<(), NotificationError>;
}

/// Stores an uploaded file and returns an opaque reference to it.
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn store(&self, bytes: Vec<u8>, suggested_name: &str) -> Result<String, CoreError>;

    /// Whether `reference` names a file previously returned by `store`.
    async fn exists(&self, reference: &str) -> Result<bool, CoreError>;

    /// Delete a stored file. Unknown references are ignored.
    async fn remove(&self, reference: &str) -> Result<(), CoreError>;
}
