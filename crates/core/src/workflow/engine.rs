//! The stage transition engine.
//!
//! Every mutating call follows the same path: role gate, load, pure
//! transition, guarded save, then notification. Notification failures are
//! logged and never change the outcome reported to the caller.

use std::sync::Arc;

use crate::driver::{Driver, NewDriver};
use crate::error::CoreError;
use crate::notifications::{self, Notification};
use crate::offboarding::Offboarding;
use crate::ports::{Notifier, WorkflowStore};
use crate::roles::{require_role, Actor, Role};
use crate::types::{DbId, Timestamp};

use super::offboarding::{
    self as off, FinanceClearance, FleetClearance, HrClearance, OpsSupervisorClearance,
    TammRevocation,
};
use super::onboarding::{
    self as on, FinanceApproval, FleetAssignment, HrApproval, OpsSupervisorApproval,
    TransferCompletion,
};

/// Source of the current time.
pub type Clock = Arc<dyn Fn() -> Timestamp + Send + Sync>;

/// Drives drivers and offboarding records through their workflows.
#[derive(Clone)]
pub struct WorkflowEngine {
    store: Arc<dyn WorkflowStore>,
    notifier: Arc<dyn Notifier>,
    clock: Clock,
}

impl WorkflowEngine {
    pub fn new(store: Arc<dyn WorkflowStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            store,
            notifier,
            clock: Arc::new(chrono::Utc::now),
        }
    }

    /// Replace the wall clock (tests pin "today" this way).
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn store(&self) -> &Arc<dyn WorkflowStore> {
        &self.store
    }

    fn now(&self) -> Timestamp {
        (self.clock)()
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    pub async fn driver(&self, id: DbId) -> Result<Driver, CoreError> {
        self.store
            .find_driver(id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Driver",
                id,
            })
    }

    pub async fn offboarding(&self, id: DbId) -> Result<Offboarding, CoreError> {
        self.store
            .find_offboarding(id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Offboarding",
                id,
            })
    }

    // -----------------------------------------------------------------------
    // Onboarding
    // -----------------------------------------------------------------------

    /// Public self-registration. No role is required.
    pub async fn register_driver(&self, input: NewDriver) -> Result<Driver, CoreError> {
        let input = input.validated()?;
        let driver = self.store.create_driver(&input).await?;
        tracing::info!(driver_id = driver.id, "Driver registered");

        let (role, message) = notifications::onboarding_notice(&driver);
        self.dispatch(role, &message).await;
        Ok(driver)
    }

    pub async fn approve_ops_manager(
        &self,
        actor: &Actor,
        driver_id: DbId,
    ) -> Result<Driver, CoreError> {
        self.transition_driver(actor, driver_id, Role::OpsManager, |d, now| {
            on::approve_ops_manager(d, now)
        })
        .await
    }

    pub async fn approve_hr(
        &self,
        actor: &Actor,
        driver_id: DbId,
        input: &HrApproval,
    ) -> Result<Driver, CoreError> {
        let approver = actor.user_id;
        self.transition_driver(actor, driver_id, Role::Hr, |d, now| {
            on::approve_hr(d, input, approver, now)
        })
        .await
    }

    pub async fn approve_ops_supervisor(
        &self,
        actor: &Actor,
        driver_id: DbId,
        input: &OpsSupervisorApproval,
    ) -> Result<Driver, CoreError> {
        self.transition_driver(actor, driver_id, Role::OpsSupervisor, |d, now| {
            on::approve_ops_supervisor(d, input, now)
        })
        .await
    }

    pub async fn assign_vehicle(
        &self,
        actor: &Actor,
        driver_id: DbId,
        input: &FleetAssignment,
    ) -> Result<Driver, CoreError> {
        self.transition_driver(actor, driver_id, Role::FleetManager, |d, now| {
            on::assign_vehicle(d, input, now)
        })
        .await
    }

    pub async fn approve_finance(
        &self,
        actor: &Actor,
        driver_id: DbId,
        input: &FinanceApproval,
    ) -> Result<Driver, CoreError> {
        self.transition_driver(actor, driver_id, Role::FinanceManager, |d, now| {
            on::approve_finance(d, input, now)
        })
        .await
    }

    pub async fn complete_transfer(
        &self,
        actor: &Actor,
        driver_id: DbId,
        input: &TransferCompletion,
    ) -> Result<Driver, CoreError> {
        self.transition_driver(actor, driver_id, Role::Hr, |d, now| {
            on::complete_transfer(d, input, now)
        })
        .await
    }

    async fn transition_driver<F>(
        &self,
        actor: &Actor,
        driver_id: DbId,
        required: Role,
        apply: F,
    ) -> Result<Driver, CoreError>
    where
        F: FnOnce(&Driver, Timestamp) -> Result<Driver, CoreError> + Send,
    {
        require_role(actor, required)?;
        let current = self.driver(driver_id).await?;
        let updated = apply(&current, self.now())?;
        let saved = self
            .store
            .update_driver(&updated, current.onboarding_stage)
            .await?;

        tracing::info!(
            driver_id,
            user_id = actor.user_id,
            from = %current.onboarding_stage,
            to = %saved.onboarding_stage,
            "Onboarding stage advanced"
        );

        let (role, message) = notifications::onboarding_notice(&saved);
        self.dispatch(role, &message).await;
        Ok(saved)
    }

    // -----------------------------------------------------------------------
    // Offboarding
    // -----------------------------------------------------------------------

    /// Open an offboarding for a completed driver.
    ///
    /// Returns [`CoreError::Conflict`] when the driver already has an active
    /// offboarding; no second record is created.
    pub async fn request_offboarding(
        &self,
        actor: &Actor,
        driver_id: DbId,
    ) -> Result<Offboarding, CoreError> {
        require_role(actor, Role::OpsManager)?;
        let driver = self.driver(driver_id).await?;
        let request = off::new_request(&driver, actor.user_id, self.now())?;

        if let Some(existing) = self.store.find_active_offboarding(driver_id).await? {
            return Err(already_requested(driver_id, existing.id));
        }
        let record = self.store.create_offboarding(&request).await?;

        tracing::info!(
            driver_id,
            offboarding_id = record.id,
            user_id = actor.user_id,
            "Offboarding requested"
        );

        self.dispatch_offboarding(&driver, &record).await;
        Ok(record)
    }

    pub async fn clear_ops_supervisor(
        &self,
        actor: &Actor,
        offboarding_id: DbId,
        input: &OpsSupervisorClearance,
    ) -> Result<Offboarding, CoreError> {
        let supervisor = actor.user_id;
        self.transition_offboarding(actor, offboarding_id, Role::OpsSupervisor, |r, now| {
            off::clear_ops_supervisor(r, input, supervisor, now)
        })
        .await
    }

    pub async fn clear_fleet(
        &self,
        actor: &Actor,
        offboarding_id: DbId,
        input: &FleetClearance,
    ) -> Result<Offboarding, CoreError> {
        self.transition_offboarding(actor, offboarding_id, Role::FleetManager, |r, now| {
            off::clear_fleet(r, input, now)
        })
        .await
    }

    pub async fn clear_finance(
        &self,
        actor: &Actor,
        offboarding_id: DbId,
        input: &FinanceClearance,
    ) -> Result<Offboarding, CoreError> {
        self.transition_offboarding(actor, offboarding_id, Role::FinanceManager, |r, now| {
            off::clear_finance(r, input, now)
        })
        .await
    }

    pub async fn clear_hr(
        &self,
        actor: &Actor,
        offboarding_id: DbId,
        input: &HrClearance,
    ) -> Result<Offboarding, CoreError> {
        self.transition_offboarding(actor, offboarding_id, Role::Hr, |r, now| {
            off::clear_hr(r, input, now)
        })
        .await
    }

    pub async fn revoke_tamm(
        &self,
        actor: &Actor,
        offboarding_id: DbId,
        input: &TammRevocation,
    ) -> Result<Offboarding, CoreError> {
        self.transition_offboarding(actor, offboarding_id, Role::FleetManager, |r, now| {
            off::revoke_tamm(r, input, now)
        })
        .await
    }

    async fn transition_offboarding<F>(
        &self,
        actor: &Actor,
        offboarding_id: DbId,
        required: Role,
        apply: F,
    ) -> Result<Offboarding, CoreError>
    where
        F: FnOnce(&Offboarding, Timestamp) -> Result<Offboarding, CoreError> + Send,
    {
        require_role(actor, required)?;
        let current = self.offboarding(offboarding_id).await?;
        let updated = apply(&current, self.now())?;
        let saved = self
            .store
            .update_offboarding(&updated, current.status)
            .await?;

        tracing::info!(
            offboarding_id,
            driver_id = saved.driver_id,
            user_id = actor.user_id,
            from = %current.status,
            to = %saved.status,
            "Offboarding status advanced"
        );

        match self.store.find_driver(saved.driver_id).await {
            Ok(Some(driver)) => self.dispatch_offboarding(&driver, &saved).await,
            Ok(None) => tracing::warn!(
                offboarding_id,
                driver_id = saved.driver_id,
                "Driver missing, skipping offboarding notification"
            ),
            Err(e) => tracing::warn!(
                offboarding_id,
                error = %e,
                "Could not load driver for offboarding notification"
            ),
        }
        Ok(saved)
    }

    // -----------------------------------------------------------------------
    // Notification
    // -----------------------------------------------------------------------

    async fn dispatch_offboarding(&self, driver: &Driver, record: &Offboarding) {
        for (role, message) in notifications::offboarding_notices(driver, record) {
            self.dispatch(role, &message).await;
        }
    }

    async fn dispatch(&self, role: Role, message: &Notification) {
        if let Err(e) = self
            .notifier
            .notify(role, &message.subject, &message.body)
            .await
        {
            tracing::warn!(role = %role, subject = %message.subject, error = %e, "Notification failed");
        }
    }
}

fn already_requested(driver_id: DbId, offboarding_id: DbId) -> CoreError {
    CoreError::Conflict(format!(
        "Offboarding already requested for driver {driver_id} (offboarding {offboarding_id})"
    ))
}
