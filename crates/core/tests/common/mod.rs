//! In-memory collaborators for exercising the workflow engine.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use driverflow_core::driver::{Driver, DriverProfileUpdate, NewDriver, STATUS_PENDING};
use driverflow_core::error::{CoreError, NotificationError};
use driverflow_core::offboarding::{NewOffboarding, Offboarding};
use driverflow_core::ports::{Notifier, WorkflowStore};
use driverflow_core::roles::{Actor, Role};
use driverflow_core::stage::{OffboardingStatus, OnboardingStage};
use driverflow_core::types::{DbId, Timestamp};
use driverflow_core::workflow::WorkflowEngine;

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

#[derive(Default)]
struct Tables {
    next_id: DbId,
    drivers: BTreeMap<DbId, Driver>,
    offboardings: BTreeMap<DbId, Offboarding>,
}

impl Tables {
    fn next_id(&mut self) -> DbId {
        self.next_id += 1;
        self.next_id
    }
}

/// `WorkflowStore` over two maps behind one mutex, so every method is a
/// single atomic unit.
#[derive(Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
    fail_writes: AtomicBool,
    full_scans: AtomicUsize,
}

impl InMemoryStore {
    /// Make every subsequent write fail as if the commit was lost.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// How many times `list_drivers` or `list_offboardings` has run.
    pub fn full_scans(&self) -> usize {
        self.full_scans.load(Ordering::SeqCst)
    }

    pub fn offboarding_count(&self) -> usize {
        self.tables.lock().unwrap().offboardings.len()
    }

    fn check_writable(&self) -> Result<(), CoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(CoreError::Persistence("simulated commit failure".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl WorkflowStore for InMemoryStore {
    async fn create_driver(&self, input: &NewDriver) -> Result<Driver, CoreError> {
        self.check_writable()?;
        let mut tables = self.tables.lock().unwrap();
        if tables
            .drivers
            .values()
            .any(|d| d.iqama_number == input.iqama_number)
        {
            return Err(CoreError::Conflict(format!(
                "Iqama number {} is already registered",
                input.iqama_number
            )));
        }
        let id = tables.next_id();
        let driver = new_driver_row(id, input, Utc::now());
        tables.drivers.insert(id, driver.clone());
        Ok(driver)
    }

    async fn find_driver(&self, id: DbId) -> Result<Option<Driver>, CoreError> {
        Ok(self.tables.lock().unwrap().drivers.get(&id).cloned())
    }

    async fn update_driver(
        &self,
        driver: &Driver,
        expected_stage: OnboardingStage,
    ) -> Result<Driver, CoreError> {
        self.check_writable()?;
        let mut tables = self.tables.lock().unwrap();
        let stored = tables.drivers.get_mut(&driver.id).ok_or(CoreError::NotFound {
            entity: "Driver",
            id: driver.id,
        })?;
        if stored.onboarding_stage != expected_stage {
            return Err(CoreError::Validation(format!(
                "Driver {} is no longer in stage '{expected_stage}'",
                driver.id
            )));
        }
        *stored = driver.clone();
        Ok(driver.clone())
    }

    async fn update_driver_profile(
        &self,
        id: DbId,
        input: &DriverProfileUpdate,
    ) -> Result<Option<Driver>, CoreError> {
        self.check_writable()?;
        let mut tables = self.tables.lock().unwrap();
        Ok(tables.drivers.get_mut(&id).map(|d| {
            if let Some(name) = &input.full_name {
                d.full_name = name.clone();
            }
            if let Some(city) = &input.city {
                d.city = Some(city.clone());
            }
            d.clone()
        }))
    }

    async fn delete_driver(&self, id: DbId) -> Result<bool, CoreError> {
        self.check_writable()?;
        let mut tables = self.tables.lock().unwrap();
        tables.offboardings.retain(|_, o| o.driver_id != id);
        Ok(tables.drivers.remove(&id).is_some())
    }

    async fn list_drivers(&self) -> Result<Vec<Driver>, CoreError> {
        self.full_scans.fetch_add(1, Ordering::SeqCst);
        Ok(self.tables.lock().unwrap().drivers.values().cloned().collect())
    }

    async fn list_drivers_in_stages(
        &self,
        stages: &[OnboardingStage],
    ) -> Result<Vec<Driver>, CoreError> {
        Ok(self
            .tables
            .lock()
            .unwrap()
            .drivers
            .values()
            .filter(|d| stages.contains(&d.onboarding_stage))
            .cloned()
            .collect())
    }

    async fn create_offboarding(&self, input: &NewOffboarding) -> Result<Offboarding, CoreError> {
        self.check_writable()?;
        let mut tables = self.tables.lock().unwrap();
        if tables
            .offboardings
            .values()
            .any(|o| o.driver_id == input.driver_id && o.status.is_active())
        {
            return Err(CoreError::Conflict(format!(
                "Offboarding already requested for driver {}",
                input.driver_id
            )));
        }
        let id = tables.next_id();
        let record = new_offboarding_row(id, input);
        tables.offboardings.insert(id, record.clone());
        Ok(record)
    }

    async fn find_offboarding(&self, id: DbId) -> Result<Option<Offboarding>, CoreError> {
        Ok(self.tables.lock().unwrap().offboardings.get(&id).cloned())
    }

    async fn find_active_offboarding(
        &self,
        driver_id: DbId,
    ) -> Result<Option<Offboarding>, CoreError> {
        Ok(self
            .tables
            .lock()
            .unwrap()
            .offboardings
            .values()
            .find(|o| o.driver_id == driver_id && o.status.is_active())
            .cloned())
    }

    async fn update_offboarding(
        &self,
        record: &Offboarding,
        expected_status: OffboardingStatus,
    ) -> Result<Offboarding, CoreError> {
        self.check_writable()?;
        let mut tables = self.tables.lock().unwrap();
        let stored = tables
            .offboardings
            .get_mut(&record.id)
            .ok_or(CoreError::NotFound {
                entity: "Offboarding",
                id: record.id,
            })?;
        if stored.status != expected_status {
            return Err(CoreError::Validation(format!(
                "Offboarding {} is no longer in status '{expected_status}'",
                record.id
            )));
        }
        *stored = record.clone();
        Ok(record.clone())
    }

    async fn list_offboardings(&self) -> Result<Vec<Offboarding>, CoreError> {
        self.full_scans.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .tables
            .lock()
            .unwrap()
            .offboardings
            .values()
            .cloned()
            .collect())
    }

    async fn list_offboardings_in_statuses(
        &self,
        statuses: &[OffboardingStatus],
    ) -> Result<Vec<Offboarding>, CoreError> {
        Ok(self
            .tables
            .lock()
            .unwrap()
            .offboardings
            .values()
            .filter(|o| statuses.contains(&o.status))
            .cloned()
            .collect())
    }
}

fn new_driver_row(id: DbId, input: &NewDriver, now: Timestamp) -> Driver {
    Driver {
        id,
        full_name: input.full_name.clone(),
        iqama_number: input.iqama_number.clone(),
        iqama_expiry_date: input.iqama_expiry_date,
        saudi_driving_license: input.saudi_driving_license,
        nationality: input.nationality.clone(),
        mobile_number: input.mobile_number.clone(),
        previous_sponsor_number: input.previous_sponsor_number.clone(),
        city: input.city.clone(),
        iqama_card_upload: input.iqama_card_upload.clone(),
        onboarding_stage: OnboardingStage::OperationsManager,
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
        created_at: now,
        updated_at: now,
    }
}

fn new_offboarding_row(id: DbId, input: &NewOffboarding) -> Offboarding {
    Offboarding {
        id,
        driver_id: input.driver_id,
        requested_by: input.requested_by,
        requested_at: input.requested_at,
        status: input.status,
        ops_supervisor_cleared: false,
        ops_supervisor_cleared_at: None,
        ops_supervisor_id: None,
        ops_supervisor_note: None,
        company_mobile_returned: false,
        company_sim_returned: false,
        platform_returned: false,
        fleet_cleared: false,
        fleet_cleared_at: None,
        fleet_damage_report: None,
        fleet_damage_cost: None,
        finance_cleared: false,
        finance_cleared_at: None,
        finance_adjustments: None,
        finance_note: None,
        finance_invoice_file: None,
        hr_cleared: false,
        hr_cleared_at: None,
        hr_note: None,
        company_contract_cancelled: false,
        qiwa_contract_cancelled: false,
        salary_paid: false,
        tamm_revoked: false,
        tamm_revoked_at: None,
        created_at: input.requested_at,
        updated_at: input.requested_at,
    }
}

// ---------------------------------------------------------------------------
// Notifiers
// ---------------------------------------------------------------------------

/// Records every notification it is asked to send.
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<(Role, String)>>,
}

impl RecordingNotifier {
    /// Roles notified so far, in order.
    pub fn roles(&self) -> Vec<Role> {
        self.sent.lock().unwrap().iter().map(|(r, _)| *r).collect()
    }

    pub fn subjects(&self) -> Vec<String> {
        self.sent.lock().unwrap().iter().map(|(_, s)| s.clone()).collect()
    }

    pub fn clear(&self) {
        self.sent.lock().unwrap().clear();
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, role: Role, subject: &str, _body: &str) -> Result<(), NotificationError> {
        self.sent.lock().unwrap().push((role, subject.to_string()));
        Ok(())
    }
}

/// Fails every dispatch.
pub struct FailingNotifier;

#[async_trait]
impl Notifier for FailingNotifier {
    async fn notify(&self, _role: Role, _subject: &str, _body: &str) -> Result<(), NotificationError> {
        Err(NotificationError::Dispatch("mail server unreachable".into()))
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// 2026-03-15 10:30 UTC.
pub fn fixed_now() -> Timestamp {
    Utc.with_ymd_and_hms(2026, 3, 15, 10, 30, 0).unwrap()
}

pub struct Harness {
    pub engine: WorkflowEngine,
    pub store: Arc<InMemoryStore>,
    pub notifier: Arc<RecordingNotifier>,
}

pub fn harness() -> Harness {
    let store = Arc::new(InMemoryStore::default());
    let notifier = Arc::new(RecordingNotifier::default());
    let engine = WorkflowEngine::new(store.clone(), notifier.clone())
        .with_clock(Arc::new(fixed_now));
    Harness {
        engine,
        store,
        notifier,
    }
}

pub fn actor(role: Role) -> Actor {
    let user_id = match role {
        Role::SuperAdmin => 1,
        Role::OpsManager => 2,
        Role::Hr => 3,
        Role::OpsSupervisor => 4,
        Role::FleetManager => 5,
        Role::FinanceManager => 6,
    };
    Actor::new(user_id, role.as_str())
}

pub fn registration(name: &str, iqama: &str) -> NewDriver {
    NewDriver {
        full_name: name.to_string(),
        iqama_number: iqama.to_string(),
        iqama_expiry_date: None,
        saudi_driving_license: true,
        nationality: Some("India".into()),
        mobile_number: Some("0501234567".into()),
        previous_sponsor_number: None,
        city: Some("Jeddah".into()),
        iqama_card_upload: None,
    }
}
