//! Message templates for workflow notifications.
//!
//! Each builder returns the role(s) to notify and the message. Bodies carry
//! the summary fields of the stage that just finished.

use crate::driver::Driver;
use crate::offboarding::Offboarding;
use crate::roles::Role;
use crate::stage::{OffboardingStatus, OnboardingStage};

/// A rendered notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub subject: String,
    pub body: String,
}

impl Notification {
    fn new(subject: String, body: String) -> Self {
        Self { subject, body }
    }
}

fn or_na(value: &Option<String>) -> &str {
    value.as_deref().filter(|v| !v.is_empty()).unwrap_or("N/A")
}

fn money(value: Option<f64>) -> String {
    format!("{:.2}", value.unwrap_or(0.0))
}

/// Notification for a driver that has just entered its current stage.
///
/// Also used on registration, when the driver enters the first stage.
pub fn onboarding_notice(driver: &Driver) -> (Role, Notification) {
    let name = &driver.full_name;
    let iqama = &driver.iqama_number;
    match driver.onboarding_stage {
        OnboardingStage::OperationsManager => (
            Role::OpsManager,
            Notification::new(
                format!("New Driver Registration: {name}"),
                format!(
                    "A new driver has registered and awaits Operations Manager approval.\n\
                     Name: {name}\nIqama: {iqama}\nCity: {}\nMobile: {}",
                    or_na(&driver.city),
                    or_na(&driver.mobile_number),
                ),
            ),
        ),
        OnboardingStage::Hr => (
            Role::Hr,
            Notification::new(
                format!("Driver Ready for HR Stage: {name}"),
                format!(
                    "Driver {name} was approved by the Operations Manager and moved to the HR stage.\n\
                     Iqama: {iqama}\nNationality: {}",
                    or_na(&driver.nationality),
                ),
            ),
        ),
        OnboardingStage::OperationsSupervisor => (
            Role::OpsSupervisor,
            Notification::new(
                format!("Driver Ready for Ops Supervisor Stage: {name}"),
                format!(
                    "Driver {name} moved to the Operations Supervisor stage.\n\
                     Iqama: {iqama}\nQiwa contract status: {}\nSponsorship transfer: {}",
                    driver.qiwa_contract_status, driver.sponsorship_transfer_status,
                ),
            ),
        ),
        OnboardingStage::FleetManager => (
            Role::FleetManager,
            Notification::new(
                format!("Driver Ready for Fleet Stage: {name}"),
                format!(
                    "Driver {name} moved to the Fleet Manager stage.\n\
                     Iqama: {iqama}\nPlatform: {} ({})\nIssued mobile: {}",
                    or_na(&driver.platform),
                    or_na(&driver.platform_id),
                    or_na(&driver.issued_mobile_number),
                ),
            ),
        ),
        OnboardingStage::Finance => (
            Role::FinanceManager,
            Notification::new(
                format!("Driver Ready for Finance Stage: {name}"),
                format!(
                    "Driver {name} moved to the Finance stage.\n\
                     Iqama: {iqama}\nVehicle: {}\nAssigned on: {}",
                    or_na(&driver.car_details),
                    driver
                        .assignment_date
                        .map(|d| d.to_string())
                        .unwrap_or_else(|| "N/A".into()),
                ),
            ),
        ),
        OnboardingStage::HrFinal => (
            Role::Hr,
            Notification::new(
                format!("Driver Ready for Sponsorship Transfer: {name}"),
                format!(
                    "Finance approved driver {name}; the sponsorship transfer can be completed.\n\
                     Iqama: {iqama}\nTransfer fee: {}\nPaid at: {}",
                    money(driver.transfer_fee_amount),
                    driver
                        .transfer_fee_paid_at
                        .map(|t| t.date_naive().to_string())
                        .unwrap_or_else(|| "N/A".into()),
                ),
            ),
        ),
        OnboardingStage::Completed => (
            Role::SuperAdmin,
            Notification::new(
                format!("Driver Onboarding Completed: {name}"),
                format!("Driver {name} completed sponsorship transfer. Iqama: {iqama}"),
            ),
        ),
    }
}

/// Notifications for an offboarding record that has just entered its
/// current status.
pub fn offboarding_notices(driver: &Driver, record: &Offboarding) -> Vec<(Role, Notification)> {
    let name = &driver.full_name;
    let iqama = &driver.iqama_number;
    match record.status {
        OffboardingStatus::Requested | OffboardingStatus::OpsSupervisor => vec![(
            Role::OpsSupervisor,
            Notification::new(
                format!("Offboarding Requested: {name}"),
                format!(
                    "The Operations Manager requested offboarding for driver {name} (Iqama: {iqama}).\n\
                     Please collect the company mobile, SIM and platform account."
                ),
            ),
        )],
        OffboardingStatus::Fleet => vec![(
            Role::FleetManager,
            Notification::new(
                format!("Offboarding Ready for Fleet: {name}"),
                format!(
                    "Operations Supervisor cleared driver {name} (Iqama: {iqama}).\n\
                     Mobile returned: {}\nSIM returned: {}\nPlatform returned: {}",
                    yes_no(record.company_mobile_returned),
                    yes_no(record.company_sim_returned),
                    yes_no(record.platform_returned),
                ),
            ),
        )],
        OffboardingStatus::Finance => vec![(
            Role::FinanceManager,
            Notification::new(
                format!("Offboarding Ready for Finance: {name}"),
                format!(
                    "Fleet cleared driver {name} (Iqama: {iqama}).\n\
                     Damage report: {}\nDamage cost: {}",
                    or_na(&record.fleet_damage_report),
                    money(record.fleet_damage_cost),
                ),
            ),
        )],
        OffboardingStatus::Hr => vec![(
            Role::Hr,
            Notification::new(
                format!("Offboarding Ready for HR: {name}"),
                format!(
                    "Finance cleared driver {name} (Iqama: {iqama}).\n\
                     Adjustments: {}\nNote: {}",
                    money(record.finance_adjustments),
                    or_na(&record.finance_note),
                ),
            ),
        )],
        OffboardingStatus::PendingTamm => vec![(
            Role::FleetManager,
            Notification::new(
                format!("Offboarding Ready for TAMM: {name}"),
                format!(
                    "HR has cleared the offboarding for driver {name} (Iqama: {iqama}). \
                     The record is ready for TAMM cancelation."
                ),
            ),
        )],
        OffboardingStatus::Completed => {
            let message = Notification::new(
                format!("Offboarding Completed: {name}"),
                format!("TAMM authorization for driver {name} (Iqama: {iqama}) has been revoked."),
            );
            vec![(Role::Hr, message.clone()), (Role::SuperAdmin, message)]
        }
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}
