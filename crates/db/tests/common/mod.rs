use chrono::{TimeZone, Utc};
use driverflow_core::driver::NewDriver;
use driverflow_core::offboarding::NewOffboarding;
use driverflow_core::stage::OffboardingStatus;
use driverflow_core::types::DbId;
use driverflow_db::models::user::CreateUser;
use driverflow_db::repositories::UserRepo;
use sqlx::PgPool;

pub fn registration(name: &str, iqama: &str) -> NewDriver {
    NewDriver {
        full_name: name.into(),
        iqama_number: iqama.into(),
        iqama_expiry_date: None,
        saudi_driving_license: true,
        nationality: Some("Egypt".into()),
        mobile_number: Some("0551234567".into()),
        previous_sponsor_number: None,
        city: Some("Jeddah".into()),
        iqama_card_upload: None,
    }
}

pub async fn seed_user(pool: &PgPool, username: &str, role: &str, email: Option<&str>) -> DbId {
    UserRepo::create(
        pool,
        &CreateUser {
            username: username.into(),
            password_hash: "not-a-real-hash".into(),
            role: role.into(),
            name: username.into(),
            designation: None,
            branch_city: None,
            email: email.map(Into::into),
        },
    )
    .await
    .unwrap()
    .id
}

/// Move a driver straight to `Completed` without walking the workflow.
pub async fn force_completed(pool: &PgPool, driver_id: DbId) {
    sqlx::query("UPDATE drivers SET onboarding_stage = 'Completed' WHERE id = $1")
        .bind(driver_id)
        .execute(pool)
        .await
        .unwrap();
}

pub fn offboarding_request(driver_id: DbId, requested_by: DbId) -> NewOffboarding {
    NewOffboarding {
        driver_id,
        requested_by,
        requested_at: Utc.with_ymd_and_hms(2026, 4, 2, 12, 0, 0).unwrap(),
        status: OffboardingStatus::Requested,
    }
}
