//! HTTP-level tests for registration, the onboarding stages, offboarding
//! clearances and the role dashboards.

mod common;

use axum::http::StatusCode;
use axum::Router;
use common::{
    body_json, get_auth, post_json_auth, post_multipart, register_driver, staff_token, Part,
    TestApp,
};
use driverflow_core::types::DbId;
use serde_json::{json, Value};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// One token per workflow role.
struct Staff {
    ops_manager: String,
    hr: String,
    ops_supervisor: String,
    fleet: String,
    finance: String,
    admin: String,
}

async fn staff(test: &TestApp, pool: &PgPool) -> Staff {
    Staff {
        ops_manager: staff_token(test, pool, "ops_manager", "OpsManager").await,
        hr: staff_token(test, pool, "hr", "HR").await,
        ops_supervisor: staff_token(test, pool, "ops_supervisor", "OpsSupervisor").await,
        fleet: staff_token(test, pool, "fleet", "FleetManager").await,
        finance: staff_token(test, pool, "finance", "FinanceManager").await,
        admin: staff_token(test, pool, "admin", "SuperAdmin").await,
    }
}

/// POST and assert the status, returning the `data` payload.
async fn act(app: Router, uri: &str, body: Value, token: &str, expected: StatusCode) -> Value {
    let response = post_json_auth(app, uri, body, token).await;
    let status = response.status();
    let json = body_json(response).await;
    assert_eq!(status, expected, "POST {uri} returned {json}");
    json["data"].clone()
}

async fn upload(test: &TestApp, token: &str, driver_id: DbId, purpose: &str) -> String {
    let driver_id = driver_id.to_string();
    let response = post_multipart(
        test.app(),
        "/api/v1/uploads",
        &[
            Part::Text("purpose", purpose),
            Part::Text("driver_id", &driver_id),
            Part::File {
                name: "file",
                file_name: "screenshot.png",
                bytes: b"\x89PNG fake image",
            },
        ],
        Some(token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["reference"]
        .as_str()
        .unwrap()
        .to_string()
}

/// Walk a freshly registered driver up to the Fleet Manager stage.
async fn to_fleet_stage(test: &TestApp, staff: &Staff, driver_id: DbId) {
    let base = format!("/api/v1/drivers/{driver_id}");
    act(
        test.app(),
        &format!("{base}/ops-manager/approve"),
        json!({}),
        &staff.ops_manager,
        StatusCode::OK,
    )
    .await;
    act(
        test.app(),
        &format!("{base}/hr/approve"),
        json!({
            "company_contract_created": true,
            "qiwa_contract_created": true,
            "qiwa_contract_status": "Approved",
        }),
        &staff.hr,
        StatusCode::OK,
    )
    .await;
    act(
        test.app(),
        &format!("{base}/ops-supervisor/approve"),
        json!({
            "platform": "Jahez",
            "platform_id": "JZ-1001",
            "issued_mobile_number": "0550000000",
            "mobile_issued": true,
        }),
        &staff.ops_supervisor,
        StatusCode::OK,
    )
    .await;
}

/// Walk a freshly registered driver all the way to `Completed`.
async fn onboard(test: &TestApp, staff: &Staff, driver_id: DbId) -> Value {
    let base = format!("/api/v1/drivers/{driver_id}");
    to_fleet_stage(test, staff, driver_id).await;
    let screenshot = upload(test, &staff.fleet, driver_id, "tamm_authorisation").await;
    act(
        test.app(),
        &format!("{base}/fleet/assign-vehicle"),
        json!({
            "vehicle_plate": "ABC 123",
            "vehicle_details": "Toyota Hiace",
            "assignment_date": "2025-01-15",
            "tamm_authorized": true,
            "tamm_authorization_ss": screenshot,
        }),
        &staff.fleet,
        StatusCode::OK,
    )
    .await;
    act(
        test.app(),
        &format!("{base}/finance/approve"),
        json!({ "transfer_fee_amount": 2500.0, "transfer_fee_paid_at": "2025-01-20" }),
        &staff.finance,
        StatusCode::OK,
    )
    .await;
    act(
        test.app(),
        &format!("{base}/hr/complete-transfer"),
        json!({}),
        &staff.hr,
        StatusCode::OK,
    )
    .await
}

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn registration_stores_iqama_card_and_starts_at_ops_manager(pool: PgPool) {
    let test = common::build_test_app(pool);
    let response = post_multipart(
        test.app(),
        "/api/v1/public/register",
        &[
            Part::Text("full_name", "  Ali Khan "),
            Part::Text("iqama_number", "2345678901"),
            Part::Text("iqama_expiry_date", "2027-03-01"),
            Part::Text("saudi_driving_license", "yes"),
            Part::Text("nationality", "Pakistan"),
            Part::File {
                name: "iqama_card_upload",
                file_name: "card.pdf",
                bytes: b"%PDF-1.4 fake",
            },
        ],
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let driver = body_json(response).await["data"].clone();
    assert_eq!(driver["full_name"], "Ali Khan");
    assert_eq!(driver["onboarding_stage"], "Operations Manager");
    assert_eq!(driver["saudi_driving_license"], true);

    let reference = driver["iqama_card_upload"].as_str().unwrap();
    assert!(reference.ends_with("Ali_Khan_2345678901_iqama_card.pdf"));
    assert!(test.uploads.path().join(reference).exists());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_iqama_registration_is_409(pool: PgPool) {
    let test = common::build_test_app(pool);
    register_driver(test.app(), "Ali Khan", "2345678901").await;

    let response = post_multipart(
        test.app(),
        "/api/v1/public/register",
        &[
            Part::Text("full_name", "Someone Else"),
            Part::Text("iqama_number", "2345678901"),
        ],
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn rejected_registration_leaves_no_stored_card(pool: PgPool) {
    let test = common::build_test_app(pool);
    register_driver(test.app(), "Ali Khan", "2345678901").await;

    let response = post_multipart(
        test.app(),
        "/api/v1/public/register",
        &[
            Part::Text("full_name", "Someone Else"),
            Part::Text("iqama_number", "2345678901"),
            Part::File {
                name: "iqama_card_upload",
                file_name: "card.pdf",
                bytes: b"%PDF-1.4 fake",
            },
        ],
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let mut entries = tokio::fs::read_dir(test.uploads.path()).await.unwrap();
    let leftover = entries.next_entry().await.unwrap().map(|e| e.file_name());
    assert_eq!(leftover, None);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn registration_rejects_disallowed_file_type(pool: PgPool) {
    let test = common::build_test_app(pool);
    let response = post_multipart(
        test.app(),
        "/api/v1/public/register",
        &[
            Part::Text("full_name", "Ali Khan"),
            Part::Text("iqama_number", "2345678901"),
            Part::File {
                name: "iqama_card_upload",
                file_name: "card.exe",
                bytes: b"MZ",
            },
        ],
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn registration_requires_name_and_iqama(pool: PgPool) {
    let test = common::build_test_app(pool);
    let response = post_multipart(
        test.app(),
        "/api/v1/public/register",
        &[Part::Text("full_name", "   "), Part::Text("iqama_number", "1")],
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Onboarding
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn full_onboarding_over_http(pool: PgPool) {
    let test = common::build_test_app(pool.clone());
    let staff = staff(&test, &pool).await;
    let driver_id = register_driver(test.app(), "Ali Khan", "2345678901").await;

    let driver = onboard(&test, &staff, driver_id).await;

    assert_eq!(driver["onboarding_stage"], "Completed");
    assert_eq!(driver["car_details"], "ABC 123 - Toyota Hiace");
    assert_eq!(driver["sponsorship_transfer_status"], "Completed");
    assert_eq!(driver["transfer_fee_paid"], true);
    assert_eq!(driver["hr_approved"], true);
    assert!(driver["tamm_authorization_ss"]
        .as_str()
        .unwrap()
        .ends_with("TAMM_Authorisation.png"));

    let response = get_auth(
        test.app(),
        &format!("/api/v1/drivers/{driver_id}"),
        &staff.hr,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["onboarding_stage"], "Completed");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn wrong_role_is_403_and_changes_nothing(pool: PgPool) {
    let test = common::build_test_app(pool.clone());
    let staff = staff(&test, &pool).await;
    let driver_id = register_driver(test.app(), "Ali Khan", "2345678901").await;

    let response = post_json_auth(
        test.app(),
        &format!("/api/v1/drivers/{driver_id}/ops-manager/approve"),
        json!({}),
        &staff.hr,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = get_auth(
        test.app(),
        &format!("/api/v1/drivers/{driver_id}"),
        &staff.hr,
    )
    .await;
    assert_eq!(
        body_json(response).await["data"]["onboarding_stage"],
        "Operations Manager"
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn super_admin_cannot_approve_a_stage(pool: PgPool) {
    let test = common::build_test_app(pool.clone());
    let staff = staff(&test, &pool).await;
    let driver_id = register_driver(test.app(), "Ali Khan", "2345678901").await;

    let response = post_json_auth(
        test.app(),
        &format!("/api/v1/drivers/{driver_id}/ops-manager/approve"),
        json!({}),
        &staff.admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn vehicle_assignment_rejects_unknown_screenshot(pool: PgPool) {
    let test = common::build_test_app(pool.clone());
    let staff = staff(&test, &pool).await;
    let driver_id = register_driver(test.app(), "Ali Khan", "2345678901").await;
    to_fleet_stage(&test, &staff, driver_id).await;

    let response = post_json_auth(
        test.app(),
        &format!("/api/v1/drivers/{driver_id}/fleet/assign-vehicle"),
        json!({
            "vehicle_plate": "ABC 123",
            "vehicle_details": "Toyota Hiace",
            "tamm_authorized": true,
            "tamm_authorization_ss": "0192f1c2_Ali_Khan_2345678901_TAMM_Authorisation.png",
        }),
        &staff.fleet,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(json["error"]
        .as_str()
        .unwrap()
        .contains("tamm_authorization_ss"));

    let response = get_auth(
        test.app(),
        &format!("/api/v1/drivers/{driver_id}"),
        &staff.fleet,
    )
    .await;
    assert_eq!(body_json(response).await["data"]["onboarding_stage"], "Fleet Manager");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn approval_out_of_stage_is_rejected(pool: PgPool) {
    let test = common::build_test_app(pool.clone());
    let staff = staff(&test, &pool).await;
    let driver_id = register_driver(test.app(), "Ali Khan", "2345678901").await;

    // Still at Operations Manager, so HR cannot act yet.
    let response = post_json_auth(
        test.app(),
        &format!("/api/v1/drivers/{driver_id}/hr/approve"),
        json!({
            "company_contract_created": true,
            "qiwa_contract_created": true,
            "qiwa_contract_status": "Approved",
        }),
        &staff.hr,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn hr_approval_requires_approved_qiwa_status(pool: PgPool) {
    let test = common::build_test_app(pool.clone());
    let staff = staff(&test, &pool).await;
    let driver_id = register_driver(test.app(), "Ali Khan", "2345678901").await;
    act(
        test.app(),
        &format!("/api/v1/drivers/{driver_id}/ops-manager/approve"),
        json!({}),
        &staff.ops_manager,
        StatusCode::OK,
    )
    .await;

    let response = post_json_auth(
        test.app(),
        &format!("/api/v1/drivers/{driver_id}/hr/approve"),
        json!({
            "company_contract_created": true,
            "qiwa_contract_created": true,
            "qiwa_contract_status": "Pending",
        }),
        &staff.hr,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_driver_is_404(pool: PgPool) {
    let test = common::build_test_app(pool.clone());
    let staff = staff(&test, &pool).await;

    let response = post_json_auth(
        test.app(),
        "/api/v1/drivers/999999/ops-manager/approve",
        json!({}),
        &staff.ops_manager,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn upload_rejects_unknown_purpose(pool: PgPool) {
    let test = common::build_test_app(pool.clone());
    let staff = staff(&test, &pool).await;
    let driver_id = register_driver(test.app(), "Ali Khan", "2345678901").await;
    let driver_id = driver_id.to_string();

    let response = post_multipart(
        test.app(),
        "/api/v1/uploads",
        &[
            Part::Text("purpose", "selfie"),
            Part::Text("driver_id", &driver_id),
            Part::File {
                name: "file",
                file_name: "me.png",
                bytes: b"png",
            },
        ],
        Some(&staff.fleet),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Offboarding
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn full_offboarding_over_http(pool: PgPool) {
    let test = common::build_test_app(pool.clone());
    let staff = staff(&test, &pool).await;
    let driver_id = register_driver(test.app(), "Ali Khan", "2345678901").await;
    onboard(&test, &staff, driver_id).await;

    let requested = act(
        test.app(),
        &format!("/api/v1/drivers/{driver_id}/offboarding"),
        json!({}),
        &staff.ops_manager,
        StatusCode::CREATED,
    )
    .await;
    assert_eq!(requested["status"], "requested");
    assert_eq!(requested["offboarding"]["status"], "Requested");
    let id = requested["offboarding"]["id"].as_i64().unwrap();
    let base = format!("/api/v1/offboarding/{id}");

    let record = act(
        test.app(),
        &format!("{base}/ops-supervisor/clear"),
        json!({
            "company_mobile_returned": true,
            "company_sim_returned": true,
            "platform_returned": false,
            "note": "platform account pending",
        }),
        &staff.ops_supervisor,
        StatusCode::OK,
    )
    .await;
    assert_eq!(record["status"], "Fleet");
    assert_eq!(record["platform_returned"], false);

    let record = act(
        test.app(),
        &format!("{base}/fleet/clear"),
        json!({ "damage_report": "scratched bumper", "damage_cost": 350.0 }),
        &staff.fleet,
        StatusCode::OK,
    )
    .await;
    assert_eq!(record["status"], "Finance");

    let record = act(
        test.app(),
        &format!("{base}/finance/clear"),
        json!({ "adjustments": -350.0 }),
        &staff.finance,
        StatusCode::OK,
    )
    .await;
    assert_eq!(record["status"], "HR");

    // Revocation before HR clearance is out of order.
    let response = post_json_auth(
        test.app(),
        &format!("{base}/fleet/revoke-tamm"),
        json!({ "tamm_revoked": true }),
        &staff.fleet,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let record = act(
        test.app(),
        &format!("{base}/hr/clear"),
        json!({
            "company_contract_cancelled": true,
            "qiwa_contract_cancelled": true,
            "salary_paid": true,
        }),
        &staff.hr,
        StatusCode::OK,
    )
    .await;
    assert_eq!(record["status"], "pending_tamm");

    let record = act(
        test.app(),
        &format!("{base}/fleet/revoke-tamm"),
        json!({ "tamm_revoked": true }),
        &staff.fleet,
        StatusCode::OK,
    )
    .await;
    assert_eq!(record["status"], "Completed");
    assert_eq!(record["tamm_revoked"], true);

    let response = get_auth(test.app(), &base, &staff.hr).await;
    assert_eq!(response.status(), StatusCode::OK);
    let view = body_json(response).await["data"].clone();
    assert_eq!(view["driver_name"], "Ali Khan");
    assert_eq!(view["iqama_number"], "2345678901");
    assert_eq!(view["status"], "Completed");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn second_offboarding_request_returns_existing_record(pool: PgPool) {
    let test = common::build_test_app(pool.clone());
    let staff = staff(&test, &pool).await;
    let driver_id = register_driver(test.app(), "Ali Khan", "2345678901").await;
    onboard(&test, &staff, driver_id).await;
    let uri = format!("/api/v1/drivers/{driver_id}/offboarding");

    let first = act(
        test.app(),
        &uri,
        json!({}),
        &staff.ops_manager,
        StatusCode::CREATED,
    )
    .await;
    let second = act(test.app(), &uri, json!({}), &staff.ops_manager, StatusCode::OK).await;

    assert_eq!(second["status"], "already_requested");
    assert_eq!(second["offboarding"]["id"], first["offboarding"]["id"]);

    let (count,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM offboardings WHERE driver_id = $1")
            .bind(driver_id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(count, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn offboarding_requires_completed_onboarding(pool: PgPool) {
    let test = common::build_test_app(pool.clone());
    let staff = staff(&test, &pool).await;
    let driver_id = register_driver(test.app(), "Ali Khan", "2345678901").await;

    let response = post_json_auth(
        test.app(),
        &format!("/api/v1/drivers/{driver_id}/offboarding"),
        json!({}),
        &staff.ops_manager,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn hr_clearance_lists_every_missing_confirmation(pool: PgPool) {
    let test = common::build_test_app(pool.clone());
    let staff = staff(&test, &pool).await;
    let driver_id = register_driver(test.app(), "Ali Khan", "2345678901").await;
    onboard(&test, &staff, driver_id).await;

    let requested = act(
        test.app(),
        &format!("/api/v1/drivers/{driver_id}/offboarding"),
        json!({}),
        &staff.ops_manager,
        StatusCode::CREATED,
    )
    .await;
    let base = format!(
        "/api/v1/offboarding/{}",
        requested["offboarding"]["id"].as_i64().unwrap()
    );
    act(
        test.app(),
        &format!("{base}/ops-supervisor/clear"),
        json!({}),
        &staff.ops_supervisor,
        StatusCode::OK,
    )
    .await;
    act(
        test.app(),
        &format!("{base}/fleet/clear"),
        json!({}),
        &staff.fleet,
        StatusCode::OK,
    )
    .await;
    act(
        test.app(),
        &format!("{base}/finance/clear"),
        json!({}),
        &staff.finance,
        StatusCode::OK,
    )
    .await;

    let response = post_json_auth(
        test.app(),
        &format!("{base}/hr/clear"),
        json!({ "company_contract_cancelled": true }),
        &staff.hr,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let message = body_json(response).await["error"]
        .as_str()
        .unwrap()
        .to_string();
    assert!(message.contains("qiwa_contract_cancelled"));
    assert!(message.contains("salary_paid"));
    assert!(!message.contains("company_contract_cancelled"));
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn dashboards_follow_the_workflow(pool: PgPool) {
    let test = common::build_test_app(pool.clone());
    let staff = staff(&test, &pool).await;
    let pending = register_driver(test.app(), "Pending Driver", "1000000001").await;
    let done = register_driver(test.app(), "Done Driver", "1000000002").await;
    onboard(&test, &staff, done).await;

    let response = get_auth(test.app(), "/api/v1/dashboard", &staff.ops_manager).await;
    assert_eq!(response.status(), StatusCode::OK);
    let dashboard = body_json(response).await["data"].clone();
    assert_eq!(dashboard["role"], "OpsManager");
    assert_eq!(dashboard["onboarding_queue"][0]["id"], pending);
    assert_eq!(dashboard["eligible_for_offboarding"][0]["id"], done);
    assert!(dashboard["summary"].is_null());

    act(
        test.app(),
        &format!("/api/v1/drivers/{done}/offboarding"),
        json!({}),
        &staff.ops_manager,
        StatusCode::CREATED,
    )
    .await;

    let response = get_auth(test.app(), "/api/v1/dashboard", &staff.ops_supervisor).await;
    let dashboard = body_json(response).await["data"].clone();
    assert_eq!(dashboard["offboarding_queue"][0]["driver_id"], done);
    assert_eq!(dashboard["offboarding_queue"][0]["driver_name"], "Done Driver");

    let response = get_auth(test.app(), "/api/v1/dashboard", &staff.admin).await;
    let summary = body_json(response).await["data"]["summary"].clone();
    assert_eq!(summary["total_drivers"], 2);
    assert_eq!(summary["pending_onboarding"], 1);
    assert_eq!(summary["in_offboarding"], 1);
    assert_eq!(summary["onboarded"], 0);
    assert_eq!(summary["offboarded"], 0);
}
