//! Handlers for `/drivers/{id}` and the onboarding stage actions.
//!
//! The engine enforces the role gate and stage checks; these handlers only
//! pass the caller and typed body through.

use axum::extract::{Path, State};
use axum::Json;
use driverflow_core::driver::Driver;
use driverflow_core::types::DbId;
use driverflow_core::workflow::onboarding::{
    FinanceApproval, FleetAssignment, HrApproval, OpsSupervisorApproval, TransferCompletion,
};

use super::uploads::require_uploaded;
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

type DriverResponse = AppResult<Json<DataResponse<Driver>>>;

fn ok(driver: Driver) -> DriverResponse {
    Ok(Json(DataResponse { data: driver }))
}

/// GET /api/v1/drivers/{id}
pub async fn get_driver(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
) -> DriverResponse {
    ok(state.engine.driver(id).await?)
}

/// POST /api/v1/drivers/{id}/ops-manager/approve
pub async fn approve_ops_manager(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> DriverResponse {
    ok(state.engine.approve_ops_manager(&user.actor(), id).await?)
}

/// POST /api/v1/drivers/{id}/hr/approve
pub async fn approve_hr(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<HrApproval>,
) -> DriverResponse {
    ok(state.engine.approve_hr(&user.actor(), id, &input).await?)
}

/// POST /api/v1/drivers/{id}/ops-supervisor/approve
pub async fn approve_ops_supervisor(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<OpsSupervisorApproval>,
) -> DriverResponse {
    ok(state
        .engine
        .approve_ops_supervisor(&user.actor(), id, &input)
        .await?)
}

/// POST /api/v1/drivers/{id}/fleet/assign-vehicle
pub async fn assign_vehicle(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<FleetAssignment>,
) -> DriverResponse {
    require_uploaded(
        &state,
        "tamm_authorization_ss",
        input.tamm_authorization_ss.as_deref(),
    )
    .await?;
    ok(state.engine.assign_vehicle(&user.actor(), id, &input).await?)
}

/// POST /api/v1/drivers/{id}/finance/approve
pub async fn approve_finance(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<FinanceApproval>,
) -> DriverResponse {
    require_uploaded(
        &state,
        "transfer_fee_receipt",
        input.transfer_fee_receipt.as_deref(),
    )
    .await?;
    ok(state.engine.approve_finance(&user.actor(), id, &input).await?)
}

/// POST /api/v1/drivers/{id}/hr/complete-transfer
pub async fn complete_transfer(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<TransferCompletion>,
) -> DriverResponse {
    require_uploaded(
        &state,
        "sponsorship_transfer_proof",
        input.sponsorship_transfer_proof.as_deref(),
    )
    .await?;
    ok(state
        .engine
        .complete_transfer(&user.actor(), id, &input)
        .await?)
}
