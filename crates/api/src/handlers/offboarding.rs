//! Handlers for offboarding requests and clearances.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use driverflow_core::dashboard::OffboardingView;
use driverflow_core::error::CoreError;
use driverflow_core::offboarding::Offboarding;
use driverflow_core::types::DbId;
use driverflow_core::workflow::offboarding::{
    FinanceClearance, FleetClearance, HrClearance, OpsSupervisorClearance, TammRevocation,
};
use serde::Serialize;

use super::uploads::require_uploaded;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Outcome of `POST /drivers/{id}/offboarding`.
#[derive(Debug, Serialize)]
pub struct OffboardingRequestResult {
    /// `requested` for a new record, `already_requested` when one was active.
    pub status: &'static str,
    pub offboarding: Offboarding,
}

type OffboardingResponse = AppResult<Json<DataResponse<Offboarding>>>;

fn ok(record: Offboarding) -> OffboardingResponse {
    Ok(Json(DataResponse { data: record }))
}

/// POST /api/v1/drivers/{id}/offboarding
///
/// Opens an offboarding (201). A second request while one is active is not
/// an error: it returns the existing record with status `already_requested`
/// (200).
pub async fn request_offboarding(
    State(state): State<AppState>,
    user: AuthUser,
    Path(driver_id): Path<DbId>,
) -> AppResult<(StatusCode, Json<DataResponse<OffboardingRequestResult>>)> {
    let result = state
        .engine
        .request_offboarding(&user.actor(), driver_id)
        .await;

    let (status, data) = match result {
        Ok(offboarding) => (
            StatusCode::CREATED,
            OffboardingRequestResult {
                status: "requested",
                offboarding,
            },
        ),
        Err(CoreError::Conflict(msg)) => {
            let existing = state
                .engine
                .store()
                .find_active_offboarding(driver_id)
                .await?
                .ok_or(AppError::Core(CoreError::Conflict(msg)))?;
            tracing::info!(
                driver_id,
                offboarding_id = existing.id,
                "Offboarding already requested"
            );
            (
                StatusCode::OK,
                OffboardingRequestResult {
                    status: "already_requested",
                    offboarding: existing,
                },
            )
        }
        Err(e) => return Err(e.into()),
    };

    Ok((status, Json(DataResponse { data })))
}

/// GET /api/v1/offboarding/{id}
pub async fn get_offboarding(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<OffboardingView>>> {
    let offboarding = state.engine.offboarding(id).await?;
    let driver = state.engine.driver(offboarding.driver_id).await?;
    Ok(Json(DataResponse {
        data: OffboardingView {
            offboarding,
            driver_name: driver.full_name,
            iqama_number: driver.iqama_number,
        },
    }))
}

/// POST /api/v1/offboarding/{id}/ops-supervisor/clear
pub async fn clear_ops_supervisor(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<OpsSupervisorClearance>,
) -> OffboardingResponse {
    ok(state
        .engine
        .clear_ops_supervisor(&user.actor(), id, &input)
        .await?)
}

/// POST /api/v1/offboarding/{id}/fleet/clear
pub async fn clear_fleet(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<FleetClearance>,
) -> OffboardingResponse {
    ok(state.engine.clear_fleet(&user.actor(), id, &input).await?)
}

/// POST /api/v1/offboarding/{id}/finance/clear
pub async fn clear_finance(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<FinanceClearance>,
) -> OffboardingResponse {
    require_uploaded(&state, "invoice_file", input.invoice_file.as_deref()).await?;
    ok(state.engine.clear_finance(&user.actor(), id, &input).await?)
}

/// POST /api/v1/offboarding/{id}/hr/clear
pub async fn clear_hr(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<HrClearance>,
) -> OffboardingResponse {
    ok(state.engine.clear_hr(&user.actor(), id, &input).await?)
}

/// POST /api/v1/offboarding/{id}/fleet/revoke-tamm
pub async fn revoke_tamm(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<TammRevocation>,
) -> OffboardingResponse {
    ok(state.engine.revoke_tamm(&user.actor(), id, &input).await?)
}
