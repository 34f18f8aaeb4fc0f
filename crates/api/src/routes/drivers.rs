//! Route definitions for the `/drivers` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{offboarding, onboarding};
use crate::state::AppState;

/// Routes mounted at `/drivers`.
///
/// ```text
/// GET  /{id}                          -> get_driver
/// POST /{id}/ops-manager/approve      -> approve_ops_manager
/// POST /{id}/hr/approve               -> approve_hr
/// POST /{id}/ops-supervisor/approve   -> approve_ops_supervisor
/// POST /{id}/fleet/assign-vehicle     -> assign_vehicle
/// POST /{id}/finance/approve          -> approve_finance
/// POST /{id}/hr/complete-transfer     -> complete_transfer
/// POST /{id}/offboarding              -> request_offboarding
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}", get(onboarding::get_driver))
        .route(
            "/{id}/ops-manager/approve",
            post(onboarding::approve_ops_manager),
        )
        .route("/{id}/hr/approve", post(onboarding::approve_hr))
        .route(
            "/{id}/ops-supervisor/approve",
            post(onboarding::approve_ops_supervisor),
        )
        .route("/{id}/fleet/assign-vehicle", post(onboarding::assign_vehicle))
        .route("/{id}/finance/approve", post(onboarding::approve_finance))
        .route(
            "/{id}/hr/complete-transfer",
            post(onboarding::complete_transfer),
        )
        .route("/{id}/offboarding", post(offboarding::request_offboarding))
}
