//! Role-specific dashboard.

use axum::extract::State;
use axum::Json;
use driverflow_core::dashboard::{build_dashboard, RoleDashboard};
use driverflow_core::error::CoreError;
use driverflow_core::roles::Role;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/dashboard
///
/// Queues for the caller's role; the Operations Manager also gets drivers
/// eligible for offboarding and the SuperAdmin gets the summary counts.
pub async fn get_dashboard(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<RoleDashboard>>> {
    let role: Role = user
        .role
        .parse()
        .map_err(|_| CoreError::Forbidden(format!("Unknown role '{}'", user.role)))?;
    let dashboard = build_dashboard(state.engine.store().as_ref(), role).await?;
    Ok(Json(DataResponse { data: dashboard }))
}
