//! Route definitions for the `/offboarding` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::offboarding;
use crate::state::AppState;

/// Routes mounted at `/offboarding`.
///
/// ```text
/// GET  /{id}                        -> get_offboarding
/// POST /{id}/ops-supervisor/clear   -> clear_ops_supervisor
/// POST /{id}/fleet/clear            -> clear_fleet
/// POST /{id}/finance/clear          -> clear_finance
/// POST /{id}/hr/clear               -> clear_hr
/// POST /{id}/fleet/revoke-tamm      -> revoke_tamm
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}", get(offboarding::get_offboarding))
        .route(
            "/{id}/ops-supervisor/clear",
            post(offboarding::clear_ops_supervisor),
        )
        .route("/{id}/fleet/clear", post(offboarding::clear_fleet))
        .route("/{id}/finance/clear", post(offboarding::clear_finance))
        .route("/{id}/hr/clear", post(offboarding::clear_hr))
        .route("/{id}/fleet/revoke-tamm", post(offboarding::revoke_tamm))
}
