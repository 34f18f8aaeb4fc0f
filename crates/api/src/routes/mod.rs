pub mod admin;
pub mod auth;
pub mod drivers;
pub mod health;
pub mod offboarding;
pub mod public;

use axum::routing::{get, post};
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                                  login (public)
/// /auth/change-password                        change own password
///
/// /public/register                             driver self-registration (multipart)
///
/// /uploads                                     store a workflow document (multipart)
/// /dashboard                                   queues for the caller's role
///
/// /drivers/{id}                                get
/// /drivers/{id}/ops-manager/approve            OpsManager
/// /drivers/{id}/hr/approve                     HR
/// /drivers/{id}/ops-supervisor/approve         OpsSupervisor
/// /drivers/{id}/fleet/assign-vehicle           FleetManager
/// /drivers/{id}/finance/approve                FinanceManager
/// /drivers/{id}/hr/complete-transfer           HR
/// /drivers/{id}/offboarding                    OpsManager
///
/// /offboarding/{id}                            get
/// /offboarding/{id}/ops-supervisor/clear       OpsSupervisor
/// /offboarding/{id}/fleet/clear                FleetManager
/// /offboarding/{id}/finance/clear              FinanceManager
/// /offboarding/{id}/hr/clear                   HR
/// /offboarding/{id}/fleet/revoke-tamm          FleetManager
///
/// /admin/users                                 list, create (SuperAdmin)
/// /admin/users/{id}                            update, deactivate
/// /admin/drivers/{id}                          correct profile, delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/public", public::router())
        .route("/uploads", post(handlers::uploads::upload_document))
        .route("/dashboard", get(handlers::dashboard::get_dashboard))
        .nest("/drivers", drivers::router())
        .nest("/offboarding", offboarding::router())
        .nest("/admin", admin::router())
}
