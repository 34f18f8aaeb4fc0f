//! Route definitions for the `/admin` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// All routes require the `SuperAdmin` role (enforced by handler extractors).
///
/// ```text
/// GET    /users          -> list_users
/// POST   /users          -> create_user
/// PUT    /users/{id}     -> update_user
/// DELETE /users/{id}     -> deactivate_user
/// PUT    /drivers/{id}   -> update_driver
/// DELETE /drivers/{id}   -> delete_driver
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(admin::list_users).post(admin::create_user))
        .route(
            "/users/{id}",
            put(admin::update_user).delete(admin::deactivate_user),
        )
        .route(
            "/drivers/{id}",
            put(admin::update_driver).delete(admin::delete_driver),
        )
}
