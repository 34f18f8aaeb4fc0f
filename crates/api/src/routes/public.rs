use axum::routing::post;
use axum::Router;

use crate::handlers::registration;
use crate::state::AppState;

/// Unauthenticated routes mounted at `/public`.
pub fn router() -> Router<AppState> {
    Router::new().route("/register", post(registration::register))
}
