use std::sync::Arc;

use driverflow_core::ports::BlobStore;
use driverflow_core::workflow::WorkflowEngine;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone: every field is a pool handle or behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool (users and health checks).
    pub pool: driverflow_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Onboarding/offboarding workflow engine.
    pub engine: Arc<WorkflowEngine>,
    /// Where uploaded documents are stored.
    pub blobs: Arc<dyn BlobStore>,
}
