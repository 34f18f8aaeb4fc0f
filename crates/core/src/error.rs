use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// The record store failed to commit. Nothing from the attempted
    /// transition was persisted; the caller may retry.
    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Failure to resolve recipients for, or dispatch, a workflow notification.
///
/// Never surfaced to callers of the workflow engine; it is logged and dropped.
#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("Recipient lookup failed: {0}")]
    Recipients(String),

    #[error("Dispatch failed: {0}")]
    Dispatch(String),
}
