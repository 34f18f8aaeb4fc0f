//! Translation of sqlx errors into domain errors.

use driverflow_core::error::CoreError;

/// PostgreSQL `unique_violation`.
const UNIQUE_VIOLATION: &str = "23505";

/// Map a sqlx error to a [`CoreError`].
///
/// Unique violations on `uq_*` constraints become [`CoreError::Conflict`];
/// everything else is a retryable [`CoreError::Persistence`].
pub fn to_core_error(err: sqlx::Error) -> CoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
            match db_err.constraint() {
                Some("uq_offboardings_active_driver") => {
                    return CoreError::Conflict(
                        "Offboarding already requested for this driver".into(),
                    );
                }
                Some("uq_drivers_iqama_number") => {
                    return CoreError::Conflict("Iqama number is already registered".into());
                }
                Some(constraint) if constraint.starts_with("uq_") => {
                    return CoreError::Conflict(format!(
                        "Duplicate value violates unique constraint: {constraint}"
                    ));
                }
                _ => {}
            }
        }
    }
    tracing::error!(error = %err, "Database error");
    CoreError::Persistence(err.to_string())
}
