//! Onboarding and offboarding state machines.
//!
//! [`onboarding`] and [`offboarding`] hold the pure transition rules: each
//! takes the current record plus a typed input and returns either a new
//! record or a validation error, never touching the original. [`engine`]
//! wires them to the role gate, the store and the notifier.

pub mod engine;
pub mod offboarding;
pub mod onboarding;

pub use engine::{Clock, WorkflowEngine};

use crate::error::CoreError;

/// Trim `value` and reject it when empty, naming `field`.
pub(crate) fn require_text(field: &str, value: &str) -> Result<String, CoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

/// Trim an optional free-text field, mapping blank to `None`.
pub(crate) fn optional_text(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Reject non-finite or negative amounts.
pub(crate) fn non_negative_amount(field: &str, value: Option<f64>) -> Result<f64, CoreError> {
    let amount = value.unwrap_or(0.0);
    if !amount.is_finite() || amount < 0.0 {
        return Err(CoreError::Validation(format!(
            "{field} must be a non-negative amount"
        )));
    }
    Ok(amount)
}
