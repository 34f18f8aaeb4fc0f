//! Request handlers.
//!
//! Workflow handlers translate HTTP input into engine calls and wrap the
//! result in [`DataResponse`](crate::response::DataResponse); errors map via
//! [`AppError`](crate::error::AppError).

pub mod admin;
pub mod auth;
pub mod dashboard;
pub mod offboarding;
pub mod onboarding;
pub mod registration;
pub mod uploads;
