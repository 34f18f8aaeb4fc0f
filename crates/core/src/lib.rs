//! Domain core for the driver onboarding/offboarding workflow.
//!
//! Everything in this crate is storage-agnostic: the state machines, the
//! role gate, the dashboard projections, and the [`ports`] traits that the
//! database, email, and HTTP crates implement.

pub mod dashboard;
pub mod driver;
pub mod error;
pub mod notifications;
pub mod offboarding;
pub mod ports;
pub mod roles;
pub mod stage;
pub mod types;
pub mod uploads;
pub mod workflow;
