//! Row structs and DTOs.
//!
//! Workflow rows (`drivers`, `offboardings`) are read into `*Row` structs
//! holding the stage/status as text, then converted into the core domain
//! types, which rejects unknown stage values.

pub mod driver;
pub mod offboarding;
pub mod user;
