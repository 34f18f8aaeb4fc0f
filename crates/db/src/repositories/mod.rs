//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod driver_repo;
pub mod offboarding_repo;
pub mod user_repo;

pub use driver_repo::DriverRepo;
pub use offboarding_repo::{CreateOffboardingOutcome, OffboardingRepo};
pub use user_repo::UserRepo;
