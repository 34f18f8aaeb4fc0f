//! Authentication and authorization middleware extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated user from a JWT Bearer token.
//! - [`rbac::RequireSuperAdmin`] -- Requires the `SuperAdmin` role.
//!
//! Workflow routes only require [`auth::AuthUser`]; the engine applies the
//! per-stage role gate itself.

pub mod auth;
pub mod rbac;
