//! First-run seeding of the administrator account.

use driverflow_core::roles::Role;
use driverflow_db::models::user::CreateUser;
use driverflow_db::repositories::UserRepo;
use driverflow_db::DbPool;

use crate::auth::password::{hash_password, validate_password_strength, MIN_PASSWORD_LENGTH};
use crate::error::{AppError, AppResult};

/// Create a `SuperAdmin` named `username` when the users table is empty.
///
/// Returns `true` if an account was created. Existing installations are left
/// untouched, so the credentials only matter on first start.
pub async fn ensure_super_admin(pool: &DbPool, username: &str, password: &str) -> AppResult<bool> {
    if UserRepo::count(pool).await? > 0 {
        return Ok(false);
    }

    validate_password_strength(password, MIN_PASSWORD_LENGTH).map_err(AppError::BadRequest)?;
    let password_hash = hash_password(password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            password_hash,
            role: Role::SuperAdmin.as_str().to_string(),
            name: "Administrator".to_string(),
            designation: None,
            branch_city: None,
            email: None,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, username, "Seeded initial SuperAdmin");
    Ok(true)
}
