//! Handlers for the `/admin` resource (user management, driver records).
//!
//! All handlers require the `SuperAdmin` role via [`RequireSuperAdmin`].

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use driverflow_core::driver::{Driver, DriverProfileUpdate};
use driverflow_core::error::CoreError;
use driverflow_core::roles::Role;
use driverflow_core::types::DbId;
use driverflow_db::models::user::{CreateUser, UpdateUser, UserResponse};
use driverflow_db::repositories::UserRepo;
use serde::Deserialize;
use validator::Validate;

use crate::auth::password::{hash_password, validate_password_strength, MIN_PASSWORD_LENGTH};
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireSuperAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /admin/users`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 3, max = 50))]
    pub username: String,
    pub password: String,
    pub role: String,
    #[validate(length(max = 200))]
    #[serde(default)]
    pub name: String,
    pub designation: Option<String>,
    pub branch_city: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
}

/// Request body for `PUT /admin/users/{id}`.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    pub role: Option<String>,
    #[validate(length(max = 200))]
    pub name: Option<String>,
    pub designation: Option<String>,
    pub branch_city: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub is_active: Option<bool>,
}

fn validate<T: Validate>(input: &T) -> Result<(), AppError> {
    input
        .validate()
        .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))
}

/// Reject role names the `users.role` check constraint would refuse.
fn canonical_role(raw: &str) -> Result<String, CoreError> {
    Ok(raw.trim().parse::<Role>()?.as_str().to_string())
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/users
pub async fn list_users(
    State(state): State<AppState>,
    RequireSuperAdmin(_admin): RequireSuperAdmin,
) -> AppResult<Json<DataResponse<Vec<UserResponse>>>> {
    let users = UserRepo::list(&state.pool).await?;
    Ok(Json(DataResponse {
        data: users.into_iter().map(UserResponse::from).collect(),
    }))
}

/// POST /api/v1/admin/users
///
/// Create a staff account. Returns 201 Created.
pub async fn create_user(
    State(state): State<AppState>,
    RequireSuperAdmin(admin): RequireSuperAdmin,
    Json(input): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<UserResponse>>)> {
    validate(&input)?;
    let role = canonical_role(&input.role)?;
    validate_password_strength(&input.password, MIN_PASSWORD_LENGTH)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let hashed = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let create_dto = CreateUser {
        username: input.username.trim().to_string(),
        password_hash: hashed,
        role,
        name: input.name,
        designation: input.designation,
        branch_city: input.branch_city,
        email: input.email,
    };

    let user = UserRepo::create(&state.pool, &create_dto).await?;
    tracing::info!(user_id = user.id, role = %user.role, created_by = admin.user_id, "User created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: user.into() })))
}

/// PUT /api/v1/admin/users/{id}
///
/// Update profile fields, role or active flag (not the password).
pub async fn update_user(
    State(state): State<AppState>,
    RequireSuperAdmin(_admin): RequireSuperAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateUserRequest>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    validate(&input)?;
    let role = input.role.as_deref().map(canonical_role).transpose()?;

    let update_dto = UpdateUser {
        role,
        name: input.name,
        designation: input.designation,
        branch_city: input.branch_city,
        email: input.email,
        is_active: input.is_active,
    };

    let user = UserRepo::update(&state.pool, id, &update_dto)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;
    Ok(Json(DataResponse { data: user.into() }))
}

/// DELETE /api/v1/admin/users/{id}
///
/// Soft-deactivate a user. Returns 204 No Content.
pub async fn deactivate_user(
    State(state): State<AppState>,
    RequireSuperAdmin(admin): RequireSuperAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if id == admin.user_id {
        return Err(AppError::Core(CoreError::Validation(
            "You cannot deactivate your own account".into(),
        )));
    }
    if UserRepo::deactivate(&state.pool, id).await? {
        tracing::info!(user_id = id, "User deactivated");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound { entity: "User", id }))
    }
}

// ---------------------------------------------------------------------------
// Drivers
// ---------------------------------------------------------------------------

/// PUT /api/v1/admin/drivers/{id}
///
/// Correct a driver's profile fields without touching workflow state.
pub async fn update_driver(
    State(state): State<AppState>,
    RequireSuperAdmin(_admin): RequireSuperAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<DriverProfileUpdate>,
) -> AppResult<Json<DataResponse<Driver>>> {
    validate(&input)?;
    let driver = state
        .engine
        .store()
        .update_driver_profile(id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Driver",
            id,
        }))?;
    Ok(Json(DataResponse { data: driver }))
}

/// DELETE /api/v1/admin/drivers/{id}
///
/// Hard-delete a driver and its offboarding history. Returns 204.
pub async fn delete_driver(
    State(state): State<AppState>,
    RequireSuperAdmin(admin): RequireSuperAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if state.engine.store().delete_driver(id).await? {
        tracing::info!(driver_id = id, user_id = admin.user_id, "Driver deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Driver",
            id,
        }))
    }
}
