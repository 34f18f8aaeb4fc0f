//! Document upload handling shared by registration and staff uploads.

use axum::extract::multipart::Field;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use driverflow_core::error::CoreError;
use driverflow_core::types::DbId;
use driverflow_core::uploads::{stored_file_name, validate_extension, validate_size, UploadPurpose};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// A file part read fully into memory.
#[derive(Debug)]
pub struct UploadedFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Read a multipart file field, or `None` when the browser sent an empty
/// file input.
pub async fn read_file(field: Field<'_>) -> AppResult<Option<UploadedFile>> {
    let file_name = field.file_name().unwrap_or_default().to_string();
    let bytes = field
        .bytes()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    if file_name.is_empty() && bytes.is_empty() {
        return Ok(None);
    }
    Ok(Some(UploadedFile {
        file_name,
        bytes: bytes.to_vec(),
    }))
}

/// Read a multipart text field.
pub async fn read_text(field: Field<'_>) -> AppResult<String> {
    field
        .text()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))
}

/// Validate `file` and persist it under the driver's document name.
pub async fn store_document(
    state: &AppState,
    purpose: UploadPurpose,
    full_name: &str,
    iqama_number: &str,
    file: UploadedFile,
) -> AppResult<String> {
    let ext = validate_extension(&file.file_name)?;
    validate_size(file.bytes.len(), state.config.max_upload_bytes)?;
    let name = stored_file_name(purpose, full_name, iqama_number, &ext);
    Ok(state.blobs.store(file.bytes, &name).await?)
}

/// Reject a workflow payload whose `field` names a file that was never
/// uploaded. Absent or blank references are left to the engine.
pub async fn require_uploaded(
    state: &AppState,
    field: &str,
    reference: Option<&str>,
) -> AppResult<()> {
    let Some(reference) = reference.map(str::trim).filter(|r| !r.is_empty()) else {
        return Ok(());
    };
    if !state.blobs.exists(reference).await? {
        return Err(CoreError::Validation(format!(
            "{field} does not refer to an uploaded file"
        ))
        .into());
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// POST /uploads
// ---------------------------------------------------------------------------

/// Stored upload reference returned to the client.
#[derive(Debug, Serialize)]
pub struct UploadResult {
    pub reference: String,
    pub driver_id: DbId,
}

/// POST /api/v1/uploads
///
/// Multipart fields: `purpose`, `driver_id`, `file`. The returned reference
/// is then passed in the JSON body of the matching workflow action.
pub async fn upload_document(
    State(state): State<AppState>,
    user: AuthUser,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<UploadResult>>)> {
    let mut purpose: Option<UploadPurpose> = None;
    let mut driver_id: Option<DbId> = None;
    let mut file: Option<UploadedFile> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "purpose" => purpose = Some(read_text(field).await?.trim().parse()?),
            "driver_id" => {
                let raw = read_text(field).await?;
                driver_id = Some(raw.trim().parse().map_err(|_| {
                    CoreError::Validation(format!("driver_id '{raw}' is not a valid id"))
                })?);
            }
            "file" => file = read_file(field).await?,
            _ => {}
        }
    }

    let purpose = purpose.ok_or_else(|| CoreError::Validation("purpose is required".into()))?;
    let driver_id =
        driver_id.ok_or_else(|| CoreError::Validation("driver_id is required".into()))?;
    let file = file.ok_or_else(|| CoreError::Validation("file is required".into()))?;

    let driver = state.engine.driver(driver_id).await?;
    let reference =
        store_document(&state, purpose, &driver.full_name, &driver.iqama_number, file).await?;

    tracing::info!(
        driver_id,
        user_id = user.user_id,
        reference = %reference,
        "Document uploaded"
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: UploadResult {
                reference,
                driver_id,
            },
        }),
    ))
}
