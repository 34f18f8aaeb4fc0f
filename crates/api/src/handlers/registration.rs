//! Public driver self-registration.

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use driverflow_core::driver::{Driver, NewDriver};
use driverflow_core::error::CoreError;
use driverflow_core::uploads::UploadPurpose;

use super::uploads::{read_file, read_text, store_document, UploadedFile};
use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Form values collected from the multipart body.
#[derive(Debug, Default)]
struct RegistrationForm {
    full_name: String,
    iqama_number: String,
    iqama_expiry_date: Option<NaiveDate>,
    saudi_driving_license: bool,
    nationality: Option<String>,
    mobile_number: Option<String>,
    previous_sponsor_number: Option<String>,
    city: Option<String>,
    iqama_card: Option<UploadedFile>,
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// HTML checkboxes and selects send `on`, `yes`, `true` or `1`.
fn truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "on" | "yes" | "true" | "1"
    )
}

fn parse_date(field: &str, value: &str) -> Result<Option<NaiveDate>, CoreError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| CoreError::Validation(format!("{field} must be a YYYY-MM-DD date")))
}

async fn read_form(mut multipart: Multipart) -> AppResult<RegistrationForm> {
    let mut form = RegistrationForm::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if name == "iqama_card_upload" {
            form.iqama_card = read_file(field).await?;
            continue;
        }
        let value = read_text(field).await?;
        match name.as_str() {
            "full_name" => form.full_name = value,
            "iqama_number" => form.iqama_number = value,
            "iqama_expiry_date" => {
                form.iqama_expiry_date = parse_date("iqama_expiry_date", &value)?
            }
            "saudi_driving_license" => form.saudi_driving_license = truthy(&value),
            "nationality" => form.nationality = non_blank(value),
            "mobile_number" => form.mobile_number = non_blank(value),
            "previous_sponsor_number" => form.previous_sponsor_number = non_blank(value),
            "city" => form.city = non_blank(value),
            _ => {}
        }
    }
    Ok(form)
}

/// POST /api/v1/public/register
///
/// Multipart registration form with an optional `iqama_card_upload` file.
/// Returns the created driver with 201 Created.
pub async fn register(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<Driver>>)> {
    let form = read_form(multipart).await?;

    let mut input = NewDriver {
        full_name: form.full_name,
        iqama_number: form.iqama_number,
        iqama_expiry_date: form.iqama_expiry_date,
        saudi_driving_license: form.saudi_driving_license,
        nationality: form.nationality,
        mobile_number: form.mobile_number,
        previous_sponsor_number: form.previous_sponsor_number,
        city: form.city,
        iqama_card_upload: None,
    }
    .validated()?;

    if let Some(file) = form.iqama_card {
        input.iqama_card_upload = Some(
            store_document(
                &state,
                UploadPurpose::IqamaCard,
                &input.full_name,
                &input.iqama_number,
                file,
            )
            .await?,
        );
    }

    let stored_card = input.iqama_card_upload.clone();
    match state.engine.register_driver(input).await {
        Ok(driver) => Ok((StatusCode::CREATED, Json(DataResponse { data: driver }))),
        Err(e) => {
            if let Some(reference) = stored_card {
                if let Err(cleanup) = state.blobs.remove(&reference).await {
                    tracing::warn!(
                        reference = %reference,
                        error = %cleanup,
                        "Failed to remove iqama card after rejected registration"
                    );
                }
            }
            Err(e.into())
        }
    }
}
