//! Upload validation and stored-file naming.
//!
//! Stored names are deterministic: `{full_name}_{iqama}_{suffix}.{ext}`
//! (offboarding invoices carry an `offboarding_` prefix), with every
//! character outside `[A-Za-z0-9_.-]` replaced by `_`.

use std::sync::OnceLock;

use regex::Regex;
use serde::Deserialize;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// File extensions accepted for document uploads (compared lowercase).
pub const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "pdf"];

/// Default maximum upload size (16 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

// ---------------------------------------------------------------------------
// Purpose
// ---------------------------------------------------------------------------

/// What an uploaded document is attached as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadPurpose {
    IqamaCard,
    TammAuthorisation,
    TransferPaymentProof,
    TransferProof,
    OffboardingInvoice,
}

impl UploadPurpose {
    fn suffix(self) -> &'static str {
        match self {
            UploadPurpose::IqamaCard => "iqama_card",
            UploadPurpose::TammAuthorisation => "TAMM_Authorisation",
            UploadPurpose::TransferPaymentProof => "transfer_payment_proof",
            UploadPurpose::TransferProof => "transfer_proof",
            UploadPurpose::OffboardingInvoice => "invoice",
        }
    }
}

impl std::str::FromStr for UploadPurpose {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "iqama_card" => Ok(UploadPurpose::IqamaCard),
            "tamm_authorisation" => Ok(UploadPurpose::TammAuthorisation),
            "transfer_payment_proof" => Ok(UploadPurpose::TransferPaymentProof),
            "transfer_proof" => Ok(UploadPurpose::TransferProof),
            "offboarding_invoice" => Ok(UploadPurpose::OffboardingInvoice),
            other => Err(CoreError::Validation(format!(
                "Unknown upload purpose '{other}'"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Return the lowercase extension of `filename` if it is allowed.
pub fn validate_extension(filename: &str) -> Result<String, CoreError> {
    let ext = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty())
        .ok_or_else(|| CoreError::Validation(format!("File '{filename}' has no extension")))?;

    if ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
        Ok(ext)
    } else {
        Err(CoreError::Validation(format!(
            "File type '.{ext}' is not allowed. Must be one of: {}",
            ALLOWED_EXTENSIONS.join(", ")
        )))
    }
}

/// Reject empty or oversized payloads.
pub fn validate_size(len: usize, max_bytes: usize) -> Result<(), CoreError> {
    if len == 0 {
        return Err(CoreError::Validation("Uploaded file is empty".into()));
    }
    if len > max_bytes {
        return Err(CoreError::Validation(format!(
            "Uploaded file exceeds the {max_bytes} byte limit"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Naming
// ---------------------------------------------------------------------------

fn unsafe_chars() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^A-Za-z0-9_.-]").expect("static pattern is valid"))
}

/// Replace every character outside `[A-Za-z0-9_.-]` with `_`.
pub fn sanitize_component(raw: &str) -> String {
    unsafe_chars().replace_all(raw.trim(), "_").into_owned()
}

/// Build the stored file name for a driver document.
pub fn stored_file_name(
    purpose: UploadPurpose,
    full_name: &str,
    iqama_number: &str,
    ext: &str,
) -> String {
    let base = format!(
        "{}_{}_{}.{}",
        sanitize_component(full_name),
        sanitize_component(iqama_number),
        purpose.suffix(),
        ext
    );
    match purpose {
        UploadPurpose::OffboardingInvoice => format!("offboarding_{base}"),
        _ => base,
    }
}
