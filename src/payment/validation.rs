//! Input validation for checkout operations.
//!
//! Everything here runs before any network call, so a malformed form never
//! reaches the payment API.

use super::client::{PaymentDetails, ProofFile};
use super::error::PaymentError;
use crate::error::Result;

/// Maximum accepted proof-of-payment size in bytes.
pub const MAX_PROOF_FILE_BYTES: usize = 5 * 1024 * 1024;

/// Accepted proof-of-payment MIME types.
pub const ALLOWED_PROOF_CONTENT_TYPES: &[&str] = &["image/png", "image/jpeg", "application/pdf"];

/// Maximum length for package IDs.
const MAX_PACKAGE_ID_LENGTH: usize = 64;

/// Validate the contact fields of a checkout form.
///
/// Both fields are required; the email must look like an address.
///
/// # Errors
///
/// Returns [`PaymentError::MissingContact`] or
/// [`PaymentError::InvalidContact`] (as [`crate::AptoError`]) on failure.
pub fn validate_contact(email: &str, phone: &str) -> Result<()> {
    if email.trim().is_empty() {
        return Err(PaymentError::MissingContact { field: "email" }.into());
    }
    if !email.contains('@') {
        return Err(PaymentError::InvalidContact {
            field: "email",
            reason: "must contain '@'".to_string(),
        }
        .into());
    }
    if phone.trim().is_empty() {
        return Err(PaymentError::MissingContact { field: "phone" }.into());
    }
    Ok(())
}

/// Validate a proof-of-payment file.
///
/// The file must be non-empty, at most 5 MiB, and a PNG, JPEG, or PDF.
pub fn validate_proof_file(proof: &ProofFile) -> Result<()> {
    if proof.bytes.is_empty() {
        return Err(PaymentError::InvalidProofFile {
            reason: "file is empty".to_string(),
        }
        .into());
    }

    if proof.size() > MAX_PROOF_FILE_BYTES {
        return Err(PaymentError::InvalidProofFile {
            reason: format!(
                "file exceeds the maximum size of {} bytes",
                MAX_PROOF_FILE_BYTES
            ),
        }
        .into());
    }

    if !ALLOWED_PROOF_CONTENT_TYPES.contains(&proof.content_type.as_str()) {
        return Err(PaymentError::InvalidProofFile {
            reason: format!(
                "content type '{}' is not accepted (must be PNG, JPEG, or PDF)",
                sanitize_for_error(&proof.content_type)
            ),
        }
        .into());
    }

    Ok(())
}

/// Validate a package ID.
///
/// Package IDs must be non-empty, at most 64 characters, and contain only
/// alphanumeric characters, underscores, and hyphens.
pub fn validate_package_id(id: &str) -> Result<()> {
    if id.is_empty() {
        return Err(PaymentError::InvalidPackageId {
            id: id.to_string(),
            reason: "package_id cannot be empty".to_string(),
        }
        .into());
    }

    if id.len() > MAX_PACKAGE_ID_LENGTH {
        return Err(PaymentError::InvalidPackageId {
            id: sanitize_for_error(id),
            reason: format!(
                "package_id exceeds maximum length of {}",
                MAX_PACKAGE_ID_LENGTH
            ),
        }
        .into());
    }

    if !id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(PaymentError::InvalidPackageId {
            id: sanitize_for_error(id),
            reason: "package_id contains invalid characters (only alphanumeric, underscore, and hyphen allowed)".to_string(),
        }
        .into());
    }

    Ok(())
}

/// Validate a full checkout form.
pub fn validate_payment_details(details: &PaymentDetails) -> Result<()> {
    validate_contact(&details.email, &details.phone)?;
    validate_proof_file(&details.proof)?;
    Ok(())
}

/// Sanitize a string for error messages to prevent log injection.
fn sanitize_for_error(s: &str) -> String {
    let sanitized: String = s
        .chars()
        .take(50)
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '/' || c == '.' {
                c
            } else {
                '?'
            }
        })
        .collect();

    if s.len() > 50 {
        format!("{}...", sanitized)
    } else {
        sanitized
    }
}
