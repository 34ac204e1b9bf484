//! Payment-specific error types.
//!
//! Provides granular error types for checkout operations, so callers can
//! distinguish validation failures from backend failures and from the
//! stale-active-package conflict that requires a fresh user confirmation.

use std::fmt;

/// Payment-specific errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentError {
    // Validation errors, raised before any network call
    /// A required contact field is empty.
    MissingContact { field: &'static str },
    /// A contact field is present but malformed.
    InvalidContact { field: &'static str, reason: String },
    /// The proof-of-payment file is unusable.
    InvalidProofFile { reason: String },
    /// The package ID is invalid.
    InvalidPackageId { id: String, reason: String },

    // Flow errors
    /// The server reported an active package the client did not know about
    /// when submitting a non-forced purchase. Retryable, but only through a
    /// fresh user confirmation.
    ActivePackageConflict { message: String },
    /// The requested transition is not legal from the current state.
    InvalidTransition {
        state: &'static str,
        action: &'static str,
    },

    // Backend errors
    /// Payment creation succeeded but the response carried no payment ID.
    MissingPaymentId { package_id: String },
    /// The payment API reported a failure; the message is the server's,
    /// verbatim.
    Backend { operation: String, message: String },
}

impl fmt::Display for PaymentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingContact { field } => {
                write!(f, "Missing required contact field: {}", field)
            }
            Self::InvalidContact { field, reason } => {
                write!(f, "Invalid contact field '{}': {}", field, reason)
            }
            Self::InvalidProofFile { reason } => {
                write!(f, "Invalid proof of payment: {}", reason)
            }
            Self::InvalidPackageId { id, reason } => {
                write!(f, "Invalid package ID '{}': {}", id, reason)
            }
            Self::ActivePackageConflict { message } => {
                write!(f, "Active package conflict, confirmation required: {}", message)
            }
            Self::InvalidTransition { state, action } => {
                write!(f, "Cannot {} from checkout state '{}'", action, state)
            }
            Self::MissingPaymentId { package_id } => {
                write!(
                    f,
                    "Payment creation for package '{}' returned no payment ID",
                    package_id
                )
            }
            Self::Backend { operation, message } => {
                write!(f, "Payment API error during '{}': {}", operation, message)
            }
        }
    }
}

impl std::error::Error for PaymentError {}

impl From<PaymentError> for crate::error::AptoError {
    fn from(err: PaymentError) -> Self {
        match &err {
            // Map to BadRequest (caller input problems)
            PaymentError::MissingContact { .. }
            | PaymentError::InvalidContact { .. }
            | PaymentError::InvalidProofFile { .. }
            | PaymentError::InvalidPackageId { .. } => {
                crate::error::AptoError::BadRequest(err.to_string())
            }

            // Map to Forbidden (the purchase is gated on confirmation)
            PaymentError::ActivePackageConflict { .. } => {
                crate::error::AptoError::Forbidden(err.to_string())
            }

            // Map to Internal
            PaymentError::InvalidTransition { .. }
            | PaymentError::MissingPaymentId { .. }
            | PaymentError::Backend { .. } => crate::error::AptoError::Internal(err.to_string()),
        }
    }
}

impl PaymentError {
    /// Check if this error was caused before any network call.
    #[must_use]
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            Self::MissingContact { .. }
                | Self::InvalidContact { .. }
                | Self::InvalidProofFile { .. }
                | Self::InvalidPackageId { .. }
        )
    }

    /// Check if the operation may be retried.
    ///
    /// Only the active-package conflict is retryable, and only after the
    /// user re-confirms the upgrade; nothing here is auto-retried.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ActivePackageConflict { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AptoError;

    #[test]
    fn test_error_display() {
        let err = PaymentError::MissingContact { field: "email" };
        assert_eq!(err.to_string(), "Missing required contact field: email");

        let err = PaymentError::Backend {
            operation: "create_payment".to_string(),
            message: "Gagal membuat payment".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Payment API error during 'create_payment': Gagal membuat payment"
        );

        let err = PaymentError::InvalidTransition {
            state: "idle",
            action: "confirm_upgrade",
        };
        assert_eq!(
            err.to_string(),
            "Cannot confirm_upgrade from checkout state 'idle'"
        );
    }

    #[test]
    fn test_error_classification() {
        assert!(PaymentError::MissingContact { field: "phone" }.is_validation_error());
        assert!(!PaymentError::MissingContact { field: "phone" }.is_retryable());

        let conflict = PaymentError::ActivePackageConflict {
            message: "active package exists".to_string(),
        };
        assert!(conflict.is_retryable());
        assert!(!conflict.is_validation_error());

        let backend = PaymentError::Backend {
            operation: "confirm_payment".to_string(),
            message: "rejected".to_string(),
        };
        assert!(!backend.is_retryable());
        assert!(!backend.is_validation_error());
    }

    #[test]
    fn test_convert_to_apto_error() {
        let err: AptoError = PaymentError::InvalidProofFile {
            reason: "too large".to_string(),
        }
        .into();
        assert!(matches!(err, AptoError::BadRequest(_)));

        let err: AptoError = PaymentError::ActivePackageConflict {
            message: "active".to_string(),
        }
        .into();
        assert!(matches!(err, AptoError::Forbidden(_)));

        let err: AptoError = PaymentError::MissingPaymentId {
            package_id: "pkg_1".to_string(),
        }
        .into();
        assert!(matches!(err, AptoError::Internal(_)));
    }

    #[test]
    fn test_backend_message_is_verbatim() {
        let err = PaymentError::Backend {
            operation: "create_payment".to_string(),
            message: "Anda memiliki paket aktif".to_string(),
        };
        assert!(err.to_string().contains("Anda memiliki paket aktif"));
    }
}
