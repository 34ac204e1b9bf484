//! Payment API wire types and client seam.
//!
//! Mirrors the platform's payment endpoints: active-package check, payment
//! creation, and multipart payment confirmation.

use crate::error::Result;
use crate::subscription::ActivePackageInfo;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Payment method offered at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    /// BCA bank transfer.
    #[serde(rename = "BCA")]
    Bca,
    /// QRIS code payment.
    #[serde(rename = "QRIS")]
    Qris,
}

impl PaymentMethod {
    /// Parse from the wire string.
    #[must_use]
    pub fn from_str(method: &str) -> Option<Self> {
        match method {
            "BCA" => Some(Self::Bca),
            "QRIS" => Some(Self::Qris),
            _ => None,
        }
    }

    /// Convert to the wire string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bca => "BCA",
            Self::Qris => "QRIS",
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Proof-of-payment file uploaded at confirmation.
#[derive(Clone, PartialEq, Eq)]
pub struct ProofFile {
    /// Original file name.
    pub file_name: String,
    /// MIME type as reported by the picker.
    pub content_type: String,
    /// Raw file contents.
    pub bytes: Vec<u8>,
}

impl ProofFile {
    /// Size of the file in bytes.
    #[must_use]
    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

// Keep the raw bytes out of debug output
impl std::fmt::Debug for ProofFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProofFile")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("size", &self.bytes.len())
            .finish()
    }
}

/// One checkout form submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentDetails {
    /// Chosen payment method.
    pub method: PaymentMethod,
    /// Registered email, receives the invoice.
    pub email: String,
    /// Active WhatsApp number, receives the activation notification.
    pub phone: String,
    /// Proof of transfer.
    pub proof: ProofFile,
}

/// Response of `GET /payment/check-active-package`.
#[derive(Debug, Clone, Deserialize)]
pub struct ActivePackageCheck {
    /// Whether the check itself succeeded.
    pub success: bool,
    /// Whether an active package exists.
    #[serde(rename = "hasActive", default)]
    pub has_active: bool,
    /// The active package, when one exists.
    #[serde(rename = "activePackage", default)]
    pub active_package: Option<ActivePackageInfo>,
    /// Server message, on failure.
    #[serde(default)]
    pub message: Option<String>,
}

/// Request body of `POST /payment/create`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatePaymentRequest {
    /// Package being purchased.
    pub package_id: String,
    /// Chosen payment method.
    pub method: PaymentMethod,
    /// Whether the purchase may replace an existing active package.
    #[serde(rename = "forceUpgrade")]
    pub force_upgrade: bool,
}

/// Response of `POST /payment/create`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePaymentResponse {
    /// Whether the payment record was created.
    pub success: bool,
    /// ID of the created payment, present on success.
    #[serde(default)]
    pub payment_id: Option<String>,
    /// Set when the server independently detected an active package.
    #[serde(rename = "hasActive", default)]
    pub has_active: bool,
    /// Server message, on failure.
    #[serde(default)]
    pub message: Option<String>,
}

/// Request of `POST /payment/confirm` (multipart).
#[derive(Debug, Clone)]
pub struct ConfirmPaymentRequest {
    /// ID returned by payment creation.
    pub payment_id: String,
    /// Contact email.
    pub email: String,
    /// Contact WhatsApp number.
    pub phone: String,
    /// Proof of transfer, sent as the `proof_image` part.
    pub proof: ProofFile,
}

/// Response of `POST /payment/confirm`.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfirmPaymentResponse {
    /// Whether the confirmation was accepted.
    pub success: bool,
    /// Server message, on failure.
    #[serde(default)]
    pub message: Option<String>,
}

/// Client seam for the payment endpoints.
///
/// Implemented by [`crate::LiveApiClient`]; a recording mock is provided
/// for testing.
#[async_trait]
pub trait PaymentClient: Send + Sync {
    /// Check whether the user currently holds an active package.
    async fn check_active_package(&self) -> Result<ActivePackageCheck>;

    /// Create a payment record for a package purchase.
    async fn create_payment(&self, request: &CreatePaymentRequest) -> Result<CreatePaymentResponse>;

    /// Confirm a created payment with contact details and proof of transfer.
    async fn confirm_payment(
        &self,
        request: ConfirmPaymentRequest,
    ) -> Result<ConfirmPaymentResponse>;
}

/// Recording mock payment client for testing.
#[cfg(any(test, feature = "test-support"))]
pub mod test {
    use super::*;
    use crate::error::AptoError;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, RwLock};

    /// Mock implementation of [`PaymentClient`].
    ///
    /// Records every call and serves scripted responses. By default the
    /// check reports no active package and both writes succeed, with
    /// payment IDs `pay_1`, `pay_2`, ...
    #[derive(Default, Clone)]
    pub struct MockPaymentClient {
        inner: Arc<Inner>,
    }

    #[derive(Default)]
    struct Inner {
        active_package: RwLock<Option<ActivePackageInfo>>,
        check_fails: AtomicBool,
        create_response: RwLock<Option<CreatePaymentResponse>>,
        confirm_response: RwLock<Option<ConfirmPaymentResponse>>,
        create_calls: RwLock<Vec<CreatePaymentRequest>>,
        confirm_calls: RwLock<Vec<ConfirmPaymentRequest>>,
    }

    impl MockPaymentClient {
        /// Create a mock with no active package and succeeding writes.
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Make the active-package check report this package.
        pub fn set_active_package(&self, package: ActivePackageInfo) {
            *self.inner.active_package.write().unwrap() = Some(package);
        }

        /// Make the active-package check report no package.
        pub fn clear_active_package(&self) {
            *self.inner.active_package.write().unwrap() = None;
        }

        /// Make the active-package check fail at the transport level.
        pub fn fail_check(&self, fail: bool) {
            self.inner.check_fails.store(fail, Ordering::SeqCst);
        }

        /// Script the next create-payment responses.
        pub fn set_create_response(&self, response: CreatePaymentResponse) {
            *self.inner.create_response.write().unwrap() = Some(response);
        }

        /// Script the next confirm-payment responses.
        pub fn set_confirm_response(&self, response: ConfirmPaymentResponse) {
            *self.inner.confirm_response.write().unwrap() = Some(response);
        }

        /// Every create-payment request received, in order.
        #[must_use]
        pub fn create_calls(&self) -> Vec<CreatePaymentRequest> {
            self.inner.create_calls.read().unwrap().clone()
        }

        /// Every confirm-payment request received, in order.
        #[must_use]
        pub fn confirm_calls(&self) -> Vec<ConfirmPaymentRequest> {
            self.inner.confirm_calls.read().unwrap().clone()
        }

        /// Total number of backend writes recorded.
        #[must_use]
        pub fn write_count(&self) -> usize {
            self.create_calls().len() + self.confirm_calls().len()
        }
    }

    #[async_trait]
    impl PaymentClient for MockPaymentClient {
        async fn check_active_package(&self) -> Result<ActivePackageCheck> {
            if self.inner.check_fails.load(Ordering::SeqCst) {
                return Err(AptoError::service_unavailable("mock check failure"));
            }
            let active = self.inner.active_package.read().unwrap().clone();
            Ok(ActivePackageCheck {
                success: true,
                has_active: active.is_some(),
                active_package: active,
                message: None,
            })
        }

        async fn create_payment(
            &self,
            request: &CreatePaymentRequest,
        ) -> Result<CreatePaymentResponse> {
            let call_number = {
                let mut calls = self.inner.create_calls.write().unwrap();
                calls.push(request.clone());
                calls.len()
            };
            if let Some(scripted) = self.inner.create_response.read().unwrap().clone() {
                return Ok(scripted);
            }
            Ok(CreatePaymentResponse {
                success: true,
                payment_id: Some(format!("pay_{}", call_number)),
                has_active: false,
                message: None,
            })
        }

        async fn confirm_payment(
            &self,
            request: ConfirmPaymentRequest,
        ) -> Result<ConfirmPaymentResponse> {
            self.inner.confirm_calls.write().unwrap().push(request);
            if let Some(scripted) = self.inner.confirm_response.read().unwrap().clone() {
                return Ok(scripted);
            }
            Ok(ConfirmPaymentResponse {
                success: true,
                message: None,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_method_wire_strings() {
        assert_eq!(PaymentMethod::Bca.as_str(), "BCA");
        assert_eq!(PaymentMethod::Qris.to_string(), "QRIS");
        assert_eq!(PaymentMethod::from_str("BCA"), Some(PaymentMethod::Bca));
        assert_eq!(PaymentMethod::from_str("GOPAY"), None);
    }

    #[test]
    fn test_create_request_serializes_force_upgrade_camel_case() {
        let request = CreatePaymentRequest {
            package_id: "pkg_premium".to_string(),
            method: PaymentMethod::Qris,
            force_upgrade: true,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["package_id"], "pkg_premium");
        assert_eq!(json["method"], "QRIS");
        assert_eq!(json["forceUpgrade"], true);
        assert!(json.get("force_upgrade").is_none());
    }

    #[test]
    fn test_active_package_check_deserializes_wire_envelope() {
        let json = r#"{
            "success": true,
            "hasActive": true,
            "activePackage": {
                "token_id": "tok_9",
                "package_id": "pkg_basic",
                "package_name": "Basic",
                "activated_at": "2025-05-01T00:00:00Z",
                "expired_at": "2025-06-11T00:00:00Z"
            }
        }"#;
        let check: ActivePackageCheck = serde_json::from_str(json).unwrap();
        assert!(check.success);
        assert!(check.has_active);
        let active = check.active_package.unwrap();
        assert_eq!(active.package_name, "Basic");
        assert_eq!(active.token_id, "tok_9");
    }

    #[test]
    fn test_active_package_check_defaults_when_absent() {
        let check: ActivePackageCheck = serde_json::from_str(r#"{"success": false}"#).unwrap();
        assert!(!check.has_active);
        assert!(check.active_package.is_none());
        assert!(check.message.is_none());
    }

    #[test]
    fn test_create_response_with_conflict_flag() {
        let json = r#"{"success": false, "hasActive": true, "message": "Anda memiliki paket aktif"}"#;
        let response: CreatePaymentResponse = serde_json::from_str(json).unwrap();
        assert!(!response.success);
        assert!(response.has_active);
        assert!(response.payment_id.is_none());
        assert_eq!(response.message.as_deref(), Some("Anda memiliki paket aktif"));
    }

    #[test]
    fn test_proof_file_debug_hides_bytes() {
        let proof = ProofFile {
            file_name: "bukti.png".to_string(),
            content_type: "image/png".to_string(),
            bytes: vec![0u8; 1024],
        };
        let debug = format!("{:?}", proof);
        assert!(debug.contains("bukti.png"));
        assert!(debug.contains("1024"));
        assert!(!debug.contains("[0,"));
    }
}
