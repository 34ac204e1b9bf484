//! Package purchase and upgrade checkout.
//!
//! Orchestrates a purchase as a two-phase commit against the payment API
//! (create the payment record, then confirm it with proof of transfer),
//! with a human confirmation gate whenever the purchase would replace an
//! existing active package.
//!
//! # Example
//!
//! ```rust,ignore
//! use apto_client::payment::{ActiveCheckOutcome, CheckoutFlow, PackageSummary};
//! use chrono::Utc;
//!
//! let mut flow = CheckoutFlow::new(client, package);
//!
//! match flow.check_active(Utc::now()).await? {
//!     ActiveCheckOutcome::ReadyToSubmit => {
//!         let outcome = flow.submit(details, Utc::now()).await?;
//!     }
//!     ActiveCheckOutcome::ConfirmationRequired(prompt) => {
//!         // Show the destructive-upgrade warning, then either
//!         // flow.confirm_upgrade().await? or flow.cancel()?
//!     }
//! }
//! ```

pub mod client;
pub mod error;
pub mod flow;
pub mod validation;

// Client exports
pub use client::{
    ActivePackageCheck, ConfirmPaymentRequest, ConfirmPaymentResponse, CreatePaymentRequest,
    CreatePaymentResponse, PaymentClient, PaymentDetails, PaymentMethod, ProofFile,
};

// Flow exports
pub use flow::{
    ActiveCheckOutcome, CheckoutFlow, CheckoutState, CurrentPackage, NewPackage, PackageSummary,
    PendingPayment, SubmitOutcome, UpgradePrompt,
};

// Error exports
pub use error::PaymentError;

// Validation exports
pub use validation::{
    validate_contact, validate_package_id, validate_payment_details, validate_proof_file,
    ALLOWED_PROOF_CONTENT_TYPES, MAX_PROOF_FILE_BYTES,
};

// Test exports
#[cfg(any(test, feature = "test-support"))]
pub use client::test::MockPaymentClient;
