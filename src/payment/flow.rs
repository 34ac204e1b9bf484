//! Checkout flow orchestration.
//!
//! Drives one purchase/upgrade attempt as a two-phase commit against the
//! payment API: create the payment record, then confirm it with contact
//! details and proof of transfer. When an unexpired active package exists,
//! the flow inserts a human confirmation gate before anything destructive
//! is submitted.
//!
//! ```text
//! Idle -> CheckingActive -> (NoActive | AwaitingConfirmation)
//! NoActive -> Submitting -> (Confirming -> Done) | Failed
//! AwaitingConfirmation -> (cancel -> Idle | confirm -> Submitting[force_upgrade])
//! ```

use super::client::{
    ConfirmPaymentRequest, CreatePaymentRequest, PaymentClient, PaymentDetails, PaymentMethod,
};
use super::error::PaymentError;
use super::validation::{validate_package_id, validate_payment_details};
use crate::error::Result;
use crate::subscription::{format_price, ActivePackageInfo};
use chrono::{DateTime, Utc};

/// The package a checkout attempt is purchasing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageSummary {
    /// Backend package identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Entitlement duration in days.
    pub duration_days: u32,
    /// Price in rupiah.
    pub price: i64,
}

/// State of one checkout attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutState {
    /// Nothing has happened yet.
    Idle,
    /// Querying the backend for an active package.
    CheckingActive,
    /// No unexpired active package; a plain purchase may proceed.
    NoActive,
    /// An active package exists; the user must confirm the upgrade.
    AwaitingConfirmation,
    /// Creating the payment record.
    Submitting,
    /// Payment record created; confirming with proof of transfer.
    Confirming {
        /// ID of the created payment.
        payment_id: String,
    },
    /// Purchase complete; navigate to the confirmation page.
    Done {
        /// ID of the confirmed payment.
        payment_id: String,
    },
    /// The backend rejected the attempt; the message is the server's,
    /// verbatim.
    Failed {
        /// Server-provided failure message.
        message: String,
    },
}

impl CheckoutState {
    /// Stable name of the state, for errors and logging.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::CheckingActive => "checking_active",
            Self::NoActive => "no_active",
            Self::AwaitingConfirmation => "awaiting_confirmation",
            Self::Submitting => "submitting",
            Self::Confirming { .. } => "confirming",
            Self::Done { .. } => "done",
            Self::Failed { .. } => "failed",
        }
    }
}

/// Form data held between submission and the user's upgrade decision.
///
/// Exists only for the duration of one checkout attempt; discarded on
/// completion, cancellation, or replay.
#[derive(Debug, Clone)]
pub struct PendingPayment {
    /// Package being purchased.
    pub package_id: String,
    /// Chosen payment method.
    pub method: PaymentMethod,
    /// Whether the stash has already been authorized to replace an active
    /// package. Always false until the user confirms.
    pub force_upgrade: bool,
    /// The full form submission.
    pub details: PaymentDetails,
}

/// The user's current package, as shown in the upgrade confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentPackage {
    /// Package name.
    pub name: String,
    /// Expiry timestamp.
    pub expired_at: DateTime<Utc>,
    /// Whole days remaining, never negative.
    pub days_left: u32,
}

/// The package being purchased, as shown in the upgrade confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPackage {
    /// Package name.
    pub name: String,
    /// Entitlement duration in days.
    pub duration_days: u32,
    /// Price in rupiah.
    pub price: i64,
}

impl NewPackage {
    /// Price formatted for display.
    #[must_use]
    pub fn price_display(&self) -> String {
        format_price(self.price)
    }
}

/// Data for the destructive-upgrade confirmation prompt.
///
/// Replacing a package forfeits the old entitlements; unused days are not
/// refunded or carried over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpgradePrompt {
    /// The package being replaced. Absent when the conflict was only
    /// discovered at submit time and the client never saw the package.
    pub current: Option<CurrentPackage>,
    /// The package being purchased.
    pub new: NewPackage,
}

/// Outcome of the active-package check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActiveCheckOutcome {
    /// No unexpired active package; submission may proceed directly.
    ReadyToSubmit,
    /// An active package exists; the user must confirm the upgrade.
    ConfirmationRequired(UpgradePrompt),
}

/// Outcome of a form submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Purchase created and confirmed.
    Completed {
        /// ID of the confirmed payment.
        payment_id: String,
    },
    /// The form was stashed; the user must confirm the upgrade before any
    /// backend call is made.
    ConfirmationRequired(UpgradePrompt),
}

/// Orchestrates one checkout attempt for one package.
///
/// The flow never parallelizes the create and confirm calls, never sends
/// `force_upgrade` without an explicit [`confirm_upgrade`] in the same
/// attempt, and rests in [`CheckoutState::Failed`] or
/// [`CheckoutState::AwaitingConfirmation`] rather than silently resetting,
/// so the caller keeps the entered form data.
///
/// [`confirm_upgrade`]: CheckoutFlow::confirm_upgrade
pub struct CheckoutFlow<C: PaymentClient> {
    client: C,
    package: PackageSummary,
    state: CheckoutState,
    active: Option<ActivePackageInfo>,
    pending: Option<PendingPayment>,
}

impl<C: PaymentClient> CheckoutFlow<C> {
    /// Start a checkout attempt for `package`.
    #[must_use]
    pub fn new(client: C, package: PackageSummary) -> Self {
        Self {
            client,
            package,
            state: CheckoutState::Idle,
            active: None,
            pending: None,
        }
    }

    /// Current state of the attempt.
    #[must_use]
    pub fn state(&self) -> &CheckoutState {
        &self.state
    }

    /// The package being purchased.
    #[must_use]
    pub fn package(&self) -> &PackageSummary {
        &self.package
    }

    /// The stashed form data, while awaiting confirmation.
    #[must_use]
    pub fn pending(&self) -> Option<&PendingPayment> {
        self.pending.as_ref()
    }

    /// The active package found by the last check, if any.
    #[must_use]
    pub fn active_package(&self) -> Option<&ActivePackageInfo> {
        self.active.as_ref()
    }

    /// Query the backend for an unexpired active package.
    ///
    /// An active package routes the flow to the confirmation gate; absence,
    /// expiry, or a failed check routes to [`CheckoutState::NoActive`] (the
    /// create endpoint re-checks server-side, so a missed active package is
    /// caught there as a conflict).
    ///
    /// # Errors
    ///
    /// Returns an error only when called outside [`CheckoutState::Idle`].
    pub async fn check_active(&mut self, now: DateTime<Utc>) -> Result<ActiveCheckOutcome> {
        if self.state != CheckoutState::Idle {
            return Err(PaymentError::InvalidTransition {
                state: self.state.name(),
                action: "check_active",
            }
            .into());
        }

        self.state = CheckoutState::CheckingActive;
        let check = match self.client.check_active_package().await {
            Ok(check) => check,
            Err(err) => {
                tracing::warn!(
                    target: "apto::payment",
                    error = %err,
                    "active-package check failed, treating as no active package"
                );
                self.state = CheckoutState::NoActive;
                return Ok(ActiveCheckOutcome::ReadyToSubmit);
            }
        };

        let active = if check.success && check.has_active {
            check.active_package.filter(|p| p.is_active(now))
        } else {
            None
        };

        match active {
            Some(package) => {
                tracing::debug!(
                    target: "apto::payment",
                    package_name = %package.package_name,
                    "active package found, upgrade confirmation required"
                );
                self.active = Some(package);
                self.state = CheckoutState::AwaitingConfirmation;
                Ok(ActiveCheckOutcome::ConfirmationRequired(
                    self.build_prompt(now),
                ))
            }
            None => {
                self.state = CheckoutState::NoActive;
                Ok(ActiveCheckOutcome::ReadyToSubmit)
            }
        }
    }

    /// The upgrade confirmation prompt, while one is required.
    #[must_use]
    pub fn upgrade_prompt(&self, now: DateTime<Utc>) -> Option<UpgradePrompt> {
        if self.state != CheckoutState::AwaitingConfirmation {
            return None;
        }
        Some(self.build_prompt(now))
    }

    /// Submit the checkout form.
    ///
    /// From [`CheckoutState::NoActive`] this runs the plain two-phase
    /// purchase. From [`CheckoutState::AwaitingConfirmation`] the form is
    /// validated and stashed, no backend call is made, and the caller must
    /// route the returned prompt through the user.
    ///
    /// # Errors
    ///
    /// Validation failures are reported before any network call. Backend
    /// failures carry the server's message verbatim and leave the flow in
    /// [`CheckoutState::Failed`].
    pub async fn submit(
        &mut self,
        details: PaymentDetails,
        now: DateTime<Utc>,
    ) -> Result<SubmitOutcome> {
        match self.state {
            CheckoutState::NoActive => {
                let payment_id = self.process(details, false).await?;
                Ok(SubmitOutcome::Completed { payment_id })
            }
            CheckoutState::AwaitingConfirmation => {
                validate_payment_details(&details)?;
                self.pending = Some(PendingPayment {
                    package_id: self.package.id.clone(),
                    method: details.method,
                    force_upgrade: false,
                    details,
                });
                Ok(SubmitOutcome::ConfirmationRequired(self.build_prompt(now)))
            }
            _ => Err(PaymentError::InvalidTransition {
                state: self.state.name(),
                action: "submit",
            }
            .into()),
        }
    }

    /// Replay the stashed form with `force_upgrade = true`.
    ///
    /// This is the only path that ever sends a forced upgrade; it requires
    /// the confirmation gate to have been reached in this attempt.
    ///
    /// # Errors
    ///
    /// Returns an error when no confirmation is pending, or propagates the
    /// purchase failure.
    pub async fn confirm_upgrade(&mut self) -> Result<String> {
        if self.state != CheckoutState::AwaitingConfirmation {
            return Err(PaymentError::InvalidTransition {
                state: self.state.name(),
                action: "confirm_upgrade",
            }
            .into());
        }
        let Some(pending) = self.pending.take() else {
            return Err(PaymentError::InvalidTransition {
                state: "awaiting_confirmation",
                action: "confirm_upgrade without a stashed submission",
            }
            .into());
        };

        self.process(pending.details, true).await
    }

    /// Abandon the confirmation gate.
    ///
    /// Discards the stashed form and returns to [`CheckoutState::Idle`]
    /// with zero backend writes.
    ///
    /// # Errors
    ///
    /// Returns an error when no confirmation is pending.
    pub fn cancel(&mut self) -> Result<()> {
        if self.state != CheckoutState::AwaitingConfirmation {
            return Err(PaymentError::InvalidTransition {
                state: self.state.name(),
                action: "cancel",
            }
            .into());
        }
        self.pending = None;
        self.active = None;
        self.state = CheckoutState::Idle;
        Ok(())
    }

    fn build_prompt(&self, now: DateTime<Utc>) -> UpgradePrompt {
        UpgradePrompt {
            current: self.active.as_ref().map(|active| CurrentPackage {
                name: active.package_name.clone(),
                expired_at: active.expired_at,
                days_left: active.days_remaining(now),
            }),
            new: NewPackage {
                name: self.package.name.clone(),
                duration_days: self.package.duration_days,
                price: self.package.price,
            },
        }
    }

    /// Run the two-phase purchase: create, then confirm.
    async fn process(&mut self, details: PaymentDetails, force_upgrade: bool) -> Result<String> {
        // Validation happens before any network call
        validate_payment_details(&details)?;
        validate_package_id(&self.package.id)?;

        self.state = CheckoutState::Submitting;
        let request = CreatePaymentRequest {
            package_id: self.package.id.clone(),
            method: details.method,
            force_upgrade,
        };
        tracing::debug!(
            target: "apto::payment",
            package_id = %request.package_id,
            method = %request.method,
            force_upgrade,
            "creating payment"
        );

        let created = match self.client.create_payment(&request).await {
            Ok(created) => created,
            Err(err) => {
                self.state = CheckoutState::Failed {
                    message: err.to_string(),
                };
                return Err(err);
            }
        };

        if !created.success {
            // The server found an active package we did not know about:
            // another session activated one between our check and this
            // submission. Back to the gate; the user must re-confirm.
            if created.has_active && !force_upgrade {
                let message = created
                    .message
                    .unwrap_or_else(|| "an active package already exists".to_string());
                self.pending = Some(PendingPayment {
                    package_id: self.package.id.clone(),
                    method: details.method,
                    force_upgrade: false,
                    details,
                });
                self.state = CheckoutState::AwaitingConfirmation;
                return Err(PaymentError::ActivePackageConflict { message }.into());
            }

            let message = created
                .message
                .unwrap_or_else(|| "payment creation failed".to_string());
            self.state = CheckoutState::Failed {
                message: message.clone(),
            };
            return Err(PaymentError::Backend {
                operation: "create_payment".to_string(),
                message,
            }
            .into());
        }

        let payment_id = match created.payment_id {
            Some(id) if !id.is_empty() => id,
            _ => {
                let err = PaymentError::MissingPaymentId {
                    package_id: self.package.id.clone(),
                };
                self.state = CheckoutState::Failed {
                    message: err.to_string(),
                };
                return Err(err.into());
            }
        };

        // Confirmation is a required second step and is never issued
        // before creation has returned a payment ID.
        self.state = CheckoutState::Confirming {
            payment_id: payment_id.clone(),
        };
        let confirm = ConfirmPaymentRequest {
            payment_id: payment_id.clone(),
            email: details.email.clone(),
            phone: details.phone.clone(),
            proof: details.proof,
        };

        let confirmed = match self.client.confirm_payment(confirm).await {
            Ok(confirmed) => confirmed,
            Err(err) => {
                self.state = CheckoutState::Failed {
                    message: err.to_string(),
                };
                return Err(err);
            }
        };

        if !confirmed.success {
            let message = confirmed
                .message
                .unwrap_or_else(|| "payment confirmation failed".to_string());
            self.state = CheckoutState::Failed {
                message: message.clone(),
            };
            return Err(PaymentError::Backend {
                operation: "confirm_payment".to_string(),
                message,
            }
            .into());
        }

        self.pending = None;
        self.state = CheckoutState::Done {
            payment_id: payment_id.clone(),
        };
        tracing::info!(
            target: "apto::payment",
            payment_id = %payment_id,
            "checkout complete"
        );
        Ok(payment_id)
    }
}

#[cfg(test)]
mod tests {
    use super::super::client::test::MockPaymentClient;
    use super::super::client::{ConfirmPaymentResponse, CreatePaymentResponse, ProofFile};
    use super::*;
    use crate::error::AptoError;
    use chrono::Duration;

    fn now() -> DateTime<Utc> {
        "2025-06-01T00:00:00Z".parse().unwrap()
    }

    fn premium_package() -> PackageSummary {
        PackageSummary {
            id: "pkg_premium".to_string(),
            name: "Premium".to_string(),
            duration_days: 30,
            price: 150_000,
        }
    }

    fn basic_active(expires_in_days: i64) -> ActivePackageInfo {
        ActivePackageInfo {
            token_id: "tok_1".to_string(),
            package_id: "pkg_basic".to_string(),
            package_name: "Basic".to_string(),
            activated_at: now() - Duration::days(20),
            expired_at: now() + Duration::days(expires_in_days),
        }
    }

    fn details() -> PaymentDetails {
        PaymentDetails {
            method: PaymentMethod::Qris,
            email: "user@example.com".to_string(),
            phone: "+6281234567890".to_string(),
            proof: ProofFile {
                file_name: "bukti.png".to_string(),
                content_type: "image/png".to_string(),
                bytes: vec![1u8; 1024],
            },
        }
    }

    #[tokio::test]
    async fn test_plain_purchase_happy_path() {
        // Scenario: no active package, purchase goes straight through
        let client = MockPaymentClient::new();
        let mut flow = CheckoutFlow::new(client.clone(), premium_package());

        let outcome = flow.check_active(now()).await.unwrap();
        assert_eq!(outcome, ActiveCheckOutcome::ReadyToSubmit);
        assert_eq!(flow.state(), &CheckoutState::NoActive);

        let outcome = flow.submit(details(), now()).await.unwrap();
        let SubmitOutcome::Completed { payment_id } = outcome else {
            panic!("expected completed purchase");
        };
        assert_eq!(payment_id, "pay_1");
        assert_eq!(
            flow.state(),
            &CheckoutState::Done {
                payment_id: "pay_1".to_string()
            }
        );

        // Exactly one create and one confirm, in order, not forced
        let creates = client.create_calls();
        assert_eq!(creates.len(), 1);
        assert!(!creates[0].force_upgrade);
        assert_eq!(creates[0].package_id, "pkg_premium");

        let confirms = client.confirm_calls();
        assert_eq!(confirms.len(), 1);
        assert_eq!(confirms[0].payment_id, "pay_1");
        assert_eq!(confirms[0].email, "user@example.com");
    }

    #[tokio::test]
    async fn test_upgrade_requires_confirmation() {
        // Scenario: Basic expires in 10 days, user buys Premium
        let client = MockPaymentClient::new();
        client.set_active_package(basic_active(10));
        let mut flow = CheckoutFlow::new(client.clone(), premium_package());

        let outcome = flow.check_active(now()).await.unwrap();
        let ActiveCheckOutcome::ConfirmationRequired(prompt) = outcome else {
            panic!("expected confirmation gate");
        };
        let current = prompt.current.unwrap();
        assert_eq!(current.name, "Basic");
        assert_eq!(current.days_left, 10);
        assert_eq!(prompt.new.name, "Premium");
        assert_eq!(prompt.new.duration_days, 30);
        assert_eq!(prompt.new.price_display(), "Rp 150.000");

        // Submitting stashes the form without touching the backend
        let outcome = flow.submit(details(), now()).await.unwrap();
        assert!(matches!(outcome, SubmitOutcome::ConfirmationRequired(_)));
        assert!(flow.pending().is_some());
        assert_eq!(client.write_count(), 0);

        // Confirming replays with force_upgrade = true
        let payment_id = flow.confirm_upgrade().await.unwrap();
        assert_eq!(payment_id, "pay_1");

        let creates = client.create_calls();
        assert_eq!(creates.len(), 1);
        assert!(creates[0].force_upgrade);
        assert_eq!(client.confirm_calls().len(), 1);
    }

    #[tokio::test]
    async fn test_cancel_discards_pending_with_zero_writes() {
        let client = MockPaymentClient::new();
        client.set_active_package(basic_active(10));
        let mut flow = CheckoutFlow::new(client.clone(), premium_package());

        flow.check_active(now()).await.unwrap();
        flow.submit(details(), now()).await.unwrap();
        assert!(flow.pending().is_some());

        flow.cancel().unwrap();
        assert_eq!(flow.state(), &CheckoutState::Idle);
        assert!(flow.pending().is_none());
        assert!(flow.active_package().is_none());
        assert_eq!(client.write_count(), 0);
    }

    #[tokio::test]
    async fn test_expired_active_package_is_not_a_gate() {
        let client = MockPaymentClient::new();
        client.set_active_package(basic_active(-1));
        let mut flow = CheckoutFlow::new(client, premium_package());

        let outcome = flow.check_active(now()).await.unwrap();
        assert_eq!(outcome, ActiveCheckOutcome::ReadyToSubmit);
        assert_eq!(flow.state(), &CheckoutState::NoActive);
    }

    #[tokio::test]
    async fn test_check_failure_routes_to_no_active() {
        let client = MockPaymentClient::new();
        client.fail_check(true);
        let mut flow = CheckoutFlow::new(client, premium_package());

        let outcome = flow.check_active(now()).await.unwrap();
        assert_eq!(outcome, ActiveCheckOutcome::ReadyToSubmit);
    }

    #[tokio::test]
    async fn test_stale_conflict_returns_to_confirmation_gate() {
        // The server finds an active package the client's check missed
        let client = MockPaymentClient::new();
        client.set_create_response(CreatePaymentResponse {
            success: false,
            payment_id: None,
            has_active: true,
            message: Some("Anda memiliki paket aktif".to_string()),
        });
        let mut flow = CheckoutFlow::new(client.clone(), premium_package());

        flow.check_active(now()).await.unwrap();
        let err = flow.submit(details(), now()).await.unwrap_err();
        assert!(matches!(err, AptoError::Forbidden(_)));
        assert!(err.to_string().contains("Anda memiliki paket aktif"));

        // Flow rests at the gate with the form preserved, no confirm issued
        assert_eq!(flow.state(), &CheckoutState::AwaitingConfirmation);
        assert!(flow.pending().is_some());
        assert_eq!(client.create_calls().len(), 1);
        assert!(client.confirm_calls().is_empty());

        // Only an explicit re-confirmation replays with force_upgrade
        client.set_create_response(CreatePaymentResponse {
            success: true,
            payment_id: Some("pay_7".to_string()),
            has_active: false,
            message: None,
        });
        let payment_id = flow.confirm_upgrade().await.unwrap();
        assert_eq!(payment_id, "pay_7");

        let creates = client.create_calls();
        assert_eq!(creates.len(), 2);
        assert!(!creates[0].force_upgrade);
        assert!(creates[1].force_upgrade);
    }

    #[tokio::test]
    async fn test_forced_submit_conflict_is_a_plain_failure() {
        // If the server still reports a conflict on a forced submit, that is
        // a hard failure, not another gate
        let client = MockPaymentClient::new();
        client.set_active_package(basic_active(10));
        client.set_create_response(CreatePaymentResponse {
            success: false,
            payment_id: None,
            has_active: true,
            message: Some("masih ada paket aktif".to_string()),
        });
        let mut flow = CheckoutFlow::new(client.clone(), premium_package());

        flow.check_active(now()).await.unwrap();
        flow.submit(details(), now()).await.unwrap();
        let err = flow.confirm_upgrade().await.unwrap_err();
        assert!(matches!(err, AptoError::Internal(_)));
        assert_eq!(
            flow.state(),
            &CheckoutState::Failed {
                message: "masih ada paket aktif".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_create_failure_surfaces_server_message_verbatim() {
        let client = MockPaymentClient::new();
        client.set_create_response(CreatePaymentResponse {
            success: false,
            payment_id: None,
            has_active: false,
            message: Some("Gagal membuat payment".to_string()),
        });
        let mut flow = CheckoutFlow::new(client.clone(), premium_package());

        flow.check_active(now()).await.unwrap();
        let err = flow.submit(details(), now()).await.unwrap_err();
        assert!(err.to_string().contains("Gagal membuat payment"));
        assert_eq!(
            flow.state(),
            &CheckoutState::Failed {
                message: "Gagal membuat payment".to_string()
            }
        );
        assert!(client.confirm_calls().is_empty());
    }

    #[tokio::test]
    async fn test_created_without_payment_id_never_confirms() {
        let client = MockPaymentClient::new();
        client.set_create_response(CreatePaymentResponse {
            success: true,
            payment_id: None,
            has_active: false,
            message: None,
        });
        let mut flow = CheckoutFlow::new(client.clone(), premium_package());

        flow.check_active(now()).await.unwrap();
        let err = flow.submit(details(), now()).await.unwrap_err();
        assert!(err.to_string().contains("returned no payment ID"));
        assert!(matches!(flow.state(), CheckoutState::Failed { .. }));
        assert!(client.confirm_calls().is_empty());
    }

    #[tokio::test]
    async fn test_confirm_failure_is_not_a_completed_purchase() {
        let client = MockPaymentClient::new();
        client.set_confirm_response(ConfirmPaymentResponse {
            success: false,
            message: Some("Bukti transfer tidak terbaca".to_string()),
        });
        let mut flow = CheckoutFlow::new(client.clone(), premium_package());

        flow.check_active(now()).await.unwrap();
        let err = flow.submit(details(), now()).await.unwrap_err();
        assert!(err.to_string().contains("Bukti transfer tidak terbaca"));
        // Created but unconfirmed: the flow must not report Done
        assert_eq!(
            flow.state(),
            &CheckoutState::Failed {
                message: "Bukti transfer tidak terbaca".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_validation_failure_makes_no_backend_calls() {
        let client = MockPaymentClient::new();
        let mut flow = CheckoutFlow::new(client.clone(), premium_package());
        flow.check_active(now()).await.unwrap();

        let mut bad = details();
        bad.proof.content_type = "image/gif".to_string();
        let err = flow.submit(bad, now()).await.unwrap_err();
        assert!(matches!(err, AptoError::BadRequest(_)));
        assert_eq!(client.write_count(), 0);
    }

    #[tokio::test]
    async fn test_transitions_are_guarded() {
        let client = MockPaymentClient::new();
        let mut flow = CheckoutFlow::new(client.clone(), premium_package());

        // Nothing before check_active
        assert!(flow.submit(details(), now()).await.is_err());
        assert!(flow.confirm_upgrade().await.is_err());
        assert!(flow.cancel().is_err());
        assert_eq!(client.write_count(), 0);

        // confirm_upgrade without a stashed submission
        client.set_active_package(basic_active(5));
        flow.check_active(now()).await.unwrap();
        assert!(flow.confirm_upgrade().await.is_err());
        assert_eq!(client.write_count(), 0);

        // check_active is not re-entrant
        assert!(flow.check_active(now()).await.is_err());
    }

    #[tokio::test]
    async fn test_upgrade_prompt_only_while_awaiting() {
        let client = MockPaymentClient::new();
        client.set_active_package(basic_active(5));
        let mut flow = CheckoutFlow::new(client, premium_package());

        assert!(flow.upgrade_prompt(now()).is_none());
        flow.check_active(now()).await.unwrap();
        assert!(flow.upgrade_prompt(now()).is_some());
        flow.cancel().unwrap();
        assert!(flow.upgrade_prompt(now()).is_none());
    }
}
