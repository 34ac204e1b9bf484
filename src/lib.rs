//! Apto Client - the client-side subscription and entitlement core of the
//! Gateway APTO digital tools platform.
//!
//! The platform backend owns all real state (packages, tokens, payment
//! records); this crate packages the decision logic every client surface
//! needs on top of it:
//!
//! - **Entitlements**: resolve, per feature and per user, whether access is
//!   free, covered by a package, gated, or locked, and what to do about it
//! - **Checkout**: drive a package purchase or destructive upgrade as a
//!   two-phase commit (create payment, then confirm with proof of transfer),
//!   with a human confirmation gate before any active package is replaced
//! - **API clients**: trait seams per concern with a production
//!   `reqwest`-based implementation and recording mocks for tests
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use apto_client::{AccessManager, ClientConfig, LiveApiClient};
//!
//! #[tokio::main]
//! async fn main() -> apto_client::Result<()> {
//!     apto_client::init_tracing();
//!
//!     let config = ClientConfig::builder().from_env().build()?;
//!     let tools_base_url = config.tools_base_url.clone();
//!     let client = LiveApiClient::new(config)?.with_auth_token("session-token".to_string());
//!
//!     let mut access = AccessManager::new(client, true, tools_base_url);
//!     access.refresh().await;
//!
//!     for code in access.accessible_features() {
//!         println!("accessible: {}", code);
//!     }
//!     Ok(())
//! }
//! ```

pub mod access;
pub mod catalog;
mod config;
mod error;
mod live_client;
pub mod payment;
pub mod subscription;

// Re-exports for public API
pub use access::{
    badge_for, decide_action, resolve_status, AccessClient, AccessDetails, AccessManager,
    AccessMap, AccessSnapshot, AccessStatus, Badge, FeatureAction,
};
pub use catalog::{find_by_code, CatalogClient, Feature, FeatureStatus};
pub use config::{ClientConfig, ClientConfigBuilder, DEFAULT_API_BASE_URL, DEFAULT_TOOLS_BASE_URL};
pub use error::{AptoError, ErrorContext, ErrorWithContext, Result};
pub use live_client::LiveApiClient;
pub use payment::{
    ActiveCheckOutcome, CheckoutFlow, CheckoutState, PackageSummary, PaymentClient, PaymentDetails,
    PaymentError, PaymentMethod, ProofFile, SubmitOutcome, UpgradePrompt,
};
pub use subscription::{
    days_remaining, format_price, subscription_status, ActivePackageInfo, SubscriptionStatus,
};

#[cfg(any(test, feature = "test-support"))]
pub use access::MockAccessClient;
#[cfg(any(test, feature = "test-support"))]
pub use catalog::test::MockCatalogClient;
#[cfg(any(test, feature = "test-support"))]
pub use payment::MockPaymentClient;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing/logging with sensible defaults
///
/// Reads the filter from `RUST_LOG` (defaulting to `info`) and switches to
/// JSON output when `APTO_LOG_JSON=true`.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let json_logs = std::env::var("APTO_LOG_JSON")
        .map(|v| v.parse::<bool>().unwrap_or(false))
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}
