//! Access snapshot management.
//!
//! Owns the per-session entitlement snapshot and keeps the fail-closed
//! refresh semantics in one place: both backend fetches must settle before
//! any access decision is made, and a failed fetch degrades to an empty
//! map rather than an error.

use super::map::{AccessDetails, AccessMap};
use super::resolver::{badge_for, decide_action, resolve_status, Badge, FeatureAction};
use super::status::AccessStatus;
use crate::catalog::Feature;
use crate::error::Result;
use async_trait::async_trait;
use url::Url;

/// Client seam for fetching a user's entitlement data.
///
/// Implemented by [`crate::LiveApiClient`]; a mock is provided for testing.
#[async_trait]
pub trait AccessClient: Send + Sync {
    /// Fetch the feature-code → status map for the authenticated user.
    async fn feature_access_status(&self) -> Result<AccessMap>;

    /// Fetch the user's package details.
    async fn feature_access_details(&self) -> Result<AccessDetails>;
}

/// One consistent view of the user's entitlements.
///
/// Snapshots are replaced wholesale on refresh; no field is ever merged
/// into an older snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccessSnapshot {
    map: AccessMap,
    details: Option<AccessDetails>,
    loading: bool,
}

impl AccessSnapshot {
    /// The fail-closed snapshot: empty map, no details, not loading.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Snapshot representing an in-flight initial fetch.
    #[must_use]
    pub fn loading() -> Self {
        Self {
            loading: true,
            ..Self::default()
        }
    }

    /// The access map.
    #[must_use]
    pub fn map(&self) -> &AccessMap {
        &self.map
    }

    /// The package details, when the fetch has produced any.
    #[must_use]
    pub fn details(&self) -> Option<&AccessDetails> {
        self.details.as_ref()
    }

    /// Whether a fetch is still in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }
}

/// Manager for a session's entitlement snapshot.
///
/// Resolution is a pure function of the snapshot plus the authentication
/// flag passed at construction; there is no ambient session state.
pub struct AccessManager<C: AccessClient> {
    client: C,
    authenticated: bool,
    tools_base_url: Url,
    snapshot: AccessSnapshot,
}

impl<C: AccessClient> AccessManager<C> {
    /// Create a manager for one session.
    ///
    /// Authenticated sessions start in the loading state until the first
    /// [`refresh`](Self::refresh); unauthenticated sessions hold the
    /// fail-closed snapshot and never fetch.
    #[must_use]
    pub fn new(client: C, authenticated: bool, tools_base_url: Url) -> Self {
        let snapshot = if authenticated {
            AccessSnapshot::loading()
        } else {
            AccessSnapshot::empty()
        };
        Self {
            client,
            authenticated,
            tools_base_url,
            snapshot,
        }
    }

    /// Whether this session is authenticated.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// The current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> &AccessSnapshot {
        &self.snapshot
    }

    /// Refetch the entitlement snapshot.
    ///
    /// The status map and the package details are fetched concurrently and
    /// both must settle before the snapshot is replaced. Failure is not an
    /// error for the caller: the snapshot degrades to the fail-closed empty
    /// map, so every non-free feature resolves to premium.
    pub async fn refresh(&mut self) {
        if !self.authenticated {
            self.snapshot = AccessSnapshot::empty();
            return;
        }

        let (map, details) = tokio::join!(
            self.client.feature_access_status(),
            self.client.feature_access_details(),
        );

        self.snapshot = match (map, details) {
            (Ok(map), Ok(details)) => AccessSnapshot {
                map,
                details: Some(details),
                loading: false,
            },
            (map, details) => {
                if let Err(err) = &map {
                    tracing::warn!(
                        target: "apto::access",
                        error = %err,
                        "failed to fetch feature access status, failing closed"
                    );
                }
                if let Err(err) = &details {
                    tracing::warn!(
                        target: "apto::access",
                        error = %err,
                        "failed to fetch feature access details, failing closed"
                    );
                }
                AccessSnapshot::empty()
            }
        };
    }

    /// Resolve the display status of a feature.
    #[must_use]
    pub fn status_for(&self, feature: &Feature) -> AccessStatus {
        resolve_status(
            feature,
            &self.snapshot.map,
            self.authenticated,
            self.snapshot.loading,
        )
    }

    /// Decide the action for opening a feature.
    #[must_use]
    pub fn action_for(&self, feature: &Feature) -> FeatureAction {
        let resolved = self.status_for(feature);
        decide_action(feature, resolved, self.authenticated, &self.tools_base_url)
    }

    /// Derive the card badge for a feature.
    #[must_use]
    pub fn badge_for(&self, feature: &Feature) -> Badge {
        badge_for(feature, self.status_for(feature))
    }

    /// Whether the user may use a feature right now.
    #[must_use]
    pub fn can_access(&self, feature: &Feature) -> bool {
        self.status_for(feature).grants_access()
    }

    /// Codes of every feature the current snapshot grants access to.
    #[must_use]
    pub fn accessible_features(&self) -> Vec<String> {
        self.snapshot.map.accessible_codes()
    }

    /// The user's package details, when known.
    #[must_use]
    pub fn package_info(&self) -> Option<&AccessDetails> {
        self.snapshot.details.as_ref()
    }
}

/// Mock access client for testing.
#[cfg(any(test, feature = "test-support"))]
pub mod test {
    use super::*;
    use crate::error::AptoError;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, RwLock};

    /// Mock implementation of [`AccessClient`].
    ///
    /// Serves scripted responses; flip [`fail_all`](Self::fail_all) to make
    /// every fetch error.
    #[derive(Default, Clone)]
    pub struct MockAccessClient {
        inner: Arc<Inner>,
    }

    #[derive(Default)]
    struct Inner {
        map: RwLock<AccessMap>,
        details: RwLock<AccessDetails>,
        fail: AtomicBool,
    }

    impl MockAccessClient {
        /// Create a mock serving an empty map.
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Replace the access map served by this mock.
        pub fn set_map(&self, map: AccessMap) {
            *self.inner.map.write().unwrap() = map;
        }

        /// Replace the details served by this mock.
        pub fn set_details(&self, details: AccessDetails) {
            *self.inner.details.write().unwrap() = details;
        }

        /// Make every subsequent fetch fail.
        pub fn fail_all(&self, fail: bool) {
            self.inner.fail.store(fail, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl AccessClient for MockAccessClient {
        async fn feature_access_status(&self) -> Result<AccessMap> {
            if self.inner.fail.load(Ordering::SeqCst) {
                return Err(AptoError::service_unavailable("mock access status failure"));
            }
            Ok(self.inner.map.read().unwrap().clone())
        }

        async fn feature_access_details(&self) -> Result<AccessDetails> {
            if self.inner.fail.load(Ordering::SeqCst) {
                return Err(AptoError::service_unavailable("mock access details failure"));
            }
            Ok(self.inner.details.read().unwrap().clone())
        }
    }
}
