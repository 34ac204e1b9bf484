//! Entitlement resolution.
//!
//! Converts a catalog feature plus the user's access map into a display
//! status and the action a surface should take when the feature is opened.
//! The same functions back every surface that lists features, so the
//! decision table lives here and nowhere else.

use super::map::AccessMap;
use super::status::AccessStatus;
use crate::catalog::Feature;
use url::Url;

/// Resolve the display status of a feature for the current session.
///
/// The branch order is load-bearing:
///
/// 1. a catalog-level free flag always wins;
/// 2. unauthenticated users are locked, whatever the map says;
/// 3. a map still in flight reads as loading, not as denial;
/// 4. otherwise the map decides, and codes absent from the map fail
///    closed to premium.
#[must_use]
pub fn resolve_status(
    feature: &Feature,
    access_map: &AccessMap,
    authenticated: bool,
    loading: bool,
) -> AccessStatus {
    if feature.is_free() {
        return AccessStatus::Free;
    }
    if !authenticated {
        return AccessStatus::Locked;
    }
    if loading {
        return AccessStatus::Loading;
    }
    access_map.get(&feature.code).unwrap_or(AccessStatus::Premium)
}

/// What a surface should do when the user opens a feature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeatureAction {
    /// Navigate straight to the external tool.
    Open {
        /// Fully-built tool URL.
        url: String,
    },
    /// Redirect to the login page.
    Login,
    /// Show the premium-access prompt for this feature.
    Upsell {
        /// Code of the gated feature.
        feature_code: String,
        /// Display name of the gated feature.
        feature_name: String,
    },
}

impl FeatureAction {
    /// Whether the action opens the tool directly.
    #[must_use]
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open { .. })
    }
}

/// Decide the action for a feature given its resolved status.
///
/// Ordering mirrors [`resolve_status`] and must be preserved: granting
/// statuses open the tool first (a catalog-free feature opens even for
/// anonymous users), the auth check comes before any premium branching,
/// and everything else falls through to the upsell prompt.
#[must_use]
pub fn decide_action(
    feature: &Feature,
    resolved: AccessStatus,
    authenticated: bool,
    tools_base_url: &Url,
) -> FeatureAction {
    if resolved.grants_access() {
        return FeatureAction::Open {
            url: feature.tool_url(tools_base_url),
        };
    }
    if !authenticated {
        return FeatureAction::Login;
    }
    FeatureAction::Upsell {
        feature_code: feature.code.clone(),
        feature_name: feature.name.clone(),
    }
}

/// Badge shown on a feature card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Badge {
    /// Catalog-free feature.
    Free,
    /// Access map still in flight.
    Loading,
    /// Covered by the user's package.
    Subscribed,
    /// Gated behind a package.
    Premium,
}

impl Badge {
    /// Stable key for styling.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Loading => "loading",
            Self::Subscribed => "subscribed",
            Self::Premium => "premium",
        }
    }
}

/// Derive the card badge for a feature.
///
/// Locked and premium collapse into the same badge; the distinction only
/// matters for the action, not the label.
#[must_use]
pub fn badge_for(feature: &Feature, resolved: AccessStatus) -> Badge {
    if feature.is_free() {
        return Badge::Free;
    }
    match resolved {
        AccessStatus::Loading => Badge::Loading,
        AccessStatus::Subscribed => Badge::Subscribed,
        _ => Badge::Premium,
    }
}
