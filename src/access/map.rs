//! Per-user access map and package detail payloads.

use super::status::AccessStatus;
use crate::subscription::{subscription_status, SubscriptionStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Mapping from feature code to entitlement status for one user session.
///
/// The map is always replaced wholesale on refetch; it is never merged
/// field by field, so it can never be partially stale.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessMap(HashMap<String, AccessStatus>);

impl AccessMap {
    /// Create an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the status for a feature code.
    #[must_use]
    pub fn get(&self, code: &str) -> Option<AccessStatus> {
        self.0.get(code).copied()
    }

    /// Whether the map holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Codes of every feature the map grants access to.
    #[must_use]
    pub fn accessible_codes(&self) -> Vec<String> {
        let mut codes: Vec<String> = self
            .0
            .iter()
            .filter(|(_, status)| status.grants_access())
            .map(|(code, _)| code.clone())
            .collect();
        codes.sort();
        codes
    }
}

impl FromIterator<(String, AccessStatus)> for AccessMap {
    fn from_iter<I: IntoIterator<Item = (String, AccessStatus)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Detail payload describing the user's package and its feature set.
///
/// From `GET /users/feature-access-details`. The backend sends an empty
/// shell for users without a package.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccessDetails {
    /// Name of the user's package, empty when none.
    #[serde(default)]
    pub package_name: String,
    /// Codes of the features the package covers.
    #[serde(default)]
    pub active_features: Vec<String>,
    /// Package expiry, absent when there is no package.
    #[serde(default)]
    pub expired_at: Option<DateTime<Utc>>,
}

impl AccessDetails {
    /// Derive the coarse subscription state at `now`.
    #[must_use]
    pub fn subscription_status(&self, now: DateTime<Utc>) -> SubscriptionStatus {
        subscription_status(&self.package_name, self.expired_at, now)
    }
}
