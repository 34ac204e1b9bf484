//! Per-feature entitlement status.

use serde::{Deserialize, Serialize};

/// Entitlement status of one feature for one user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessStatus {
    /// Free for everyone.
    Free,
    /// Covered by the user's active package.
    Subscribed,
    /// Requires a package the user does not have.
    Premium,
    /// Denied; the user is not authenticated.
    Locked,
    /// The access map is still being fetched.
    ///
    /// Transient; must never be conflated with [`AccessStatus::Locked`].
    Loading,
}

impl AccessStatus {
    /// Whether this status grants access to the tool.
    #[must_use]
    pub fn grants_access(&self) -> bool {
        matches!(self, Self::Free | Self::Subscribed)
    }

    /// Parse from the backend's status string.
    #[must_use]
    pub fn from_str(status: &str) -> Self {
        match status {
            "free" => Self::Free,
            "subscribed" => Self::Subscribed,
            "locked" => Self::Locked,
            "loading" => Self::Loading,
            // Unknown statuses fail closed to paid
            _ => Self::Premium,
        }
    }

    /// Convert to the backend's status string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Subscribed => "subscribed",
            Self::Premium => "premium",
            Self::Locked => "locked",
            Self::Loading => "loading",
        }
    }
}

impl std::fmt::Display for AccessStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grants_access() {
        assert!(AccessStatus::Free.grants_access());
        assert!(AccessStatus::Subscribed.grants_access());
        assert!(!AccessStatus::Premium.grants_access());
        assert!(!AccessStatus::Locked.grants_access());
        assert!(!AccessStatus::Loading.grants_access());
    }

    #[test]
    fn test_from_str() {
        assert_eq!(AccessStatus::from_str("free"), AccessStatus::Free);
        assert_eq!(AccessStatus::from_str("subscribed"), AccessStatus::Subscribed);
        assert_eq!(AccessStatus::from_str("premium"), AccessStatus::Premium);
        assert_eq!(AccessStatus::from_str("locked"), AccessStatus::Locked);
        assert_eq!(AccessStatus::from_str("loading"), AccessStatus::Loading);
        assert_eq!(AccessStatus::from_str("unknown"), AccessStatus::Premium);
    }

    #[test]
    fn test_serde_round_trip() {
        let json = serde_json::to_string(&AccessStatus::Subscribed).unwrap();
        assert_eq!(json, "\"subscribed\"");
        let parsed: AccessStatus = serde_json::from_str("\"locked\"").unwrap();
        assert_eq!(parsed, AccessStatus::Locked);
    }
}
