//! Feature catalog types.
//!
//! The catalog is owned by the backend; the client reads it and never
//! mutates it. Each entry describes one tool offered by the platform.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use url::Url;

/// A catalog entry for one tool offered by the platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    /// Backend-assigned identifier.
    pub id: i64,
    /// Unique string key, used in access maps and tool URLs.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Short description.
    #[serde(default)]
    pub description: Option<String>,
    /// Catalog-level pricing flag.
    pub status: FeatureStatus,
}

impl Feature {
    /// Whether the catalog marks this feature free for everyone.
    #[must_use]
    pub fn is_free(&self) -> bool {
        self.status == FeatureStatus::Free
    }

    /// Build the external tool URL for this feature.
    ///
    /// The tool lives on the main site at `{tools_base_url}/{code}/`.
    #[must_use]
    pub fn tool_url(&self, tools_base_url: &Url) -> String {
        format!(
            "{}/{}/",
            tools_base_url.as_str().trim_end_matches('/'),
            self.code.trim_matches('/')
        )
    }
}

/// Catalog-level pricing flag for a feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureStatus {
    /// Free for everyone, no package required.
    Free,
    /// Requires an active package.
    Premium,
}

impl FeatureStatus {
    /// Parse from the backend's status string.
    #[must_use]
    pub fn from_str(status: &str) -> Self {
        match status {
            "free" => Self::Free,
            // Unknown statuses are treated as paid, never silently free.
            _ => Self::Premium,
        }
    }

    /// Convert to the backend's status string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Premium => "premium",
        }
    }
}

impl std::fmt::Display for FeatureStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Find a catalog entry by its code.
#[must_use]
pub fn find_by_code<'a>(features: &'a [Feature], code: &str) -> Option<&'a Feature> {
    features.iter().find(|f| f.code == code)
}

/// Client seam for fetching the feature catalog.
///
/// Implemented by [`crate::LiveApiClient`]; a mock is provided for testing.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Fetch the full feature catalog.
    async fn list_features(&self) -> Result<Vec<Feature>>;
}

/// Mock catalog client for testing.
#[cfg(any(test, feature = "test-support"))]
pub mod test {
    use super::*;
    use std::sync::RwLock;

    /// Mock implementation of [`CatalogClient`] serving a fixed catalog.
    #[derive(Default)]
    pub struct MockCatalogClient {
        features: RwLock<Vec<Feature>>,
    }

    impl MockCatalogClient {
        /// Create an empty mock catalog.
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Replace the catalog served by this mock.
        pub fn set_features(&self, features: Vec<Feature>) {
            *self.features.write().unwrap() = features;
        }
    }

    #[async_trait]
    impl CatalogClient for MockCatalogClient {
        async fn list_features(&self) -> Result<Vec<Feature>> {
            Ok(self.features.read().unwrap().clone())
        }
    }
}
