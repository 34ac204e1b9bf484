//! Subscription state helpers.
//!
//! The active package (when one exists) is the single token granting a user
//! access to a feature set until its expiry timestamp. All probes take an
//! explicit `now` so callers and tests control the clock.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Milliseconds in a day, for days-remaining rounding.
const MILLIS_PER_DAY: i64 = 86_400_000;

/// The user's currently active package token.
///
/// At most one of these exists per user; a forced upgrade supersedes it
/// rather than merging with it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivePackageInfo {
    /// Identifier of the access token row.
    pub token_id: String,
    /// Identifier of the package the token was minted for.
    pub package_id: String,
    /// Display name of the package.
    pub package_name: String,
    /// When the token was activated.
    pub activated_at: DateTime<Utc>,
    /// When the token expires.
    pub expired_at: DateTime<Utc>,
}

impl ActivePackageInfo {
    /// Whether the token is still active at `now`.
    ///
    /// Active means `expired_at` strictly greater than `now`.
    #[must_use]
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.expired_at > now
    }

    /// Whole days remaining until expiry, rounded up, never negative.
    #[must_use]
    pub fn days_remaining(&self, now: DateTime<Utc>) -> u32 {
        days_remaining(self.expired_at, now)
    }
}

/// Coarse subscription state derived from a package name and expiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    /// An unexpired package exists.
    Active,
    /// A package exists but its expiry has passed.
    Expired,
    /// No package at all.
    None,
}

impl SubscriptionStatus {
    /// Convert to the status string used across the platform.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Expired => "expired",
            Self::None => "none",
        }
    }
}

impl std::fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Derive the subscription state from a package name and expiry timestamp.
#[must_use]
pub fn subscription_status(
    package_name: &str,
    expired_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> SubscriptionStatus {
    let Some(expired_at) = expired_at else {
        return SubscriptionStatus::None;
    };
    if package_name.is_empty() {
        return SubscriptionStatus::None;
    }

    if expired_at > now {
        SubscriptionStatus::Active
    } else {
        SubscriptionStatus::Expired
    }
}

/// Whole days remaining until `expired_at`, rounded up and floored at zero.
#[must_use]
pub fn days_remaining(expired_at: DateTime<Utc>, now: DateTime<Utc>) -> u32 {
    let millis = (expired_at - now).num_milliseconds();
    if millis <= 0 {
        return 0;
    }
    ((millis + MILLIS_PER_DAY - 1) / MILLIS_PER_DAY) as u32
}

/// Format a rupiah amount for display, e.g. `Rp 150.000`.
///
/// Prices on the platform carry no minor units.
#[must_use]
pub fn format_price(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    let first_group = digits.len() % 3;
    if first_group > 0 {
        grouped.push_str(&digits[..first_group]);
    }
    for (i, chunk) in digits[first_group..].as_bytes().chunks(3).enumerate() {
        if i > 0 || first_group > 0 {
            grouped.push('.');
        }
        grouped.push_str(std::str::from_utf8(chunk).expect("digits are ASCII"));
    }

    if amount < 0 {
        format!("-Rp {}", grouped)
    } else {
        format!("Rp {}", grouped)
    }
}
