//! # warden-types: Core types for `Warden`
//!
//! This crate contains shared types used across the `Warden` crates:
//! - Entity IDs ([`PolicyId`])
//! - Requester lifecycle ([`RequesterStatus`])
//! - Time sources ([`Clock`], [`SystemClock`], [`ManualClock`])

use std::{
    fmt::{Debug, Display},
    str::FromStr,
    sync::{Mutex, PoisonError},
};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Entity IDs
// ============================================================================

/// Unique identifier for an authorization policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PolicyId(u64);

impl PolicyId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the next ID in sequence.
    pub fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl Display for PolicyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for PolicyId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<PolicyId> for u64 {
    fn from(id: PolicyId) -> Self {
        id.0
    }
}

// ============================================================================
// Requester Status
// ============================================================================

/// Account status of a requester.
///
/// Only [`RequesterStatus::Active`] requesters are ever evaluated against
/// policies; every other status is denied before any policy is consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequesterStatus {
    #[default]
    Active,
    Inactive,
    Locked,
}

impl RequesterStatus {
    /// The wire form used in `status:<value>` subject patterns.
    pub fn as_str(&self) -> &'static str {
        match self {
            RequesterStatus::Active => "ACTIVE",
            RequesterStatus::Inactive => "INACTIVE",
            RequesterStatus::Locked => "LOCKED",
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, RequesterStatus::Active)
    }
}

impl Display for RequesterStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown status string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStatus(pub String);

impl Display for UnknownStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown requester status '{}'", self.0)
    }
}

impl std::error::Error for UnknownStatus {}

impl FromStr for RequesterStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACTIVE" => Ok(RequesterStatus::Active),
            "INACTIVE" => Ok(RequesterStatus::Inactive),
            "LOCKED" => Ok(RequesterStatus::Locked),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

// ============================================================================
// Clock
// ============================================================================

/// Abstraction over wall-clock time.
///
/// Production uses [`SystemClock`]; tests inject a [`ManualClock`] so cache
/// expiry and time-window conditions are deterministic.
pub trait Clock: Send + Sync + Debug {
    /// Returns the current instant in UTC.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time from the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[inline]
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    /// Moves the clock to an absolute instant. Going backwards is allowed.
    pub fn set(&self, instant: DateTime<Utc>) {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner) = instant;
    }

    /// Moves the clock forward by `delta`.
    pub fn advance(&self, delta: Duration) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += delta;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use test_case::test_case;

    #[test_case(RequesterStatus::Active, "ACTIVE")]
    #[test_case(RequesterStatus::Inactive, "INACTIVE")]
    #[test_case(RequesterStatus::Locked, "LOCKED")]
    fn test_status_wire_form(status: RequesterStatus, expected: &str) {
        assert_eq!(status.as_str(), expected);
        assert_eq!(expected.parse::<RequesterStatus>(), Ok(status));

        let json = serde_json::to_string(&status).expect("serialize status");
        assert_eq!(json, format!("\"{expected}\""));
    }

    #[test]
    fn test_status_parsing_is_case_sensitive() {
        assert!("active".parse::<RequesterStatus>().is_err());
    }

    #[test]
    fn test_only_active_is_active() {
        assert!(RequesterStatus::Active.is_active());
        assert!(!RequesterStatus::Inactive.is_active());
        assert!(!RequesterStatus::Locked.is_active());
    }

    #[test]
    fn test_manual_clock_advances() {
        let start = Utc.with_ymd_and_hms(2025, 1, 8, 10, 0, 0).unwrap();
        let clock = ManualClock::new(start);
        assert_eq!(clock.now(), start);

        clock.advance(Duration::seconds(61));
        assert_eq!(clock.now(), start + Duration::seconds(61));

        clock.set(start);
        assert_eq!(clock.now(), start);
    }

    #[test]
    fn test_policy_id_sequence() {
        let id = PolicyId::new(7);
        assert_eq!(u64::from(id.next()), 8);
        assert_eq!(id.to_string(), "7");
    }

    proptest::proptest! {
        #[test]
        fn prop_policy_id_ordering_matches_u64(a: u64, b: u64) {
            proptest::prop_assert_eq!(PolicyId::new(a).cmp(&PolicyId::new(b)), a.cmp(&b));
        }
    }
}
