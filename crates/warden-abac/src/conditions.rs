//! Policy conditions.
//!
//! [`PolicyConditions`] is the stored form: an open map in which only the
//! `time` key is understood today. [`CompiledConditions`] is what the
//! evaluator checks. Every recognised condition kind is an optional sub-check
//! and all present sub-checks must pass.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, FixedOffset, Timelike, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Stored form
// ============================================================================

/// Conditions as stored on a policy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PolicyConditions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<TimeCondition>,
    /// Keys with no evaluator support. They are kept for round-tripping and
    /// ignored during evaluation.
    #[serde(flatten)]
    pub other: BTreeMap<String, serde_json::Value>,
}

/// `{"after": "HH:MM", "before": "HH:MM"}`, both bounds inclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeCondition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<String>,
}

impl PolicyConditions {
    pub fn time_window(after: Option<&str>, before: Option<&str>) -> Self {
        Self {
            time: Some(TimeCondition {
                after: after.map(str::to_string),
                before: before.map(str::to_string),
            }),
            other: BTreeMap::new(),
        }
    }
}

// ============================================================================
// Time of day
// ============================================================================

/// A wall-clock minute, ordered chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay {
    hour: u8,
    minute: u8,
}

impl TimeOfDay {
    pub fn new(hour: u8, minute: u8) -> Option<Self> {
        (hour < 24 && minute < 60).then_some(Self { hour, minute })
    }

    /// Parses `HH:MM` (24-hour). A single-digit hour is accepted.
    pub fn parse(raw: &str) -> Option<Self> {
        let (hour, minute) = raw.trim().split_once(':')?;
        if hour.is_empty() || hour.len() > 2 || minute.len() != 2 {
            return None;
        }
        if !hour.bytes().chain(minute.bytes()).all(|b| b.is_ascii_digit()) {
            return None;
        }
        Self::new(hour.parse().ok()?, minute.parse().ok()?)
    }

    /// The minute `instant` falls in, seen from `offset`.
    pub fn at(instant: DateTime<Utc>, offset: FixedOffset) -> Self {
        let local = instant.with_timezone(&offset);
        // chrono guarantees hour < 24 and minute < 60.
        Self {
            hour: local.hour() as u8,
            minute: local.minute() as u8,
        }
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

// ============================================================================
// Compiled form
// ============================================================================

/// One bound of a time window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeBound {
    At(TimeOfDay),
    /// The stored bound did not parse. A malformed bound never passes.
    Malformed(String),
}

impl TimeBound {
    fn parse(raw: &str) -> Self {
        TimeOfDay::parse(raw).map_or_else(|| TimeBound::Malformed(raw.to_string()), TimeBound::At)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeWindow {
    pub after: Option<TimeBound>,
    pub before: Option<TimeBound>,
}

impl TimeWindow {
    /// Returns true if `now` is within both bounds (inclusive).
    pub fn contains(&self, now: TimeOfDay) -> bool {
        let after_ok = match &self.after {
            None => true,
            Some(TimeBound::At(after)) => now >= *after,
            Some(TimeBound::Malformed(_)) => false,
        };
        let before_ok = match &self.before {
            None => true,
            Some(TimeBound::At(before)) => now <= *before,
            Some(TimeBound::Malformed(_)) => false,
        };
        after_ok && before_ok
    }

    pub fn malformed_bounds(&self) -> impl Iterator<Item = &str> {
        [&self.after, &self.before]
            .into_iter()
            .filter_map(|bound| match bound {
                Some(TimeBound::Malformed(raw)) => Some(raw.as_str()),
                _ => None,
            })
    }
}

/// Conditions ready for evaluation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompiledConditions {
    pub time: Option<TimeWindow>,
    /// Names of stored keys with no evaluator support.
    pub ignored_keys: Vec<String>,
}

impl CompiledConditions {
    pub fn compile(conditions: &PolicyConditions) -> Self {
        // A blank bound is an unset bound.
        let bound = |raw: Option<&str>| {
            raw.filter(|raw| !raw.trim().is_empty())
                .map(TimeBound::parse)
        };
        let time = conditions.time.as_ref().map(|time| TimeWindow {
            after: bound(time.after.as_deref()),
            before: bound(time.before.as_deref()),
        });
        Self {
            time,
            ignored_keys: conditions.other.keys().cloned().collect(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
