//! Domain models for habit contracts.
//!
//! Field names serialize in camelCase so the records written through the
//! store match the original tree layout (`timesPerWeek`, `completionDays`,
//! `endDate`, `weekLog`) byte-for-byte.

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Upper bound for a task's weekly frequency target (0..=7 allowed).
pub const MAX_TIMES_PER_WEEK: u8 = 7;

fn default_times_per_week() -> u8 {
    1
}

/// One recurring task owned by a single participant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
    /// Weekly frequency target, 0..=7
    #[serde(default = "default_times_per_week")]
    pub times_per_week: u8,
    /// Every day this task was marked done. The set type makes duplicate
    /// dates structurally impossible.
    #[serde(default)]
    pub completion_days: BTreeSet<NaiveDate>,
}

impl Task {
    /// New task with the defaults a freshly added task carries.
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            completed: false,
            times_per_week: default_times_per_week(),
            completion_days: BTreeSet::new(),
        }
    }
}

/// One user's membership record within a contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    /// Display name captured at join time
    pub name: String,
    #[serde(default)]
    pub todos: BTreeMap<String, Task>,
    /// Opaque signature blob; presence (non-empty) means this participant
    /// has signed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
}

impl Participant {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            todos: BTreeMap::new(),
            signature: None,
        }
    }

    pub fn has_signed(&self) -> bool {
        self.signature.as_deref().is_some_and(|s| !s.is_empty())
    }
}

/// Immutable archived copy of all participants' task state at a rollover
/// moment. Appended to the week log and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekSnapshot {
    /// Date the rollover ran
    pub week: NaiveDate,
    pub users: BTreeMap<String, Participant>,
}

/// A habit contract. The contract id is the store key, not a field of the
/// record itself. The `Default` value is an empty unsigned contract, the
/// state a never-written id reads back as.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contract {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub punishment: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    /// Monotonic: transitions false -> true exactly once, never back
    #[serde(default)]
    pub signed: bool,
    #[serde(default)]
    pub users: BTreeMap<String, Participant>,
    #[serde(default)]
    pub week_log: Vec<WeekSnapshot>,
}

impl Contract {
    /// Fresh unsigned contract with no participants.
    pub fn new(end_date: NaiveDate) -> Self {
        Self {
            name: String::new(),
            punishment: String::new(),
            end_date: Some(end_date),
            signed: false,
            users: BTreeMap::new(),
            week_log: Vec::new(),
        }
    }

    pub fn is_member(&self, uid: &str) -> bool {
        self.users.contains_key(uid)
    }

    /// Quorum check: at least two participants and every one of them holds
    /// a non-empty signature.
    pub fn all_signed(&self) -> bool {
        self.users.len() >= 2 && self.users.values().all(Participant::has_signed)
    }

    pub fn end_date_or_default(&self, today: NaiveDate) -> NaiveDate {
        self.end_date.unwrap_or_else(|| default_end_date(today))
    }
}

/// Contracts default to running one year from creation.
pub fn default_end_date(today: NaiveDate) -> NaiveDate {
    today.checked_add_months(Months::new(12)).unwrap_or(today)
}
