use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Authenticated user as reported by the identity provider.
///
/// Every mutating backend operation requires one of these as the acting
/// user; an unauthenticated session simply has none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub uid: String,
    pub display_name: String,
}

impl CurrentUser {
    pub fn new(uid: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            display_name: display_name.into(),
        }
    }
}

/// Directory listing entry for a single contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractSummary {
    pub id: String,
    pub name: String,
    /// Display names of everyone currently in the contract
    pub participant_names: Vec<String>,
}

/// One task row with its weekly progress, ready for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskProgressRow {
    pub task_id: String,
    pub text: String,
    pub completed: bool,
    pub times_per_week: u8,
    /// Distinct completion days inside the current Monday-anchored week
    pub completed_this_week: u32,
    /// Clamped to [0, 100]; 0 when the weekly target is 0
    pub progress_percent: f64,
}

/// One participant's task list plus signature status, for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantTasks {
    pub uid: String,
    pub name: String,
    pub has_signed: bool,
    pub tasks: Vec<TaskProgressRow>,
}

/// Explicit view state machine for the contract screen.
///
/// Replaces nested conditional rendering with one tagged variant per
/// screen: loading, sign-in prompt, the contract directory, the join
/// prompt for non-members, the editable pre-signature view, and the
/// locked post-signature view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ContractView {
    /// Still waiting on auth or the first store snapshot
    Loading,
    /// No signed-in user; nothing can be shown or written
    Unauthenticated,
    /// Base URL: the user's own contracts and joinable ones
    Directory {
        mine: Vec<ContractSummary>,
        joinable: Vec<ContractSummary>,
    },
    /// Viewing a contract the user has not joined yet
    Joinable {
        contract_id: String,
        member_names: Vec<String>,
    },
    /// Member of an unsigned contract: everything is editable
    MemberEditing {
        contract_id: String,
        name: String,
        punishment: String,
        end_date: NaiveDate,
        participants: Vec<ParticipantTasks>,
        signed_names: Vec<String>,
        unsigned_names: Vec<String>,
    },
    /// Member of a signed contract: only completion toggling remains
    Signed {
        contract_id: String,
        name: String,
        punishment: String,
        end_date: NaiveDate,
        participants: Vec<ParticipantTasks>,
    },
}
