//! Pure view-state selection.
//!
//! Derives the explicit [`ContractView`] state machine from auth state
//! plus the latest store snapshots, with no mutation and no rendering
//! concerns. The progression mirrors the screens of the original UI:
//! loading, sign-in prompt, directory, join prompt, editable member
//! view, locked signed view.

use chrono::NaiveDate;

use shared::{ContractView, CurrentUser, ParticipantTasks, TaskProgressRow};

use crate::domain::commands::contract::ListContractsResult;
use crate::domain::models::{Contract, Participant};
use crate::domain::progress;

fn task_rows(participant: &Participant, today: NaiveDate) -> Vec<TaskProgressRow> {
    participant
        .todos
        .values()
        .map(|task| TaskProgressRow {
            task_id: task.id.clone(),
            text: task.text.clone(),
            completed: task.completed,
            times_per_week: task.times_per_week,
            completed_this_week: progress::completed_this_week(&task.completion_days, today),
            progress_percent: progress::weekly_progress_percent(
                &task.completion_days,
                task.times_per_week,
                today,
            ),
        })
        .collect()
}

fn participant_tasks(contract: &Contract, today: NaiveDate) -> Vec<ParticipantTasks> {
    contract
        .users
        .iter()
        .map(|(uid, participant)| ParticipantTasks {
            uid: uid.clone(),
            name: participant.name.clone(),
            has_signed: participant.has_signed(),
            tasks: task_rows(participant, today),
        })
        .collect()
}

/// Select the view for the directory (base URL) screen.
pub fn select_directory_view(
    user: Option<&CurrentUser>,
    listing: Option<&ListContractsResult>,
) -> ContractView {
    let Some(_user) = user else {
        return ContractView::Unauthenticated;
    };
    match listing {
        None => ContractView::Loading,
        Some(listing) => ContractView::Directory {
            mine: listing.mine.clone(),
            joinable: listing.joinable.clone(),
        },
    }
}

/// Select the view for a single contract screen.
///
/// `contract` is the latest document snapshot: `None` while the first
/// snapshot has not arrived is indistinguishable from a contract that
/// does not exist yet, and both render as a joinable empty contract once
/// `loaded` is true.
pub fn select_contract_view(
    user: Option<&CurrentUser>,
    contract_id: &str,
    contract: Option<&Contract>,
    loaded: bool,
    today: NaiveDate,
) -> ContractView {
    let Some(user) = user else {
        return ContractView::Unauthenticated;
    };
    if !loaded {
        return ContractView::Loading;
    }

    let Some(contract) = contract else {
        return ContractView::Joinable {
            contract_id: contract_id.to_string(),
            member_names: Vec::new(),
        };
    };

    if !contract.is_member(&user.uid) {
        return ContractView::Joinable {
            contract_id: contract_id.to_string(),
            member_names: contract.users.values().map(|p| p.name.clone()).collect(),
        };
    }

    let participants = participant_tasks(contract, today);
    if contract.signed {
        return ContractView::Signed {
            contract_id: contract_id.to_string(),
            name: contract.name.clone(),
            punishment: contract.punishment.clone(),
            end_date: contract.end_date_or_default(today),
            participants,
        };
    }

    let signed_names = contract
        .users
        .values()
        .filter(|p| p.has_signed())
        .map(|p| p.name.clone())
        .collect();
    let unsigned_names = contract
        .users
        .values()
        .filter(|p| !p.has_signed())
        .map(|p| p.name.clone())
        .collect();

    ContractView::MemberEditing {
        contract_id: contract_id.to_string(),
        name: contract.name.clone(),
        punishment: contract.punishment.clone(),
        end_date: contract.end_date_or_default(today),
        participants,
        signed_names,
        unsigned_names,
    }
}
