//! Weekly rollover: archive the current week, reset completion tracking.
//!
//! Appends a deep copy of all participants' task state to the append-only
//! week log, then clears every task's completion-day log. The `completed`
//! flag is deliberately not reset; that asymmetry is long-standing
//! observed behavior and is preserved here rather than corrected.
//! Scheduling is the embedder's concern; this service only exposes the
//! operation.

use chrono::Local;
use log::info;
use shared::CurrentUser;

use crate::domain::commands::contract::{RolloverCommand, RolloverResult};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::WeekSnapshot;
use crate::storage::ContractRepository;

/// Service performing the weekly archive-and-reset.
#[derive(Clone)]
pub struct RolloverService {
    repository: ContractRepository,
}

impl RolloverService {
    pub fn new(repository: ContractRepository) -> Self {
        Self { repository }
    }

    /// Snapshot the week and clear per-task completion days.
    pub fn rollover(
        &self,
        actor: &CurrentUser,
        command: RolloverCommand,
    ) -> DomainResult<RolloverResult> {
        info!(
            "Rolling over contract {} (requested by {})",
            command.contract_id, actor.uid
        );

        let contract = self
            .repository
            .load_contract(&command.contract_id)?
            .ok_or_else(|| {
                DomainError::not_found(format!("Contract not found: {}", command.contract_id))
            })?;

        let snapshot = WeekSnapshot {
            week: Local::now().date_naive(),
            users: contract.users.clone(),
        };
        let mut week_log = contract.week_log.clone();
        week_log.push(snapshot.clone());
        self.repository
            .save_week_log(&command.contract_id, &week_log)?;

        for (uid, participant) in &contract.users {
            for task in participant.todos.values() {
                if task.completion_days.is_empty() {
                    continue;
                }
                let mut reset = task.clone();
                reset.completion_days.clear();
                self.repository
                    .save_task(&command.contract_id, uid, &reset)?;
            }
        }

        info!(
            "Archived week {} for contract {} ({} entries in log)",
            snapshot.week,
            command.contract_id,
            week_log.len()
        );
        Ok(RolloverResult { snapshot })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{Contract, Participant, Task};
    use crate::storage::MemoryStore;
    use chrono::NaiveDate;
    use std::sync::Arc;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn seeded_repository() -> ContractRepository {
        let repository = ContractRepository::new(Arc::new(MemoryStore::new()));
        repository
            .save_contract("c1", &Contract::new(date(2025, 6, 1)))
            .expect("failed to seed contract");

        let mut ada = Participant::new("Ada");
        let mut run = Task::new("t1", "Run");
        run.completed = true;
        run.completion_days.insert(date(2024, 6, 3));
        run.completion_days.insert(date(2024, 6, 4));
        ada.todos.insert("t1".to_string(), run);

        let mut grace = Participant::new("Grace");
        let mut read = Task::new("t2", "Read");
        read.completion_days.insert(date(2024, 6, 4));
        grace.todos.insert("t2".to_string(), read);

        repository
            .save_participant("c1", "u1", &ada)
            .expect("failed to seed participant");
        repository
            .save_participant("c1", "u2", &grace)
            .expect("failed to seed participant");
        repository
    }

    #[test]
    fn test_rollover_archives_pre_rollover_state_exactly() {
        let repository = seeded_repository();
        let service = RolloverService::new(repository.clone());

        let before = repository
            .load_contract("c1")
            .expect("load failed")
            .expect("contract missing");

        let result = service
            .rollover(
                &CurrentUser::new("u1", "Ada"),
                RolloverCommand {
                    contract_id: "c1".to_string(),
                },
            )
            .expect("rollover failed");

        assert_eq!(result.snapshot.users, before.users);

        let after = repository
            .load_contract("c1")
            .expect("load failed")
            .expect("contract missing");
        assert_eq!(after.week_log.len(), 1);
        assert_eq!(after.week_log[0], result.snapshot);
    }

    #[test]
    fn test_rollover_clears_completion_days_but_not_completed_flag() {
        let repository = seeded_repository();
        let service = RolloverService::new(repository.clone());

        service
            .rollover(
                &CurrentUser::new("u1", "Ada"),
                RolloverCommand {
                    contract_id: "c1".to_string(),
                },
            )
            .expect("rollover failed");

        let after = repository
            .load_contract("c1")
            .expect("load failed")
            .expect("contract missing");
        for participant in after.users.values() {
            for task in participant.todos.values() {
                assert!(task.completion_days.is_empty());
            }
        }
        // Observed behavior: the flag survives the reset
        assert!(after.users["u1"].todos["t1"].completed);
    }

    #[test]
    fn test_week_log_is_append_only_across_rollovers() {
        let repository = seeded_repository();
        let service = RolloverService::new(repository.clone());
        let actor = CurrentUser::new("u1", "Ada");

        let first = service
            .rollover(
                &actor,
                RolloverCommand {
                    contract_id: "c1".to_string(),
                },
            )
            .expect("rollover failed");
        service
            .rollover(
                &actor,
                RolloverCommand {
                    contract_id: "c1".to_string(),
                },
            )
            .expect("rollover failed");

        let after = repository
            .load_contract("c1")
            .expect("load failed")
            .expect("contract missing");
        assert_eq!(after.week_log.len(), 2);
        // Earlier snapshots are untouched by later rollovers
        assert_eq!(after.week_log[0], first.snapshot);
        // The second snapshot saw the already-cleared completion days
        for participant in after.week_log[1].users.values() {
            for task in participant.todos.values() {
                assert!(task.completion_days.is_empty());
            }
        }
    }

    #[test]
    fn test_rollover_missing_contract_is_not_found() {
        let repository = ContractRepository::new(Arc::new(MemoryStore::new()));
        let service = RolloverService::new(repository);

        let err = service
            .rollover(
                &CurrentUser::new("u1", "Ada"),
                RolloverCommand {
                    contract_id: "ghost".to_string(),
                },
            )
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
