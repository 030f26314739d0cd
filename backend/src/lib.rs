//! # Habit Contract Backend
//!
//! Core library for a shared-accountability habit tracker: groups
//! co-author a contract of recurring tasks, commit to it with electronic
//! signatures, and track weekly completion against self-declared
//! frequency targets.
//!
//! This backend:
//! - Owns the contract lifecycle state machine (open -> signed) and all
//!   weekly-progress computation
//! - Talks to the external realtime store only through the injected
//!   [`storage::RealtimeStore`] handle
//! - Excludes auth, mail transport, and rendering entirely; those are
//!   collaborators at the edges

use std::sync::Arc;

pub mod domain;
pub mod storage;

use domain::notifications::{LogOnlyNotifier, SignedNotifier};
use storage::{ContractRepository, MemoryStore, RealtimeStore};

/// Main backend struct that orchestrates all services.
pub struct Backend {
    pub directory_service: domain::ContractDirectoryService,
    pub membership_service: domain::MembershipService,
    pub task_service: domain::TaskService,
    pub signature_service: domain::SignatureService,
    pub rollover_service: domain::RolloverService,
    pub watch_service: domain::ContractWatchService,
}

impl Backend {
    /// Create a backend instance over an injected store and notifier.
    ///
    /// Handles are passed in explicitly; there is no process-wide store
    /// singleton anywhere in this crate.
    pub fn new(store: Arc<dyn RealtimeStore>, notifier: Arc<dyn SignedNotifier>) -> Self {
        let repository = ContractRepository::new(store.clone());

        Backend {
            directory_service: domain::ContractDirectoryService::new(repository.clone()),
            membership_service: domain::MembershipService::new(repository.clone()),
            task_service: domain::TaskService::new(repository.clone()),
            signature_service: domain::SignatureService::new(repository.clone(), notifier),
            rollover_service: domain::RolloverService::new(repository),
            watch_service: domain::ContractWatchService::new(store),
        }
    }

    /// Backend over the in-memory store with log-only notifications, for
    /// tests and development shells.
    pub fn in_memory() -> Self {
        Backend::new(Arc::new(MemoryStore::new()), Arc::new(LogOnlyNotifier))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::commands::contract::{
        JoinContractCommand, RenameContractCommand, RolloverCommand, SignContractCommand,
    };
    use crate::domain::commands::tasks::{AddTaskCommand, ToggleTaskCommand};
    use shared::CurrentUser;

    /// Full lifecycle walk-through: create, join, populate, sign, track,
    /// roll over.
    #[test]
    fn test_contract_lifecycle_end_to_end() {
        let backend = Backend::in_memory();
        let ada = CurrentUser::new("u1", "Ada");
        let grace = CurrentUser::new("u2", "Grace");

        let contract_id = backend
            .directory_service
            .create_contract(&ada)
            .expect("create failed")
            .contract_id;

        for user in [&ada, &grace] {
            backend
                .membership_service
                .join(
                    user,
                    JoinContractCommand {
                        contract_id: contract_id.clone(),
                    },
                )
                .expect("join failed");
        }

        backend
            .directory_service
            .rename_contract(
                &ada,
                RenameContractCommand {
                    contract_id: contract_id.clone(),
                    name: "Gym Pact".to_string(),
                },
            )
            .expect("rename failed");

        let task = backend
            .task_service
            .add_task(
                &ada,
                AddTaskCommand {
                    contract_id: contract_id.clone(),
                    text: "Run 5k".to_string(),
                },
            )
            .expect("add task failed")
            .task;

        // Ada signs first: not locked yet
        let first = backend
            .signature_service
            .sign(
                &ada,
                SignContractCommand {
                    contract_id: contract_id.clone(),
                    signature: "sig-a".to_string(),
                },
            )
            .expect("sign failed");
        assert!(!first.contract_signed);

        let second = backend
            .signature_service
            .sign(
                &grace,
                SignContractCommand {
                    contract_id: contract_id.clone(),
                    signature: "sig-g".to_string(),
                },
            )
            .expect("sign failed");
        assert!(second.contract_signed);

        // Membership is frozen, completion tracking is not
        assert!(backend
            .membership_service
            .join(
                &CurrentUser::new("u9", "Eve"),
                JoinContractCommand {
                    contract_id: contract_id.clone(),
                },
            )
            .unwrap_err()
            .is_validation());

        let toggled = backend
            .task_service
            .toggle_task(
                &ada,
                ToggleTaskCommand {
                    contract_id: contract_id.clone(),
                    task_id: task.id.clone(),
                },
            )
            .expect("toggle failed")
            .task;
        assert!(toggled.completed);
        assert_eq!(toggled.completion_days.len(), 1);

        // Roll the week: snapshot keeps the day, the live task loses it
        let rollover = backend
            .rollover_service
            .rollover(
                &ada,
                RolloverCommand {
                    contract_id: contract_id.clone(),
                },
            )
            .expect("rollover failed");
        assert_eq!(
            rollover.snapshot.users["u1"].todos[&task.id]
                .completion_days
                .len(),
            1
        );

        let listing = backend
            .directory_service
            .list_contracts(&ada)
            .expect("list failed");
        assert_eq!(listing.mine.len(), 1);
        assert!(listing.joinable.is_empty());
    }
}
