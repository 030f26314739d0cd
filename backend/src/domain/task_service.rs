//! Task ledger domain logic.
//!
//! CRUD over a single participant's task list within a contract. Adding,
//! deleting and retargeting tasks is only allowed while the contract is
//! unsigned; completion toggling works in both lifecycle states.

use chrono::Local;
use log::{debug, info};
use shared::CurrentUser;

use crate::domain::commands::tasks::{
    AddTaskCommand, AddTaskResult, DeleteTaskCommand, SetTimesPerWeekCommand,
    SetTimesPerWeekResult, ToggleTaskCommand, ToggleTaskResult,
};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{Contract, Task, MAX_TIMES_PER_WEEK};
use crate::storage::ContractRepository;

/// Service for managing one participant's tasks.
#[derive(Clone)]
pub struct TaskService {
    repository: ContractRepository,
}

impl TaskService {
    pub fn new(repository: ContractRepository) -> Self {
        Self { repository }
    }

    fn require_contract(&self, contract_id: &str) -> DomainResult<Contract> {
        self.repository
            .load_contract(contract_id)?
            .ok_or_else(|| DomainError::not_found(format!("Contract not found: {contract_id}")))
    }

    /// Add a new task to the acting user's list.
    pub fn add_task(&self, actor: &CurrentUser, command: AddTaskCommand) -> DomainResult<AddTaskResult> {
        info!("Adding task for {}: {:?}", actor.uid, command);

        let text = command.text.trim();
        if text.is_empty() {
            return Err(DomainError::validation("Task text cannot be empty"));
        }

        let contract = self.require_contract(&command.contract_id)?;
        if contract.signed {
            return Err(DomainError::validation(
                "Cannot add tasks to a signed contract",
            ));
        }
        if !contract.is_member(&actor.uid) {
            return Err(DomainError::not_found(format!(
                "User {} is not a participant of contract {}",
                actor.uid, command.contract_id
            )));
        }

        let task_id = self.repository.new_task_id(&command.contract_id, &actor.uid);
        let task = Task::new(task_id, text);
        self.repository
            .save_task(&command.contract_id, &actor.uid, &task)?;

        info!("Created task {} for {}", task.id, actor.uid);
        Ok(AddTaskResult { task })
    }

    /// Flip a task's completed flag, recording or removing today's date.
    ///
    /// Completing inserts today into the completion log if absent;
    /// un-completing removes today only, never any historical date. Works
    /// on signed contracts too.
    pub fn toggle_task(
        &self,
        actor: &CurrentUser,
        command: ToggleTaskCommand,
    ) -> DomainResult<ToggleTaskResult> {
        debug!("Toggling task for {}: {:?}", actor.uid, command);

        let mut task = self
            .repository
            .load_task(&command.contract_id, &actor.uid, &command.task_id)?
            .ok_or_else(|| {
                DomainError::not_found(format!("Task not found: {}", command.task_id))
            })?;

        let today = Local::now().date_naive();
        if task.completed {
            task.completion_days.remove(&today);
        } else {
            task.completion_days.insert(today);
        }
        task.completed = !task.completed;

        self.repository
            .save_task(&command.contract_id, &actor.uid, &task)?;
        Ok(ToggleTaskResult { task })
    }

    /// Remove a task from the acting user's list. Idempotent: deleting an
    /// absent task is not an error.
    pub fn delete_task(&self, actor: &CurrentUser, command: DeleteTaskCommand) -> DomainResult<()> {
        info!("Deleting task for {}: {:?}", actor.uid, command);

        let contract = self.require_contract(&command.contract_id)?;
        if contract.signed {
            return Err(DomainError::validation(
                "Cannot delete tasks from a signed contract",
            ));
        }

        self.repository
            .delete_task(&command.contract_id, &actor.uid, &command.task_id)?;
        Ok(())
    }

    /// Change a task's weekly frequency target.
    pub fn set_times_per_week(
        &self,
        actor: &CurrentUser,
        command: SetTimesPerWeekCommand,
    ) -> DomainResult<SetTimesPerWeekResult> {
        info!("Setting frequency for {}: {:?}", actor.uid, command);

        if command.times_per_week > MAX_TIMES_PER_WEEK {
            return Err(DomainError::validation(format!(
                "Times per week must be between 0 and {MAX_TIMES_PER_WEEK}"
            )));
        }

        let contract = self.require_contract(&command.contract_id)?;
        if contract.signed {
            return Err(DomainError::validation(
                "Cannot change frequency targets on a signed contract",
            ));
        }

        let mut task = self
            .repository
            .load_task(&command.contract_id, &actor.uid, &command.task_id)?
            .ok_or_else(|| {
                DomainError::not_found(format!("Task not found: {}", command.task_id))
            })?;
        task.times_per_week = command.times_per_week;

        self.repository
            .save_task(&command.contract_id, &actor.uid, &task)?;
        Ok(SetTimesPerWeekResult { task })
    }
}
