//! Commands for the task ledger.

use crate::domain::models::Task;

#[derive(Debug, Clone)]
pub struct AddTaskCommand {
    pub contract_id: String,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct AddTaskResult {
    pub task: Task,
}

#[derive(Debug, Clone)]
pub struct ToggleTaskCommand {
    pub contract_id: String,
    pub task_id: String,
}

#[derive(Debug, Clone)]
pub struct ToggleTaskResult {
    pub task: Task,
}

#[derive(Debug, Clone)]
pub struct DeleteTaskCommand {
    pub contract_id: String,
    pub task_id: String,
}

#[derive(Debug, Clone)]
pub struct SetTimesPerWeekCommand {
    pub contract_id: String,
    pub task_id: String,
    pub times_per_week: u8,
}

#[derive(Debug, Clone)]
pub struct SetTimesPerWeekResult {
    pub task: Task,
}
