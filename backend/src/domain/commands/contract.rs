//! Commands for contract-level operations: membership, signing,
//! rollover, and directory edits.

use chrono::NaiveDate;
use shared::ContractSummary;

use crate::domain::models::WeekSnapshot;

#[derive(Debug, Clone)]
pub struct JoinContractCommand {
    pub contract_id: String,
}

#[derive(Debug, Clone)]
pub struct LeaveContractCommand {
    pub contract_id: String,
}

#[derive(Debug, Clone)]
pub struct SignContractCommand {
    pub contract_id: String,
    /// Opaque signature blob, e.g. a data URL of a drawn signature
    pub signature: String,
}

#[derive(Debug, Clone)]
pub struct SignContractResult {
    /// True when this signature completed the quorum and locked the
    /// contract
    pub contract_signed: bool,
}

#[derive(Debug, Clone)]
pub struct RolloverCommand {
    pub contract_id: String,
}

#[derive(Debug, Clone)]
pub struct RolloverResult {
    pub snapshot: WeekSnapshot,
}

#[derive(Debug, Clone)]
pub struct CreateContractResult {
    pub contract_id: String,
}

#[derive(Debug, Clone)]
pub struct ListContractsResult {
    /// Contracts the acting user participates in
    pub mine: Vec<ContractSummary>,
    /// Named contracts the acting user could join
    pub joinable: Vec<ContractSummary>,
}

#[derive(Debug, Clone)]
pub struct RenameContractCommand {
    pub contract_id: String,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct SetPunishmentCommand {
    pub contract_id: String,
    pub punishment: String,
}

#[derive(Debug, Clone)]
pub struct SetEndDateCommand {
    pub contract_id: String,
    pub end_date: NaiveDate,
}
