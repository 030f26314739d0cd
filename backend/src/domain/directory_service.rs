//! Contract directory: creation, listing, and unsigned-only field edits.
//!
//! Listing partitions every stored contract into "mine" (the acting user
//! participates, named or not) and "joinable" (named contracts the user
//! is not in). Name, punishment and end date stay editable until the
//! contract signs.

use log::info;
use shared::{ContractSummary, CurrentUser};

use crate::domain::commands::contract::{
    CreateContractResult, ListContractsResult, RenameContractCommand, SetEndDateCommand,
    SetPunishmentCommand,
};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{default_end_date, Contract};
use crate::storage::ContractRepository;

/// Service for creating and listing contracts.
#[derive(Clone)]
pub struct ContractDirectoryService {
    repository: ContractRepository,
}

impl ContractDirectoryService {
    pub fn new(repository: ContractRepository) -> Self {
        Self { repository }
    }

    fn require_contract(&self, contract_id: &str) -> DomainResult<Contract> {
        self.repository
            .load_contract(contract_id)?
            .ok_or_else(|| DomainError::not_found(format!("Contract not found: {contract_id}")))
    }

    fn require_open(&self, contract_id: &str, action: &str) -> DomainResult<Contract> {
        let contract = self.require_contract(contract_id)?;
        if contract.signed {
            return Err(DomainError::validation(format!(
                "Cannot {action} a signed contract"
            )));
        }
        Ok(contract)
    }

    /// Allocate a fresh empty contract. The creator is not automatically
    /// joined; they go through the membership service like everyone else.
    pub fn create_contract(&self, actor: &CurrentUser) -> DomainResult<CreateContractResult> {
        let contract_id = self.repository.new_contract_id();
        let today = chrono::Local::now().date_naive();
        let contract = Contract::new(default_end_date(today));
        self.repository.save_contract(&contract_id, &contract)?;

        info!("Created contract {} for {}", contract_id, actor.uid);
        Ok(CreateContractResult { contract_id })
    }

    /// List all contracts, split into the acting user's own and joinable
    /// ones. Joinable requires a non-empty name; membership does not.
    pub fn list_contracts(&self, actor: &CurrentUser) -> DomainResult<ListContractsResult> {
        let contracts = self.repository.load_all_contracts()?;

        let mut mine = Vec::new();
        let mut joinable = Vec::new();
        for (id, contract) in contracts {
            let summary = ContractSummary {
                id,
                name: contract.name.clone(),
                participant_names: contract.users.values().map(|p| p.name.clone()).collect(),
            };
            if contract.is_member(&actor.uid) {
                mine.push(summary);
            } else if !contract.name.trim().is_empty() {
                joinable.push(summary);
            }
        }

        info!(
            "Listed contracts for {}: {} mine, {} joinable",
            actor.uid,
            mine.len(),
            joinable.len()
        );
        Ok(ListContractsResult { mine, joinable })
    }

    pub fn rename_contract(
        &self,
        actor: &CurrentUser,
        command: RenameContractCommand,
    ) -> DomainResult<()> {
        info!("User {} renaming contract {}", actor.uid, command.contract_id);
        self.require_open(&command.contract_id, "rename")?;
        self.repository
            .set_name(&command.contract_id, &command.name)?;
        Ok(())
    }

    pub fn set_punishment(
        &self,
        actor: &CurrentUser,
        command: SetPunishmentCommand,
    ) -> DomainResult<()> {
        info!(
            "User {} setting punishment on contract {}",
            actor.uid, command.contract_id
        );
        self.require_open(&command.contract_id, "edit the punishment of")?;
        self.repository
            .set_punishment(&command.contract_id, &command.punishment)?;
        Ok(())
    }

    pub fn set_end_date(
        &self,
        actor: &CurrentUser,
        command: SetEndDateCommand,
    ) -> DomainResult<()> {
        info!(
            "User {} setting end date on contract {}",
            actor.uid, command.contract_id
        );
        self.require_open(&command.contract_id, "change the end date of")?;
        self.repository
            .set_end_date(&command.contract_id, command.end_date)?;
        Ok(())
    }
}
