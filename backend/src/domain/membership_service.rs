//! Membership domain logic: joining and leaving a contract.
//!
//! Both directions are closed once the contract is signed. Joining is
//! idempotent so a double-tap on the join button can never wipe an
//! existing participant's tasks or signature.

use log::info;
use shared::CurrentUser;

use crate::domain::commands::contract::{JoinContractCommand, LeaveContractCommand};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{Contract, Participant};
use crate::storage::ContractRepository;

/// Service governing a contract's participant set.
#[derive(Clone)]
pub struct MembershipService {
    repository: ContractRepository,
}

impl MembershipService {
    pub fn new(repository: ContractRepository) -> Self {
        Self { repository }
    }

    fn require_contract(&self, contract_id: &str) -> DomainResult<Contract> {
        self.repository
            .load_contract(contract_id)?
            .ok_or_else(|| DomainError::not_found(format!("Contract not found: {contract_id}")))
    }

    /// Join a contract as a new participant with an empty task list.
    ///
    /// No-op if the acting user is already a participant. A contract id
    /// with no record yet is treated as an empty unsigned contract, so the
    /// first join materializes it (lazy creation, same as writing the
    /// participant record under a fresh key).
    pub fn join(&self, actor: &CurrentUser, command: JoinContractCommand) -> DomainResult<()> {
        info!("User {} joining contract {}", actor.uid, command.contract_id);

        let contract = self
            .repository
            .load_contract(&command.contract_id)?
            .unwrap_or_default();
        if contract.signed {
            return Err(DomainError::validation("Cannot join a signed contract"));
        }
        if contract.is_member(&actor.uid) {
            info!(
                "User {} is already in contract {}, nothing to do",
                actor.uid, command.contract_id
            );
            return Ok(());
        }

        let display_name = if actor.display_name.trim().is_empty() {
            "Anonymous".to_string()
        } else {
            actor.display_name.clone()
        };
        self.repository.save_participant(
            &command.contract_id,
            &actor.uid,
            &Participant::new(display_name),
        )?;
        Ok(())
    }

    /// Leave a contract, discarding the participant's tasks and signature.
    pub fn leave(&self, actor: &CurrentUser, command: LeaveContractCommand) -> DomainResult<()> {
        info!("User {} leaving contract {}", actor.uid, command.contract_id);

        let contract = self.require_contract(&command.contract_id)?;
        if contract.signed {
            return Err(DomainError::validation("Cannot leave a signed contract"));
        }

        self.repository
            .delete_participant(&command.contract_id, &actor.uid)?;
        Ok(())
    }
}
