//! Signature and lock coordination.
//!
//! Per contract the lifecycle is a two-state machine: OPEN (editable)
//! and SIGNED (terminal, locked). Signing records the caller's signature
//! blob against their participant record without disturbing their task
//! map; once every participant of a contract with at least two members
//! has signed, the contract locks and the mail collaborator is notified
//! once. There is no unsign.

use std::sync::Arc;

use log::{info, warn};
use shared::CurrentUser;

use crate::domain::commands::contract::{SignContractCommand, SignContractResult};
use crate::domain::errors::{DomainError, DomainResult, TWO_PARTICIPANTS_REQUIRED};
use crate::domain::models::Contract;
use crate::domain::notifications::SignedNotifier;
use crate::storage::ContractRepository;

/// Service coordinating the OPEN -> SIGNED transition.
#[derive(Clone)]
pub struct SignatureService {
    repository: ContractRepository,
    notifier: Arc<dyn SignedNotifier>,
}

impl SignatureService {
    pub fn new(repository: ContractRepository, notifier: Arc<dyn SignedNotifier>) -> Self {
        Self {
            repository,
            notifier,
        }
    }

    fn require_contract(&self, contract_id: &str) -> DomainResult<Contract> {
        self.repository
            .load_contract(contract_id)?
            .ok_or_else(|| DomainError::not_found(format!("Contract not found: {contract_id}")))
    }

    /// Record the acting user's signature; lock the contract if this
    /// completes the quorum.
    ///
    /// Notification failure is logged and swallowed: the signed state has
    /// already been committed and is not rolled back.
    pub fn sign(
        &self,
        actor: &CurrentUser,
        command: SignContractCommand,
    ) -> DomainResult<SignContractResult> {
        info!("User {} signing contract {}", actor.uid, command.contract_id);

        if command.signature.trim().is_empty() {
            return Err(DomainError::validation("Signature cannot be empty"));
        }

        let mut contract = self.require_contract(&command.contract_id)?;
        if contract.signed {
            return Err(DomainError::validation("Contract is already signed"));
        }
        if contract.users.len() < 2 {
            return Err(DomainError::validation(TWO_PARTICIPANTS_REQUIRED));
        }

        let mut participant = contract
            .users
            .get(&actor.uid)
            .cloned()
            .ok_or_else(|| {
                DomainError::not_found(format!(
                    "User {} is not a participant of contract {}",
                    actor.uid, command.contract_id
                ))
            })?;

        // The whole participant record is rewritten so the existing task
        // map rides along untouched.
        participant.signature = Some(command.signature);
        self.repository
            .save_participant(&command.contract_id, &actor.uid, &participant)?;

        contract.users.insert(actor.uid.clone(), participant);

        if !contract.all_signed() {
            return Ok(SignContractResult {
                contract_signed: false,
            });
        }

        self.repository.set_signed(&command.contract_id, true)?;
        info!(
            "Contract {} fully signed by {} participants",
            command.contract_id,
            contract.users.len()
        );

        if let Err(err) = self
            .notifier
            .notify_contract_signed(&command.contract_id, &contract.users)
        {
            warn!(
                "Failed to send contract-signed notification for {}: {err:#}",
                command.contract_id
            );
        }

        Ok(SignContractResult {
            contract_signed: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{Participant, Task};
    use crate::storage::MemoryStore;
    use anyhow::anyhow;
    use chrono::NaiveDate;
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Test notifier that counts calls and can be told to fail.
    #[derive(Default)]
    struct RecordingNotifier {
        calls: AtomicUsize,
        fail: bool,
        last_participants: Mutex<Option<BTreeMap<String, Participant>>>,
    }

    impl RecordingNotifier {
        fn failing() -> Self {
            Self {
                fail: true,
                ..Default::default()
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl SignedNotifier for RecordingNotifier {
        fn notify_contract_signed(
            &self,
            _contract_id: &str,
            participants: &BTreeMap<String, Participant>,
        ) -> anyhow::Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_participants.lock().unwrap() = Some(participants.clone());
            if self.fail {
                return Err(anyhow!("mail endpoint unreachable"));
            }
            Ok(())
        }
    }

    fn setup_with_notifier(
        notifier: Arc<RecordingNotifier>,
    ) -> (SignatureService, ContractRepository) {
        let repository = ContractRepository::new(Arc::new(MemoryStore::new()));
        let end_date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        repository
            .save_contract("c1", &Contract::new(end_date))
            .expect("failed to seed contract");
        (
            SignatureService::new(repository.clone(), notifier),
            repository,
        )
    }

    fn add_participant(repository: &ContractRepository, uid: &str, name: &str) {
        repository
            .save_participant("c1", uid, &Participant::new(name))
            .expect("failed to seed participant");
    }

    fn sign_command(signature: &str) -> SignContractCommand {
        SignContractCommand {
            contract_id: "c1".to_string(),
            signature: signature.to_string(),
        }
    }

    #[test]
    fn test_single_participant_cannot_sign() {
        let notifier = Arc::new(RecordingNotifier::default());
        let (service, repository) = setup_with_notifier(notifier.clone());
        add_participant(&repository, "u1", "Ada");

        let err = service
            .sign(&CurrentUser::new("u1", "Ada"), sign_command("sig-a"))
            .unwrap_err();
        match err {
            DomainError::Validation(message) => assert_eq!(message, TWO_PARTICIPANTS_REQUIRED),
            other => panic!("expected validation error, got {other:?}"),
        }
        assert_eq!(notifier.call_count(), 0);
    }

    #[test]
    fn test_first_signature_does_not_lock() {
        let notifier = Arc::new(RecordingNotifier::default());
        let (service, repository) = setup_with_notifier(notifier.clone());
        add_participant(&repository, "u1", "Ada");
        add_participant(&repository, "u2", "Grace");

        let result = service
            .sign(&CurrentUser::new("u1", "Ada"), sign_command("sig-a"))
            .expect("sign failed");
        assert!(!result.contract_signed);

        let contract = repository
            .load_contract("c1")
            .expect("load failed")
            .expect("contract missing");
        assert!(!contract.signed);
        assert!(contract.users["u1"].has_signed());
        assert!(!contract.users["u2"].has_signed());
        assert_eq!(notifier.call_count(), 0);
    }

    #[test]
    fn test_quorum_locks_and_notifies_once() {
        let notifier = Arc::new(RecordingNotifier::default());
        let (service, repository) = setup_with_notifier(notifier.clone());
        add_participant(&repository, "u1", "Ada");
        add_participant(&repository, "u2", "Grace");

        service
            .sign(&CurrentUser::new("u1", "Ada"), sign_command("sig-a"))
            .expect("sign failed");
        let result = service
            .sign(&CurrentUser::new("u2", "Grace"), sign_command("sig-g"))
            .expect("sign failed");
        assert!(result.contract_signed);

        let contract = repository
            .load_contract("c1")
            .expect("load failed")
            .expect("contract missing");
        assert!(contract.signed);
        assert_eq!(notifier.call_count(), 1);

        let snapshot = notifier.last_participants.lock().unwrap();
        let participants = snapshot.as_ref().expect("no snapshot recorded");
        assert!(participants.values().all(|p| p.has_signed()));
    }

    #[test]
    fn test_signing_preserves_task_map() {
        let notifier = Arc::new(RecordingNotifier::default());
        let (service, repository) = setup_with_notifier(notifier);
        add_participant(&repository, "u2", "Grace");

        let mut participant = Participant::new("Ada");
        participant
            .todos
            .insert("t1".to_string(), Task::new("t1", "Run"));
        participant
            .todos
            .insert("t2".to_string(), Task::new("t2", "Read"));
        repository
            .save_participant("c1", "u1", &participant)
            .expect("save failed");

        service
            .sign(&CurrentUser::new("u1", "Ada"), sign_command("sig-a"))
            .expect("sign failed");

        let after = repository
            .load_participant("c1", "u1")
            .expect("load failed")
            .expect("participant missing");
        assert_eq!(after.todos, participant.todos);
        assert!(after.has_signed());
    }

    #[test]
    fn test_notifier_failure_keeps_contract_signed() {
        let notifier = Arc::new(RecordingNotifier::failing());
        let (service, repository) = setup_with_notifier(notifier.clone());
        add_participant(&repository, "u1", "Ada");
        add_participant(&repository, "u2", "Grace");

        service
            .sign(&CurrentUser::new("u1", "Ada"), sign_command("sig-a"))
            .expect("sign failed");
        let result = service
            .sign(&CurrentUser::new("u2", "Grace"), sign_command("sig-g"))
            .expect("sign should succeed despite notifier failure");
        assert!(result.contract_signed);
        assert_eq!(notifier.call_count(), 1);

        let contract = repository
            .load_contract("c1")
            .expect("load failed")
            .expect("contract missing");
        assert!(contract.signed);
    }

    #[test]
    fn test_already_signed_contract_rejects_further_signatures() {
        let notifier = Arc::new(RecordingNotifier::default());
        let (service, repository) = setup_with_notifier(notifier);
        add_participant(&repository, "u1", "Ada");
        add_participant(&repository, "u2", "Grace");
        repository.set_signed("c1", true).expect("failed to sign");

        let err = service
            .sign(&CurrentUser::new("u1", "Ada"), sign_command("sig-a"))
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_non_participant_cannot_sign() {
        let notifier = Arc::new(RecordingNotifier::default());
        let (service, repository) = setup_with_notifier(notifier);
        add_participant(&repository, "u1", "Ada");
        add_participant(&repository, "u2", "Grace");

        let err = service
            .sign(&CurrentUser::new("u9", "Eve"), sign_command("sig-e"))
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_empty_signature_blob_is_rejected() {
        let notifier = Arc::new(RecordingNotifier::default());
        let (service, repository) = setup_with_notifier(notifier);
        add_participant(&repository, "u1", "Ada");
        add_participant(&repository, "u2", "Grace");

        let err = service
            .sign(&CurrentUser::new("u1", "Ada"), sign_command("  "))
            .unwrap_err();
        assert!(err.is_validation());
    }
}
