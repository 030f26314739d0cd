//! Outbound seam to the mail-sending collaborator.
//!
//! The core never talks SMTP or HTTP itself; it hands a participant
//! snapshot to whatever notifier the embedder injects. Delivery is best
//! effort: the signature service logs a failed notification and moves on
//! without rolling back the signed state.

use std::collections::BTreeMap;

use anyhow::Result;
use log::info;

use crate::domain::models::Participant;

/// Collaborator notified when a contract reaches full signature quorum.
pub trait SignedNotifier: Send + Sync {
    /// Called once per OPEN -> SIGNED transition with a snapshot of all
    /// participants at the moment of signing.
    fn notify_contract_signed(
        &self,
        contract_id: &str,
        participants: &BTreeMap<String, Participant>,
    ) -> Result<()>;
}

/// Notifier that only logs, for embedders with no mail endpoint wired up.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogOnlyNotifier;

impl SignedNotifier for LogOnlyNotifier {
    fn notify_contract_signed(
        &self,
        contract_id: &str,
        participants: &BTreeMap<String, Participant>,
    ) -> Result<()> {
        info!(
            "📧 No mail endpoint configured, skipping contract-signed emails for {} ({} participants)",
            contract_id,
            participants.len()
        );
        Ok(())
    }
}
