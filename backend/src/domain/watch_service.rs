//! Typed change subscriptions over the realtime store.
//!
//! The original client subscribed to four paths per contract and pushed
//! raw snapshots straight into render state. Here each path gets its own
//! typed event stream and its own unsubscribe handle; the four
//! subscriptions are logically independent and can be cancelled
//! separately.

use std::sync::Arc;

use log::warn;
use serde_json::Value;

use crate::domain::models::{Contract, WeekSnapshot};
use crate::storage::{ContractRepository, RealtimeStore, StoreError, Subscription};

/// Structured change event delivered to a watch listener.
#[derive(Debug, Clone, PartialEq)]
pub enum ContractEvent {
    /// Whole contract document changed; `None` means it was deleted or
    /// does not exist yet
    Contract(Option<Contract>),
    /// The signed flag changed (absent reads as false)
    Signed(bool),
    /// The punishment text changed (absent reads as empty)
    Punishment(String),
    /// The week log changed (absent reads as empty)
    WeekLog(Vec<WeekSnapshot>),
}

/// Service exposing per-contract change listeners.
#[derive(Clone)]
pub struct ContractWatchService {
    store: Arc<dyn RealtimeStore>,
}

impl ContractWatchService {
    pub fn new(store: Arc<dyn RealtimeStore>) -> Self {
        Self { store }
    }

    fn subscribe_mapped(
        &self,
        path: String,
        map: impl Fn(Option<Value>) -> ContractEvent + Send + Sync + 'static,
        listener: impl Fn(ContractEvent) + Send + Sync + 'static,
    ) -> Result<Subscription, StoreError> {
        self.store
            .subscribe(&path, Box::new(move |value| listener(map(value))))
    }

    /// Watch the whole contract document.
    pub fn watch_contract(
        &self,
        contract_id: &str,
        listener: impl Fn(ContractEvent) + Send + Sync + 'static,
    ) -> Result<Subscription, StoreError> {
        let path = ContractRepository::contract_path(contract_id);
        self.subscribe_mapped(
            path.clone(),
            move |value| {
                let contract = value.and_then(|value| {
                    match serde_json::from_value::<Contract>(value) {
                        Ok(contract) => Some(contract),
                        Err(err) => {
                            warn!("Undecodable contract snapshot at '{path}': {err}");
                            None
                        }
                    }
                });
                ContractEvent::Contract(contract)
            },
            listener,
        )
    }

    /// Watch only the signed flag.
    pub fn watch_signed(
        &self,
        contract_id: &str,
        listener: impl Fn(ContractEvent) + Send + Sync + 'static,
    ) -> Result<Subscription, StoreError> {
        self.subscribe_mapped(
            ContractRepository::signed_path(contract_id),
            |value| ContractEvent::Signed(value.and_then(|v| v.as_bool()).unwrap_or(false)),
            listener,
        )
    }

    /// Watch only the punishment text.
    pub fn watch_punishment(
        &self,
        contract_id: &str,
        listener: impl Fn(ContractEvent) + Send + Sync + 'static,
    ) -> Result<Subscription, StoreError> {
        self.subscribe_mapped(
            ContractRepository::punishment_path(contract_id),
            |value| {
                let punishment = value
                    .as_ref()
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                ContractEvent::Punishment(punishment)
            },
            listener,
        )
    }

    /// Watch only the week log.
    pub fn watch_week_log(
        &self,
        contract_id: &str,
        listener: impl Fn(ContractEvent) + Send + Sync + 'static,
    ) -> Result<Subscription, StoreError> {
        let path = ContractRepository::week_log_path(contract_id);
        self.subscribe_mapped(
            path.clone(),
            move |value| {
                let week_log = value
                    .map(|value| match serde_json::from_value(value) {
                        Ok(week_log) => week_log,
                        Err(err) => {
                            warn!("Undecodable week log at '{path}': {err}");
                            Vec::new()
                        }
                    })
                    .unwrap_or_default();
                ContractEvent::WeekLog(week_log)
            },
            listener,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{Contract, Participant};
    use crate::storage::MemoryStore;
    use chrono::NaiveDate;
    use std::sync::Mutex;

    fn setup() -> (ContractWatchService, ContractRepository) {
        let store = Arc::new(MemoryStore::new());
        (
            ContractWatchService::new(store.clone()),
            ContractRepository::new(store),
        )
    }

    fn collect() -> (Arc<Mutex<Vec<ContractEvent>>>, impl Fn(ContractEvent) + Send + Sync) {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        (events, move |event| sink.lock().unwrap().push(event))
    }

    #[test]
    fn test_watch_signed_fires_with_current_then_changed_value() {
        let (service, repository) = setup();
        let (events, listener) = collect();

        let _sub = service.watch_signed("c1", listener).expect("subscribe failed");
        repository.set_signed("c1", true).expect("write failed");

        let events = events.lock().unwrap();
        assert_eq!(
            *events,
            vec![ContractEvent::Signed(false), ContractEvent::Signed(true)]
        );
    }

    #[test]
    fn test_watch_contract_decodes_document_and_reports_absence() {
        let (service, repository) = setup();
        let (events, listener) = collect();

        let _sub = service.watch_contract("c1", listener).expect("subscribe failed");

        let mut contract = Contract::new(NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());
        contract
            .users
            .insert("u1".to_string(), Participant::new("Ada"));
        repository.save_contract("c1", &contract).expect("save failed");

        let events = events.lock().unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0], ContractEvent::Contract(None));
        assert_eq!(events[1], ContractEvent::Contract(Some(contract)));
    }

    #[test]
    fn test_watch_punishment_is_independent_of_signed_watch() {
        let (service, repository) = setup();
        let (punishment_events, punishment_listener) = collect();
        let (signed_events, signed_listener) = collect();

        let punishment_sub = service
            .watch_punishment("c1", punishment_listener)
            .expect("subscribe failed");
        let _signed_sub = service
            .watch_signed("c1", signed_listener)
            .expect("subscribe failed");

        punishment_sub.unsubscribe();
        repository
            .set_punishment("c1", "cold showers")
            .expect("write failed");
        repository.set_signed("c1", true).expect("write failed");

        // Cancelled watch saw only its initial fire
        assert_eq!(punishment_events.lock().unwrap().len(), 1);
        // Sibling watch kept going
        assert_eq!(signed_events.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_watch_week_log_decodes_snapshots() {
        let (service, repository) = setup();
        let (events, listener) = collect();

        let _sub = service.watch_week_log("c1", listener).expect("subscribe failed");

        let snapshot = crate::domain::models::WeekSnapshot {
            week: NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(),
            users: Default::default(),
        };
        repository
            .save_week_log("c1", std::slice::from_ref(&snapshot))
            .expect("save failed");

        let events = events.lock().unwrap();
        assert_eq!(events[0], ContractEvent::WeekLog(Vec::new()));
        assert_eq!(events[1], ContractEvent::WeekLog(vec![snapshot]));
    }
}
