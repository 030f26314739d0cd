//! Typed repository over the path-addressed realtime store.
//!
//! Centralizes every path the backend touches and all JSON
//! encoding/decoding, so domain services work purely in terms of
//! [`Contract`], [`Participant`] and [`Task`].

use std::sync::Arc;

use log::warn;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::domain::models::{Contract, Participant, Task, WeekSnapshot};

use super::traits::{RealtimeStore, StoreError};

/// Repository giving typed access to contract records.
#[derive(Clone)]
pub struct ContractRepository {
    store: Arc<dyn RealtimeStore>,
}

impl ContractRepository {
    pub fn new(store: Arc<dyn RealtimeStore>) -> Self {
        Self { store }
    }

    pub fn contracts_path() -> &'static str {
        "contracts"
    }

    pub fn contract_path(contract_id: &str) -> String {
        format!("contracts/{contract_id}")
    }

    pub fn name_path(contract_id: &str) -> String {
        format!("contracts/{contract_id}/name")
    }

    pub fn punishment_path(contract_id: &str) -> String {
        format!("contracts/{contract_id}/punishment")
    }

    pub fn end_date_path(contract_id: &str) -> String {
        format!("contracts/{contract_id}/endDate")
    }

    pub fn signed_path(contract_id: &str) -> String {
        format!("contracts/{contract_id}/signed")
    }

    pub fn week_log_path(contract_id: &str) -> String {
        format!("contracts/{contract_id}/weekLog")
    }

    pub fn user_path(contract_id: &str, uid: &str) -> String {
        format!("contracts/{contract_id}/users/{uid}")
    }

    pub fn todos_path(contract_id: &str, uid: &str) -> String {
        format!("contracts/{contract_id}/users/{uid}/todos")
    }

    pub fn todo_path(contract_id: &str, uid: &str, task_id: &str) -> String {
        format!("contracts/{contract_id}/users/{uid}/todos/{task_id}")
    }

    /// Allocate a fresh contract id.
    pub fn new_contract_id(&self) -> String {
        self.store.generate_child_key(Self::contracts_path())
    }

    /// Allocate a fresh task id within one participant's todo map.
    pub fn new_task_id(&self, contract_id: &str, uid: &str) -> String {
        self.store
            .generate_child_key(&Self::todos_path(contract_id, uid))
    }

    fn decode<T: DeserializeOwned>(path: String, value: Value) -> Result<T, StoreError> {
        serde_json::from_value(value).map_err(|source| StoreError::Decode { path, source })
    }

    fn encode<T: Serialize>(path: &str, value: &T) -> Result<Value, StoreError> {
        serde_json::to_value(value)
            .map_err(|err| StoreError::backend(path, format!("failed to encode value: {err}")))
    }

    fn read_typed<T: DeserializeOwned>(&self, path: String) -> Result<Option<T>, StoreError> {
        match self.store.read(&path)? {
            Some(value) => Ok(Some(Self::decode(path, value)?)),
            None => Ok(None),
        }
    }

    fn write_typed<T: Serialize>(&self, path: String, value: &T) -> Result<(), StoreError> {
        let encoded = Self::encode(&path, value)?;
        self.store.write(&path, Some(encoded))
    }

    pub fn load_contract(&self, contract_id: &str) -> Result<Option<Contract>, StoreError> {
        self.read_typed(Self::contract_path(contract_id))
    }

    /// Load every stored contract as `(id, contract)` pairs.
    ///
    /// Records that fail to decode are skipped with a warning rather than
    /// failing the whole listing.
    pub fn load_all_contracts(&self) -> Result<Vec<(String, Contract)>, StoreError> {
        let value = match self.store.read(Self::contracts_path())? {
            Some(value) => value,
            None => return Ok(Vec::new()),
        };
        let entries = match value {
            Value::Object(entries) => entries,
            other => {
                warn!("Contracts root is not an object: {other:?}");
                return Ok(Vec::new());
            }
        };

        let mut contracts = Vec::with_capacity(entries.len());
        for (id, record) in entries {
            match Self::decode::<Contract>(Self::contract_path(&id), record) {
                Ok(contract) => contracts.push((id, contract)),
                Err(err) => warn!("Skipping undecodable contract {id}: {err}"),
            }
        }
        Ok(contracts)
    }

    pub fn save_contract(&self, contract_id: &str, contract: &Contract) -> Result<(), StoreError> {
        self.write_typed(Self::contract_path(contract_id), contract)
    }

    pub fn load_participant(
        &self,
        contract_id: &str,
        uid: &str,
    ) -> Result<Option<Participant>, StoreError> {
        self.read_typed(Self::user_path(contract_id, uid))
    }

    pub fn save_participant(
        &self,
        contract_id: &str,
        uid: &str,
        participant: &Participant,
    ) -> Result<(), StoreError> {
        self.write_typed(Self::user_path(contract_id, uid), participant)
    }

    pub fn delete_participant(&self, contract_id: &str, uid: &str) -> Result<(), StoreError> {
        self.store.write(&Self::user_path(contract_id, uid), None)
    }

    pub fn load_task(
        &self,
        contract_id: &str,
        uid: &str,
        task_id: &str,
    ) -> Result<Option<Task>, StoreError> {
        self.read_typed(Self::todo_path(contract_id, uid, task_id))
    }

    pub fn save_task(&self, contract_id: &str, uid: &str, task: &Task) -> Result<(), StoreError> {
        self.write_typed(Self::todo_path(contract_id, uid, &task.id), task)
    }

    pub fn delete_task(
        &self,
        contract_id: &str,
        uid: &str,
        task_id: &str,
    ) -> Result<(), StoreError> {
        self.store
            .write(&Self::todo_path(contract_id, uid, task_id), None)
    }

    pub fn set_name(&self, contract_id: &str, name: &str) -> Result<(), StoreError> {
        self.write_typed(Self::name_path(contract_id), &name)
    }

    pub fn set_punishment(&self, contract_id: &str, punishment: &str) -> Result<(), StoreError> {
        self.write_typed(Self::punishment_path(contract_id), &punishment)
    }

    pub fn set_end_date(
        &self,
        contract_id: &str,
        end_date: chrono::NaiveDate,
    ) -> Result<(), StoreError> {
        self.write_typed(Self::end_date_path(contract_id), &end_date)
    }

    pub fn set_signed(&self, contract_id: &str, signed: bool) -> Result<(), StoreError> {
        self.write_typed(Self::signed_path(contract_id), &signed)
    }

    pub fn save_week_log(
        &self,
        contract_id: &str,
        week_log: &[WeekSnapshot],
    ) -> Result<(), StoreError> {
        self.write_typed(Self::week_log_path(contract_id), &week_log)
    }
}
