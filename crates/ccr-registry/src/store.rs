//! # Challenge and Outcome Stores
//!
//! Persistence is an opaque key-value mapping injected into the engine:
//! `InstanceId → AppChallenge` and `InstanceId → outcome bytes`. The engine
//! performs every check before writing, so a store only ever sees committed
//! values.

use std::collections::HashMap;

use thiserror::Error;

use ccr_core::InstanceId;

use crate::challenge::AppChallenge;

/// Errors raised by a store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Outcomes are write-once.
    #[error("outcome already set for {0}")]
    OutcomeAlreadySet(InstanceId),
}

/// Mapping from instance identity to its challenge record.
pub trait ChallengeStore {
    /// The stored record, or [`AppChallenge::ZERO`] if none was ever written.
    fn load_challenge(&self, instance: &InstanceId) -> AppChallenge;

    /// Overwrite the record for `instance`.
    fn store_challenge(&mut self, instance: InstanceId, challenge: AppChallenge);
}

/// Write-once mapping from instance identity to resolved outcome bytes.
pub trait OutcomeStore {
    /// The stored outcome, or `None` if the instance was never resolved.
    fn load_outcome(&self, instance: &InstanceId) -> Option<Vec<u8>>;

    /// Store the outcome for `instance`.
    ///
    /// # Errors
    ///
    /// [`StoreError::OutcomeAlreadySet`] if an outcome exists already.
    fn store_outcome(&mut self, instance: InstanceId, outcome: Vec<u8>) -> Result<(), StoreError>;
}

/// In-memory store backing both mappings.
#[derive(Debug, Default, Clone)]
pub struct InMemoryStore {
    challenges: HashMap<InstanceId, AppChallenge>,
    outcomes: HashMap<InstanceId, Vec<u8>>,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of instances with a written challenge record.
    pub fn challenge_count(&self) -> usize {
        self.challenges.len()
    }

    /// Number of resolved instances.
    pub fn outcome_count(&self) -> usize {
        self.outcomes.len()
    }
}

impl ChallengeStore for InMemoryStore {
    fn load_challenge(&self, instance: &InstanceId) -> AppChallenge {
        self.challenges.get(instance).copied().unwrap_or_default()
    }

    fn store_challenge(&mut self, instance: InstanceId, challenge: AppChallenge) {
        self.challenges.insert(instance, challenge);
    }
}

impl OutcomeStore for InMemoryStore {
    fn load_outcome(&self, instance: &InstanceId) -> Option<Vec<u8>> {
        self.outcomes.get(instance).cloned()
    }

    fn store_outcome(&mut self, instance: InstanceId, outcome: Vec<u8>) -> Result<(), StoreError> {
        match self.outcomes.entry(instance) {
            std::collections::hash_map::Entry::Occupied(_) => {
                Err(StoreError::OutcomeAlreadySet(instance))
            }
            std::collections::hash_map::Entry::Vacant(slot) => {
                slot.insert(outcome);
                Ok(())
            }
        }
    }
}
