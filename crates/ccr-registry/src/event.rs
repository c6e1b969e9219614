//! # Challenge Notifications
//!
//! Every committed transition produces a [`ChallengeEvent::ChallengeUpdated`]
//! carrying the record as written. Progression, cancellation and outcome
//! resolution precede it with their own audit event. The engine delivers
//! events to each subscribed [`ChallengeObserver`] after the store write,
//! so observers never see a transition that was rolled back.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;

use ccr_core::{Address, InstanceId, Signature};

use crate::challenge::AppChallenge;

/// A committed registry transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ChallengeEvent {
    /// A transition stored a new challenge record.
    ChallengeUpdated {
        instance: InstanceId,
        challenge: AppChallenge,
    },
    /// `progress_state` applied an action.
    StateProgressed {
        instance: InstanceId,
        turn_taker: Address,
        #[serde(with = "bytes_hex")]
        action: Vec<u8>,
        signature: Signature,
    },
    /// `cancel_dispute` reset the record.
    DisputeCancelled {
        instance: InstanceId,
        version_number: u64,
    },
    /// `set_outcome` stored the outcome.
    OutcomeSet {
        instance: InstanceId,
        #[serde(with = "bytes_hex")]
        outcome: Vec<u8>,
    },
}

impl ChallengeEvent {
    /// The instance the event concerns.
    pub fn instance(&self) -> &InstanceId {
        match self {
            Self::ChallengeUpdated { instance, .. }
            | Self::StateProgressed { instance, .. }
            | Self::DisputeCancelled { instance, .. }
            | Self::OutcomeSet { instance, .. } => instance,
        }
    }

    /// Short name used in log fields.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ChallengeUpdated { .. } => "challenge_updated",
            Self::StateProgressed { .. } => "state_progressed",
            Self::DisputeCancelled { .. } => "dispute_cancelled",
            Self::OutcomeSet { .. } => "outcome_set",
        }
    }
}

mod bytes_hex {
    use serde::Serializer;

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&ccr_core::encoding::to_hex(bytes))
    }
}

/// Receiver of committed transitions.
pub trait ChallengeObserver: Send + Sync {
    fn on_event(&self, event: &ChallengeEvent);
}

impl<F> ChallengeObserver for F
where
    F: Fn(&ChallengeEvent) + Send + Sync,
{
    fn on_event(&self, event: &ChallengeEvent) {
        self(event)
    }
}

/// Observer that records every event it receives.
///
/// Clones share the same log.
#[derive(Debug, Default, Clone)]
pub struct EventLog {
    events: Arc<Mutex<Vec<ChallengeEvent>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the recorded events, oldest first.
    pub fn events(&self) -> Vec<ChallengeEvent> {
        self.events.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    /// Take every recorded event, leaving the log empty.
    pub fn drain(&self) -> Vec<ChallengeEvent> {
        std::mem::take(&mut *self.events.lock())
    }
}

impl ChallengeObserver for EventLog {
    fn on_event(&self, event: &ChallengeEvent) {
        self.events.lock().push(event.clone());
    }
}
