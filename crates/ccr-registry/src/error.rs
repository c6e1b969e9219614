//! # Adjudication Errors
//!
//! Every failure is synchronous and local: the rejected call leaves the
//! stored challenge and outcome untouched, and the caller resubmits a
//! corrected call.

use thiserror::Error;

use ccr_core::{CanonicalizationError, Hash32, InstanceId};

use crate::challenge::ChallengeStatus;
use crate::store::StoreError;
use crate::strategy::AppStrategyError;

/// Registry operations, used in errors, logs and metric labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    SetState,
    ProgressState,
    CancelDispute,
    SetAndProgressState,
    SetOutcome,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SetState => "set_state",
            Self::ProgressState => "progress_state",
            Self::CancelDispute => "cancel_dispute",
            Self::SetAndProgressState => "set_and_progress_state",
            Self::SetOutcome => "set_outcome",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors returned by the adjudication engine.
#[derive(Error, Debug)]
pub enum AdjudicationError {
    /// The challenge is not in a status the operation accepts.
    #[error("{operation} not allowed in status {status}: {reason}")]
    InvalidStateTransition {
        status: ChallengeStatus,
        operation: Operation,
        reason: String,
    },

    /// The signature set does not satisfy the operation's signer requirement.
    #[error("signature mismatch: {0}")]
    SignatureMismatch(String),

    /// The supplied version violates the versioning rule of the operation.
    #[error("stale or invalid version: stored {stored}, supplied {supplied}")]
    StaleOrInvalidVersion { stored: u64, supplied: u64 },

    /// Supplied or computed state bytes do not hash to the expected value.
    #[error("state hash mismatch: expected {expected}, got {actual}")]
    StateHashMismatch { expected: Hash32, actual: Hash32 },

    /// The application strategy rejected the call.
    #[error("app strategy failure: {0}")]
    AppStrategy(#[from] AppStrategyError),

    /// No outcome has been stored for the instance.
    #[error("outcome not set for {0}")]
    OutcomeNotSet(InstanceId),

    #[error("canonicalization failed: {0}")]
    Canonicalization(#[from] CanonicalizationError),

    #[error("storage error: {0}")]
    Storage(#[from] StoreError),
}

impl AdjudicationError {
    /// Stable label for the `kind` metric dimension.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidStateTransition { .. } => "invalid_state_transition",
            Self::SignatureMismatch(_) => "signature_mismatch",
            Self::StaleOrInvalidVersion { .. } => "stale_or_invalid_version",
            Self::StateHashMismatch { .. } => "state_hash_mismatch",
            Self::AppStrategy(_) => "app_strategy",
            Self::OutcomeNotSet(_) => "outcome_not_set",
            Self::Canonicalization(_) => "canonicalization",
            Self::Storage(_) => "storage",
        }
    }
}
