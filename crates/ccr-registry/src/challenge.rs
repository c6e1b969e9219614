//! # Challenge Record and Status
//!
//! One [`AppChallenge`] exists per instance identity. It is created lazily
//! as the zero value, mutated in place by every accepted transition, and
//! reset to zero by cancellation. It is never deleted.
//!
//! ## Design Choice: Validated Enum over Typestate
//!
//! The record is persisted and reloaded on every call, and several
//! operations are legal from more than one status, so the status is a
//! validated enum checked at runtime by the predicates below rather than a
//! typestate.
//!
//! ## Windows
//!
//! With `f = finalizes_at`, `d = default_timeout` and "passed" meaning
//! `deadline <= now`:
//!
//! ```text
//! IN_DISPUTE              [ set_state .. f )      [ f .. f+d )         [ f+d ..
//!                           disputable             progressable         finalized
//!                           cancellable            cancellable
//!
//! IN_ONCHAIN_PROGRESSION  [ progress .. f )       [ f ..
//!                           progressable           finalized
//!                           cancellable
//!
//! EXPLICITLY_FINALIZED    finalized at any time
//! ```

use serde::{Deserialize, Serialize};

use ccr_core::{has_passed, Hash32};

/// Status of a challenge record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChallengeStatus {
    /// No dispute has been raised, or the last one was cancelled.
    #[default]
    NoChallenge,
    /// A mutually signed state was submitted and its window is running.
    InDispute,
    /// A participant force-moved the state on-chain.
    InOnchainProgression,
    /// A progression reached a terminal application state.
    ExplicitlyFinalized,
    /// The outcome was computed and stored. Terminal.
    OutcomeSet,
}

impl ChallengeStatus {
    /// The canonical string name of this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoChallenge => "NO_CHALLENGE",
            Self::InDispute => "IN_DISPUTE",
            Self::InOnchainProgression => "IN_ONCHAIN_PROGRESSION",
            Self::ExplicitlyFinalized => "EXPLICITLY_FINALIZED",
            Self::OutcomeSet => "OUTCOME_SET",
        }
    }

    /// Whether a dispute or progression is open.
    pub fn is_open(&self) -> bool {
        matches!(self, Self::InDispute | Self::InOnchainProgression)
    }

    /// Whether this status is terminal (no further transitions).
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::OutcomeSet)
    }
}

impl std::fmt::Display for ChallengeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The on-chain challenge record of one application instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AppChallenge {
    /// Current status.
    pub status: ChallengeStatus,
    /// Hash of the most recently accepted application state.
    pub app_state_hash: Hash32,
    /// Version of the most recently accepted state.
    pub version_number: u64,
    /// Tick at which the current window elapses.
    pub finalizes_at: u64,
}

impl AppChallenge {
    /// The zero record: `{NO_CHALLENGE, 0, 0, 0}`.
    pub const ZERO: AppChallenge = AppChallenge {
        status: ChallengeStatus::NoChallenge,
        app_state_hash: Hash32::ZERO,
        version_number: 0,
        finalizes_at: 0,
    };

    /// Whether this is exactly the zero record.
    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    /// Whether a new mutually signed state may be submitted.
    ///
    /// `supersede_open_dispute` controls whether an `IN_DISPUTE` record whose
    /// dispute window is still running may be replaced.
    pub fn is_disputable(&self, now: u64, supersede_open_dispute: bool) -> bool {
        match self.status {
            ChallengeStatus::NoChallenge => true,
            ChallengeStatus::InDispute => {
                supersede_open_dispute && !has_passed(self.finalizes_at, now)
            }
            _ => false,
        }
    }

    /// Whether the turn-taker may force-move the state.
    pub fn is_progressable(&self, now: u64, default_timeout: u64) -> bool {
        match self.status {
            ChallengeStatus::InDispute => {
                has_passed(self.finalizes_at, now)
                    && !has_passed(self.response_deadline(default_timeout), now)
            }
            ChallengeStatus::InOnchainProgression => !has_passed(self.finalizes_at, now),
            _ => false,
        }
    }

    /// Whether the state is settled and its outcome may be computed.
    pub fn is_finalized(&self, now: u64, default_timeout: u64) -> bool {
        match self.status {
            ChallengeStatus::ExplicitlyFinalized => true,
            ChallengeStatus::InDispute => {
                has_passed(self.response_deadline(default_timeout), now)
            }
            ChallengeStatus::InOnchainProgression => has_passed(self.finalizes_at, now),
            _ => false,
        }
    }

    /// Whether all participants may jointly cancel the challenge.
    pub fn is_cancellable(&self, now: u64, default_timeout: u64) -> bool {
        self.status.is_open() && !self.is_finalized(now, default_timeout)
    }

    /// End of the response window following an elapsed dispute window.
    fn response_deadline(&self, default_timeout: u64) -> u64 {
        self.finalizes_at.saturating_add(default_timeout)
    }
}
