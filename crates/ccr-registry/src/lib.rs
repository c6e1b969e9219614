//! # ccr-registry — State-Channel Challenge Registry
//!
//! The on-chain arbiter of off-chain state channels. When participants stop
//! cooperating, any of them can escalate the latest mutually signed state
//! here; the registry then resolves the instance by timeout, by unilateral
//! force moves of the designated turn-taker, or by unanimous cancellation.
//!
//! ## Lifecycle
//!
//! ```text
//! NO_CHALLENGE ──set_state──▶ IN_DISPUTE ──progress_state──▶ IN_ONCHAIN_PROGRESSION
//!      ▲                         │   ▲                          │      │
//!      └──────cancel_dispute─────┘   └─set_state (supersede)    │      │ terminal state
//!      ▲                                                        │      ▼
//!      └────────────────────────cancel_dispute──────────────────┘  EXPLICITLY_FINALIZED
//!
//! finalized (any of the above, once its window elapses) ──set_outcome──▶ OUTCOME_SET
//! ```
//!
//! ## Collaborators
//!
//! - [`ccr_core::Clock`]: current ledger tick.
//! - [`ccr_crypto::SignatureVerifier`]: ordered signer-set check.
//! - [`AppStrategy`]: per-application rules, resolved through [`AppRegistry`].
//! - [`ChallengeStore`] and [`OutcomeStore`]: persistence.
//!
//! ## Crate Policy
//!
//! - Rejected calls have no side effects and emit no events.
//! - No `unwrap()`/`expect()` outside tests.

pub mod challenge;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod store;
pub mod strategy;
pub mod update;

pub use challenge::{AppChallenge, ChallengeStatus};
pub use config::{ConfigError, EngineConfig};
pub use engine::AdjudicationEngine;
pub use error::{AdjudicationError, Operation};
pub use event::{ChallengeEvent, ChallengeObserver, EventLog};
pub use store::{ChallengeStore, InMemoryStore, OutcomeStore, StoreError};
pub use strategy::{AppRegistry, AppStrategy, AppStrategyError};
pub use update::{
    cancel_digest, set_state_digest, SignedCancelRequest, SignedUpdate, CANCEL_TAG, SET_STATE_TAG,
};
