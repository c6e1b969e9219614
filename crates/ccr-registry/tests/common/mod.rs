//! Shared fixtures: a two-player counter application, deterministic
//! participant keys, a manual clock and signing helpers.

#![allow(dead_code)]

use serde::{Deserialize, Serialize};

use ccr_core::{sha256_raw, Address, AppDefinition, AppIdentity, Hash32, ManualClock};
use ccr_crypto::{Ed25519KeyPair, Ed25519Verifier};
use ccr_registry::{
    AdjudicationEngine, AppRegistry, AppStrategy, AppStrategyError, EngineConfig, EventLog,
    InMemoryStore, SignedCancelRequest, SignedUpdate,
};

pub const COUNTER_APP: &str = "counter.v1";
/// Same rules as [`COUNTER_APP`], but terminal once the count reaches 4.
pub const SHORT_COUNTER_APP: &str = "counter-short.v1";
pub const DEFAULT_TIMEOUT: u64 = 50;
pub const START: u64 = 1_000;

// =========================================================================
// Counter application
// =========================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterState {
    pub count: u64,
    pub turn: u64,
}

#[derive(Debug, Serialize, Deserialize)]
struct Increment {
    increment: u64,
}

#[derive(Debug, Serialize, Deserialize)]
struct CounterOutcome {
    final_count: u64,
}

/// Participants take turns adding a positive amount to a shared count.
pub struct CounterApp {
    pub target: u64,
}

impl CounterApp {
    fn decode(state: &[u8]) -> Result<CounterState, AppStrategyError> {
        serde_json::from_slice(state).map_err(|e| AppStrategyError::InvalidState(e.to_string()))
    }
}

impl AppStrategy for CounterApp {
    fn compute_outcome(&self, state: &[u8]) -> Result<Vec<u8>, AppStrategyError> {
        let state = Self::decode(state)?;
        serde_json::to_vec(&CounterOutcome {
            final_count: state.count,
        })
        .map_err(|e| AppStrategyError::InvalidState(e.to_string()))
    }

    fn apply_action(&self, state: &[u8], action: &[u8]) -> Result<Vec<u8>, AppStrategyError> {
        let current = Self::decode(state)?;
        let action: Increment = serde_json::from_slice(action)
            .map_err(|e| AppStrategyError::ActionRejected(e.to_string()))?;
        if action.increment == 0 {
            return Err(AppStrategyError::ActionRejected(
                "increment must be positive".into(),
            ));
        }
        let count = current
            .count
            .checked_add(action.increment)
            .ok_or_else(|| AppStrategyError::ActionRejected("count overflow".into()))?;
        Ok(encode(CounterState {
            count,
            turn: current.turn + 1,
        }))
    }

    fn turn_taker(
        &self,
        state: &[u8],
        participants: &[Address],
    ) -> Result<Address, AppStrategyError> {
        let state = Self::decode(state)?;
        let len = participants.len() as u64;
        if len == 0 {
            return Err(AppStrategyError::InvalidState("no participants".into()));
        }
        Ok(participants[(state.turn % len) as usize])
    }

    fn is_state_terminal(&self, state: &[u8]) -> Result<bool, AppStrategyError> {
        Ok(Self::decode(state)?.count >= self.target)
    }
}

pub fn encode(state: CounterState) -> Vec<u8> {
    serde_json::to_vec(&state).expect("counter state serializes")
}

pub fn state(count: u64, turn: u64) -> Vec<u8> {
    encode(CounterState { count, turn })
}

pub fn increment(n: u64) -> Vec<u8> {
    serde_json::to_vec(&Increment { increment: n }).expect("action serializes")
}

pub fn outcome(final_count: u64) -> Vec<u8> {
    serde_json::to_vec(&CounterOutcome { final_count }).expect("outcome serializes")
}

pub fn counter_apps() -> AppRegistry {
    let mut apps = AppRegistry::new();
    apps.register(AppDefinition::new(COUNTER_APP).unwrap(), CounterApp { target: 100 });
    apps.register(
        AppDefinition::new(SHORT_COUNTER_APP).unwrap(),
        CounterApp { target: 4 },
    );
    apps
}

// =========================================================================
// Harness
// =========================================================================

pub type Engine = AdjudicationEngine<InMemoryStore, ManualClock, Ed25519Verifier>;

pub struct Harness {
    pub p1: Ed25519KeyPair,
    pub p2: Ed25519KeyPair,
    pub clock: ManualClock,
    pub log: EventLog,
    pub engine: Engine,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        let clock = ManualClock::new(START);
        let log = EventLog::new();
        let mut engine = AdjudicationEngine::new(
            InMemoryStore::new(),
            clock.clone(),
            Ed25519Verifier,
            counter_apps(),
        )
        .with_config(config);
        engine.subscribe(log.clone());
        Self {
            p1: Ed25519KeyPair::from_seed(&[1u8; 32]),
            p2: Ed25519KeyPair::from_seed(&[2u8; 32]),
            clock,
            log,
            engine,
        }
    }

    pub fn identity(&self, app: &str, default_timeout: u64) -> AppIdentity {
        AppIdentity::new(
            Address([0xaa; 32]),
            7,
            vec![self.p1.address(), self.p2.address()],
            AppDefinition::new(app).unwrap(),
            default_timeout,
        )
        .unwrap()
    }

    pub fn counter(&self) -> AppIdentity {
        self.identity(COUNTER_APP, DEFAULT_TIMEOUT)
    }

    pub fn now(&self) -> u64 {
        ccr_core::Clock::now(&self.clock)
    }

    /// An update for `state` signed by both participants in order.
    pub fn co_signed(
        &self,
        identity: &AppIdentity,
        state: &[u8],
        version: u64,
        timeout: u64,
    ) -> SignedUpdate {
        self.signed_by(identity, &[&self.p1, &self.p2], sha256_raw(state), version, timeout)
    }

    /// A force-move update for `state` signed by `signer` alone.
    pub fn force_move(
        &self,
        identity: &AppIdentity,
        signer: &Ed25519KeyPair,
        state: &[u8],
        version: u64,
    ) -> SignedUpdate {
        self.signed_by(identity, &[signer], sha256_raw(state), version, 0)
    }

    pub fn signed_by(
        &self,
        identity: &AppIdentity,
        signers: &[&Ed25519KeyPair],
        app_state_hash: Hash32,
        version: u64,
        timeout: u64,
    ) -> SignedUpdate {
        let update = SignedUpdate::unsigned(app_state_hash, version, timeout);
        let digest = update.digest(&identity.instance_id().unwrap()).unwrap();
        let signatures = signers.iter().map(|k| k.sign_digest(&digest)).collect();
        update.with_signatures(signatures)
    }

    /// A cancel request at `version` signed by both participants in order.
    pub fn cancel(&self, identity: &AppIdentity, version: u64) -> SignedCancelRequest {
        let request = SignedCancelRequest::unsigned(version);
        let digest = request.digest(&identity.instance_id().unwrap()).unwrap();
        request.with_signatures(vec![self.p1.sign_digest(&digest), self.p2.sign_digest(&digest)])
    }
}

/// Install a test subscriber once so `RUST_LOG` works under `cargo test`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
