//! # Adjudication Engine
//!
//! The five registry operations over an injected store, clock, signature
//! verifier and application registry.
//!
//! ## Commit Discipline
//!
//! Every operation loads the stored record into a working copy, runs all
//! of its checks against that copy, and writes once at the end. The checks
//! (`plan_*`) take `&self` and cannot touch the store, so a rejected call
//! has no side effects. [`AdjudicationEngine::set_and_progress_state`]
//! threads one working copy through both steps and commits once.
//!
//! ## Signer Rules
//!
//! | Operation        | Digest     | Required signers                    |
//! |------------------|------------|-------------------------------------|
//! | `set_state`      | set-state  | every participant, in order         |
//! | `progress_state` | set-state  | the strategy's turn-taker, alone    |
//! | `cancel_dispute` | cancel     | every participant, in order         |

use ccr_core::{deadline_after, sha256_raw, Address, AppIdentity, Clock, InstanceId, Signature};
use ccr_crypto::SignatureVerifier;

use crate::challenge::{AppChallenge, ChallengeStatus};
use crate::config::EngineConfig;
use crate::error::{AdjudicationError, Operation};
use crate::event::{ChallengeEvent, ChallengeObserver};
use crate::store::{ChallengeStore, OutcomeStore};
use crate::strategy::{AppRegistry, AppStrategyError};
use crate::update::{SignedCancelRequest, SignedUpdate};

/// Result of a checked force move, not yet committed.
struct Progression {
    challenge: AppChallenge,
    turn_taker: Address,
    signature: Signature,
}

/// The challenge registry.
pub struct AdjudicationEngine<S, C, V> {
    store: S,
    clock: C,
    verifier: V,
    apps: AppRegistry,
    config: EngineConfig,
    observers: Vec<Box<dyn ChallengeObserver>>,
}

impl<S, C, V> AdjudicationEngine<S, C, V>
where
    S: ChallengeStore + OutcomeStore,
    C: Clock,
    V: SignatureVerifier,
{
    /// Create an engine with the default configuration.
    pub fn new(store: S, clock: C, verifier: V, apps: AppRegistry) -> Self {
        Self {
            store,
            clock,
            verifier,
            apps,
            config: EngineConfig::default(),
            observers: Vec::new(),
        }
    }

    /// Replace the configuration.
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Register an observer for committed transitions.
    pub fn subscribe(&mut self, observer: impl ChallengeObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn apps(&self) -> &AppRegistry {
        &self.apps
    }

    // ── Operations ──────────────────────────────────────────────────────

    /// Open (or, if the policy allows, supersede) a dispute with a state
    /// signed by every participant.
    pub fn set_state(
        &mut self,
        identity: &AppIdentity,
        req: &SignedUpdate,
    ) -> Result<AppChallenge, AdjudicationError> {
        let op = Operation::SetState;
        let (instance, next) = self
            .load(identity)
            .and_then(|(instance, current)| {
                let next = self.plan_set_state(identity, &instance, current, req)?;
                Ok((instance, next))
            })
            .map_err(|e| self.reject(op, identity, e))?;

        self.store.store_challenge(instance, next);
        self.commit(
            op,
            &instance,
            &next,
            vec![ChallengeEvent::ChallengeUpdated {
                instance,
                challenge: next,
            }],
        );
        Ok(next)
    }

    /// Force-move the state by applying `action` to `old_state`, signed by
    /// the turn-taker alone.
    pub fn progress_state(
        &mut self,
        identity: &AppIdentity,
        req: &SignedUpdate,
        old_state: &[u8],
        action: &[u8],
    ) -> Result<AppChallenge, AdjudicationError> {
        let op = Operation::ProgressState;
        let (instance, progression) = self
            .load(identity)
            .and_then(|(instance, current)| {
                let progression =
                    self.plan_progress_state(identity, &instance, current, req, old_state, action)?;
                Ok((instance, progression))
            })
            .map_err(|e| self.reject(op, identity, e))?;

        let next = progression.challenge;
        self.store.store_challenge(instance, next);
        self.commit(op, &instance, &next, progression_events(instance, progression, action));
        Ok(next)
    }

    /// Reset an open challenge to the zero record on unanimous request.
    pub fn cancel_dispute(
        &mut self,
        identity: &AppIdentity,
        req: &SignedCancelRequest,
    ) -> Result<AppChallenge, AdjudicationError> {
        let op = Operation::CancelDispute;
        let (instance, cancelled_version) = self
            .load(identity)
            .and_then(|(instance, current)| {
                self.plan_cancel_dispute(identity, &instance, current, req)?;
                Ok((instance, current.version_number))
            })
            .map_err(|e| self.reject(op, identity, e))?;

        let next = AppChallenge::ZERO;
        self.store.store_challenge(instance, next);
        self.commit(
            op,
            &instance,
            &next,
            vec![
                ChallengeEvent::DisputeCancelled {
                    instance,
                    version_number: cancelled_version,
                },
                ChallengeEvent::ChallengeUpdated {
                    instance,
                    challenge: next,
                },
            ],
        );
        Ok(next)
    }

    /// Open a zero-timeout dispute and force-move it in a single call.
    ///
    /// `set_req.timeout` must be zero. Nothing is written unless both steps
    /// succeed.
    ///
    /// Observers receive the events of both steps, so the first
    /// [`ChallengeEvent::ChallengeUpdated`] carries the intermediate
    /// `IN_DISPUTE` record. That record is never stored; only the
    /// progressed record is visible through
    /// [`get_app_challenge`](Self::get_app_challenge).
    pub fn set_and_progress_state(
        &mut self,
        identity: &AppIdentity,
        set_req: &SignedUpdate,
        progress_req: &SignedUpdate,
        old_state: &[u8],
        action: &[u8],
    ) -> Result<AppChallenge, AdjudicationError> {
        let op = Operation::SetAndProgressState;
        let (instance, disputed, progression) = self
            .load(identity)
            .and_then(|(instance, current)| {
                if set_req.timeout != 0 {
                    return Err(AdjudicationError::InvalidStateTransition {
                        status: current.status,
                        operation: op,
                        reason: format!(
                            "set-state timeout must be zero, got {}",
                            set_req.timeout
                        ),
                    });
                }
                let disputed = self.plan_set_state(identity, &instance, current, set_req)?;
                let progression = self.plan_progress_state(
                    identity,
                    &instance,
                    disputed,
                    progress_req,
                    old_state,
                    action,
                )?;
                Ok((instance, disputed, progression))
            })
            .map_err(|e| self.reject(op, identity, e))?;

        let next = progression.challenge;
        self.store.store_challenge(instance, next);
        let mut events = vec![ChallengeEvent::ChallengeUpdated {
            instance,
            challenge: disputed,
        }];
        events.extend(progression_events(instance, progression, action));
        self.commit(op, &instance, &next, events);
        Ok(next)
    }

    /// Compute and store the outcome of a finalized state.
    ///
    /// Returns the stored outcome bytes.
    pub fn set_outcome(
        &mut self,
        identity: &AppIdentity,
        final_state: &[u8],
    ) -> Result<Vec<u8>, AdjudicationError> {
        let op = Operation::SetOutcome;
        let (instance, current, outcome) = self
            .load(identity)
            .and_then(|(instance, current)| {
                let outcome = self.plan_set_outcome(identity, &instance, current, final_state)?;
                Ok((instance, current, outcome))
            })
            .map_err(|e| self.reject(op, identity, e))?;

        self.store
            .store_outcome(instance, outcome.clone())
            .map_err(|e| self.reject(op, identity, e.into()))?;
        let next = AppChallenge {
            status: ChallengeStatus::OutcomeSet,
            ..current
        };
        self.store.store_challenge(instance, next);
        self.commit(
            op,
            &instance,
            &next,
            vec![
                ChallengeEvent::OutcomeSet {
                    instance,
                    outcome: outcome.clone(),
                },
                ChallengeEvent::ChallengeUpdated {
                    instance,
                    challenge: next,
                },
            ],
        );
        Ok(outcome)
    }

    // ── Accessors ───────────────────────────────────────────────────────

    /// The stored record, or the zero record if none exists.
    pub fn get_app_challenge(&self, instance: &InstanceId) -> AppChallenge {
        self.store.load_challenge(instance)
    }

    /// The resolved outcome.
    ///
    /// # Errors
    ///
    /// [`AdjudicationError::OutcomeNotSet`] if the instance was never
    /// resolved. An outcome of zero bytes is returned as `Ok(vec![])`.
    pub fn get_outcome(&self, instance: &InstanceId) -> Result<Vec<u8>, AdjudicationError> {
        self.store
            .load_outcome(instance)
            .ok_or(AdjudicationError::OutcomeNotSet(*instance))
    }

    pub fn is_outcome_set(&self, instance: &InstanceId) -> bool {
        self.store.load_outcome(instance).is_some()
    }

    /// Whether `set_outcome` would currently pass its status check.
    pub fn is_state_finalized(&self, identity: &AppIdentity) -> Result<bool, AdjudicationError> {
        let (_, current) = self.load(identity)?;
        Ok(current.is_finalized(self.clock.now(), identity.default_timeout))
    }

    // ── Checks ──────────────────────────────────────────────────────────

    fn load(&self, identity: &AppIdentity) -> Result<(InstanceId, AppChallenge), AdjudicationError> {
        let instance = identity.instance_id()?;
        Ok((instance, self.store.load_challenge(&instance)))
    }

    fn plan_set_state(
        &self,
        identity: &AppIdentity,
        instance: &InstanceId,
        current: AppChallenge,
        req: &SignedUpdate,
    ) -> Result<AppChallenge, AdjudicationError> {
        let now = self.clock.now();
        let participants = identity.participants();
        tracing::debug!(
            %instance,
            status = %current.status,
            finalizes_at = current.finalizes_at,
            now,
            "checking set_state"
        );

        if participants.len() > self.config.max_participants {
            return Err(AdjudicationError::SignatureMismatch(format!(
                "{} participants exceeds the limit of {}",
                participants.len(),
                self.config.max_participants
            )));
        }
        if !current.is_disputable(now, self.config.supersede_open_dispute) {
            let reason = match current.status {
                ChallengeStatus::InDispute if !self.config.supersede_open_dispute => {
                    "an open dispute cannot be superseded"
                }
                ChallengeStatus::InDispute => "dispute window has elapsed",
                _ => "challenge is not disputable",
            };
            return Err(AdjudicationError::InvalidStateTransition {
                status: current.status,
                operation: Operation::SetState,
                reason: reason.into(),
            });
        }

        let digest = req.digest(instance)?;
        if !self.verifier.verify(&req.signatures, &digest, participants) {
            return Err(AdjudicationError::SignatureMismatch(format!(
                "expected one signature per participant in order ({} participants, {} signatures)",
                participants.len(),
                req.signatures.len()
            )));
        }
        if req.version_number <= current.version_number {
            return Err(AdjudicationError::StaleOrInvalidVersion {
                stored: current.version_number,
                supplied: req.version_number,
            });
        }

        Ok(AppChallenge {
            status: ChallengeStatus::InDispute,
            app_state_hash: req.app_state_hash,
            version_number: req.version_number,
            finalizes_at: deadline_after(now, req.timeout),
        })
    }

    fn plan_progress_state(
        &self,
        identity: &AppIdentity,
        instance: &InstanceId,
        current: AppChallenge,
        req: &SignedUpdate,
        old_state: &[u8],
        action: &[u8],
    ) -> Result<Progression, AdjudicationError> {
        let now = self.clock.now();
        let default_timeout = identity.default_timeout;
        tracing::debug!(
            %instance,
            status = %current.status,
            finalizes_at = current.finalizes_at,
            default_timeout,
            now,
            "checking progress_state"
        );

        if !current.is_progressable(now, default_timeout) {
            let reason = match current.status {
                ChallengeStatus::InDispute if now < current.finalizes_at => {
                    "dispute window has not elapsed"
                }
                ChallengeStatus::InDispute | ChallengeStatus::InOnchainProgression => {
                    "response window has elapsed"
                }
                _ => "challenge is not progressable",
            };
            return Err(AdjudicationError::InvalidStateTransition {
                status: current.status,
                operation: Operation::ProgressState,
                reason: reason.into(),
            });
        }

        let old_hash = sha256_raw(old_state);
        if old_hash != current.app_state_hash {
            return Err(AdjudicationError::StateHashMismatch {
                expected: current.app_state_hash,
                actual: old_hash,
            });
        }

        let strategy = self.apps.resolve(&identity.app_definition)?;
        let turn_taker = strategy.turn_taker(old_state, identity.participants())?;
        if !identity.is_participant(&turn_taker) {
            return Err(AppStrategyError::TurnTakerNotParticipant(turn_taker).into());
        }

        let signature = match req.signatures.as_slice() {
            [signature] => signature,
            other => {
                return Err(AdjudicationError::SignatureMismatch(format!(
                    "expected exactly one signature by the turn taker, got {}",
                    other.len()
                )))
            }
        };
        let digest = req.digest(instance)?;
        if !self.verifier.verify(
            std::slice::from_ref(signature),
            &digest,
            std::slice::from_ref(&turn_taker),
        ) {
            return Err(AdjudicationError::SignatureMismatch(format!(
                "signature is not by turn taker {turn_taker}"
            )));
        }

        let new_state = strategy.apply_action(old_state, action)?;
        let new_hash = sha256_raw(&new_state);
        if new_hash != req.app_state_hash {
            return Err(AdjudicationError::StateHashMismatch {
                expected: req.app_state_hash,
                actual: new_hash,
            });
        }
        if current.version_number.checked_add(1) != Some(req.version_number) {
            return Err(AdjudicationError::StaleOrInvalidVersion {
                stored: current.version_number,
                supplied: req.version_number,
            });
        }

        let status = if strategy.is_state_terminal(&new_state)? {
            ChallengeStatus::ExplicitlyFinalized
        } else {
            ChallengeStatus::InOnchainProgression
        };
        Ok(Progression {
            challenge: AppChallenge {
                status,
                app_state_hash: new_hash,
                version_number: req.version_number,
                finalizes_at: deadline_after(now, default_timeout),
            },
            turn_taker,
            signature: signature.clone(),
        })
    }

    fn plan_cancel_dispute(
        &self,
        identity: &AppIdentity,
        instance: &InstanceId,
        current: AppChallenge,
        req: &SignedCancelRequest,
    ) -> Result<(), AdjudicationError> {
        let now = self.clock.now();
        let default_timeout = identity.default_timeout;
        tracing::debug!(
            %instance,
            status = %current.status,
            finalizes_at = current.finalizes_at,
            now,
            "checking cancel_dispute"
        );

        if !current.is_cancellable(now, default_timeout) {
            let reason = if current.status.is_open() {
                "challenge is already finalized"
            } else {
                "no open challenge to cancel"
            };
            return Err(AdjudicationError::InvalidStateTransition {
                status: current.status,
                operation: Operation::CancelDispute,
                reason: reason.into(),
            });
        }

        let participants = identity.participants();
        let digest = req.digest(instance)?;
        if !self.verifier.verify(&req.signatures, &digest, participants) {
            return Err(AdjudicationError::SignatureMismatch(format!(
                "cancellation requires every participant in order ({} participants, {} signatures)",
                participants.len(),
                req.signatures.len()
            )));
        }
        if req.version_number != current.version_number {
            return Err(AdjudicationError::StaleOrInvalidVersion {
                stored: current.version_number,
                supplied: req.version_number,
            });
        }
        Ok(())
    }

    fn plan_set_outcome(
        &self,
        identity: &AppIdentity,
        instance: &InstanceId,
        current: AppChallenge,
        final_state: &[u8],
    ) -> Result<Vec<u8>, AdjudicationError> {
        let now = self.clock.now();
        tracing::debug!(
            %instance,
            status = %current.status,
            finalizes_at = current.finalizes_at,
            now,
            "checking set_outcome"
        );

        if current.status.is_terminal() || self.store.load_outcome(instance).is_some() {
            return Err(AdjudicationError::InvalidStateTransition {
                status: current.status,
                operation: Operation::SetOutcome,
                reason: "outcome already set".into(),
            });
        }
        if !current.is_finalized(now, identity.default_timeout) {
            return Err(AdjudicationError::InvalidStateTransition {
                status: current.status,
                operation: Operation::SetOutcome,
                reason: "challenge is not finalized".into(),
            });
        }

        let final_hash = sha256_raw(final_state);
        if final_hash != current.app_state_hash {
            return Err(AdjudicationError::StateHashMismatch {
                expected: current.app_state_hash,
                actual: final_hash,
            });
        }

        let strategy = self.apps.resolve(&identity.app_definition)?;
        Ok(strategy.compute_outcome(final_state)?)
    }

    // ── Bookkeeping ─────────────────────────────────────────────────────

    fn commit(
        &self,
        op: Operation,
        instance: &InstanceId,
        challenge: &AppChallenge,
        events: Vec<ChallengeEvent>,
    ) {
        tracing::info!(
            op = op.as_str(),
            %instance,
            status = %challenge.status,
            version = challenge.version_number,
            finalizes_at = challenge.finalizes_at,
            "challenge transition committed"
        );
        metrics::counter!("ccr_transitions_total", "op" => op.as_str()).increment(1);
        for event in &events {
            for observer in &self.observers {
                observer.on_event(event);
            }
        }
    }

    fn reject(
        &self,
        op: Operation,
        identity: &AppIdentity,
        err: AdjudicationError,
    ) -> AdjudicationError {
        tracing::warn!(
            op = op.as_str(),
            app = %identity.app_definition,
            channel_nonce = identity.channel_nonce,
            kind = err.kind(),
            error = %err,
            "registry call rejected"
        );
        metrics::counter!(
            "ccr_rejections_total",
            "op" => op.as_str(),
            "kind" => err.kind()
        )
        .increment(1);
        err
    }
}

fn progression_events(
    instance: InstanceId,
    progression: Progression,
    action: &[u8],
) -> Vec<ChallengeEvent> {
    vec![
        ChallengeEvent::StateProgressed {
            instance,
            turn_taker: progression.turn_taker,
            action: action.to_vec(),
            signature: progression.signature,
        },
        ChallengeEvent::ChallengeUpdated {
            instance,
            challenge: progression.challenge,
        },
    ]
}

impl<S, C, V> std::fmt::Debug for AdjudicationEngine<S, C, V>
where
    S: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdjudicationEngine")
            .field("store", &self.store)
            .field("apps", &self.apps)
            .field("config", &self.config)
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}
