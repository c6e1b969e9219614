//! # Registry Invariants
//!
//! Random operation sequences against one instance. Whatever mix of valid
//! and invalid calls arrives, accepted transitions respect the versioning
//! rules and rejected calls leave no trace.

mod common;

use proptest::prelude::*;

use ccr_registry::{AdjudicationError, AppChallenge, ChallengeStatus};
use common::{increment, state, CounterState, Harness, DEFAULT_TIMEOUT};

#[derive(Debug, Clone)]
enum Step {
    Set {
        count: u64,
        version: u64,
        timeout: u64,
        co_signed: bool,
    },
    Progress {
        version_delta: u64,
        amount: u64,
        by_p1: bool,
    },
    Cancel {
        version: u64,
    },
    Outcome,
    Advance(u64),
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        (0..20u64, 0..8u64, 0..120u64, any::<bool>()).prop_map(
            |(count, version, timeout, co_signed)| Step::Set {
                count,
                version,
                timeout,
                co_signed,
            }
        ),
        (0..3u64, 0..4u64, any::<bool>()).prop_map(|(version_delta, amount, by_p1)| {
            Step::Progress {
                version_delta,
                amount,
                by_p1,
            }
        }),
        (0..8u64).prop_map(|version| Step::Cancel { version }),
        Just(Step::Outcome),
        (0..80u64).prop_map(Step::Advance),
    ]
}

/// Runs `steps`, checking the invariants after every call.
fn run(steps: &[Step]) -> Result<(), TestCaseError> {
    let mut h = Harness::new();
    let id = h.counter();
    let instance = id.instance_id().unwrap();
    // Off-chain copy of the state the record currently commits to.
    let mut latest: Option<CounterState> = None;

    for step in steps {
        let before = h.engine.get_app_challenge(&instance);
        let outcome_before = h.engine.get_outcome(&instance).ok();
        let events_before = h.log.len();

        let result: Result<AppChallenge, AdjudicationError> = match step {
            Step::Set {
                count,
                version,
                timeout,
                co_signed,
            } => {
                let s = CounterState { count: *count, turn: 1 };
                let bytes = common::encode(s);
                let req = if *co_signed {
                    h.co_signed(&id, &bytes, *version, *timeout)
                } else {
                    h.force_move(&id, &h.p1, &bytes, *version)
                };
                let r = h.engine.set_state(&id, &req);
                if let Ok(c) = &r {
                    prop_assert!(c.version_number > before.version_number);
                    prop_assert_eq!(c.status, ChallengeStatus::InDispute);
                    latest = Some(s);
                }
                r
            }
            Step::Progress {
                version_delta,
                amount,
                by_p1,
            } => {
                let old = latest.unwrap_or(CounterState { count: 0, turn: 0 });
                let new = CounterState {
                    count: old.count + amount,
                    turn: old.turn + 1,
                };
                let signer = if *by_p1 { &h.p1 } else { &h.p2 };
                let req = h.force_move(
                    &id,
                    signer,
                    &common::encode(new),
                    before.version_number + version_delta,
                );
                let r = h
                    .engine
                    .progress_state(&id, &req, &common::encode(old), &increment(*amount));
                if let Ok(c) = &r {
                    prop_assert_eq!(c.version_number, before.version_number + 1);
                    prop_assert_eq!(*version_delta, 1);
                    prop_assert!(*amount > 0);
                    latest = Some(new);
                }
                r
            }
            Step::Cancel { version } => {
                let r = h.engine.cancel_dispute(&id, &h.cancel(&id, *version));
                if let Ok(c) = &r {
                    prop_assert!(c.is_zero());
                    prop_assert_eq!(*version, before.version_number);
                    latest = None;
                }
                r
            }
            Step::Outcome => {
                let bytes = common::encode(latest.unwrap_or(CounterState { count: 0, turn: 0 }));
                h.engine.set_outcome(&id, &bytes).map(|_| h.engine.get_app_challenge(&instance))
            }
            Step::Advance(ticks) => {
                h.clock.advance(*ticks);
                continue;
            }
        };

        let after = h.engine.get_app_challenge(&instance);
        match result {
            Ok(c) => {
                prop_assert_eq!(c, after);
                prop_assert!(h.log.len() > events_before);
            }
            Err(_) => {
                prop_assert_eq!(after, before);
                prop_assert_eq!(h.engine.get_outcome(&instance).ok(), outcome_before.clone());
                prop_assert_eq!(h.log.len(), events_before);
            }
        }
        // Once written, the outcome never changes.
        if let Some(outcome) = outcome_before {
            prop_assert_eq!(h.engine.get_outcome(&instance).ok(), Some(outcome));
        }
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Accepted calls follow the versioning rules and rejected calls never
    /// write or notify.
    #[test]
    fn random_call_sequences_preserve_invariants(steps in prop::collection::vec(step(), 1..40)) {
        run(&steps)?;
    }
}

#[test]
fn progress_version_must_be_exactly_next() {
    for supplied in [1, 3] {
        let mut h = Harness::new();
        let id = h.counter();
        h.engine
            .set_state(&id, &h.co_signed(&id, &state(1, 1), 1, 0))
            .unwrap();
        let err = h
            .engine
            .progress_state(
                &id,
                &h.force_move(&id, &h.p2, &state(4, 2), supplied),
                &state(1, 1),
                &increment(3),
            )
            .unwrap_err();
        assert!(matches!(
            err,
            AdjudicationError::StaleOrInvalidVersion { stored: 1, supplied: s } if s == supplied
        ));
    }
}

#[test]
fn cancel_resets_from_every_open_status() {
    let mut h = Harness::new();
    let id = h.counter();
    h.engine
        .set_state(&id, &h.co_signed(&id, &state(1, 1), 1, 0))
        .unwrap();
    h.engine
        .progress_state(&id, &h.force_move(&id, &h.p2, &state(4, 2), 2), &state(1, 1), &increment(3))
        .unwrap();
    h.clock.advance(DEFAULT_TIMEOUT - 1);
    assert!(h.engine.cancel_dispute(&id, &h.cancel(&id, 2)).unwrap().is_zero());

    h.engine
        .set_state(&id, &h.co_signed(&id, &state(7, 1), 1, 10))
        .unwrap();
    assert!(h.engine.cancel_dispute(&id, &h.cancel(&id, 1)).unwrap().is_zero());
}
