//! # Application Strategies
//!
//! The registry knows nothing about any particular channel application.
//! Each instance names its application through its [`AppDefinition`]; the
//! [`AppRegistry`] resolves that name to an [`AppStrategy`] at call time,
//! which decides turn order, applies actions, detects terminal states and
//! computes the outcome.
//!
//! Strategies are pure functions of their inputs. A rejection from a
//! strategy aborts the whole registry call that invoked it.

use std::collections::BTreeMap;
use std::sync::Arc;

use thiserror::Error;

use ccr_core::{Address, AppDefinition};

/// Failure raised by, or while resolving, an application strategy.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppStrategyError {
    /// No strategy is registered under the instance's app definition.
    #[error("no strategy registered for app definition {0}")]
    UnknownApp(AppDefinition),

    /// The application refused the action.
    #[error("action rejected: {0}")]
    ActionRejected(String),

    /// The application could not decode or interpret a state.
    #[error("invalid app state: {0}")]
    InvalidState(String),

    /// The strategy named a turn-taker outside the participant list.
    #[error("turn taker {0} is not a participant")]
    TurnTakerNotParticipant(Address),
}

/// Application logic consulted by the registry.
pub trait AppStrategy: Send + Sync {
    /// Compute the outcome bytes of a finalized state.
    fn compute_outcome(&self, state: &[u8]) -> Result<Vec<u8>, AppStrategyError>;

    /// Apply `action` to `state`, returning the new encoded state.
    fn apply_action(&self, state: &[u8], action: &[u8]) -> Result<Vec<u8>, AppStrategyError>;

    /// The participant whose signature alone authorizes the next move.
    ///
    /// Must return one of `participants`.
    fn turn_taker(&self, state: &[u8], participants: &[Address])
        -> Result<Address, AppStrategyError>;

    /// Whether no further moves are possible from `state`.
    fn is_state_terminal(&self, state: &[u8]) -> Result<bool, AppStrategyError>;
}

/// Strategies keyed by app definition.
#[derive(Default, Clone)]
pub struct AppRegistry {
    strategies: BTreeMap<AppDefinition, Arc<dyn AppStrategy>>,
}

impl AppRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `strategy` under `definition`, returning any strategy it
    /// replaces.
    pub fn register(
        &mut self,
        definition: AppDefinition,
        strategy: impl AppStrategy + 'static,
    ) -> Option<Arc<dyn AppStrategy>> {
        self.strategies.insert(definition, Arc::new(strategy))
    }

    /// Resolve the strategy for `definition`.
    pub fn resolve(&self, definition: &AppDefinition) -> Result<&dyn AppStrategy, AppStrategyError> {
        self.strategies
            .get(definition)
            .map(|s| s.as_ref())
            .ok_or_else(|| AppStrategyError::UnknownApp(definition.clone()))
    }

    /// Whether a strategy is registered under `definition`.
    pub fn contains(&self, definition: &AppDefinition) -> bool {
        self.strategies.contains_key(definition)
    }

    /// Number of registered strategies.
    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    /// Whether no strategies are registered.
    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
}

impl std::fmt::Debug for AppRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.strategies.keys()).finish()
    }
}
