//! # Signed Requests and Their Digests
//!
//! Participants sign digests off-chain; the registry recomputes the same
//! digests on-chain and checks the signatures against them. Both sides use
//! the functions in this module, so there is exactly one definition of
//! what gets signed.
//!
//! ## Digest Layout
//!
//! ```text
//! set-state  = SHA-256(JCS({tag: SET_STATE_TAG, identity, app_state_hash, version_number, timeout}))
//! cancel     = SHA-256(JCS({tag: CANCEL_TAG, identity, version_number}))
//! ```
//!
//! The tag separates the two message kinds, so a cancel signature can never
//! be replayed as a set-state signature or vice versa. The identity binds
//! every signature to one application instance.

use serde::{Deserialize, Serialize};

use ccr_core::{sha256_digest, CanonicalBytes, CanonicalizationError, Hash32, InstanceId, Signature};

/// Domain tag of set-state digests.
pub const SET_STATE_TAG: &str = "ccr.set-state.v1";

/// Domain tag of cancel-dispute digests.
pub const CANCEL_TAG: &str = "ccr.cancel-dispute.v1";

/// A state update with its signatures.
///
/// For `set_state` the signatures cover every participant in order; for
/// `progress_state` there is exactly one, by the turn-taker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedUpdate {
    /// Hash of the application state being submitted.
    pub app_state_hash: Hash32,
    /// Version of the submitted state.
    pub version_number: u64,
    /// Length of the dispute window opened by `set_state`.
    pub timeout: u64,
    /// Signatures over [`SignedUpdate::digest`].
    pub signatures: Vec<Signature>,
}

impl SignedUpdate {
    /// Create an update with no signatures yet.
    pub fn unsigned(app_state_hash: Hash32, version_number: u64, timeout: u64) -> Self {
        Self {
            app_state_hash,
            version_number,
            timeout,
            signatures: Vec::new(),
        }
    }

    /// Attach signatures, replacing any already present.
    pub fn with_signatures(mut self, signatures: Vec<Signature>) -> Self {
        self.signatures = signatures;
        self
    }

    /// The digest participants sign for this update.
    pub fn digest(&self, instance: &InstanceId) -> Result<Hash32, CanonicalizationError> {
        set_state_digest(
            instance,
            &self.app_state_hash,
            self.version_number,
            self.timeout,
        )
    }
}

/// A request to drop an open challenge, signed by all participants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedCancelRequest {
    /// Must equal the stored version number.
    pub version_number: u64,
    /// Signatures over [`SignedCancelRequest::digest`], one per participant.
    pub signatures: Vec<Signature>,
}

impl SignedCancelRequest {
    /// Create a request with no signatures yet.
    pub fn unsigned(version_number: u64) -> Self {
        Self {
            version_number,
            signatures: Vec::new(),
        }
    }

    /// Attach signatures, replacing any already present.
    pub fn with_signatures(mut self, signatures: Vec<Signature>) -> Self {
        self.signatures = signatures;
        self
    }

    /// The digest participants sign for this request.
    pub fn digest(&self, instance: &InstanceId) -> Result<Hash32, CanonicalizationError> {
        cancel_digest(instance, self.version_number)
    }
}

#[derive(Serialize)]
struct SetStateMessage<'a> {
    tag: &'static str,
    identity: &'a InstanceId,
    app_state_hash: &'a Hash32,
    version_number: u64,
    timeout: u64,
}

#[derive(Serialize)]
struct CancelMessage<'a> {
    tag: &'static str,
    identity: &'a InstanceId,
    version_number: u64,
}

/// Digest signed to agree on a state.
pub fn set_state_digest(
    instance: &InstanceId,
    app_state_hash: &Hash32,
    version_number: u64,
    timeout: u64,
) -> Result<Hash32, CanonicalizationError> {
    let canonical = CanonicalBytes::new(&SetStateMessage {
        tag: SET_STATE_TAG,
        identity: instance,
        app_state_hash,
        version_number,
        timeout,
    })?;
    Ok(sha256_digest(&canonical))
}

/// Digest signed to cancel a challenge at `version_number`.
pub fn cancel_digest(
    instance: &InstanceId,
    version_number: u64,
) -> Result<Hash32, CanonicalizationError> {
    let canonical = CanonicalBytes::new(&CancelMessage {
        tag: CANCEL_TAG,
        identity: instance,
        version_number,
    })?;
    Ok(sha256_digest(&canonical))
}
