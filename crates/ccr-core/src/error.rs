//! # Error Types
//!
//! Leaf-level errors shared by every crate in the workspace. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! Registry-level failures (state transitions, signatures, versions) live in
//! `ccr-registry`; this module only covers what can go wrong while building
//! the primitive values those checks operate on.

use thiserror::Error;

/// Error during canonical serialization.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// Float values are not permitted in canonical representations.
    /// Versions, timeouts and nonces are integers.
    #[error("float values are not permitted in canonical representations: {0}")]
    FloatRejected(f64),

    /// JSON serialization failed.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}

/// Error while decoding a hex-encoded primitive.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// The hex string has the wrong number of characters.
    #[error("expected {expected} hex chars, got {actual}")]
    InvalidLength {
        /// Required number of hex characters.
        expected: usize,
        /// Number of hex characters supplied.
        actual: usize,
    },

    /// The hex string contains a non-hex character.
    #[error("invalid hex at position {position}")]
    InvalidHex {
        /// Offset of the offending character pair.
        position: usize,
    },
}

/// Error while constructing a channel application identity.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentityError {
    /// An application instance needs at least one participant.
    #[error("participant list is empty")]
    NoParticipants,

    /// The same participant appears twice in the signer set.
    #[error("duplicate participant {0}")]
    DuplicateParticipant(String),

    /// The application definition identifier is malformed.
    #[error("invalid app definition {value:?}: {reason}")]
    InvalidAppDefinition {
        /// The rejected identifier.
        value: String,
        /// Why it was rejected.
        reason: String,
    },
}
