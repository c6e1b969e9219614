//! # Cryptographic Error Types
//!
//! Structured errors for key and signature handling in `ccr-crypto`.

use thiserror::Error;

/// Errors from cryptographic operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// Ed25519 signature verification failed.
    #[error("Ed25519 verification failed: {0}")]
    VerificationFailed(String),

    /// Invalid Ed25519 signature length.
    #[error("invalid Ed25519 signature length: expected 64 bytes, got {0}")]
    InvalidSignatureLength(usize),

    /// The address is not a valid Ed25519 verifying key.
    #[error("invalid Ed25519 public key: {0}")]
    InvalidPublicKey(String),
}
