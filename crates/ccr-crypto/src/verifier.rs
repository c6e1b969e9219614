//! # Signer-Set Verification
//!
//! The registry's only cryptographic question is: "did exactly these
//! signers, in exactly this order, sign this digest?" [`SignatureVerifier`]
//! is that question as a trait, so the state machine stays independent of
//! any particular curve.
//!
//! ## Matching Rule
//!
//! `signatures[i]` must be a valid signature by `signers[i]` for every `i`,
//! and the two lists must have the same length. A missing, extra or
//! misordered signature fails the whole check.

use ccr_core::{Address, Hash32, Signature};

use crate::ed25519::verify_digest;

/// Verifies an ordered signature set against an ordered signer set.
pub trait SignatureVerifier: Send + Sync {
    /// Whether `signatures` correspond 1:1, in order, to `signers` over
    /// `digest`.
    fn verify(&self, signatures: &[Signature], digest: &Hash32, signers: &[Address]) -> bool;
}

/// Ed25519 verifier where each [`Address`] is the signer's verifying key.
#[derive(Debug, Default, Clone, Copy)]
pub struct Ed25519Verifier;

impl SignatureVerifier for Ed25519Verifier {
    fn verify(&self, signatures: &[Signature], digest: &Hash32, signers: &[Address]) -> bool {
        if signatures.len() != signers.len() {
            tracing::debug!(
                signatures = signatures.len(),
                signers = signers.len(),
                "signature count does not match signer count"
            );
            return false;
        }
        signatures
            .iter()
            .zip(signers)
            .enumerate()
            .all(|(i, (sig, signer))| match verify_digest(digest, sig, signer) {
                Ok(()) => true,
                Err(e) => {
                    tracing::debug!(index = i, signer = %signer, error = %e, "signature rejected");
                    false
                }
            })
    }
}
