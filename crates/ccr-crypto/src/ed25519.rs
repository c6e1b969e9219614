//! # Ed25519 Participant Keys
//!
//! Key generation, digest signing and single-signature verification for
//! channel participants. A participant's [`Address`] *is* its Ed25519
//! verifying key, so no key registry is needed to check a signer set.
//!
//! ## Security Invariant
//!
//! - Signing input is a [`Hash32`] produced from `CanonicalBytes`. Raw
//!   message bytes are never signed.
//! - Private keys are never serialized or logged. `Ed25519KeyPair` does not
//!   implement `Serialize` and its `Debug` output is redacted.

use ccr_core::{Address, Hash32, Signature};
use ed25519_dalek::{Signer, Verifier};

use crate::error::CryptoError;

/// An Ed25519 key pair for a channel participant.
pub struct Ed25519KeyPair {
    signing_key: ed25519_dalek::SigningKey,
}

impl Ed25519KeyPair {
    /// Generate a new random key pair.
    pub fn generate() -> Self {
        let mut csprng = rand::rngs::OsRng;
        let signing_key = ed25519_dalek::SigningKey::generate(&mut csprng);
        Self { signing_key }
    }

    /// Create a key pair from a 32-byte private key seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        let signing_key = ed25519_dalek::SigningKey::from_bytes(seed);
        Self { signing_key }
    }

    /// The participant address (the verifying key bytes).
    pub fn address(&self) -> Address {
        Address::from_bytes(self.signing_key.verifying_key().to_bytes())
    }

    /// Sign a message digest.
    pub fn sign_digest(&self, digest: &Hash32) -> Signature {
        let sig = self.signing_key.sign(digest.as_bytes());
        Signature::from_bytes(sig.to_bytes().to_vec())
    }
}

impl std::fmt::Debug for Ed25519KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Ed25519KeyPair(<private>)")
    }
}

/// Verify one signature over `digest` by the key behind `signer`.
///
/// # Errors
///
/// - [`CryptoError::InvalidSignatureLength`] if the signature is not 64 bytes.
/// - [`CryptoError::InvalidPublicKey`] if `signer` is not a valid curve point.
/// - [`CryptoError::VerificationFailed`] if the signature does not verify.
pub fn verify_digest(
    digest: &Hash32,
    signature: &Signature,
    signer: &Address,
) -> Result<(), CryptoError> {
    let bytes: [u8; 64] = signature
        .as_bytes()
        .try_into()
        .map_err(|_| CryptoError::InvalidSignatureLength(signature.as_bytes().len()))?;
    let vk = ed25519_dalek::VerifyingKey::from_bytes(signer.as_bytes())
        .map_err(|e| CryptoError::InvalidPublicKey(e.to_string()))?;
    let sig = ed25519_dalek::Signature::from_bytes(&bytes);
    vk.verify(digest.as_bytes(), &sig)
        .map_err(|e| CryptoError::VerificationFailed(e.to_string()))
}
