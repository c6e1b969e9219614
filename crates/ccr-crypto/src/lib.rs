//! # ccr-crypto — Cryptographic Primitives
//!
//! - **Ed25519** participant keys: generation, digest signing, and
//!   single-signature verification.
//! - **SignatureVerifier**: the swappable signer-set check consumed by the
//!   registry, with an Ed25519 implementation.
//!
//! ## Crate Policy
//!
//! - Depends only on `ccr-core` internally.
//! - No mocking of cryptographic operations in tests; all tests use real
//!   Ed25519 keys.

pub mod ed25519;
pub mod error;
pub mod verifier;

pub use ed25519::{verify_digest, Ed25519KeyPair};
pub use error::CryptoError;
pub use verifier::{Ed25519Verifier, SignatureVerifier};
