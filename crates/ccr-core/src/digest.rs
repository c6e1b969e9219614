//! # Digests — 32-Byte Hashes
//!
//! Defines `Hash32`, the fixed-width digest used for application state
//! hashes, instance identities and signed-message digests.
//!
//! ## Two Digest Paths
//!
//! - [`sha256_digest()`] accepts only `&CanonicalBytes`. Every structured
//!   message (identity, set-state, cancel) is hashed this way.
//! - [`sha256_raw()`] hashes opaque application state. The registry never
//!   interprets state bytes; it only checks that the bytes a caller supplies
//!   hash to the value that was agreed on.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};

use crate::canonical::CanonicalBytes;
use crate::encoding::{from_hex_array, hex_prefix, to_hex};
use crate::error::CodecError;

/// A 32-byte digest.
///
/// Serializes as a lowercase hex string.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Hash32(pub [u8; 32]);

impl Hash32 {
    /// The all-zero digest, used as the "no state" value of a fresh challenge.
    pub const ZERO: Hash32 = Hash32([0u8; 32]);

    /// Create a digest from raw bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Return the raw 32 bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Whether this is the all-zero digest.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }

    /// Render the digest as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        to_hex(&self.0)
    }

    /// Parse a digest from a 64-character hex string.
    pub fn from_hex(hex: &str) -> Result<Self, CodecError> {
        from_hex_array(hex).map(Self)
    }
}

impl std::fmt::Debug for Hash32 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Hash32({}...)", hex_prefix(&self.0))
    }
}

impl std::fmt::Display for Hash32 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Hash32 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Hash32 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex = String::deserialize(deserializer)?;
        Self::from_hex(&hex).map_err(serde::de::Error::custom)
    }
}

/// Compute a SHA-256 digest from canonical bytes.
///
/// The signature enforces that only `CanonicalBytes` can be hashed on the
/// structured-message path.
pub fn sha256_digest(data: &CanonicalBytes) -> Hash32 {
    sha256_raw(data.as_bytes())
}

/// Compute a SHA-256 digest over opaque bytes.
///
/// Used for application state, whose encoding belongs to the application.
pub fn sha256_raw(data: &[u8]) -> Hash32 {
    let hash = Sha256::digest(data);
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&hash);
    Hash32(bytes)
}
