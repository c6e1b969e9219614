//! Scheme-agnostic signature bytes.
//!
//! The registry never inspects a signature; it hands the bytes to a
//! `SignatureVerifier`. Keeping them opaque here lets the verifier be
//! swapped without touching the state machine.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::encoding::{from_hex, hex_prefix, to_hex};
use crate::error::CodecError;

/// Opaque signature bytes. Serializes as a lowercase hex string.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Signature(Vec<u8>);

impl Signature {
    /// Wrap raw signature bytes.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Access the raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Render as lowercase hex.
    pub fn to_hex(&self) -> String {
        to_hex(&self.0)
    }

    /// Parse from a hex string of any even length.
    pub fn from_hex(hex: &str) -> Result<Self, CodecError> {
        from_hex(hex).map(Self)
    }
}

impl std::fmt::Debug for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Signature({}...)", hex_prefix(&self.0))
    }
}

impl Serialize for Signature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Signature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex = String::deserialize(deserializer)?;
        Self::from_hex(&hex).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_hex() {
        let sig = Signature::from_bytes(vec![0xde, 0xad, 0xbe, 0xef, 0x01]);
        let json = serde_json::to_string(&sig).unwrap();
        assert_eq!(json, "\"deadbeef01\"");
        let back: Signature = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sig);
        assert_eq!(format!("{sig:?}"), "Signature(deadbeef...)");
    }
}
