//! # Channel Application Identity
//!
//! Newtypes for the identifiers the registry is keyed by. These prevent
//! identifier confusion: an `InstanceId` cannot be passed where a state
//! hash is expected, and a participant `Address` is not an app definition.
//!
//! ## Instance Identity
//!
//! An [`InstanceId`] is derived from an [`AppIdentity`]: the anchor
//! (multisig) address, channel nonce, ordered participant list, app
//! definition and default timeout. The participant list is hashed as an
//! ordered array, so swapping two participants yields a different instance.
//! Once chosen, the identity never changes; it is the sole key for the
//! challenge record and the outcome.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::canonical::CanonicalBytes;
use crate::digest::{sha256_digest, Hash32};
use crate::encoding::{from_hex_array, hex_prefix, to_hex};
use crate::error::{CanonicalizationError, CodecError, IdentityError};

/// A 32-byte participant or anchor address.
///
/// For the Ed25519 verifier this is the participant's verifying key.
/// Serializes as a lowercase hex string.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address(pub [u8; 32]);

impl Address {
    /// Create an address from raw bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Return the raw 32 bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Render the address as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        to_hex(&self.0)
    }

    /// Parse an address from a 64-character hex string.
    pub fn from_hex(hex: &str) -> Result<Self, CodecError> {
        from_hex_array(hex).map(Self)
    }
}

impl std::fmt::Debug for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Address({}...)", hex_prefix(&self.0))
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex = String::deserialize(deserializer)?;
        Self::from_hex(&hex).map_err(serde::de::Error::custom)
    }
}

/// Identifier of the application strategy governing an instance
/// (e.g. `"counter.v1"`).
///
/// Non-empty, at most 128 characters, no whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct AppDefinition(String);

impl AppDefinition {
    /// Create a validated app definition identifier.
    pub fn new(id: impl Into<String>) -> Result<Self, IdentityError> {
        let id = id.into();
        let reason = if id.is_empty() {
            Some("must not be empty")
        } else if id.len() > 128 {
            Some("must be at most 128 characters")
        } else if id.chars().any(char::is_whitespace) {
            Some("must not contain whitespace")
        } else {
            None
        };
        match reason {
            Some(reason) => Err(IdentityError::InvalidAppDefinition {
                value: id,
                reason: reason.to_string(),
            }),
            None => Ok(Self(id)),
        }
    }

    /// Access the identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for AppDefinition {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::new(s).map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for AppDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unique identifier of a channel application instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstanceId(pub Hash32);

impl InstanceId {
    /// Access the underlying digest.
    pub fn as_hash(&self) -> &Hash32 {
        &self.0
    }
}

impl std::fmt::Display for InstanceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "instance:{}", self.0)
    }
}

/// The full, immutable description of a channel application instance.
///
/// Deserialization goes through [`AppIdentity::new`], so a decoded identity
/// upholds the same participant invariants as a constructed one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "AppIdentityRepr")]
pub struct AppIdentity {
    /// Address of the on-chain anchor (the channel's multisig).
    pub multisig_address: Address,
    /// Nonce distinguishing instances installed in the same channel.
    pub channel_nonce: u64,
    /// Ordered signer set. Order matters for signature matching.
    participants: Vec<Address>,
    /// Identifier resolving the application strategy.
    pub app_definition: AppDefinition,
    /// Ledger ticks a force move waits for an answer.
    pub default_timeout: u64,
}

#[derive(Deserialize)]
struct AppIdentityRepr {
    multisig_address: Address,
    channel_nonce: u64,
    participants: Vec<Address>,
    app_definition: AppDefinition,
    default_timeout: u64,
}

impl TryFrom<AppIdentityRepr> for AppIdentity {
    type Error = IdentityError;

    fn try_from(repr: AppIdentityRepr) -> Result<Self, Self::Error> {
        Self::new(
            repr.multisig_address,
            repr.channel_nonce,
            repr.participants,
            repr.app_definition,
            repr.default_timeout,
        )
    }
}

impl AppIdentity {
    /// Create an identity, rejecting empty or duplicate participant lists.
    pub fn new(
        multisig_address: Address,
        channel_nonce: u64,
        participants: Vec<Address>,
        app_definition: AppDefinition,
        default_timeout: u64,
    ) -> Result<Self, IdentityError> {
        if participants.is_empty() {
            return Err(IdentityError::NoParticipants);
        }
        for (i, p) in participants.iter().enumerate() {
            if participants[..i].contains(p) {
                return Err(IdentityError::DuplicateParticipant(p.to_hex()));
            }
        }
        Ok(Self {
            multisig_address,
            channel_nonce,
            participants,
            app_definition,
            default_timeout,
        })
    }

    /// The ordered signer set.
    pub fn participants(&self) -> &[Address] {
        &self.participants
    }

    /// Whether `address` is one of the participants.
    pub fn is_participant(&self, address: &Address) -> bool {
        self.participants.contains(address)
    }

    /// Derive the instance identity.
    ///
    /// SHA-256 over the JCS form of the identity. Participants are hashed as
    /// an ordered array.
    pub fn instance_id(&self) -> Result<InstanceId, CanonicalizationError> {
        let canonical = CanonicalBytes::new(self)?;
        Ok(InstanceId(sha256_digest(&canonical)))
    }
}
