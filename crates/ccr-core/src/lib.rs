//! # ccr-core — Foundational Types for the Challenge Registry
//!
//! Leaf crate of the workspace. Defines the primitives every other crate
//! builds on: canonical bytes for signed messages, 32-byte digests, channel
//! application identities, opaque signatures and ledger clocks.
//!
//! ## Key Design Principles
//!
//! 1. **Newtypes for identifiers.** `Address`, `AppDefinition`, `InstanceId`
//!    and `Hash32` are distinct types. No bare byte arrays cross an API.
//!
//! 2. **`CanonicalBytes` for structured digests.** Every digest that is
//!    signed (instance identity, set-state, cancel-dispute) flows through
//!    `CanonicalBytes::new()`, so all parties hash identical bytes.
//!
//! 3. **Injected time.** Nothing reads the wall clock implicitly; the
//!    registry is handed a [`Clock`].
//!
//! ## Crate Policy
//!
//! - No dependencies on other `ccr-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod canonical;
pub mod digest;
pub mod encoding;
pub mod error;
pub mod identity;
pub mod signature;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use canonical::CanonicalBytes;
pub use digest::{sha256_digest, sha256_raw, Hash32};
pub use error::{CanonicalizationError, CodecError, IdentityError};
pub use identity::{Address, AppDefinition, AppIdentity, InstanceId};
pub use signature::Signature;
pub use temporal::{deadline_after, has_passed, Clock, ManualClock, SystemClock};
