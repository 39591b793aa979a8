//! Cryptographic core of the Resource Custody Ledger (RCL).
//!
//! This crate owns the two routines everything else depends on being exact:
//!
//! - Canonical serialization of a block's causal fields ([`BlockPayload`],
//!   [`OfflinePayload`]) — same logical input, identical bytes, always.
//! - Domain-separated SHA-256 digests over those bytes ([`BlockHasher`]).
//!
//! On top of them sits [`ChainVerifier`], a generic hash-chain walker that
//! recomputes every digest, follows every link, and reports every fault it
//! finds instead of stopping at the first.

pub mod hasher;
pub mod payload;
pub mod verify;

pub use hasher::{BlockHasher, CryptoError};
pub use payload::{BlockPayload, OfflinePayload};
pub use verify::{ChainLink, ChainVerifier, LinkFault, LinkFaultKind};

pub use rcl_types::ChainHash;
