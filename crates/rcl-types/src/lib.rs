//! Foundation types for the Resource Custody Ledger (RCL).
//!
//! This crate provides the identity, temporal, and structural types used
//! throughout the RCL system. Every other RCL crate depends on `rcl-types`.
//!
//! # Key Types
//!
//! - [`ResourceId`] / [`SessionId`] / [`ActorId`] — Externally supplied identifiers
//! - [`BlockId`] / [`OfflineBlockId`] — UUID v7 block identifiers, assigned at creation
//! - [`ChainHash`] — SHA-256 digest with a fixed genesis sentinel
//! - [`CustodyAction`] — Closed set of resource movement actions
//! - [`CustodyMetadata`] — Known-fields record plus an open, order-stable side map
//! - [`EventStamp`] — Millisecond timestamp with a logical tiebreak counter

pub mod action;
pub mod error;
pub mod hash;
pub mod id;
pub mod metadata;
pub mod stamp;

pub use action::CustodyAction;
pub use error::TypeError;
pub use hash::ChainHash;
pub use id::{ActorId, BlockId, OfflineBlockId, ResourceId, SessionId};
pub use metadata::{CustodyMetadata, GpsPoint};
pub use stamp::EventStamp;
