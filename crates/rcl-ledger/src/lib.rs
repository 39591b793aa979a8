//! Authoritative custody chains for the Resource Custody Ledger (RCL).
//!
//! This crate is the heart of RCL. It provides:
//! - The [`Block`] record: one hash-linked entry in a per-resource history
//! - [`ChainWriter`] / [`ChainReader`] trait boundaries
//! - [`InMemoryLedger`]: per-resource serialized appends, concurrent across resources
//! - [`ChainValidator`]: on-demand, side-effect-free integrity verification
//! - Projections: resource history with totals, recent activity, aggregate stats
//!
//! Each `ResourceId` owns an independent chain; there is no global chain and
//! no global write lock. Validation is a separate computation from the stored
//! `is_valid` flag — appending sets the flag true once and nothing in this
//! crate ever rewrites it.

pub mod block;
pub mod error;
pub mod memory;
pub mod projection;
pub mod traits;
pub mod validation;

pub use block::{Block, NewBlock};
pub use error::{BatchAppendError, LedgerError};
pub use memory::InMemoryLedger;
pub use projection::{LedgerStats, ProjectionBuilder, ResourceHistory};
pub use traits::{ChainReader, ChainWriter};
pub use validation::{ChainReport, ChainValidator};
