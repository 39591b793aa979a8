//! Reconciliation engine for the Resource Custody Ledger (RCL).
//!
//! Merges offline session chains back into the authoritative resource
//! chains: pending blocks are replayed one at a time, in their original
//! local order, through the resource ledger's own `append` — each merge
//! produces a brand-new authoritative block that *references* the offline
//! block (id, timestamp, hash) in its metadata rather than reusing its hash.
//!
//! A pass keeps going past individual failures by default, so one bad block
//! cannot strand the rest of a field session's data; `retry` later picks up
//! exactly the blocks still marked unsynced.

pub mod config;
pub mod engine;
pub mod error;
pub mod sweep;

pub use config::{SyncConfig, SyncMode};
pub use engine::{SyncEngine, SyncFailure, SyncReport};
pub use error::{SyncError, SyncResult};
pub use sweep::{spawn_sweep, SweepHandle};
