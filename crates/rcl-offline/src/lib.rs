//! Offline custody chains for the Resource Custody Ledger (RCL).
//!
//! Field actors keep recording movements while disconnected: each mission
//! session owns a lighter, local hash chain that may interleave several
//! resources. The chain exists to make local tampering and reordering
//! detectable before reconciliation — its block numbers bear no relationship
//! to any resource chain's. Appends here never perform remote I/O and never
//! fail for lack of connectivity.

pub mod block;
pub mod error;
pub mod ledger;

pub use block::{OfflineBlock, OfflineEntry};
pub use error::OfflineError;
pub use ledger::{ChainState, OfflineLedger, OfflineReport};
