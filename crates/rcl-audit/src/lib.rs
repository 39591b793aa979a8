//! Audit queries for the Resource Custody Ledger (RCL).
//!
//! The surface the outside world reads history through: receipt timelines
//! for the public transparency lookup, per-resource reports, on-demand chain
//! verification with a human-readable verdict, a recent-activity feed, and
//! aggregate stats. Strictly read-only — mutation happens through the ledger
//! and reconciliation crates, never here. Unknown records degrade to a plain
//! "not found"; internal failure detail is logged, not leaked.

pub mod query;

pub use query::{ActivityEntry, AuditError, AuditQuery, AuditResult, TimelineEntry, VerifyOutcome};
