use std::sync::Arc;

use chrono::{DateTime, SecondsFormat};
use serde::Serialize;
use tracing::warn;

use rcl_ledger::{
    Block, ChainReader, ChainReport, ChainValidator, LedgerError, LedgerStats, ProjectionBuilder,
    ResourceHistory,
};
use rcl_types::{EventStamp, ResourceId};

/// Errors surfaced to the external query boundary.
///
/// Deliberately coarse: a public lookup learns that a record is missing or
/// that the service is unavailable, nothing about why.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuditError {
    #[error("record not found")]
    NotFound,

    #[error("ledger unavailable")]
    Unavailable,
}

pub type AuditResult<T> = Result<T, AuditError>;

/// One step of a reconstructed custody timeline.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEntry {
    /// RFC 3339 rendering of the block timestamp.
    pub time: String,
    /// Human-readable action label.
    pub action: String,
    pub location: Option<String>,
    pub actor: String,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    /// The block's stored validity flag (bookkeeping, not a recomputation).
    pub is_valid: bool,
}

/// One row of the recent-activity feed.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEntry {
    pub time: String,
    pub resource_id: ResourceId,
    pub resource_name: String,
    pub action: String,
    pub actor: String,
}

/// Chain verification with a rendered verdict.
#[derive(Clone, Debug, PartialEq)]
pub struct VerifyOutcome {
    pub report: ChainReport,
    pub message: String,
}

/// Read-only audit facade over a [`ChainReader`].
pub struct AuditQuery<R> {
    reader: Arc<R>,
}

impl<R: ChainReader> AuditQuery<R> {
    pub fn new(reader: Arc<R>) -> Self {
        Self { reader }
    }

    /// Reconstruct the timeline behind a receipt number.
    ///
    /// The public transparency lookup: unauthenticated callers paste a
    /// receipt number and see each recorded step. An unknown receipt is an
    /// empty timeline, not an error.
    pub fn receipt_timeline(&self, receipt_number: &str) -> AuditResult<Vec<TimelineEntry>> {
        let blocks = self
            .reader
            .find_by_receipt(receipt_number)
            .map_err(internal)?;
        Ok(blocks.iter().map(timeline_entry).collect())
    }

    /// A resource's full history with derived totals.
    pub fn resource_report(&self, resource: &ResourceId) -> AuditResult<ResourceHistory> {
        ProjectionBuilder::resource_history(self.reader.as_ref(), resource).map_err(internal)
    }

    /// Verify a resource chain on demand and render the verdict.
    pub fn verify_resource(&self, resource: &ResourceId) -> AuditResult<VerifyOutcome> {
        if self.reader.block_count(resource).map_err(internal)? == 0 {
            return Err(AuditError::NotFound);
        }
        let report =
            ChainValidator::validate_chain(self.reader.as_ref(), resource).map_err(internal)?;
        let message = if report.is_valid {
            format!(
                "Chain intact: all {} blocks verified for {}",
                report.total_blocks, resource
            )
        } else {
            format!(
                "Chain broken: {} of {} blocks failed verification for {}",
                report.invalid_block_ids.len(),
                report.total_blocks,
                resource
            )
        };
        Ok(VerifyOutcome { report, message })
    }

    /// The newest movements across all chains, newest first.
    pub fn recent_activity(&self, limit: usize) -> AuditResult<Vec<ActivityEntry>> {
        let blocks =
            ProjectionBuilder::recent_activity(self.reader.as_ref(), limit).map_err(internal)?;
        Ok(blocks
            .iter()
            .map(|block| ActivityEntry {
                time: rfc3339(block.timestamp),
                resource_id: block.resource_id.clone(),
                resource_name: block.resource_name.clone(),
                action: block.action.label().to_string(),
                actor: actor_of(block),
            })
            .collect())
    }

    /// Aggregate ledger stats, recent-activity window anchored at now.
    pub fn stats(&self) -> AuditResult<LedgerStats> {
        ProjectionBuilder::stats(self.reader.as_ref(), EventStamp::now()).map_err(internal)
    }
}

fn timeline_entry(block: &Block) -> TimelineEntry {
    TimelineEntry {
        time: rfc3339(block.timestamp),
        action: block.action.label().to_string(),
        location: block
            .metadata
            .target_location
            .clone()
            .or_else(|| block.metadata.source_location.clone()),
        actor: actor_of(block),
        quantity: block.metadata.quantity,
        unit: block.metadata.unit.clone(),
        is_valid: block.is_valid,
    }
}

fn actor_of(block: &Block) -> String {
    block
        .actor_name
        .clone()
        .unwrap_or_else(|| block.actor_id.to_string())
}

fn rfc3339(stamp: EventStamp) -> String {
    DateTime::from_timestamp_millis(stamp.physical_ms as i64)
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
        .unwrap_or_else(|| stamp.to_string())
}

fn internal(error: LedgerError) -> AuditError {
    match error {
        LedgerError::ResourceNotFound(_) | LedgerError::BlockNotFound => AuditError::NotFound,
        other => {
            warn!(error = %other, "audit query hit an internal ledger error");
            AuditError::Unavailable
        }
    }
}
