use rcl_types::{EventStamp, ResourceId};

use crate::block::Block;
use crate::error::LedgerError;
use crate::traits::ChainReader;

const DAY_MS: u64 = 24 * 60 * 60 * 1000;

/// A resource's full movement history with derived totals.
#[derive(Clone, Debug, PartialEq)]
pub struct ResourceHistory {
    pub resource_id: ResourceId,
    /// The chain's current human label (from its latest block).
    pub resource_name: String,
    /// Blocks ordered by timestamp.
    pub blocks: Vec<Block>,
    /// Quantity sum over inbound actions (donation, purchase).
    pub total_inbound: f64,
    /// Quantity sum over outbound actions (distribution, warehouse-out).
    pub total_outbound: f64,
    /// Most recent non-empty `metadata.target_location`.
    pub current_location: Option<String>,
}

/// Aggregate counters across the whole ledger.
///
/// `chain_integrity_percent` is computed from the blocks' stored `is_valid`
/// flags, which only external invalidation bookkeeping ever clears — it is
/// NOT a fresh recomputation. Run [`crate::ChainValidator`] for that.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LedgerStats {
    pub total_blocks: u64,
    pub total_resources: u64,
    /// Blocks stamped within the 24 hours before `now`.
    pub recent_activity_count: u64,
    pub chain_integrity_percent: f64,
}

/// Deterministic projection builders over a [`ChainReader`].
pub struct ProjectionBuilder;

impl ProjectionBuilder {
    /// Reconstruct a resource's history. Unknown resources are an error so
    /// callers can distinguish "no such lot" from "lot with no movements".
    pub fn resource_history<R: ChainReader>(
        reader: &R,
        resource: &ResourceId,
    ) -> Result<ResourceHistory, LedgerError> {
        let mut blocks = reader.read_chain(resource)?;
        if blocks.is_empty() {
            return Err(LedgerError::ResourceNotFound(resource.clone()));
        }
        blocks.sort_by_key(|block| block.timestamp);

        let mut total_inbound = 0.0;
        let mut total_outbound = 0.0;
        let mut current_location = None;
        for block in &blocks {
            let quantity = block.metadata.quantity.unwrap_or(0.0);
            if block.action.is_inbound() {
                total_inbound += quantity;
            } else if block.action.is_outbound() {
                total_outbound += quantity;
            }
            if let Some(location) = block.metadata.target_location() {
                current_location = Some(location.to_string());
            }
        }

        Ok(ResourceHistory {
            resource_id: resource.clone(),
            resource_name: blocks
                .last()
                .map(|block| block.resource_name.clone())
                .unwrap_or_default(),
            total_inbound,
            total_outbound,
            current_location,
            blocks,
        })
    }

    /// The newest blocks across all chains, newest first.
    pub fn recent_activity<R: ChainReader>(
        reader: &R,
        limit: usize,
    ) -> Result<Vec<Block>, LedgerError> {
        let blocks = reader.read_ledger()?;
        Ok(blocks.into_iter().rev().take(limit).collect())
    }

    /// Aggregate stats, with the recent-activity window anchored at `now`.
    pub fn stats<R: ChainReader>(reader: &R, now: EventStamp) -> Result<LedgerStats, LedgerError> {
        let blocks = reader.read_ledger()?;
        let total_blocks = blocks.len() as u64;
        let total_resources = reader.resource_ids()?.len() as u64;

        let window_start = now.physical_ms.saturating_sub(DAY_MS);
        let recent_activity_count = blocks
            .iter()
            .filter(|block| block.timestamp.physical_ms >= window_start)
            .count() as u64;

        let flagged_valid = blocks.iter().filter(|block| block.is_valid).count() as u64;
        let chain_integrity_percent = if total_blocks == 0 {
            100.0
        } else {
            100.0 * flagged_valid as f64 / total_blocks as f64
        };

        Ok(LedgerStats {
            total_blocks,
            total_resources,
            recent_activity_count,
            chain_integrity_percent,
        })
    }
}
