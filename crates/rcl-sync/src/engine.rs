use std::sync::Arc;

use tracing::{debug, info, warn};

use rcl_ledger::{Block, ChainWriter, NewBlock};
use rcl_offline::{OfflineBlock, OfflineLedger};
use rcl_types::{OfflineBlockId, ResourceId, SessionId};

use crate::config::{SyncConfig, SyncMode};
use crate::error::SyncResult;

/// Outcome of one reconciliation pass over a session.
#[derive(Clone, Debug, PartialEq)]
pub struct SyncReport {
    pub session_id: SessionId,
    /// `true` only if zero errors occurred across the whole batch.
    pub success: bool,
    pub synced_count: u64,
    pub failed_count: u64,
    pub errors: Vec<SyncFailure>,
}

/// One block that failed to merge during a pass.
#[derive(Clone, Debug, PartialEq)]
pub struct SyncFailure {
    pub offline_block_id: OfflineBlockId,
    /// The block's number within its session chain.
    pub block_number: u64,
    pub resource_id: ResourceId,
    pub reason: String,
}

/// Replays pending offline blocks into the authoritative ledger.
///
/// One pass is sequential within its session; several sessions may
/// reconcile concurrently and only serialize at the resource-chain level.
/// `is_synced` is the sole durable progress marker, so an aborted pass is
/// always resumable with `retry`.
pub struct SyncEngine<W> {
    offline: Arc<OfflineLedger>,
    ledger: Arc<W>,
    config: SyncConfig,
}

impl<W: ChainWriter> SyncEngine<W> {
    pub fn new(offline: Arc<OfflineLedger>, ledger: Arc<W>, config: SyncConfig) -> Self {
        Self {
            offline,
            ledger,
            config,
        }
    }

    /// The offline ledger this engine drains.
    pub fn offline(&self) -> &Arc<OfflineLedger> {
        &self.offline
    }

    /// Merge every pending block of a session, in original local order.
    ///
    /// Each block is forwarded through the resource ledger's `append`, which
    /// assigns the authoritative number, links, and digest for that
    /// resource's own chain; the offline provenance travels along in the
    /// forwarded metadata. Under [`SyncMode::BestEffort`] a failed block is
    /// recorded and the pass continues with the next one.
    pub fn sync_to_ledger(&self, session: &SessionId) -> SyncResult<SyncReport> {
        let pending = self.offline.pending_blocks(session)?;
        debug!(session = %session, pending = pending.len(), "starting reconciliation pass");

        let mut synced_count = 0u64;
        let mut errors = Vec::new();
        for block in pending {
            match self.forward(session, &block) {
                Ok(applied) => {
                    synced_count += 1;
                    info!(
                        session = %session,
                        offline_number = block.block_number,
                        resource = %applied.resource_id,
                        number = applied.block_number,
                        "merged offline block"
                    );
                }
                Err(reason) => {
                    warn!(
                        session = %session,
                        offline_number = block.block_number,
                        resource = %block.resource_id,
                        %reason,
                        "failed to merge offline block"
                    );
                    errors.push(SyncFailure {
                        offline_block_id: block.id,
                        block_number: block.block_number,
                        resource_id: block.resource_id.clone(),
                        reason,
                    });
                    if self.config.mode == SyncMode::StopOnError {
                        break;
                    }
                }
            }
        }

        Ok(SyncReport {
            session_id: session.clone(),
            success: errors.is_empty(),
            synced_count,
            failed_count: errors.len() as u64,
            errors,
        })
    }

    /// Re-run the pass for whatever is still pending. Previously merged
    /// blocks are skipped: `is_synced` is the idempotency marker.
    pub fn retry(&self, session: &SessionId) -> SyncResult<SyncReport> {
        debug!(session = %session, "retrying reconciliation");
        self.sync_to_ledger(session)
    }

    fn forward(&self, session: &SessionId, block: &OfflineBlock) -> Result<Block, String> {
        let offline_stamp = serde_json::to_value(block.timestamp).map_err(|e| e.to_string())?;
        let mut metadata = block.metadata.clone();
        metadata.insert_extra(
            "offlineBlockId",
            serde_json::Value::String(block.id.as_uuid().to_string()),
        );
        metadata.insert_extra("offlineTimestamp", offline_stamp);
        metadata.insert_extra(
            "offlineHash",
            serde_json::Value::String(block.curr_hash.to_hex()),
        );

        let new_block = NewBlock {
            resource_id: block.resource_id.clone(),
            resource_name: None,
            action: block.action,
            actor_id: block.actor_id.clone(),
            actor_name: None,
            metadata,
            signature: None,
        };

        let applied = self.ledger.append(new_block).map_err(|e| e.to_string())?;
        self.offline
            .mark_synced(session, &block.id)
            .map_err(|e| e.to_string())?;
        Ok(applied)
    }
}
