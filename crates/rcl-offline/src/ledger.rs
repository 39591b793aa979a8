use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use tracing::{debug, warn};

use rcl_crypto::{BlockHasher, ChainVerifier};
use rcl_types::{ChainHash, EventStamp, OfflineBlockId, SessionId};

use crate::block::{OfflineBlock, OfflineEntry};
use crate::error::OfflineError;

/// Local, session-keyed chain store.
///
/// A single field device owns a session, so appends within one session are
/// serial by construction; the per-session mutex merely upholds that when a
/// session is shared with the reconciliation sweep. Everything here is local
/// state — no operation depends on connectivity.
pub struct OfflineLedger {
    sessions: RwLock<HashMap<SessionId, Arc<Mutex<SessionChain>>>>,
}

struct SessionChain {
    blocks: Vec<OfflineBlock>,
    created_at: EventStamp,
    last_updated_at: EventStamp,
}

/// Snapshot of one session chain's bookkeeping.
#[derive(Clone, Debug, PartialEq)]
pub struct ChainState {
    pub session_id: SessionId,
    pub total_blocks: u64,
    pub last_hash: Option<ChainHash>,
    pub pending_sync_count: u64,
    pub created_at: EventStamp,
    pub last_updated_at: EventStamp,
}

/// Result of validating a session chain, usable entirely offline.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OfflineReport {
    pub session_id: SessionId,
    pub is_valid: bool,
    pub total_blocks: u64,
    pub invalid_block_numbers: Vec<u64>,
}

impl OfflineLedger {
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    fn session_handle(
        &self,
        session: &SessionId,
    ) -> Result<Arc<Mutex<SessionChain>>, OfflineError> {
        if let Some(chain) = self
            .sessions
            .read()
            .map_err(|_| OfflineError::LockPoisoned)?
            .get(session)
        {
            return Ok(Arc::clone(chain));
        }

        let mut sessions = self
            .sessions
            .write()
            .map_err(|_| OfflineError::LockPoisoned)?;
        let chain = sessions.entry(session.clone()).or_insert_with(|| {
            let now = EventStamp::now();
            Arc::new(Mutex::new(SessionChain {
                blocks: Vec::new(),
                created_at: now,
                last_updated_at: now,
            }))
        });
        Ok(Arc::clone(chain))
    }

    fn existing_session(
        &self,
        session: &SessionId,
    ) -> Result<Arc<Mutex<SessionChain>>, OfflineError> {
        self.sessions
            .read()
            .map_err(|_| OfflineError::LockPoisoned)?
            .get(session)
            .map(Arc::clone)
            .ok_or_else(|| OfflineError::SessionNotFound(session.clone()))
    }

    /// Append one block to a session's local chain, creating the chain on
    /// first use. Purely local: never performs I/O, never fails for lack of
    /// connectivity.
    pub fn append(
        &self,
        session: &SessionId,
        entry: OfflineEntry,
    ) -> Result<OfflineBlock, OfflineError> {
        let handle = self.session_handle(session)?;
        let mut chain = handle.lock().map_err(|_| OfflineError::LockPoisoned)?;

        let (block_number, prev_hash, timestamp) = match chain.blocks.last() {
            Some(last) => (
                last.block_number + 1,
                last.curr_hash,
                EventStamp::next_after(&last.timestamp),
            ),
            None => (1, ChainHash::GENESIS, EventStamp::now()),
        };

        let mut block = OfflineBlock {
            id: OfflineBlockId::new(),
            session_id: session.clone(),
            resource_id: entry.resource_id,
            action: entry.action,
            actor_id: entry.actor_id,
            metadata: entry.metadata,
            timestamp,
            prev_hash,
            curr_hash: ChainHash::GENESIS,
            block_number,
            is_synced: false,
        };
        block.curr_hash = BlockHasher::OFFLINE.hash_value(&block.payload())?;

        chain.last_updated_at = timestamp;
        chain.blocks.push(block.clone());

        debug!(
            session = %session,
            number = block.block_number,
            resource = %block.resource_id,
            "recorded offline block"
        );
        Ok(block)
    }

    /// Append several entries in order.
    pub fn append_batch(
        &self,
        session: &SessionId,
        entries: Vec<OfflineEntry>,
    ) -> Result<Vec<OfflineBlock>, OfflineError> {
        entries
            .into_iter()
            .map(|entry| self.append(session, entry))
            .collect()
    }

    /// Validate the session chain with the same walker the resource ledger
    /// uses: every link followed, every digest recomputed, all faults listed.
    pub fn validate(&self, session: &SessionId) -> Result<OfflineReport, OfflineError> {
        let handle = self.existing_session(session)?;
        let chain = handle.lock().map_err(|_| OfflineError::LockPoisoned)?;

        let faults = ChainVerifier::verify(&chain.blocks);
        let mut invalid_block_numbers: Vec<u64> = faults
            .iter()
            .map(|fault| chain.blocks[fault.index].block_number)
            .collect();
        invalid_block_numbers.dedup();

        Ok(OfflineReport {
            session_id: session.clone(),
            is_valid: faults.is_empty(),
            total_blocks: chain.blocks.len() as u64,
            invalid_block_numbers,
        })
    }

    /// Bookkeeping snapshot for one session.
    pub fn chain_state(&self, session: &SessionId) -> Result<ChainState, OfflineError> {
        let handle = self.existing_session(session)?;
        let chain = handle.lock().map_err(|_| OfflineError::LockPoisoned)?;
        Ok(Self::state_of(session, &chain))
    }

    /// Snapshot every live session chain, sorted by session id.
    pub fn active_chains(&self) -> Result<Vec<ChainState>, OfflineError> {
        let handles: Vec<(SessionId, Arc<Mutex<SessionChain>>)> = {
            let sessions = self
                .sessions
                .read()
                .map_err(|_| OfflineError::LockPoisoned)?;
            sessions
                .iter()
                .map(|(id, handle)| (id.clone(), Arc::clone(handle)))
                .collect()
        };

        let mut states = Vec::with_capacity(handles.len());
        for (session, handle) in handles {
            let chain = handle.lock().map_err(|_| OfflineError::LockPoisoned)?;
            states.push(Self::state_of(&session, &chain));
        }
        states.sort_by(|a, b| a.session_id.cmp(&b.session_id));
        Ok(states)
    }

    /// Delete a session chain, but only once nothing in it is pending.
    ///
    /// Returns `true` when the chain was removed. With unsynced blocks still
    /// present the call refuses, returns `false`, and leaves the chain fully
    /// intact — clearing would lose field data.
    pub fn clear_synced(&self, session: &SessionId) -> Result<bool, OfflineError> {
        let handle = self.existing_session(session)?;
        let pending = {
            let chain = handle.lock().map_err(|_| OfflineError::LockPoisoned)?;
            chain.blocks.iter().filter(|b| !b.is_synced).count()
        };
        if pending > 0 {
            warn!(session = %session, pending, "refusing to clear chain with pending blocks");
            return Ok(false);
        }

        let mut sessions = self
            .sessions
            .write()
            .map_err(|_| OfflineError::LockPoisoned)?;
        sessions.remove(session);
        debug!(session = %session, "cleared synced session chain");
        Ok(true)
    }

    /// Pending (`is_synced == false`) blocks in original local order.
    pub fn pending_blocks(&self, session: &SessionId) -> Result<Vec<OfflineBlock>, OfflineError> {
        let handle = self.existing_session(session)?;
        let chain = handle.lock().map_err(|_| OfflineError::LockPoisoned)?;
        Ok(chain
            .blocks
            .iter()
            .filter(|block| !block.is_synced)
            .cloned()
            .collect())
    }

    /// Flip one block's `is_synced` marker after a successful merge.
    pub fn mark_synced(
        &self,
        session: &SessionId,
        block_id: &OfflineBlockId,
    ) -> Result<(), OfflineError> {
        let handle = self.existing_session(session)?;
        let mut chain = handle.lock().map_err(|_| OfflineError::LockPoisoned)?;
        let block = chain
            .blocks
            .iter_mut()
            .find(|block| block.id == *block_id)
            .ok_or_else(|| OfflineError::BlockNotFound(session.clone()))?;
        block.is_synced = true;
        Ok(())
    }

    fn state_of(session: &SessionId, chain: &SessionChain) -> ChainState {
        ChainState {
            session_id: session.clone(),
            total_blocks: chain.blocks.len() as u64,
            last_hash: chain.blocks.last().map(|block| block.curr_hash),
            pending_sync_count: chain.blocks.iter().filter(|b| !b.is_synced).count() as u64,
            created_at: chain.created_at,
            last_updated_at: chain.last_updated_at,
        }
    }
}

impl Default for OfflineLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use rcl_types::{CustodyAction, CustodyMetadata};

    use super::*;

    fn session(name: &str) -> SessionId {
        SessionId::from(name)
    }

    fn entry(resource: &str) -> OfflineEntry {
        OfflineEntry::new(resource, CustodyAction::Distribution, "field-actor-1")
            .with_metadata(CustodyMetadata::quantity(5.0, "boxes"))
    }

    #[test]
    fn session_chain_starts_at_genesis_and_stays_linked() {
        let ledger = OfflineLedger::new();
        let sid = session("mission-1");

        let first = ledger.append(&sid, entry("res-a")).unwrap();
        let second = ledger.append(&sid, entry("res-b")).unwrap();

        assert_eq!(first.block_number, 1);
        assert!(first.prev_hash.is_genesis());
        assert!(!first.is_synced);
        assert_eq!(second.block_number, 2);
        assert_eq!(second.prev_hash, first.curr_hash);

        let report = ledger.validate(&sid).unwrap();
        assert!(report.is_valid);
        assert_eq!(report.total_blocks, 2);
    }

    #[test]
    fn session_numbering_is_independent_of_resources() {
        let ledger = OfflineLedger::new();
        let sid = session("mission-2");

        // Interleave two resources; numbering follows the session, not them.
        let numbers: Vec<u64> = ["res-a", "res-b", "res-a", "res-b"]
            .iter()
            .map(|resource| ledger.append(&sid, entry(resource)).unwrap().block_number)
            .collect();
        assert_eq!(numbers, vec![1, 2, 3, 4]);
    }

    #[test]
    fn validate_flags_local_tampering() {
        let ledger = OfflineLedger::new();
        let sid = session("mission-3");
        for resource in ["res-a", "res-b", "res-c"] {
            ledger.append(&sid, entry(resource)).unwrap();
        }

        {
            let sessions = ledger.sessions.read().unwrap();
            let mut chain = sessions.get(&sid).unwrap().lock().unwrap();
            chain.blocks[1].metadata.quantity = Some(500.0);
        }

        let report = ledger.validate(&sid).unwrap();
        assert!(!report.is_valid);
        assert_eq!(report.invalid_block_numbers, vec![2, 3]);
    }

    #[test]
    fn chain_state_tracks_pending_count() {
        let ledger = OfflineLedger::new();
        let sid = session("mission-4");
        let blocks: Vec<OfflineBlock> = (0..3)
            .map(|_| ledger.append(&sid, entry("res-a")).unwrap())
            .collect();

        let state = ledger.chain_state(&sid).unwrap();
        assert_eq!(state.total_blocks, 3);
        assert_eq!(state.pending_sync_count, 3);
        assert_eq!(state.last_hash, Some(blocks[2].curr_hash));

        ledger.mark_synced(&sid, &blocks[0].id).unwrap();
        assert_eq!(ledger.chain_state(&sid).unwrap().pending_sync_count, 2);
    }

    #[test]
    fn clear_refuses_while_blocks_are_pending() {
        let ledger = OfflineLedger::new();
        let sid = session("mission-5");
        let blocks: Vec<OfflineBlock> = (0..3)
            .map(|_| ledger.append(&sid, entry("res-a")).unwrap())
            .collect();
        ledger.mark_synced(&sid, &blocks[0].id).unwrap();
        ledger.mark_synced(&sid, &blocks[1].id).unwrap();

        assert!(!ledger.clear_synced(&sid).unwrap());
        assert_eq!(ledger.chain_state(&sid).unwrap().total_blocks, 3);

        ledger.mark_synced(&sid, &blocks[2].id).unwrap();
        assert!(ledger.clear_synced(&sid).unwrap());
        assert!(matches!(
            ledger.chain_state(&sid),
            Err(OfflineError::SessionNotFound(_))
        ));
    }

    #[test]
    fn unknown_session_is_not_found() {
        let ledger = OfflineLedger::new();
        assert!(matches!(
            ledger.validate(&session("ghost")),
            Err(OfflineError::SessionNotFound(_))
        ));
    }

    #[test]
    fn active_chains_sorted_by_session() {
        let ledger = OfflineLedger::new();
        ledger.append(&session("zulu"), entry("res-a")).unwrap();
        ledger.append(&session("alpha"), entry("res-b")).unwrap();

        let states = ledger.active_chains().unwrap();
        assert_eq!(states.len(), 2);
        assert_eq!(states[0].session_id, session("alpha"));
        assert_eq!(states[1].session_id, session("zulu"));
    }
}
