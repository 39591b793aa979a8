use serde::{Deserialize, Serialize};

use rcl_crypto::{BlockHasher, ChainLink, CryptoError, OfflinePayload};
use rcl_types::{
    ActorId, ChainHash, CustodyAction, CustodyMetadata, EventStamp, OfflineBlockId, ResourceId,
    SessionId,
};

/// One entry in a mission session's local chain.
///
/// Chained within the session, not within a resource: block numbers restart
/// at 1 per session and detect local tampering or reordering before sync.
/// After a successful sync `is_synced` flips true; the authoritative chain
/// gets its own, separate block that merely references this one's hash.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfflineBlock {
    pub id: OfflineBlockId,
    pub session_id: SessionId,
    pub resource_id: ResourceId,
    pub action: CustodyAction,
    pub actor_id: ActorId,
    pub metadata: CustodyMetadata,
    pub timestamp: EventStamp,
    pub prev_hash: ChainHash,
    pub curr_hash: ChainHash,
    /// 1-based, gapless, per session.
    pub block_number: u64,
    pub is_synced: bool,
}

impl OfflineBlock {
    /// Canonical view of the hashed fields.
    pub fn payload(&self) -> OfflinePayload<'_> {
        OfflinePayload {
            session_id: &self.session_id,
            resource_id: &self.resource_id,
            action: self.action,
            actor_id: &self.actor_id,
            metadata: &self.metadata,
            prev_hash: &self.prev_hash,
            timestamp: self.timestamp,
            block_number: self.block_number,
        }
    }
}

impl ChainLink for OfflineBlock {
    fn block_number(&self) -> u64 {
        self.block_number
    }

    fn prev_hash(&self) -> &ChainHash {
        &self.prev_hash
    }

    fn curr_hash(&self) -> &ChainHash {
        &self.curr_hash
    }

    fn recompute_hash(&self) -> Result<ChainHash, CryptoError> {
        BlockHasher::OFFLINE.hash_value(&self.payload())
    }
}

/// Input for one offline append: the custody facts that will later be
/// forwarded verbatim to the resource ledger.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfflineEntry {
    pub resource_id: ResourceId,
    pub action: CustodyAction,
    pub actor_id: ActorId,
    #[serde(default)]
    pub metadata: CustodyMetadata,
}

impl OfflineEntry {
    pub fn new(
        resource_id: impl Into<ResourceId>,
        action: CustodyAction,
        actor_id: impl Into<ActorId>,
    ) -> Self {
        Self {
            resource_id: resource_id.into(),
            action,
            actor_id: actor_id.into(),
            metadata: CustodyMetadata::default(),
        }
    }

    pub fn with_metadata(mut self, metadata: CustodyMetadata) -> Self {
        self.metadata = metadata;
        self
    }
}
