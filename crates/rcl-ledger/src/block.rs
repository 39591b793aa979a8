use serde::{Deserialize, Serialize};

use rcl_crypto::{BlockHasher, BlockPayload, ChainLink, CryptoError};
use rcl_types::{
    ActorId, BlockId, ChainHash, CustodyAction, CustodyMetadata, EventStamp, ResourceId,
};

/// One entry in a resource's authoritative custody chain.
///
/// Created once and never mutated. The digest covers `resource_id`,
/// `resource_name`, `action`, `actor_id`, `metadata`, `prev_hash`,
/// `timestamp`, and `block_number`; the actor display name and the optional
/// external signature stay outside it. `is_valid` is bookkeeping set true at
/// creation — chain validation never rewrites it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub id: BlockId,
    pub resource_id: ResourceId,
    pub resource_name: String,
    pub action: CustodyAction,
    pub actor_id: ActorId,
    pub actor_name: Option<String>,
    pub metadata: CustodyMetadata,
    pub timestamp: EventStamp,
    pub prev_hash: ChainHash,
    pub curr_hash: ChainHash,
    /// 1-based, gapless, per resource.
    pub block_number: u64,
    /// Opaque external signature; the ledger neither creates nor checks it.
    pub signature: Option<String>,
    pub is_valid: bool,
}

impl Block {
    /// Canonical view of the hashed fields.
    pub fn payload(&self) -> BlockPayload<'_> {
        BlockPayload {
            resource_id: &self.resource_id,
            resource_name: &self.resource_name,
            action: self.action,
            actor_id: &self.actor_id,
            metadata: &self.metadata,
            prev_hash: &self.prev_hash,
            timestamp: self.timestamp,
            block_number: self.block_number,
        }
    }
}

impl ChainLink for Block {
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
        BlockHasher::BLOCK.hash_value(&self.payload())
    }
}

/// Input for appending one block to a resource chain.
///
/// The ledger assigns id, block number, previous hash, digest, and timestamp.
/// When `resource_name` is absent the chain's current name is inherited.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBlock {
    pub resource_id: ResourceId,
    #[serde(default)]
    pub resource_name: Option<String>,
    pub action: CustodyAction,
    pub actor_id: ActorId,
    #[serde(default)]
    pub actor_name: Option<String>,
    #[serde(default)]
    pub metadata: CustodyMetadata,
    #[serde(default)]
    pub signature: Option<String>,
}

impl NewBlock {
    pub fn new(
        resource_id: impl Into<ResourceId>,
        action: CustodyAction,
        actor_id: impl Into<ActorId>,
    ) -> Self {
        Self {
            resource_id: resource_id.into(),
            resource_name: None,
            action,
            actor_id: actor_id.into(),
            actor_name: None,
            metadata: CustodyMetadata::default(),
            signature: None,
        }
    }

    pub fn named(mut self, resource_name: impl Into<String>) -> Self {
        self.resource_name = Some(resource_name.into());
        self
    }

    pub fn with_metadata(mut self, metadata: CustodyMetadata) -> Self {
        self.metadata = metadata;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_block_deserializes_with_optional_fields_absent() {
        let body = serde_json::json!({
            "resourceId": "res-9",
            "action": "transfer",
            "actorId": "actor-1"
        });
        let parsed: NewBlock = serde_json::from_value(body).unwrap();
        assert_eq!(parsed.resource_id, ResourceId::from("res-9"));
        assert!(parsed.resource_name.is_none());
        assert_eq!(parsed.metadata, CustodyMetadata::default());
    }

    #[test]
    fn block_serializes_hashes_as_hex() {
        let block = Block {
            id: BlockId::new(),
            resource_id: ResourceId::from("res-1"),
            resource_name: "Tarpaulins".into(),
            action: CustodyAction::Transfer,
            actor_id: ActorId::from("actor-2"),
            actor_name: None,
            metadata: CustodyMetadata::default(),
            timestamp: EventStamp::new(1_700_000_000_000, 0),
            prev_hash: ChainHash::GENESIS,
            curr_hash: ChainHash::from_digest([0xcd; 32]),
            block_number: 1,
            signature: None,
            is_valid: true,
        };
        let value = serde_json::to_value(&block).unwrap();
        assert_eq!(value["prevHash"], serde_json::json!("0".repeat(64)));
        assert_eq!(value["currHash"], serde_json::json!("cd".repeat(32)));
    }
}
