use serde::Serialize;

use rcl_types::{ActorId, ChainHash, CustodyAction, CustodyMetadata, EventStamp, ResourceId, SessionId};

use crate::hasher::CryptoError;

/// Canonical view of the fields an authoritative block hash covers.
///
/// Field order here IS the canonical byte order: serialization goes through
/// `serde_json::to_vec`, which emits struct fields in declaration order and
/// the metadata side map in key order. The resource name is part of the
/// digest; the actor display name and any external signature are not.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockPayload<'a> {
    pub resource_id: &'a ResourceId,
    pub resource_name: &'a str,
    pub action: CustodyAction,
    pub actor_id: &'a ActorId,
    pub metadata: &'a CustodyMetadata,
    pub prev_hash: &'a ChainHash,
    pub timestamp: EventStamp,
    pub block_number: u64,
}

impl BlockPayload<'_> {
    /// Deterministic byte representation of this payload.
    pub fn canonical_bytes(&self) -> Result<Vec<u8>, CryptoError> {
        serde_json::to_vec(self).map_err(|e| CryptoError::Serialization(e.to_string()))
    }
}

/// Canonical view of the fields an offline block hash covers.
///
/// Offline chains are scoped to a field session, so the session id is bound
/// into the digest alongside the forwarded custody fields.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OfflinePayload<'a> {
    pub session_id: &'a SessionId,
    pub resource_id: &'a ResourceId,
    pub action: CustodyAction,
    pub actor_id: &'a ActorId,
    pub metadata: &'a CustodyMetadata,
    pub prev_hash: &'a ChainHash,
    pub timestamp: EventStamp,
    pub block_number: u64,
}

impl OfflinePayload<'_> {
    /// Deterministic byte representation of this payload.
    pub fn canonical_bytes(&self) -> Result<Vec<u8>, CryptoError> {
        serde_json::to_vec(self).map_err(|e| CryptoError::Serialization(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hasher::BlockHasher;
    use proptest::prelude::*;
    use serde_json::Value;
    use std::collections::BTreeMap;

    fn payload_hash(metadata: &CustodyMetadata) -> ChainHash {
        let payload = BlockPayload {
            resource_id: &ResourceId::from("res-1"),
            resource_name: "Rice 25kg bags",
            action: CustodyAction::InboundDonation,
            actor_id: &ActorId::from("actor-7"),
            metadata,
            prev_hash: &ChainHash::GENESIS,
            timestamp: EventStamp::new(1_700_000_000_000, 0),
            block_number: 1,
        };
        BlockHasher::BLOCK.hash_value(&payload).unwrap()
    }

    #[test]
    fn canonical_bytes_are_stable() {
        let metadata = CustodyMetadata::quantity(120.0, "kg");
        let payload = BlockPayload {
            resource_id: &ResourceId::from("res-1"),
            resource_name: "Rice 25kg bags",
            action: CustodyAction::InboundDonation,
            actor_id: &ActorId::from("actor-7"),
            metadata: &metadata,
            prev_hash: &ChainHash::GENESIS,
            timestamp: EventStamp::new(1_700_000_000_000, 0),
            block_number: 1,
        };
        assert_eq!(
            payload.canonical_bytes().unwrap(),
            payload.canonical_bytes().unwrap()
        );
    }

    #[test]
    fn resource_name_is_part_of_the_digest() {
        let metadata = CustodyMetadata::default();
        let base = payload_hash(&metadata);
        let renamed = BlockPayload {
            resource_id: &ResourceId::from("res-1"),
            resource_name: "Rice 50kg bags",
            action: CustodyAction::InboundDonation,
            actor_id: &ActorId::from("actor-7"),
            metadata: &metadata,
            prev_hash: &ChainHash::GENESIS,
            timestamp: EventStamp::new(1_700_000_000_000, 0),
            block_number: 1,
        };
        assert_ne!(base, BlockHasher::BLOCK.hash_value(&renamed).unwrap());
    }

    #[test]
    fn offline_payload_binds_session_id() {
        let metadata = CustodyMetadata::default();
        let make = |session: &SessionId| {
            let payload = OfflinePayload {
                session_id: session,
                resource_id: &ResourceId::from("res-1"),
                action: CustodyAction::Distribution,
                actor_id: &ActorId::from("actor-7"),
                metadata: &metadata,
                prev_hash: &ChainHash::GENESIS,
                timestamp: EventStamp::new(1_700_000_000_000, 0),
                block_number: 1,
            };
            BlockHasher::OFFLINE.hash_value(&payload).unwrap()
        };
        assert_ne!(
            make(&SessionId::from("mission-a")),
            make(&SessionId::from("mission-b"))
        );
    }

    proptest! {
        #[test]
        fn digest_is_deterministic_over_metadata(
            quantity in proptest::option::of(0.0f64..1e9),
            unit in proptest::option::of("[a-z]{1,8}"),
            notes in proptest::option::of(".{0,40}"),
            extras in proptest::collection::btree_map("[a-zA-Z]{1,12}", "[ -~]{0,20}", 0..6),
        ) {
            let mut metadata = CustodyMetadata {
                quantity,
                unit,
                notes,
                ..CustodyMetadata::default()
            };
            let extras: BTreeMap<String, Value> = extras
                .into_iter()
                .map(|(k, v)| (k, Value::from(v)))
                .collect();
            metadata.extra = extras;

            prop_assert_eq!(payload_hash(&metadata), payload_hash(&metadata.clone()));
        }
    }
}
