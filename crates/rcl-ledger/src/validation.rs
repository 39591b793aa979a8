use std::collections::{BTreeMap, HashSet};

use rcl_crypto::{ChainVerifier, LinkFault};
use rcl_types::{BlockId, ResourceId};

use crate::error::LedgerError;
use crate::traits::ChainReader;

/// Result of validating one resource chain.
///
/// Produced on demand; never persisted and never written back into the
/// blocks' stored `is_valid` flags.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChainReport {
    pub resource_id: ResourceId,
    pub is_valid: bool,
    pub total_blocks: u64,
    /// Every block whose link or digest failed verification, in chain order.
    pub invalid_block_ids: Vec<BlockId>,
    /// The highest block that verified cleanly, if any.
    pub last_verified_block_id: Option<BlockId>,
    pub faults: Vec<LinkFault>,
}

/// On-demand chain integrity validator.
///
/// Deterministic, side-effect-free, O(n) per chain. Walks every block and
/// reports every broken link rather than stopping at the first, so a
/// downstream UI can show exactly which steps of history are suspect.
pub struct ChainValidator;

impl ChainValidator {
    /// Validate a single resource chain.
    pub fn validate_chain<R: ChainReader>(
        reader: &R,
        resource: &ResourceId,
    ) -> Result<ChainReport, LedgerError> {
        let blocks = reader.read_chain(resource)?;
        let faults = ChainVerifier::verify(&blocks);

        let bad_indices: HashSet<usize> = faults.iter().map(|fault| fault.index).collect();
        let mut invalid_block_ids = Vec::new();
        let mut last_verified_block_id = None;
        for (index, block) in blocks.iter().enumerate() {
            if bad_indices.contains(&index) {
                invalid_block_ids.push(block.id);
            } else {
                last_verified_block_id = Some(block.id);
            }
        }

        Ok(ChainReport {
            resource_id: resource.clone(),
            is_valid: faults.is_empty(),
            total_blocks: blocks.len() as u64,
            invalid_block_ids,
            last_verified_block_id,
            faults,
        })
    }

    /// Validate every chain known to the ledger.
    pub fn validate_all<R: ChainReader>(
        reader: &R,
    ) -> Result<BTreeMap<ResourceId, ChainReport>, LedgerError> {
        let mut reports = BTreeMap::new();
        for resource in reader.resource_ids()? {
            let report = Self::validate_chain(reader, &resource)?;
            reports.insert(resource, report);
        }
        Ok(reports)
    }
}
