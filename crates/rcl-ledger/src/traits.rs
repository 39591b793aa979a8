use rcl_types::{BlockId, ResourceId};

use crate::block::{Block, NewBlock};
use crate::error::{BatchAppendError, LedgerError};

/// Write boundary for authoritative custody chains.
///
/// Implementations must serialize appends per `resource_id`: two concurrent
/// appends for the same resource must never both observe the same latest
/// block. An implementation that cannot uphold this atomically (e.g. an
/// optimistic transactional backend) surfaces
/// [`LedgerError::WriteConflict`] and the caller retries. Appends for
/// different resources may proceed fully concurrently.
pub trait ChainWriter: Send + Sync {
    /// Append one block: assigns `block_number = last + 1`, links
    /// `prev_hash` to the latest block (genesis sentinel for a new chain),
    /// computes the digest, and persists durably before returning.
    fn append(&self, new_block: NewBlock) -> Result<Block, LedgerError>;

    /// Append entries sequentially, preserving caller order.
    ///
    /// Stops at the first failure and reports both the failing index and
    /// every block already appended — a partial failure is never silent.
    fn append_batch(&self, entries: Vec<NewBlock>) -> Result<Vec<Block>, BatchAppendError> {
        let mut appended = Vec::with_capacity(entries.len());
        for (index, entry) in entries.into_iter().enumerate() {
            match self.append(entry) {
                Ok(block) => appended.push(block),
                Err(source) => {
                    return Err(BatchAppendError {
                        appended,
                        index,
                        source,
                    })
                }
            }
        }
        Ok(appended)
    }
}

/// Read boundary for custody chain queries.
///
/// Readers only ever observe committed blocks — never an in-flight append.
pub trait ChainReader: Send + Sync {
    /// The latest block of a resource chain, if the chain exists.
    fn latest(&self, resource: &ResourceId) -> Result<Option<Block>, LedgerError>;

    /// A resource's full chain in ascending `block_number` order.
    /// An unknown resource reads as an empty chain.
    fn read_chain(&self, resource: &ResourceId) -> Result<Vec<Block>, LedgerError>;

    /// Every block across all chains, ordered by timestamp.
    fn read_ledger(&self) -> Result<Vec<Block>, LedgerError>;

    /// Look up a single block by id.
    fn get_block(&self, id: &BlockId) -> Result<Option<Block>, LedgerError>;

    /// All resource ids with at least one block, sorted.
    fn resource_ids(&self) -> Result<Vec<ResourceId>, LedgerError>;

    /// Number of blocks in a resource chain (0 for unknown resources).
    fn block_count(&self, resource: &ResourceId) -> Result<u64, LedgerError>;

    /// Blocks whose `metadata.receipt_number` equals the given value,
    /// ordered by timestamp. Backs the public transparency lookup.
    fn find_by_receipt(&self, receipt_number: &str) -> Result<Vec<Block>, LedgerError> {
        let blocks = self
            .read_ledger()?
            .into_iter()
            .filter(|block| block.metadata.receipt_number.as_deref() == Some(receipt_number))
            .collect();
        Ok(blocks)
    }
}
