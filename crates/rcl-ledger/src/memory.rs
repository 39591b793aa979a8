use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use tracing::debug;

use rcl_crypto::BlockHasher;
use rcl_types::{BlockId, ChainHash, EventStamp, ResourceId};

use crate::block::{Block, NewBlock};
use crate::error::LedgerError;
use crate::traits::{ChainReader, ChainWriter};

/// In-memory ledger for tests, local demos, and embedding.
///
/// Each resource chain lives behind its own mutex; the outer map lock is held
/// only long enough to locate or create a chain. Appends for one resource are
/// serialized, appends for different resources run concurrently, and readers
/// clone out committed blocks.
pub struct InMemoryLedger {
    chains: RwLock<HashMap<ResourceId, Arc<Mutex<ResourceChain>>>>,
    block_index: RwLock<HashMap<BlockId, ResourceId>>,
}

#[derive(Default)]
struct ResourceChain {
    blocks: Vec<Block>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self {
            chains: RwLock::new(HashMap::new()),
            block_index: RwLock::new(HashMap::new()),
        }
    }

    fn chain_handle(
        &self,
        resource: &ResourceId,
    ) -> Result<Arc<Mutex<ResourceChain>>, LedgerError> {
        if let Some(chain) = self
            .chains
            .read()
            .map_err(|_| LedgerError::LockPoisoned)?
            .get(resource)
        {
            return Ok(Arc::clone(chain));
        }

        let mut chains = self.chains.write().map_err(|_| LedgerError::LockPoisoned)?;
        Ok(Arc::clone(chains.entry(resource.clone()).or_default()))
    }

    fn existing_chain(
        &self,
        resource: &ResourceId,
    ) -> Result<Option<Arc<Mutex<ResourceChain>>>, LedgerError> {
        Ok(self
            .chains
            .read()
            .map_err(|_| LedgerError::LockPoisoned)?
            .get(resource)
            .map(Arc::clone))
    }
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl ChainWriter for InMemoryLedger {
    fn append(&self, new_block: NewBlock) -> Result<Block, LedgerError> {
        let resource = new_block.resource_id.clone();
        let handle = self.chain_handle(&resource)?;

        // Per-resource serialization boundary. A poisoned chain mutex means a
        // previous append died mid-write; surface it as a retryable conflict.
        let mut chain = handle
            .lock()
            .map_err(|_| LedgerError::WriteConflict(resource.clone()))?;

        let (block_number, prev_hash, timestamp, inherited_name) = match chain.blocks.last() {
            Some(last) => (
                last.block_number + 1,
                last.curr_hash,
                EventStamp::next_after(&last.timestamp),
                Some(last.resource_name.clone()),
            ),
            None => (1, ChainHash::GENESIS, EventStamp::now(), None),
        };

        let resource_name = new_block
            .resource_name
            .or(inherited_name)
            .unwrap_or_default();

        let mut block = Block {
            id: BlockId::new(),
            resource_id: resource.clone(),
            resource_name,
            action: new_block.action,
            actor_id: new_block.actor_id,
            actor_name: new_block.actor_name,
            metadata: new_block.metadata,
            timestamp,
            prev_hash,
            curr_hash: ChainHash::GENESIS,
            block_number,
            signature: new_block.signature,
            is_valid: true,
        };
        block.curr_hash = BlockHasher::BLOCK.hash_value(&block.payload())?;

        chain.blocks.push(block.clone());
        drop(chain);

        self.block_index
            .write()
            .map_err(|_| LedgerError::LockPoisoned)?
            .insert(block.id, resource.clone());

        debug!(
            resource = %resource,
            number = block.block_number,
            action = %block.action,
            hash = %block.curr_hash.short_hex(),
            "appended custody block"
        );
        Ok(block)
    }
}

impl ChainReader for InMemoryLedger {
    fn latest(&self, resource: &ResourceId) -> Result<Option<Block>, LedgerError> {
        let Some(handle) = self.existing_chain(resource)? else {
            return Ok(None);
        };
        let chain = handle.lock().map_err(|_| LedgerError::LockPoisoned)?;
        Ok(chain.blocks.last().cloned())
    }

    fn read_chain(&self, resource: &ResourceId) -> Result<Vec<Block>, LedgerError> {
        let Some(handle) = self.existing_chain(resource)? else {
            return Ok(vec![]);
        };
        let chain = handle.lock().map_err(|_| LedgerError::LockPoisoned)?;
        Ok(chain.blocks.clone())
    }

    fn read_ledger(&self) -> Result<Vec<Block>, LedgerError> {
        let handles: Vec<_> = {
            let chains = self.chains.read().map_err(|_| LedgerError::LockPoisoned)?;
            chains.values().map(Arc::clone).collect()
        };

        let mut blocks = Vec::new();
        for handle in handles {
            let chain = handle.lock().map_err(|_| LedgerError::LockPoisoned)?;
            blocks.extend(chain.blocks.iter().cloned());
        }
        blocks.sort_by_key(|block| (block.timestamp, block.block_number));
        Ok(blocks)
    }

    fn get_block(&self, id: &BlockId) -> Result<Option<Block>, LedgerError> {
        let resource = {
            let index = self
                .block_index
                .read()
                .map_err(|_| LedgerError::LockPoisoned)?;
            index.get(id).cloned()
        };
        let Some(resource) = resource else {
            return Ok(None);
        };

        let blocks = self.read_chain(&resource)?;
        Ok(blocks.into_iter().find(|block| block.id == *id))
    }

    fn resource_ids(&self) -> Result<Vec<ResourceId>, LedgerError> {
        let chains = self.chains.read().map_err(|_| LedgerError::LockPoisoned)?;
        let mut ids: Vec<_> = chains
            .iter()
            .filter(|(_, handle)| {
                handle
                    .lock()
                    .map(|chain| !chain.blocks.is_empty())
                    .unwrap_or(false)
            })
            .map(|(id, _)| id.clone())
            .collect();
        ids.sort();
        Ok(ids)
    }

    fn block_count(&self, resource: &ResourceId) -> Result<u64, LedgerError> {
        let Some(handle) = self.existing_chain(resource)? else {
            return Ok(0);
        };
        let chain = handle.lock().map_err(|_| LedgerError::LockPoisoned)?;
        Ok(chain.blocks.len() as u64)
    }
}
