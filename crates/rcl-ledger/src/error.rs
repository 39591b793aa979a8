use rcl_types::ResourceId;

use crate::block::Block;

/// Errors produced by ledger operations.
///
/// Broken chains and partial sync results are NOT errors — validation and
/// reconciliation return structured reports instead.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LedgerError {
    /// A concurrent append for the same resource could not be serialized.
    /// The caller should retry the whole append.
    #[error("concurrent append conflict on resource {0}")]
    WriteConflict(ResourceId),

    #[error("resource {0} not found")]
    ResourceNotFound(ResourceId),

    #[error("block not found")]
    BlockNotFound,

    #[error("ledger lock poisoned")]
    LockPoisoned,

    #[error("crypto error: {0}")]
    Crypto(#[from] rcl_crypto::CryptoError),
}

/// A batch append that failed partway.
///
/// `appended` holds every block created before the failure, in order, so the
/// caller always knows which entries succeeded.
#[derive(Debug, thiserror::Error)]
#[error("batch append failed at entry {index}: {source}")]
pub struct BatchAppendError {
    pub appended: Vec<Block>,
    pub index: usize,
    pub source: LedgerError,
}
