use thiserror::Error;

/// Structural failures of a reconciliation call.
///
/// Per-block merge failures are NOT errors — they are collected into the
/// returned [`crate::SyncReport`] so the pass can keep going.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SyncError {
    #[error("offline ledger error: {0}")]
    Offline(#[from] rcl_offline::OfflineError),

    #[error("ledger error: {0}")]
    Ledger(#[from] rcl_ledger::LedgerError),
}

pub type SyncResult<T> = Result<T, SyncError>;
