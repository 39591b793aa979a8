use rcl_types::SessionId;

/// Errors produced by offline chain operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OfflineError {
    #[error("session {0} not found")]
    SessionNotFound(SessionId),

    #[error("offline block not found in session {0}")]
    BlockNotFound(SessionId),

    #[error("offline ledger lock poisoned")]
    LockPoisoned,

    #[error("crypto error: {0}")]
    Crypto(#[from] rcl_crypto::CryptoError),
}
