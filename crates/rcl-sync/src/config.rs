use std::time::Duration;

/// What a sync pass does when one block fails to merge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SyncMode {
    /// Keep going past failures so the rest of the session still lands.
    /// Maximum progress, but no causal ordering across resources when
    /// failures are interleaved.
    #[default]
    BestEffort,
    /// Halt the pass at the first failure, preserving ordering at the cost
    /// of progress.
    StopOnError,
}

/// Reconciliation configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SyncConfig {
    pub mode: SyncMode,
    /// Cadence of the background sweep over sessions with pending blocks.
    pub sweep_interval: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            mode: SyncMode::default(),
            sweep_interval: Duration::from_secs(30),
        }
    }
}
