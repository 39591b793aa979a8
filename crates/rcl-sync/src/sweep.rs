use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use rcl_ledger::ChainWriter;

use crate::engine::SyncEngine;

/// Handle to the background reconciliation sweep.
///
/// The sweep only stops between sessions, never mid-pass; aborted work is
/// resumable because `is_synced` is the sole progress marker.
pub struct SweepHandle {
    task: JoinHandle<()>,
}

impl SweepHandle {
    /// Stop the sweep. In-flight session passes finish on their own.
    pub fn abort(&self) {
        self.task.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Spawn the periodic reconciliation sweep.
///
/// Every `interval`, each session with pending blocks gets a `retry` with
/// the same per-session serialization as a live call. Failures are logged
/// and left for the next tick.
pub fn spawn_sweep<W>(engine: Arc<SyncEngine<W>>, interval: Duration) -> SweepHandle
where
    W: ChainWriter + 'static,
{
    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            sweep_once(&engine);
        }
    });
    SweepHandle { task }
}

/// One sweep pass: retry every session with pending blocks.
/// Returns the number of sessions attempted.
pub fn sweep_once<W: ChainWriter>(engine: &SyncEngine<W>) -> usize {
    let states = match engine.offline().active_chains() {
        Ok(states) => states,
        Err(e) => {
            warn!(error = %e, "sweep could not list session chains");
            return 0;
        }
    };

    let mut attempted = 0;
    for state in states {
        if state.pending_sync_count == 0 {
            continue;
        }
        attempted += 1;
        match engine.retry(&state.session_id) {
            Ok(report) if report.success => {
                debug!(
                    session = %report.session_id,
                    synced = report.synced_count,
                    "sweep drained session"
                );
            }
            Ok(report) => {
                warn!(
                    session = %report.session_id,
                    synced = report.synced_count,
                    failed = report.failed_count,
                    "sweep left blocks pending"
                );
            }
            Err(e) => {
                warn!(session = %state.session_id, error = %e, "sweep pass failed");
            }
        }
    }
    attempted
}

#[cfg(test)]
mod tests {
    use rcl_ledger::{ChainReader, InMemoryLedger};
    use rcl_offline::{OfflineEntry, OfflineLedger};
    use rcl_types::{CustodyAction, ResourceId, SessionId};

    use crate::config::SyncConfig;

    use super::*;

    fn setup() -> (Arc<SyncEngine<InMemoryLedger>>, Arc<OfflineLedger>, Arc<InMemoryLedger>) {
        let offline = Arc::new(OfflineLedger::new());
        let ledger = Arc::new(InMemoryLedger::new());
        let engine = Arc::new(SyncEngine::new(
            Arc::clone(&offline),
            Arc::clone(&ledger),
            SyncConfig::default(),
        ));
        (engine, offline, ledger)
    }

    fn entry(resource: &str) -> OfflineEntry {
        OfflineEntry::new(resource, CustodyAction::Distribution, "field-actor-1")
    }

    #[test]
    fn sweep_once_targets_only_pending_sessions() {
        let (engine, offline, ledger) = setup();
        offline
            .append(&SessionId::from("busy"), entry("res-a"))
            .unwrap();
        offline
            .append(&SessionId::from("busy"), entry("res-b"))
            .unwrap();

        // A fully synced session is skipped on the next pass.
        offline
            .append(&SessionId::from("done"), entry("res-c"))
            .unwrap();
        engine.sync_to_ledger(&SessionId::from("done")).unwrap();

        assert_eq!(sweep_once(&engine), 1);
        assert_eq!(
            offline
                .chain_state(&SessionId::from("busy"))
                .unwrap()
                .pending_sync_count,
            0
        );
        assert_eq!(ledger.block_count(&ResourceId::from("res-a")).unwrap(), 1);
        assert_eq!(sweep_once(&engine), 0);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn spawned_sweep_drains_sessions_until_aborted() {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
        let (engine, offline, _ledger) = setup();
        let session = SessionId::from("mission-1");
        for resource in ["res-a", "res-b", "res-c"] {
            offline.append(&session, entry(resource)).unwrap();
        }

        let handle = spawn_sweep(Arc::clone(&engine), Duration::from_millis(10));
        for _ in 0..100 {
            if offline.chain_state(&session).unwrap().pending_sync_count == 0 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(offline.chain_state(&session).unwrap().pending_sync_count, 0);

        handle.abort();
    }
}
