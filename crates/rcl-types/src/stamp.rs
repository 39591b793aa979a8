use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Timestamp assigned to a block at creation.
///
/// Combines wall-clock milliseconds with a logical counter so that stamps
/// within one chain are strictly increasing even when several blocks land in
/// the same millisecond. Ordering: `physical_ms` → `logical` (total order).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventStamp {
    /// Wall-clock milliseconds since UNIX epoch.
    pub physical_ms: u64,
    /// Logical counter for events at the same physical time.
    pub logical: u32,
}

impl EventStamp {
    /// Create a stamp with explicit values.
    pub fn new(physical_ms: u64, logical: u32) -> Self {
        Self {
            physical_ms,
            logical,
        }
    }

    /// Stamp for the current wall-clock time.
    pub fn now() -> Self {
        let physical_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;
        Self {
            physical_ms,
            logical: 0,
        }
    }

    /// The zero stamp.
    pub const fn zero() -> Self {
        Self {
            physical_ms: 0,
            logical: 0,
        }
    }

    /// A stamp for "now" that is guaranteed strictly after `prev`.
    ///
    /// If the wall clock has not advanced past `prev`, the logical counter
    /// breaks the tie. This keeps per-chain timestamps a total order.
    pub fn next_after(prev: &Self) -> Self {
        let now = Self::now();
        if now.physical_ms > prev.physical_ms {
            now
        } else {
            Self {
                physical_ms: prev.physical_ms,
                logical: prev.logical.saturating_add(1),
            }
        }
    }
}

impl PartialOrd for EventStamp {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EventStamp {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.physical_ms
            .cmp(&other.physical_ms)
            .then(self.logical.cmp(&other.logical))
    }
}

impl fmt::Debug for EventStamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EventStamp({}ms.{})", self.physical_ms, self.logical)
    }
}

impl fmt::Display for EventStamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.physical_ms, self.logical)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_physical_first() {
        assert!(EventStamp::new(100, 5) < EventStamp::new(200, 0));
    }

    #[test]
    fn ordering_logical_second() {
        assert!(EventStamp::new(100, 1) < EventStamp::new(100, 2));
    }

    #[test]
    fn next_after_is_strictly_increasing() {
        let mut stamp = EventStamp::now();
        for _ in 0..100 {
            let next = EventStamp::next_after(&stamp);
            assert!(next > stamp);
            stamp = next;
        }
    }

    #[test]
    fn next_after_future_stamp_uses_logical_counter() {
        let future = EventStamp::new(u64::MAX - 1, 3);
        let next = EventStamp::next_after(&future);
        assert_eq!(next.physical_ms, future.physical_ms);
        assert_eq!(next.logical, 4);
    }

    #[test]
    fn now_produces_reasonable_timestamp() {
        let stamp = EventStamp::now();
        // After 2020-01-01 (1577836800000 ms).
        assert!(stamp.physical_ms > 1_577_836_800_000);
        assert_eq!(stamp.logical, 0);
    }

    #[test]
    fn serde_roundtrip() {
        let stamp = EventStamp::new(1234567890, 42);
        let json = serde_json::to_string(&stamp).unwrap();
        let parsed: EventStamp = serde_json::from_str(&json).unwrap();
        assert_eq!(stamp, parsed);
    }
}
