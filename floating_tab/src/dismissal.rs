use chrono::Duration;
use tracing::warn;

use crate::storage::KeyValueStore;

/// How long an explicit close suppresses automatic starts.
pub const DISMISSAL_WINDOW: Duration = Duration::hours(24);

/// Whether a close recorded at `closed_at_ms` still suppresses the widget
/// at `now_ms`. Both values are milliseconds since the Unix epoch.
pub fn is_recently_dismissed(now_ms: i64, closed_at_ms: Option<i64>) -> bool {
    closed_at_ms.is_some_and(|closed_at| {
        now_ms.saturating_sub(closed_at) < DISMISSAL_WINDOW.num_milliseconds()
    })
}

/// Reads and writes the dismissal record.
///
/// Storage failures never reach the caller: unreadable or unparsable
/// records read as absent and failed writes are only logged.
pub struct DismissalStore {
    store: Box<dyn KeyValueStore>,
    key: String,
}

impl DismissalStore {
    pub fn new(store: Box<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// The recorded close time, if one exists and is not later than
    /// `now_ms`. A record from the future can only be corrupt.
    pub fn closed_at(&self, now_ms: i64) -> Option<i64> {
        let raw = match self.store.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!("Failed to read dismissal record {}: {}", self.key, e);
                return None;
            }
        };

        match raw.trim().parse::<i64>() {
            Ok(closed_at) if closed_at > now_ms => {
                warn!(
                    "Ignoring dismissal record {}={} later than now ({})",
                    self.key, closed_at, now_ms
                );
                None
            }
            Ok(closed_at) => Some(closed_at),
            Err(e) => {
                warn!(
                    "Ignoring unparsable dismissal record {}={:?}: {}",
                    self.key, raw, e
                );
                None
            }
        }
    }

    pub fn record_close(&mut self, now_ms: i64) {
        if let Err(e) = self.store.set(&self.key, &now_ms.to_string()) {
            warn!("Failed to persist dismissal record {}: {}", self.key, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, StorageError};

    const HOUR_MS: i64 = 60 * 60 * 1000;
    const NOW: i64 = 1_760_000_000_000;

    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable("denied".to_string()))
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("denied".to_string()))
        }
    }

    #[test]
    fn test_closed_23_hours_ago_is_recent() {
        assert!(is_recently_dismissed(NOW, Some(NOW - 23 * HOUR_MS)));
    }

    #[test]
    fn test_closed_25_hours_ago_is_not_recent() {
        assert!(!is_recently_dismissed(NOW, Some(NOW - 25 * HOUR_MS)));
    }

    #[test]
    fn test_never_closed_is_not_recent() {
        assert!(!is_recently_dismissed(NOW, None));
    }

    #[test]
    fn test_window_boundary_is_exclusive() {
        assert!(!is_recently_dismissed(NOW, Some(NOW - 24 * HOUR_MS)));
        assert!(is_recently_dismissed(NOW, Some(NOW - 24 * HOUR_MS + 1)));
    }

    #[test]
    fn test_record_close_round_trips_through_store() {
        let store = MemoryStore::new();
        let mut dismissal = DismissalStore::new(Box::new(store.clone()), "k");

        dismissal.record_close(NOW);

        assert_eq!(store.get("k").unwrap(), Some(NOW.to_string()));
        assert_eq!(dismissal.closed_at(NOW), Some(NOW));
    }

    #[test]
    fn test_corrupt_record_reads_as_absent() {
        let mut store = MemoryStore::new();
        store.set("k", "yesterday").unwrap();

        let dismissal = DismissalStore::new(Box::new(store), "k");

        assert_eq!(dismissal.closed_at(NOW), None);
    }

    #[test]
    fn test_future_record_reads_as_absent() {
        let mut store = MemoryStore::new();
        store.set("k", &i64::MAX.to_string()).unwrap();
        store.set("later", &(NOW + 1).to_string()).unwrap();

        let far = DismissalStore::new(Box::new(store.clone()), "k");
        let near = DismissalStore::new(Box::new(store), "later");

        assert_eq!(far.closed_at(NOW), None);
        assert_eq!(near.closed_at(NOW), None);
        assert_eq!(near.closed_at(NOW + 1), Some(NOW + 1));
    }

    #[test]
    fn test_storage_errors_fail_open() {
        let mut dismissal = DismissalStore::new(Box::new(BrokenStore), "k");

        dismissal.record_close(NOW);

        assert_eq!(dismissal.closed_at(NOW), None);
    }
}
