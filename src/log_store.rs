use chrono::Utc;
use parking_lot::RwLock;
use tracing::debug;

use crate::models::{LogEntry, LogRecord};

/// Append-only, process-lifetime record of translation attempts.
///
/// Appends never fail and never touch I/O. Entries are stamped under the
/// write lock, so timestamps never go backwards in insertion order even if
/// the wall clock does.
#[derive(Debug, Default)]
pub struct RequestLogStore {
    entries: RwLock<Vec<LogEntry>>,
}

impl RequestLogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&self, record: LogRecord) -> LogEntry {
        let mut entries = self.entries.write();

        let now = Utc::now();
        let timestamp = match entries.last() {
            Some(last) if last.timestamp > now => last.timestamp,
            _ => now,
        };

        let entry = LogEntry::from_record(record, timestamp);
        debug!(
            "Log added: id={} status={:?} target={}",
            entry.id, entry.status, entry.target_language
        );
        entries.push(entry.clone());
        entry
    }

    /// Snapshot of every entry in insertion order
    pub fn list_all(&self) -> Vec<LogEntry> {
        self.entries.read().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LogStatus;
    use std::sync::Arc;

    fn record(text: &str) -> LogRecord {
        LogRecord::success(text.to_string(), "ta".to_string(), format!("{}!", text))
    }

    #[test]
    fn keeps_insertion_order() {
        let store = RequestLogStore::new();
        store.append(record("one"));
        store.append(LogRecord::error(
            "two".to_string(),
            "fr".to_string(),
            "unsupported".to_string(),
        ));
        store.append(record("three"));

        let entries = store.list_all();
        let texts: Vec<_> = entries.iter().map(|e| e.source_text.as_str()).collect();
        assert_eq!(texts, ["one", "two", "three"]);
        assert_eq!(entries[1].status, LogStatus::Error);
        assert_eq!(entries[1].error_message.as_deref(), Some("unsupported"));
        assert!(entries.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
    }

    #[test]
    fn snapshot_is_unaffected_by_later_appends() {
        let store = RequestLogStore::new();
        store.append(record("before"));

        let snapshot = store.list_all();
        store.append(record("after"));

        assert_eq!(snapshot.len(), 1);
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn concurrent_appends_are_all_kept() {
        let store = Arc::new(RequestLogStore::new());
        let mut handles = Vec::new();
        for i in 0..16 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                for j in 0..10 {
                    store.append(record(&format!("{}-{}", i, j)));
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let entries = store.list_all();
        assert_eq!(entries.len(), 160);
        assert!(entries.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
    }
}
