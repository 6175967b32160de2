// Request Log Module
// Keeps the most recent API requests in memory, newest first, capped at 100
// entries. Every mutation schedules a best-effort persist of the full list
// to a JSON file; persistence failures never reach the request path.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use uuid::Uuid;

/// Retention cap; the oldest entries are evicted first
pub const MAX_LOG_ENTRIES: usize = 100;

/// One recorded API request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub method: String,
    pub url: String,
    pub headers: BTreeMap<String, String>,
    pub body: Value,
    pub ip: String,
}

impl LogEntry {
    pub fn new(
        method: impl Into<String>,
        url: impl Into<String>,
        headers: BTreeMap<String, String>,
        body: Value,
        ip: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            method: method.into(),
            url: url.into(),
            headers,
            body,
            ip: ip.into(),
        }
    }
}

/// In-memory request log with fire-and-forget file persistence
#[derive(Debug)]
pub struct RequestLog {
    entries: RwLock<Vec<LogEntry>>,
    path: PathBuf,
}

impl RequestLog {
    /// Open the log backed by the given file, loading any previously
    /// persisted entries. A missing or corrupt file yields an empty log.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = load_entries(&path);
        Self {
            entries: RwLock::new(entries),
            path,
        }
    }

    /// Prepend an entry, evict beyond the cap, schedule a persist
    pub fn record(&self, entry: LogEntry) {
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(0, entry);
            entries.truncate(MAX_LOG_ENTRIES);
        }
        self.schedule_persist();
    }

    /// Drop all entries and persist the empty state
    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.write() {
            entries.clear();
        }
        self.schedule_persist();
    }

    /// Current in-memory entries, newest first
    pub fn snapshot(&self) -> Vec<LogEntry> {
        self.entries
            .read()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Write the current entries to the backing file and wait for the
    /// result. The request path uses the spawned variant instead.
    pub async fn persist(&self) -> std::io::Result<()> {
        persist_entries(&self.path, &self.snapshot()).await
    }

    fn schedule_persist(&self) {
        let snapshot = self.snapshot();
        let path = self.path.clone();
        tokio::spawn(async move {
            if let Err(error) = persist_entries(&path, &snapshot).await {
                tracing::warn!(%error, path = %path.display(), "Failed to persist request log");
            }
        });
    }
}

async fn persist_entries(path: &Path, entries: &[LogEntry]) -> std::io::Result<()> {
    let json = serde_json::to_vec_pretty(entries)?;
    tokio::fs::write(path, json).await
}

fn load_entries(path: &Path) -> Vec<LogEntry> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(_) => return Vec::new(),
    };

    match serde_json::from_slice(&bytes) {
        Ok(entries) => entries,
        Err(error) => {
            tracing::warn!(%error, path = %path.display(), "Ignoring corrupt request log file");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry(label: &str) -> LogEntry {
        LogEntry::new(
            "POST",
            "/v1/chat/completions",
            BTreeMap::new(),
            json!({ "label": label }),
            "127.0.0.1",
        )
    }

    fn temp_log() -> (tempfile::TempDir, RequestLog) {
        let dir = tempfile::tempdir().unwrap();
        let log = RequestLog::open(dir.path().join("request_logs.json"));
        (dir, log)
    }

    #[tokio::test]
    async fn test_newest_first_ordering() {
        let (_dir, log) = temp_log();
        log.record(entry("first"));
        log.record(entry("second"));

        let entries = log.snapshot();
        assert_eq!(entries[0].body["label"], "second");
        assert_eq!(entries[1].body["label"], "first");
    }

    #[tokio::test]
    async fn test_cap_evicts_oldest() {
        let (_dir, log) = temp_log();
        for i in 0..MAX_LOG_ENTRIES {
            log.record(entry(&i.to_string()));
        }
        assert_eq!(log.len(), MAX_LOG_ENTRIES);

        log.record(entry("overflow"));
        let entries = log.snapshot();
        assert_eq!(entries.len(), MAX_LOG_ENTRIES);
        assert_eq!(entries[0].body["label"], "overflow");
        // Entry "0" (the oldest) fell off the tail
        assert_eq!(entries.last().unwrap().body["label"], "1");
    }

    #[tokio::test]
    async fn test_cap_holds_after_every_insert() {
        let (_dir, log) = temp_log();
        for i in 0..250 {
            log.record(entry(&i.to_string()));
            assert!(log.len() <= MAX_LOG_ENTRIES);
        }
    }

    #[tokio::test]
    async fn test_clear() {
        let (_dir, log) = temp_log();
        log.record(entry("x"));
        log.clear();
        assert!(log.is_empty());
    }

    #[tokio::test]
    async fn test_persist_and_reload_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("request_logs.json");

        let log = RequestLog::open(&path);
        log.record(entry("kept"));
        log.persist().await.unwrap();

        let reloaded = RequestLog::open(&path);
        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded.snapshot()[0].body["label"], "kept");
    }

    #[tokio::test]
    async fn test_missing_file_yields_empty_log() {
        let dir = tempfile::tempdir().unwrap();
        let log = RequestLog::open(dir.path().join("does_not_exist.json"));
        assert!(log.is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_file_yields_empty_log() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("request_logs.json");
        std::fs::write(&path, b"not json at all").unwrap();

        let log = RequestLog::open(&path);
        assert!(log.is_empty());
    }
}
