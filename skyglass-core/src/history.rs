use std::sync::Arc;

use crate::{error::ErrorKind, model::HistoryEntry, storage::KeyValueStore};

/// Storage key holding the JSON-encoded history array.
pub const HISTORY_KEY: &str = "weatherHistory";

/// Maximum number of remembered searches.
pub const MAX_HISTORY: usize = 5;

/// Bounded, deduplicated, most-recent-first list of searched place names.
#[derive(Debug)]
pub struct HistoryStore {
    storage: Arc<dyn KeyValueStore>,
    entries: Vec<HistoryEntry>,
}

impl HistoryStore {
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self {
            storage,
            entries: Vec::new(),
        }
    }

    /// Read the persisted list. Missing or unreadable data is an empty history.
    pub fn load(&mut self) -> Vec<HistoryEntry> {
        self.entries = match self.read() {
            Ok(entries) => entries,
            Err(kind) => {
                tracing::warn!("{kind}; starting with empty history");
                Vec::new()
            }
        };
        self.entries.clone()
    }

    fn read(&self) -> Result<Vec<HistoryEntry>, ErrorKind> {
        let raw = self.storage.get(HISTORY_KEY).map_err(|err| {
            tracing::debug!("History storage read failed: {err:#}");
            ErrorKind::StorageReadError
        })?;

        let Some(raw) = raw else {
            return Ok(Vec::new());
        };
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }

        let stored: Vec<HistoryEntry> =
            serde_json::from_str(&raw).map_err(|_| ErrorKind::StorageReadError)?;

        let mut entries: Vec<HistoryEntry> = Vec::with_capacity(MAX_HISTORY);
        for entry in stored {
            if entries.len() == MAX_HISTORY {
                break;
            }
            if !entries.contains(&entry) {
                entries.push(entry);
            }
        }
        Ok(entries)
    }

    /// Move `name` to the front, dropping earlier copies, keep at most five,
    /// and persist the result in a single write.
    pub fn record(&mut self, name: &str) -> Vec<HistoryEntry> {
        let mut updated = Vec::with_capacity(MAX_HISTORY);
        updated.push(name.to_string());
        updated.extend(self.entries.iter().filter(|e| e.as_str() != name).cloned());
        updated.truncate(MAX_HISTORY);

        self.entries = updated;
        self.persist();
        self.entries.clone()
    }

    fn persist(&self) {
        let encoded = match serde_json::to_string(&self.entries) {
            Ok(encoded) => encoded,
            Err(err) => {
                tracing::warn!("Failed to encode search history: {err}");
                return;
            }
        };

        if let Err(err) = self.storage.put(HISTORY_KEY, &encoded) {
            tracing::warn!("Failed to persist search history: {err:#}");
        }
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }
}
