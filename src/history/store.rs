//! Size-bounded, persisted history of generated images

use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, info};

use super::GeneratedImage;
use crate::error::Result;
use crate::storage::{self, KeyValueStore, HISTORY_KEY};

/// Maximum number of entries kept
pub const MAX_HISTORY: usize = 20;

/// Newest-first list of past generations
///
/// Storage order is insertion order; `list` sorts by timestamp for display.
/// Every mutation persists the whole list before it becomes visible.
pub struct HistoryStore {
    store: Arc<dyn KeyValueStore>,
    entries: Mutex<Vec<GeneratedImage>>,
}

impl HistoryStore {
    /// Load persisted history; absent or malformed state starts empty
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let mut entries: Vec<GeneratedImage> =
            storage::get_json(store.as_ref(), HISTORY_KEY).unwrap_or_default();
        entries.truncate(MAX_HISTORY);
        debug!(entries = entries.len(), "Loaded image history");

        Self {
            store,
            entries: Mutex::new(entries),
        }
    }

    /// Prepend, keep the most recent `MAX_HISTORY` insertions, persist
    pub fn append(&self, image: GeneratedImage) -> Result<()> {
        let mut entries = self.entries.lock();
        let mut next = Vec::with_capacity(MAX_HISTORY);
        next.push(image);
        next.extend(entries.iter().take(MAX_HISTORY - 1).cloned());

        storage::set_json(self.store.as_ref(), HISTORY_KEY, &next)?;
        *entries = next;
        Ok(())
    }

    /// Entries sorted by descending timestamp
    pub fn list(&self) -> Vec<GeneratedImage> {
        let mut entries = self.entries.lock().clone();
        entries.sort_by(|a, b| b.timestamp_ms.cmp(&a.timestamp_ms));
        entries
    }

    pub fn clear(&self) -> Result<()> {
        let mut entries = self.entries.lock();
        storage::set_json(self.store.as_ref(), HISTORY_KEY, &Vec::<GeneratedImage>::new())?;
        info!(removed = entries.len(), "Cleared image history");
        entries.clear();
        Ok(())
    }

    pub fn select(&self, id: &str) -> Option<GeneratedImage> {
        self.entries.lock().iter().find(|image| image.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}
