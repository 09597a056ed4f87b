//! Keyed persistence for history and preferences

pub mod file;
pub mod memory;

use serde::{de::DeserializeOwned, Serialize};
use tracing::warn;

use crate::error::Result;

pub use file::FileStore;
pub use memory::MemoryStore;

pub const HISTORY_KEY: &str = "coverart_image_history";
pub const LAST_ASPECT_RATIO_KEY: &str = "coverart_last_aspect_ratio";
pub const LAST_STYLE_KEY: &str = "coverart_last_style";

/// Process-wide string key-value store
///
/// `set` and `remove` must be durable when they return.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;

    fn remove(&self, key: &str) -> Result<()>;
}

/// Read and deserialize a value; absent, unreadable or malformed values are `None`
pub fn get_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            warn!(key = %key, error = %e, "Failed to read persisted value");
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(key = %key, error = %e, "Discarding malformed persisted value");
            None
        }
    }
}

pub fn set_json<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<()> {
    let raw = serde_json::to_string(value)?;
    store.set(key, &raw)
}
