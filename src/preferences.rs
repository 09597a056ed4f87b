//! Last-used aspect ratio and style, persisted across restarts

use parking_lot::RwLock;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

use crate::catalog::{self, AspectRatio, StylePreset};
use crate::error::Result;
use crate::storage::{self, KeyValueStore, LAST_ASPECT_RATIO_KEY, LAST_STYLE_KEY};

/// Snapshot of the current form defaults
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferenceState {
    pub aspect_ratio: AspectRatio,
    pub style: StylePreset,
}

impl Default for PreferenceState {
    fn default() -> Self {
        Self {
            aspect_ratio: AspectRatio::default(),
            style: catalog::default_style(),
        }
    }
}

pub struct Preferences {
    store: Arc<dyn KeyValueStore>,
    state: RwLock<PreferenceState>,
}

impl Preferences {
    /// Load persisted values; anything absent or unrecognized falls back to the default
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let aspect_ratio = store
            .get(LAST_ASPECT_RATIO_KEY)
            .ok()
            .flatten()
            .and_then(|raw| raw.parse::<AspectRatio>().ok())
            .unwrap_or_default();

        // Resolve against the catalog so stale fragments are never reused
        let style = storage::get_json::<StylePreset>(store.as_ref(), LAST_STYLE_KEY)
            .and_then(|saved| catalog::find_style(&saved.id))
            .unwrap_or_else(catalog::default_style);

        debug!(aspect_ratio = %aspect_ratio, style = %style.id, "Loaded preferences");

        Self {
            store,
            state: RwLock::new(PreferenceState {
                aspect_ratio,
                style,
            }),
        }
    }

    pub fn snapshot(&self) -> PreferenceState {
        self.state.read().clone()
    }

    pub fn aspect_ratio(&self) -> AspectRatio {
        self.state.read().aspect_ratio
    }

    pub fn style(&self) -> StylePreset {
        self.state.read().style.clone()
    }

    pub fn set_aspect_ratio(&self, aspect_ratio: AspectRatio) -> Result<()> {
        let mut state = self.state.write();
        self.store.set(LAST_ASPECT_RATIO_KEY, aspect_ratio.as_str())?;
        state.aspect_ratio = aspect_ratio;
        Ok(())
    }

    pub fn set_style(&self, style: StylePreset) -> Result<()> {
        let mut state = self.state.write();
        storage::set_json(self.store.as_ref(), LAST_STYLE_KEY, &style)?;
        state.style = style;
        Ok(())
    }
}
