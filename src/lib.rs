//! Cover Art Studio
//!
//! Turns a title, an aspect ratio and a style preset into AI-generated cover
//! art. Failed generations are classified and transient ones retried with
//! linear backoff; results land in a bounded, persisted history.

pub mod api;
pub mod backend;
pub mod catalog;
pub mod config;
pub mod error;
pub mod generation;
pub mod history;
pub mod preferences;
pub mod response;
pub mod storage;

pub use error::{AppError, Result};

use std::sync::Arc;
use tokio::sync::Semaphore;

use generation::GenerationClient;
use history::HistoryStore;
use preferences::Preferences;
use storage::KeyValueStore;

/// Application state shared across all handlers
pub struct AppState {
    pub generator: Arc<GenerationClient>,
    pub history: Arc<HistoryStore>,
    pub preferences: Arc<Preferences>,
    /// Single permit; a generation holds it while in flight
    pub generation_slot: Arc<Semaphore>,
}

impl AppState {
    /// Wire the client to history and preferences backed by `store`
    pub fn new(generator: GenerationClient, store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            generator: Arc::new(generator),
            history: Arc::new(HistoryStore::load(store.clone())),
            preferences: Arc::new(Preferences::load(store)),
            generation_slot: Arc::new(Semaphore::new(1)),
        }
    }
}
