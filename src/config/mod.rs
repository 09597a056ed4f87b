//! Configuration loading

pub mod settings;

pub use settings::{GenerationConfig, LoggingConfig, ServerConfig, Settings, StorageConfig};
