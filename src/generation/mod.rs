//! Generation pipeline - prompt construction, failure classification, retry and the client

pub mod classify;
pub mod client;
pub mod prompt;
pub mod retry;

pub use classify::classify_failure;
pub use client::GenerationClient;
pub use prompt::{build_prompt, GenerationRequest};
pub use retry::RetryPolicy;
