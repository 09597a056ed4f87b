//! Response handling module - base64/data URI helpers and export actions

pub mod base64;
pub mod export;

pub use export::{slugify, ImageExport, ShareOutcome, SharePayload};
