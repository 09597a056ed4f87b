//! Backend module - the image generation trait and its HTTP client

pub mod imagen;
pub mod traits;

pub use imagen::ImagenBackend;
pub use traits::{GenerateRequest, GenerateResponse, ImageBackend, ImagePayload};
