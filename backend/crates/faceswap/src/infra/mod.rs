//! Infrastructure Layer
//!
//! Concrete implementations of domain ports plus the image codec glue.

pub mod gradio;
pub mod imaging;
pub mod memory_cache;
pub mod scratch;
