//! Face Swap Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Value objects, entities, port traits
//! - `application/` - Use cases
//! - `infra/` - Gradio gateway, image codec, cache, scratch space
//! - `presentation/` - HTTP handlers
//!
//! ## Request Model
//! - Uploads are normalized before fingerprinting, so the cache keys on what the model sees
//! - Results are cached per ordered (source, destination) pair for a bounded time
//! - Scratch files never outlive the request that created them

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::{ResponseStyle, SwapConfig};
pub use error::{SwapError, SwapResult};
pub use infra::gradio::{GradioClient, GradioConfig};
pub use infra::memory_cache::InMemoryResultCache;
pub use presentation::router::{swap_router, swap_router_generic};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

#[cfg(test)]
mod tests;
