//! Application Layer - Use Cases
//!
//! This layer orchestrates domain logic and infrastructure.
//! Contains the pipeline stages and the end-to-end swap use case.

pub mod config;
pub mod finalize_output;
pub mod invoke_swap;
pub mod normalize;
pub mod swap_faces;
