//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Content digests (SHA-256, hex encoded)
//! - Retry with exponential backoff
//! - Outbound HTTP client construction

pub mod client;
pub mod crypto;
pub mod retry;
