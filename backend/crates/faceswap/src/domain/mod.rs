//! Domain Layer - Swap vocabulary and ports
//!
//! This layer contains:
//! - Value objects (ImageExtension, Fingerprint, PairKey, SwapFailure)
//! - Entities (StoredArtifact, CacheEntry)
//! - Domain services (content fingerprinting)
//! - Port traits (ResultCache, FaceSwapGateway)

pub mod entities;
pub mod repository;
pub mod services;
pub mod value_objects;
