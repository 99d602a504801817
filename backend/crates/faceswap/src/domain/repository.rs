//! Port Traits
//!
//! Interfaces for the result cache and the remote inference service.
//! Implementations live in the infrastructure layer.

use crate::domain::entities::StoredArtifact;
use crate::domain::value_objects::{FaceIndex, PairKey};
use crate::error::RemoteError;
use std::path::{Path, PathBuf};

/// Result cache trait
#[trait_variant::make(ResultCache: Send)]
pub trait LocalResultCache {
    /// Live artifact for the pair, if any. Expired entries count as absent.
    async fn get(&self, key: &PairKey) -> Option<StoredArtifact>;

    /// Insert or overwrite the artifact for the pair
    async fn put(&self, key: PairKey, artifact: StoredArtifact);
}

/// One prediction request to the remote model
#[derive(Debug, Clone, Copy)]
pub struct SwapRequest<'a> {
    pub source: &'a Path,
    pub source_face_index: FaceIndex,
    pub destination: &'a Path,
    pub destination_face_index: FaceIndex,
    /// Where the gateway may write the downloaded result
    pub download_dir: &'a Path,
}

/// Remote face-swap service trait
#[trait_variant::make(FaceSwapGateway: Send)]
pub trait LocalFaceSwapGateway {
    /// Run one prediction and return the local path of the produced image.
    /// `Ok(None)` means the service answered but produced no image.
    async fn predict(&self, request: &SwapRequest<'_>) -> Result<Option<PathBuf>, RemoteError>;
}
