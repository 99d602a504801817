//! Swap Faces Use Case
//!
//! End-to-end pipeline for one validated upload pair:
//! normalize -> fingerprint -> cache lookup -> (miss) remote swap ->
//! finalize -> cache store.

use std::sync::Arc;

use crate::application::config::SwapConfig;
use crate::application::finalize_output::{FinalizeOutputUseCase, artifact_file_name};
use crate::application::invoke_swap::InvokeSwapUseCase;
use crate::application::normalize::normalize_upload;
use crate::domain::entities::StoredArtifact;
use crate::domain::repository::{FaceSwapGateway, ResultCache};
use crate::domain::services::pair_key;
use crate::domain::value_objects::{ImageExtension, Normalization, UploadedImage};
use crate::error::SwapResult;
use crate::infra::scratch::ScratchDir;

/// Output DTO for swap faces
#[derive(Debug, Clone)]
pub struct SwapFacesOutput {
    pub artifact: StoredArtifact,
    pub cache_hit: bool,
}

/// Swap Faces Use Case
pub struct SwapFacesUseCase<G, C>
where
    G: FaceSwapGateway,
    C: ResultCache,
{
    gateway: Arc<G>,
    cache: Arc<C>,
    config: Arc<SwapConfig>,
}

impl<G, C> SwapFacesUseCase<G, C>
where
    G: FaceSwapGateway + Sync,
    C: ResultCache + Sync,
{
    pub fn new(gateway: Arc<G>, cache: Arc<C>, config: Arc<SwapConfig>) -> Self {
        Self {
            gateway,
            cache,
            config,
        }
    }

    pub async fn execute(
        &self,
        source: UploadedImage,
        destination: UploadedImage,
    ) -> SwapResult<SwapFacesOutput> {
        let (source_ext, destination_ext) = (source.extension, destination.extension);

        let source = normalize_upload(source.bytes, self.config.max_dimension).await;
        let destination = normalize_upload(destination.bytes, self.config.max_dimension).await;
        log_normalization("source", &source);
        log_normalization("destination", &destination);

        let key = pair_key(source.bytes(), destination.bytes());
        if let Some(artifact) = self.cache.get(&key).await {
            tracing::info!(pair_key = %key, file = %artifact.file_name, "Cache hit");
            return Ok(SwapFacesOutput {
                artifact,
                cache_hit: true,
            });
        }
        tracing::info!(pair_key = %key, "Cache miss");

        let scratch = ScratchDir::create().await?;
        let outcome = self
            .swap_in(&scratch, (&source, source_ext), (&destination, destination_ext))
            .await;
        scratch.close().await;
        let artifact = outcome?;

        self.cache.put(key.clone(), artifact.clone()).await;
        tracing::info!(pair_key = %key, file = %artifact.file_name, "Cache updated");

        Ok(SwapFacesOutput {
            artifact,
            cache_hit: false,
        })
    }

    /// Remote swap and finalization for a cache miss, using `scratch` for inputs
    async fn swap_in(
        &self,
        scratch: &ScratchDir,
        (source, source_ext): (&Normalization, ImageExtension),
        (destination, destination_ext): (&Normalization, ImageExtension),
    ) -> SwapResult<StoredArtifact> {
        let source_path = scratch
            .write("source", scratch_extension(source, source_ext), source.bytes())
            .await?;
        let destination_path = scratch
            .write("dest", scratch_extension(destination, destination_ext), destination.bytes())
            .await?;
        tracing::info!(dir = %scratch.path().display(), "Temporary files saved");

        let invoker = InvokeSwapUseCase::new(self.gateway.clone(), self.config.retry.clone());
        let result_path = invoker
            .execute(
                &source_path,
                &destination_path,
                self.config.source_face_index,
                self.config.destination_face_index,
                scratch.path(),
            )
            .await?;

        let finalizer = FinalizeOutputUseCase::new(
            self.config.output_dir.clone(),
            self.config.sharpness_factor,
        );
        let artifact = finalizer
            .execute(&result_path, artifact_file_name(&self.config.artifact_prefix))
            .await?;
        Ok(artifact)
    }
}

/// Normalized payloads are PNG; pass-through payloads keep the upload's extension
fn scratch_extension(outcome: &Normalization, uploaded: ImageExtension) -> ImageExtension {
    if outcome.is_normalized() {
        ImageExtension::Png
    } else {
        uploaded
    }
}

fn log_normalization(role: &str, outcome: &Normalization) {
    match outcome {
        Normalization::Normalized {
            width,
            height,
            resized,
            bytes,
        } => {
            tracing::info!(role, width, height, resized, size = bytes.len(), "Image normalized");
        }
        Normalization::Unchanged { reason, bytes } => {
            tracing::warn!(role, reason = %reason, size = bytes.len(), "Image left unchanged");
        }
    }
}
