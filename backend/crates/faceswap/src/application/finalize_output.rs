//! Finalize Output Use Case
//!
//! Turns the remote result into a canonical RGB PNG under the output
//! directory, then applies the cosmetic sharpening pass.

use std::path::{Path, PathBuf};

use kernel::id::ArtifactId;

use crate::domain::entities::StoredArtifact;
use crate::domain::value_objects::SwapFailure;
use crate::infra::imaging;

/// Fresh artifact file name: `<prefix><32 hex chars>.png`
pub fn artifact_file_name(prefix: &str) -> String {
    format!("{}{}.png", prefix, ArtifactId::new().simple())
}

/// Output Finalizer
pub struct FinalizeOutputUseCase {
    output_dir: PathBuf,
    sharpness_factor: f32,
    /// Where the sharpened copy is written before it replaces the artifact
    staging_dir: PathBuf,
}

impl FinalizeOutputUseCase {
    pub fn new(output_dir: PathBuf, sharpness_factor: f32) -> Self {
        Self {
            staging_dir: output_dir.clone(),
            output_dir,
            sharpness_factor,
        }
    }

    #[cfg(test)]
    fn with_staging_dir(mut self, staging_dir: PathBuf) -> Self {
        self.staging_dir = staging_dir;
        self
    }

    pub async fn execute(
        &self,
        result_path: &Path,
        file_name: String,
    ) -> Result<StoredArtifact, SwapFailure> {
        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|e| save_failed("create output directory", e))?;

        let output_path = self.output_dir.join(&file_name);

        let source = result_path.to_path_buf();
        let target = output_path.clone();
        tokio::task::spawn_blocking(move || {
            let img = imaging::load(&source)?;
            imaging::save_rgb_png(&img, &target)
        })
        .await
        .map_err(|e| save_failed("image worker", e))?
        .map_err(|e| save_failed("convert result", e))?;

        self.sharpen(&output_path).await;

        tracing::info!(path = %output_path.display(), "Stored swap result");
        Ok(StoredArtifact::new(file_name, output_path))
    }

    /// Best effort: on failure the unsharpened file stays in place.
    async fn sharpen(&self, path: &Path) {
        let target = path.to_path_buf();
        let staging = self.staging_dir.clone();
        let factor = self.sharpness_factor;
        let outcome = tokio::task::spawn_blocking(move || {
            imaging::sharpen_file(&target, &staging, factor)
        })
        .await;

        match outcome {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                tracing::error!(error = %e, path = %path.display(), "Error enhancing image");
            }
            Err(e) => {
                tracing::error!(error = %e, path = %path.display(), "Enhancement worker failed");
            }
        }
    }
}

fn save_failed(stage: &str, err: impl std::fmt::Display) -> SwapFailure {
    tracing::error!(stage, error = %err, "Error saving output image");
    SwapFailure::SaveFailed(format!("{stage}: {err}"))
}
