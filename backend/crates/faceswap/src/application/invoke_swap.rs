//! Invoke Swap Use Case
//!
//! Validates the scratch inputs, calls the remote service under the retry
//! policy and checks that a usable file came back.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use platform::retry::{RetryPolicy, retry_with_backoff};

use crate::domain::repository::{FaceSwapGateway, SwapRequest};
use crate::domain::value_objects::{FaceIndex, ImageExtension, SwapFailure};

/// Remote Swap Invoker
pub struct InvokeSwapUseCase<G>
where
    G: FaceSwapGateway,
{
    gateway: Arc<G>,
    retry: RetryPolicy,
}

impl<G> InvokeSwapUseCase<G>
where
    G: FaceSwapGateway + Sync,
{
    pub fn new(gateway: Arc<G>, retry: RetryPolicy) -> Self {
        Self { gateway, retry }
    }

    pub async fn execute(
        &self,
        source: &Path,
        destination: &Path,
        source_face_index: FaceIndex,
        destination_face_index: FaceIndex,
        download_dir: &Path,
    ) -> Result<PathBuf, SwapFailure> {
        tracing::info!("Validating input files");
        if !(is_valid_input(source).await && is_valid_input(destination).await) {
            tracing::error!(
                source = %source.display(),
                destination = %destination.display(),
                "Invalid input files"
            );
            return Err(SwapFailure::InvalidInput);
        }

        let request = SwapRequest {
            source,
            source_face_index,
            destination,
            destination_face_index,
            download_dir,
        };
        let gateway = &self.gateway;

        let produced = retry_with_backoff(&self.retry, |attempt| async move {
            tracing::info!(attempt, "Invoking remote face swap");
            gateway.predict(&request).await
        })
        .await
        .map_err(|exhausted| SwapFailure::Remote {
            attempts: exhausted.attempts,
            message: exhausted.last_error.to_string(),
        })?;

        match produced {
            Some(path) if is_non_empty_file(&path).await => Ok(path),
            _ => {
                tracing::error!("Face swap failed, no result returned");
                Err(SwapFailure::NoResult)
            }
        }
    }
}

async fn is_valid_input(path: &Path) -> bool {
    ImageExtension::from_path(path).is_some()
        && tokio::fs::metadata(path)
            .await
            .map(|meta| meta.is_file())
            .unwrap_or(false)
}

async fn is_non_empty_file(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|meta| meta.is_file() && meta.len() > 0)
        .unwrap_or(false)
}
