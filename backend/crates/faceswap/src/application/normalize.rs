//! Normalize Upload Use Case
//!
//! Best-effort downscale and PNG re-encode of an upload. Never fails: any
//! decode or encode error passes the original bytes through.

use std::sync::Arc;

use crate::domain::value_objects::Normalization;
use crate::infra::imaging;

pub async fn normalize_upload(bytes: Vec<u8>, max_dimension: u32) -> Normalization {
    let input = Arc::new(bytes);
    let worker_input = Arc::clone(&input);

    let outcome = tokio::task::spawn_blocking(move || {
        imaging::normalize_image(&worker_input, max_dimension)
    })
    .await;

    let reason = match outcome {
        Ok(Ok(encoded)) => {
            return Normalization::Normalized {
                bytes: encoded.bytes,
                width: encoded.width,
                height: encoded.height,
                resized: encoded.resized,
            };
        }
        Ok(Err(e)) => e.to_string(),
        Err(e) => format!("normalization worker failed: {e}"),
    };

    tracing::warn!(reason = %reason, "Image normalization failed, using original bytes");
    let bytes = Arc::try_unwrap(input).unwrap_or_else(|shared| shared.as_ref().clone());
    Normalization::Unchanged { bytes, reason }
}
