//! Application Configuration
//!
//! Configuration for the swap pipeline.

use std::path::PathBuf;
use std::time::Duration;

use crate::domain::value_objects::FaceIndex;
pub use platform::retry::RetryPolicy;

/// How a successful swap is reported to the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseStyle {
    /// `{"result_image_url": "/output/<file>"}`
    #[default]
    Url,
    /// `{"result_image_path": "<path on disk>"}`
    Path,
}

/// Swap pipeline configuration
#[derive(Debug, Clone)]
pub struct SwapConfig {
    /// Longest allowed side of a normalized upload
    pub max_dimension: u32,
    /// Directory holding finalized artifacts (served publicly)
    pub output_dir: PathBuf,
    /// URL prefix the output directory is mounted under
    pub public_url_prefix: String,
    /// Shape of the success body
    pub response_style: ResponseStyle,
    /// Maximum number of cached pair results
    pub cache_capacity: usize,
    /// Lifetime of a cached pair result
    pub cache_ttl: Duration,
    /// Remote invocation retry policy
    pub retry: RetryPolicy,
    /// Face to take from the source image
    pub source_face_index: FaceIndex,
    /// Face to replace in the destination image
    pub destination_face_index: FaceIndex,
    /// Sharpness enhancement applied to every artifact (1.0 = unchanged)
    pub sharpness_factor: f32,
    /// File name prefix of finalized artifacts
    pub artifact_prefix: String,
    /// Upper bound on the multipart request body
    pub max_upload_bytes: usize,
}

impl Default for SwapConfig {
    fn default() -> Self {
        Self {
            max_dimension: 512,
            output_dir: PathBuf::from("output"),
            public_url_prefix: "/output".to_string(),
            response_style: ResponseStyle::Url,
            cache_capacity: 100,
            cache_ttl: Duration::from_secs(3600),
            retry: RetryPolicy::default(),
            source_face_index: FaceIndex::FIRST,
            destination_face_index: FaceIndex::FIRST,
            sharpness_factor: 2.0,
            artifact_prefix: "face_swap_".to_string(),
            max_upload_bytes: 20 * 1024 * 1024,
        }
    }
}

impl SwapConfig {
    /// Profile for hosts with more memory: larger inputs sent to the model
    pub fn high_resolution() -> Self {
        Self {
            max_dimension: 1024,
            ..Default::default()
        }
    }

    /// Public URL of an artifact file name
    pub fn public_url(&self, file_name: &str) -> String {
        format!("{}/{}", self.public_url_prefix.trim_end_matches('/'), file_name)
    }
}
