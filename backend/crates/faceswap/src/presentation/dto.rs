//! API DTOs (Data Transfer Objects)

use serde::Serialize;

/// Response for POST /swap
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum SwapResponse {
    Url { result_image_url: String },
    Path { result_image_path: String },
}

/// Response for GET /health
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

impl HealthResponse {
    pub fn running() -> Self {
        Self {
            status: "API is running",
        }
    }
}
