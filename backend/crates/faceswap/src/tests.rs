//! Unit and scenario tests for the faceswap crate

/// Test doubles shared by the use case and handler tests
#[cfg(test)]
pub(crate) mod support {
    use crate::application::config::{RetryPolicy, SwapConfig};
    use crate::domain::repository::{FaceSwapGateway, SwapRequest};
    use crate::error::RemoteError;
    use crate::infra::imaging::fixtures::{encode, solid_rgb};
    use image::ImageFormat;
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Clone, Copy)]
    pub enum GatewayBehavior {
        /// Write a small PNG and return it
        Succeed,
        /// Always fail with a transport error
        Fail,
        /// Fail the first `n` calls, then succeed
        FailTimes(u32),
        /// Answer without producing an image
        Nothing,
        /// Produce a zero-byte file
        EmptyFile,
    }

    pub struct StubGateway {
        behavior: GatewayBehavior,
        calls: AtomicUsize,
        seen: Mutex<Vec<PathBuf>>,
        dimensions: Mutex<Vec<(u32, u32)>>,
    }

    impl StubGateway {
        pub fn new(behavior: GatewayBehavior) -> Self {
            Self {
                behavior,
                calls: AtomicUsize::new(0),
                seen: Mutex::new(Vec::new()),
                dimensions: Mutex::new(Vec::new()),
            }
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        /// Source and destination paths of every call, in order
        pub fn seen_inputs(&self) -> Vec<PathBuf> {
            self.seen.lock().unwrap().clone()
        }

        /// Pixel size of every decodable input the gateway received
        pub fn seen_dimensions(&self) -> Vec<(u32, u32)> {
            self.dimensions.lock().unwrap().clone()
        }

        fn write_result(dir: &Path, call: usize) -> PathBuf {
            let path = dir.join(format!("result_{call}.png"));
            let bytes = encode(&solid_rgb(32, 32, [10, 200, 30]), ImageFormat::Png);
            std::fs::write(&path, bytes).unwrap();
            path
        }
    }

    impl FaceSwapGateway for StubGateway {
        async fn predict(
            &self,
            request: &SwapRequest<'_>,
        ) -> Result<Option<PathBuf>, RemoteError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            {
                let mut seen = self.seen.lock().unwrap();
                seen.push(request.source.to_path_buf());
                seen.push(request.destination.to_path_buf());
            }
            {
                let mut dimensions = self.dimensions.lock().unwrap();
                for path in [request.source, request.destination] {
                    if let Ok(size) = image::image_dimensions(path) {
                        dimensions.push(size);
                    }
                }
            }

            match self.behavior {
                GatewayBehavior::Succeed => {
                    Ok(Some(Self::write_result(request.download_dir, call)))
                }
                GatewayBehavior::Fail => {
                    Err(RemoteError::Transport("network unreachable".to_string()))
                }
                GatewayBehavior::FailTimes(n) if (call as u32) < n => {
                    Err(RemoteError::Transport("network unreachable".to_string()))
                }
                GatewayBehavior::FailTimes(_) => {
                    Ok(Some(Self::write_result(request.download_dir, call)))
                }
                GatewayBehavior::Nothing => Ok(None),
                GatewayBehavior::EmptyFile => {
                    let path = request.download_dir.join("empty.png");
                    std::fs::write(&path, b"").unwrap();
                    Ok(Some(path))
                }
            }
        }
    }

    /// Default configuration writing into `output`, retrying without delay
    pub fn test_config(output: &Path) -> SwapConfig {
        SwapConfig {
            output_dir: output.to_path_buf(),
            retry: RetryPolicy::immediate(3),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod config_tests {
    use crate::application::config::*;
    use crate::domain::value_objects::FaceIndex;
    use std::time::Duration;

    #[test]
    fn test_default_config() {
        let config = SwapConfig::default();
        assert_eq!(config.max_dimension, 512);
        assert_eq!(config.cache_capacity, 100);
        assert_eq!(config.cache_ttl, Duration::from_secs(3600));
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.retry.initial_delay, Duration::from_secs(2));
        assert_eq!(config.source_face_index, FaceIndex::FIRST);
        assert_eq!(config.destination_face_index, FaceIndex::FIRST);
        assert_eq!(config.response_style, ResponseStyle::Url);
        assert_eq!(config.artifact_prefix, "face_swap_");
    }

    #[test]
    fn test_high_resolution_config() {
        let config = SwapConfig::high_resolution();
        assert_eq!(config.max_dimension, 1024);
        assert_eq!(config.cache_capacity, SwapConfig::default().cache_capacity);
    }

    #[test]
    fn test_public_url() {
        let mut config = SwapConfig::default();
        assert_eq!(config.public_url("a.png"), "/output/a.png");

        config.public_url_prefix = "/static/".to_string();
        assert_eq!(config.public_url("a.png"), "/static/a.png");
    }
}

#[cfg(test)]
mod models_tests {
    use crate::presentation::dto::*;

    #[test]
    fn test_url_response_serialization() {
        let response = SwapResponse::Url {
            result_image_url: "/output/face_swap_x.png".to_string(),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"result_image_url": "/output/face_swap_x.png"})
        );
    }

    #[test]
    fn test_path_response_serialization() {
        let response = SwapResponse::Path {
            result_image_path: "output/face_swap_x.png".to_string(),
        };
        let json = serde_json::to_string(&response).unwrap();
        assert_eq!(json, r#"{"result_image_path":"output/face_swap_x.png"}"#);
    }

    #[test]
    fn test_health_response_serialization() {
        let json = serde_json::to_string(&HealthResponse::running()).unwrap();
        assert_eq!(json, r#"{"status":"API is running"}"#);
    }
}

#[cfg(test)]
mod error_tests {
    use crate::domain::value_objects::SwapFailure;
    use crate::error::*;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    #[test]
    fn test_error_into_response_status_codes() {
        let cases = [
            (SwapError::NoFileSelected, StatusCode::BAD_REQUEST),
            (SwapError::InvalidFileFormat, StatusCode::BAD_REQUEST),
            (
                SwapError::Swap(SwapFailure::InvalidInput),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                SwapError::Swap(SwapFailure::NoResult),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                SwapError::Swap(SwapFailure::Remote {
                    attempts: 3,
                    message: "timeout".to_string(),
                }),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                SwapError::Internal("disk".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.status_code(), expected);
            assert_eq!(error.into_response().status(), expected);
        }
    }

    #[test]
    fn test_error_display() {
        assert_eq!(SwapError::NoFileSelected.to_string(), "No file selected");
        assert_eq!(
            SwapError::InvalidFileFormat.to_string(),
            "Invalid file format. Only PNG, JPG, JPEG allowed"
        );
        assert_eq!(
            SwapError::Swap(SwapFailure::NoResult).to_string(),
            "Face swap failed"
        );
        assert_eq!(
            SwapError::Swap(SwapFailure::Remote {
                attempts: 3,
                message: "boom".to_string()
            })
            .to_string(),
            "Error: boom"
        );
    }
}

/// End-to-end scenarios through the HTTP router
#[cfg(test)]
mod handler_tests {
    use super::support::{GatewayBehavior, StubGateway, test_config};
    use crate::application::config::{ResponseStyle, SwapConfig};
    use crate::domain::repository::FaceSwapGateway;
    use crate::infra::imaging::fixtures::{encode, solid_rgb};
    use crate::infra::memory_cache::InMemoryResultCache;
    use crate::presentation::router::swap_router_generic;
    use axum::Router;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use image::ImageFormat;
    use serde_json::Value;
    use std::path::Path;
    use std::sync::Arc;
    use tower::ServiceExt;

    const BOUNDARY: &str = "----faceswap-test-boundary";

    /// Forwards to a shared stub so the test keeps a handle on call counts
    struct SharedGateway(Arc<StubGateway>);

    impl FaceSwapGateway for SharedGateway {
        async fn predict(
            &self,
            request: &crate::domain::repository::SwapRequest<'_>,
        ) -> Result<Option<std::path::PathBuf>, crate::error::RemoteError> {
            FaceSwapGateway::predict(self.0.as_ref(), request).await
        }
    }

    struct Part<'a> {
        name: &'a str,
        file_name: Option<&'a str>,
        bytes: Vec<u8>,
    }

    fn file<'a>(name: &'a str, file_name: &'a str, bytes: Vec<u8>) -> Part<'a> {
        Part {
            name,
            file_name: Some(file_name),
            bytes,
        }
    }

    fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
        let mut body = Vec::new();
        for part in parts {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            let disposition = match part.file_name {
                Some(file_name) => format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                    part.name, file_name
                ),
                None => format!("Content-Disposition: form-data; name=\"{}\"\r\n", part.name),
            };
            body.extend_from_slice(disposition.as_bytes());
            body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
            body.extend_from_slice(&part.bytes);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn swap_request(parts: &[Part<'_>]) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/swap")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(multipart_body(parts)))
            .unwrap()
    }

    fn app(behavior: GatewayBehavior, config: SwapConfig) -> (Router, Arc<StubGateway>) {
        let stub = Arc::new(StubGateway::new(behavior));
        let cache = InMemoryResultCache::new(config.cache_capacity, config.cache_ttl);
        let router = swap_router_generic(SharedGateway(stub.clone()), cache, config);
        (router, stub)
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn red_png(side: u32) -> Vec<u8> {
        encode(&solid_rgb(side, side, [255, 0, 0]), ImageFormat::Png)
    }

    fn blue_jpg(side: u32) -> Vec<u8> {
        encode(&solid_rgb(side, side, [0, 0, 255]), ImageFormat::Jpeg)
    }

    fn artifact_path(output: &Path, url: &str) -> std::path::PathBuf {
        output.join(url.trim_start_matches("/output/"))
    }

    #[tokio::test]
    async fn test_health() {
        let output = tempfile::tempdir().unwrap();
        let (router, _) = app(GatewayBehavior::Succeed, test_config(output.path()));

        let response = router
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["status"], "API is running");
    }

    #[tokio::test]
    async fn test_swap_returns_served_artifact_url() {
        let output = tempfile::tempdir().unwrap();
        let (router, stub) = app(GatewayBehavior::Succeed, test_config(output.path()));

        let response = router
            .clone()
            .oneshot(swap_request(&[
                file("source_image", "source.png", red_png(2000)),
                file("dest_image", "dest.jpg", blue_jpg(2000)),
            ]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(stub.seen_dimensions(), vec![(512, 512), (512, 512)]);
        let body = json_body(response).await;
        let url = body["result_image_url"].as_str().unwrap().to_string();
        assert!(url.starts_with("/output/face_swap_"));
        assert!(url.ends_with(".png"));
        assert_eq!(stub.calls(), 1);

        let saved = std::fs::read(artifact_path(output.path(), &url)).unwrap();
        assert_eq!(image::guess_format(&saved).unwrap(), ImageFormat::Png);

        let served = router
            .oneshot(Request::get(&url).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(served.status(), StatusCode::OK);
        let served = axum::body::to_bytes(served.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(served.as_ref(), saved.as_slice());
    }

    #[tokio::test]
    async fn test_repeated_pair_is_served_from_cache() {
        let output = tempfile::tempdir().unwrap();
        let (router, stub) = app(GatewayBehavior::Succeed, test_config(output.path()));

        let mut urls = Vec::new();
        for _ in 0..2 {
            let response = router
                .clone()
                .oneshot(swap_request(&[
                    file("source_image", "a.png", red_png(128)),
                    file("dest_image", "b.jpg", blue_jpg(128)),
                ]))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            urls.push(json_body(response).await["result_image_url"].clone());
        }

        assert_eq!(urls[0], urls[1]);
        assert_eq!(stub.calls(), 1);
    }

    #[tokio::test]
    async fn test_rejects_unsupported_extension() {
        let output = tempfile::tempdir().unwrap();
        let (router, stub) = app(GatewayBehavior::Succeed, test_config(output.path()));

        let response = router
            .oneshot(swap_request(&[
                file("source_image", "image.txt", b"not an image".to_vec()),
                file("dest_image", "b.jpg", blue_jpg(64)),
            ]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(
            body["error"],
            "Invalid file format. Only PNG, JPG, JPEG allowed"
        );
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn test_rejects_missing_file_name() {
        let output = tempfile::tempdir().unwrap();
        let (router, stub) = app(GatewayBehavior::Succeed, test_config(output.path()));

        let response = router
            .oneshot(swap_request(&[
                Part {
                    name: "source_image",
                    file_name: None,
                    bytes: red_png(16),
                },
                file("dest_image", "b.jpg", blue_jpg(16)),
            ]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"], "No file selected");
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn test_missing_file_name_reported_before_bad_extension() {
        let output = tempfile::tempdir().unwrap();
        let (router, stub) = app(GatewayBehavior::Succeed, test_config(output.path()));

        let response = router
            .oneshot(swap_request(&[
                file("source_image", "image.txt", b"not an image".to_vec()),
                Part {
                    name: "dest_image",
                    file_name: None,
                    bytes: blue_jpg(16),
                },
            ]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"], "No file selected");
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn test_bad_extension_on_destination_is_rejected() {
        let output = tempfile::tempdir().unwrap();
        let (router, stub) = app(GatewayBehavior::Succeed, test_config(output.path()));

        let response = router
            .oneshot(swap_request(&[
                file("source_image", "a.png", red_png(16)),
                file("dest_image", "b.gif", b"GIF89a".to_vec()),
            ]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await["error"],
            "Invalid file format. Only PNG, JPG, JPEG allowed"
        );
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn test_rejects_missing_field() {
        let output = tempfile::tempdir().unwrap();
        let (router, stub) = app(GatewayBehavior::Succeed, test_config(output.path()));

        let response = router
            .oneshot(swap_request(&[
                file("source_image", "a.png", red_png(16)),
                file("unrelated", "c.png", red_png(16)),
            ]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"], "No file selected");
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn test_remote_failure_is_500_and_not_cached() {
        let output = tempfile::tempdir().unwrap();
        let (router, stub) = app(GatewayBehavior::Fail, test_config(output.path()));

        for round in 1..=2 {
            let response = router
                .clone()
                .oneshot(swap_request(&[
                    file("source_image", "a.png", red_png(32)),
                    file("dest_image", "b.png", red_png(32)),
                ]))
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
            let body = json_body(response).await;
            let message = body["error"].as_str().unwrap();
            assert!(message.starts_with("Error: "));
            assert!(message.contains("network unreachable"));
            assert_eq!(stub.calls(), 3 * round);
        }
        assert_eq!(std::fs::read_dir(output.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_path_response_style() {
        let output = tempfile::tempdir().unwrap();
        let config = SwapConfig {
            response_style: ResponseStyle::Path,
            ..test_config(output.path())
        };
        let (router, _) = app(GatewayBehavior::Succeed, config);

        let response = router
            .oneshot(swap_request(&[
                file("source_image", "a.jpeg", blue_jpg(32)),
                file("dest_image", "b.png", red_png(32)),
            ]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert!(body.get("result_image_url").is_none());
        let path = body["result_image_path"].as_str().unwrap();
        assert!(Path::new(path).is_file());
        assert!(Path::new(path).starts_with(output.path()));
    }
}
