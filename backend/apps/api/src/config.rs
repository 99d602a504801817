//! Server Configuration
//!
//! Everything is read from `FACESWAP_*` environment variables (after `.env`
//! is loaded); unset or unparsable values fall back to the defaults.

use faceswap::application::config::{ResponseStyle, RetryPolicy, SwapConfig};
use faceswap::domain::value_objects::FaceIndex;
use faceswap::infra::gradio::GradioConfig;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Process-wide configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// `None` allows any origin
    pub cors_origins: Option<Vec<String>>,
    pub swap: SwapConfig,
    pub gradio: GradioConfig,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let env = Env(&lookup);

        let mut swap = match env.string("FACESWAP_PROFILE").as_deref() {
            Some("high") | Some("high_resolution") => SwapConfig::high_resolution(),
            _ => SwapConfig::default(),
        };
        swap.max_dimension = env.parse("FACESWAP_MAX_DIMENSION", swap.max_dimension);
        if let Some(dir) = env.string("FACESWAP_OUTPUT_DIR") {
            swap.output_dir = PathBuf::from(dir);
        }
        swap.response_style = match env.string("FACESWAP_RESPONSE_STYLE").as_deref() {
            Some("path") => ResponseStyle::Path,
            Some("url") => ResponseStyle::Url,
            _ => swap.response_style,
        };
        swap.cache_capacity = env.parse("FACESWAP_CACHE_CAPACITY", swap.cache_capacity);
        swap.cache_ttl = Duration::from_secs(
            env.parse("FACESWAP_CACHE_TTL_SECS", swap.cache_ttl.as_secs()),
        );
        swap.retry = RetryPolicy::new(
            env.parse("FACESWAP_RETRY_ATTEMPTS", swap.retry.max_attempts),
            Duration::from_millis(env.parse(
                "FACESWAP_RETRY_DELAY_MS",
                swap.retry.initial_delay.as_millis() as u64,
            )),
            env.parse("FACESWAP_RETRY_BACKOFF", swap.retry.backoff_factor),
        );
        swap.source_face_index = env.face_index("FACESWAP_SOURCE_FACE_INDEX", swap.source_face_index);
        swap.destination_face_index =
            env.face_index("FACESWAP_DEST_FACE_INDEX", swap.destination_face_index);
        swap.sharpness_factor = env.parse("FACESWAP_SHARPNESS", swap.sharpness_factor);
        swap.max_upload_bytes = env.parse("FACESWAP_MAX_UPLOAD_BYTES", swap.max_upload_bytes);

        let mut gradio = match env.string("FACESWAP_SPACE_ID") {
            Some(space) => GradioConfig::for_space(&space),
            None => GradioConfig::default(),
        };
        if let Some(url) = env.string("FACESWAP_GRADIO_URL") {
            gradio.base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(api_name) = env.string("FACESWAP_API_NAME") {
            gradio.api_name = api_name.trim_start_matches('/').to_string();
        }
        gradio.token = env.string("FACESWAP_HF_TOKEN");
        gradio.http.request_timeout = Duration::from_secs(env.parse(
            "FACESWAP_REMOTE_TIMEOUT_SECS",
            gradio.http.request_timeout.as_secs(),
        ));

        let bind_addr = env
            .string("FACESWAP_BIND")
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 8000)));

        let cors_origins = env.string("FACESWAP_CORS_ORIGINS").and_then(|v| {
            let origins: Vec<String> = v
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty() && *o != "*")
                .map(str::to_string)
                .collect();
            (!origins.is_empty()).then_some(origins)
        });

        Self {
            bind_addr,
            cors_origins,
            swap,
            gradio,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

struct Env<'a, F: Fn(&str) -> Option<String>>(&'a F);

impl<F: Fn(&str) -> Option<String>> Env<'_, F> {
    fn string(&self, key: &str) -> Option<String> {
        (self.0)(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn parse<T: std::str::FromStr>(&self, key: &str, default: T) -> T {
        match self.string(key) {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!(key, value = %raw, "Ignoring unparsable setting");
                default
            }),
            None => default,
        }
    }

    fn face_index(&self, key: &str, default: FaceIndex) -> FaceIndex {
        FaceIndex::new(self.parse(key, default.get())).unwrap_or(default)
    }
}
