//! Gradio HTTP gateway
//!
//! Talks to a hosted Gradio app (by default a Hugging Face space) over its
//! queue API: upload both images, submit a prediction, read the completion
//! event, download the produced file.

use std::path::{Path, PathBuf};

use kernel::id::ScratchFileId;
use platform::client::{ClientBuildError, HttpClientConfig, build_http_client};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::domain::repository::{FaceSwapGateway, SwapRequest};
use crate::error::RemoteError;

/// Space hosting the face-swap model
pub const DEFAULT_SPACE_ID: &str = "Dentro/face-swap";

/// Longest remote error body kept in an error message
const MAX_ERROR_BODY: usize = 512;

/// Gradio endpoint configuration
#[derive(Debug, Clone)]
pub struct GradioConfig {
    /// Base URL of the Gradio app, e.g. `https://dentro-face-swap.hf.space`
    pub base_url: String,
    /// Endpoint name without the leading slash
    pub api_name: String,
    /// Optional bearer token (Hugging Face access token for private spaces)
    pub token: Option<String>,
    /// HTTP client settings
    pub http: HttpClientConfig,
}

impl Default for GradioConfig {
    fn default() -> Self {
        Self {
            base_url: space_url(DEFAULT_SPACE_ID),
            api_name: "predict".to_string(),
            token: None,
            http: HttpClientConfig::default(),
        }
    }
}

impl GradioConfig {
    /// Config pointing at a Hugging Face space id such as `owner/name`
    pub fn for_space(space_id: &str) -> Self {
        Self {
            base_url: space_url(space_id),
            ..Default::default()
        }
    }
}

/// Public host of a Hugging Face space
pub fn space_url(space_id: &str) -> String {
    let host = space_id
        .trim()
        .to_ascii_lowercase()
        .replace(['/', '_', '.'], "-");
    format!("https://{host}.hf.space")
}

#[derive(Debug, Deserialize)]
struct EventId {
    event_id: String,
}

/// Location of a produced file as reported by the completion event
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ResultFile {
    url: Option<String>,
    path: Option<String>,
}

/// Gradio-backed implementation of [`FaceSwapGateway`]
#[derive(Debug, Clone)]
pub struct GradioClient {
    http: reqwest::Client,
    config: GradioConfig,
}

impl GradioClient {
    pub fn new(config: GradioConfig) -> Result<Self, ClientBuildError> {
        let http = build_http_client(&config.http)?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &GradioConfig {
        &self.config
    }

    fn base(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/gradio_api/{}", self.base(), path)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.config.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn upload(&self, paths: [&Path; 2]) -> Result<Vec<String>, RemoteError> {
        let mut form = Form::new();
        for path in paths {
            let bytes = tokio::fs::read(path).await?;
            let file_name = path
                .file_name()
                .and_then(|name| name.to_str())
                .unwrap_or("image.png")
                .to_string();
            form = form.part("files", Part::bytes(bytes).file_name(file_name));
        }

        let response = self
            .authorize(self.http.post(self.endpoint("upload")))
            .multipart(form)
            .send()
            .await?;
        let uploaded: Vec<String> = ensure_success(response).await?.json().await?;

        if uploaded.len() != paths.len() {
            return Err(RemoteError::Protocol(format!(
                "uploaded {} files, server acknowledged {}",
                paths.len(),
                uploaded.len()
            )));
        }
        Ok(uploaded)
    }

    async fn submit(
        &self,
        source: &str,
        destination: &str,
        request: &SwapRequest<'_>,
    ) -> Result<String, RemoteError> {
        let payload = json!({
            "data": [
                file_data(source),
                request.source_face_index.get(),
                file_data(destination),
                request.destination_face_index.get(),
            ]
        });

        let url = self.endpoint(&format!("call/{}", self.config.api_name));
        let response = self
            .authorize(self.http.post(url))
            .json(&payload)
            .send()
            .await?;
        let event: EventId = ensure_success(response).await?.json().await?;
        Ok(event.event_id)
    }

    async fn await_result(&self, event_id: &str) -> Result<Option<ResultFile>, RemoteError> {
        let url = self.endpoint(&format!("call/{}/{}", self.config.api_name, event_id));
        let response = self.authorize(self.http.get(url)).send().await?;
        let body = ensure_success(response).await?.text().await?;
        parse_event_stream(&body)
    }

    async fn download(&self, file: &ResultFile, dir: &Path) -> Result<PathBuf, RemoteError> {
        let url = resolve_file_url(self.base(), file)
            .ok_or_else(|| RemoteError::Protocol("result has neither url nor path".into()))?;

        let response = self.authorize(self.http.get(&url)).send().await?;
        let bytes = ensure_success(response).await?.bytes().await?;

        let name = format!(
            "result_{}.{}",
            ScratchFileId::new().simple(),
            extension_of(&url).unwrap_or("png")
        );
        let path = dir.join(name);
        tokio::fs::write(&path, &bytes).await?;
        Ok(path)
    }
}

impl FaceSwapGateway for GradioClient {
    async fn predict(&self, request: &SwapRequest<'_>) -> Result<Option<PathBuf>, RemoteError> {
        tracing::info!(endpoint = %self.base(), "Uploading images to inference service");
        let uploaded = self.upload([request.source, request.destination]).await?;

        tracing::info!("Sending face swap request");
        let event_id = self.submit(&uploaded[0], &uploaded[1], request).await?;

        tracing::debug!(event_id = %event_id, "Waiting for prediction");
        let Some(file) = self.await_result(&event_id).await? else {
            return Ok(None);
        };

        let path = self.download(&file, request.download_dir).await?;
        tracing::info!(path = %path.display(), "Downloaded swap result");
        Ok(Some(path))
    }
}

fn file_data(path: &str) -> Value {
    json!({ "path": path, "meta": { "_type": "gradio.FileData" } })
}

async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, RemoteError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let mut body = response.text().await.unwrap_or_default();
    if body.len() > MAX_ERROR_BODY {
        let mut cut = MAX_ERROR_BODY;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        body.truncate(cut);
    }
    Err(RemoteError::Rejected {
        status: status.as_u16(),
        body,
    })
}

/// Read a finished server-sent event stream and extract the first output.
///
/// `Ok(None)` when the prediction completed without a file.
pub(crate) fn parse_event_stream(body: &str) -> Result<Option<ResultFile>, RemoteError> {
    let mut event = "";
    for line in body.lines() {
        if let Some(name) = line.strip_prefix("event:") {
            event = name.trim();
            continue;
        }
        let Some(data) = line.strip_prefix("data:") else {
            continue;
        };
        let data = data.trim();
        match event {
            "complete" => {
                let outputs: Value = serde_json::from_str(data)
                    .map_err(|e| RemoteError::Protocol(format!("invalid completion data: {e}")))?;
                return Ok(first_output(&outputs));
            }
            "error" => {
                let message = match serde_json::from_str::<Value>(data) {
                    Ok(Value::String(message)) => message,
                    Ok(Value::Null) | Err(_) if data.is_empty() || data == "null" => {
                        "remote reported an error".to_string()
                    }
                    _ => data.to_string(),
                };
                return Err(RemoteError::Prediction(message));
            }
            _ => {}
        }
    }
    Err(RemoteError::Protocol(
        "event stream ended without a completion event".into(),
    ))
}

fn first_output(outputs: &Value) -> Option<ResultFile> {
    let first = match outputs {
        Value::Array(items) => items.first()?,
        other => other,
    };
    match first {
        Value::String(path) if !path.is_empty() => Some(ResultFile {
            url: None,
            path: Some(path.clone()),
        }),
        Value::Object(map) => {
            let field = |name: &str| {
                map.get(name)
                    .and_then(Value::as_str)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
            };
            let file = ResultFile {
                url: field("url"),
                path: field("path"),
            };
            (file.url.is_some() || file.path.is_some()).then_some(file)
        }
        _ => None,
    }
}

pub(crate) fn resolve_file_url(base: &str, file: &ResultFile) -> Option<String> {
    match (&file.url, &file.path) {
        (Some(url), _) if url.starts_with("http://") || url.starts_with("https://") => {
            Some(url.clone())
        }
        (Some(url), _) => Some(format!("{}/{}", base, url.trim_start_matches('/'))),
        (None, Some(path)) => Some(format!("{}/gradio_api/file={}", base, path)),
        (None, None) => None,
    }
}

fn extension_of(url: &str) -> Option<&str> {
    let path = url.split(['?', '#']).next()?;
    let last = path.rsplit('/').next()?;
    let (_, ext) = last.rsplit_once('.')?;
    (!ext.is_empty() && ext.len() <= 5 && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .then_some(ext)
}
