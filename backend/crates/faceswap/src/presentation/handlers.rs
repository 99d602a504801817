//! HTTP Handlers

use crate::application::config::{ResponseStyle, SwapConfig};
use crate::application::swap_faces::SwapFacesUseCase;
use crate::domain::repository::{FaceSwapGateway, ResultCache};
use crate::domain::value_objects::{ImageExtension, UploadedImage};
use crate::error::{SwapError, SwapResult};
use crate::presentation::dto::{HealthResponse, SwapResponse};
use axum::Json;
use axum::extract::{Multipart, State};
use axum::extract::multipart::Field;
use std::sync::Arc;

/// Multipart field carrying the face to copy
pub const SOURCE_FIELD: &str = "source_image";
/// Multipart field carrying the image whose face is replaced
pub const DEST_FIELD: &str = "dest_image";

/// Shared state for swap handlers
pub struct SwapAppState<G, C>
where
    G: FaceSwapGateway + Sync + 'static,
    C: ResultCache + Sync + 'static,
{
    pub gateway: Arc<G>,
    pub cache: Arc<C>,
    pub config: Arc<SwapConfig>,
}

impl<G, C> Clone for SwapAppState<G, C>
where
    G: FaceSwapGateway + Sync + 'static,
    C: ResultCache + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            gateway: self.gateway.clone(),
            cache: self.cache.clone(),
            config: self.config.clone(),
        }
    }
}

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    tracing::info!("Health check requested");
    Json(HealthResponse::running())
}

/// POST /swap
pub async fn swap_faces<G, C>(
    State(state): State<SwapAppState<G, C>>,
    multipart: Multipart,
) -> SwapResult<Json<SwapResponse>>
where
    G: FaceSwapGateway + Sync + 'static,
    C: ResultCache + Sync + 'static,
{
    tracing::info!("Received request to /swap");
    let (source, destination) = read_uploads(multipart).await?;
    tracing::info!(
        source = %source.file_name,
        destination = %destination.file_name,
        "Images read successfully"
    );

    let use_case = SwapFacesUseCase::new(
        state.gateway.clone(),
        state.cache.clone(),
        state.config.clone(),
    );
    let output = use_case.execute(source, destination).await?;

    let response = match state.config.response_style {
        ResponseStyle::Url => SwapResponse::Url {
            result_image_url: state.config.public_url(&output.artifact.file_name),
        },
        ResponseStyle::Path => SwapResponse::Path {
            result_image_path: output.artifact.path.display().to_string(),
        },
    };
    Ok(Json(response))
}

/// An upload field after its file name has been inspected
enum ImageField {
    NoFileName,
    Unsupported(String),
    Image(UploadedImage),
}

/// Collect both uploads.
///
/// A body is read only when its file name passes. Presence of both file names
/// is checked before either extension, matching the order errors are reported.
async fn read_uploads(mut multipart: Multipart) -> SwapResult<(UploadedImage, UploadedImage)> {
    let mut source = None;
    let mut destination = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_string);
        let slot = match name.as_deref() {
            Some(SOURCE_FIELD) => &mut source,
            Some(DEST_FIELD) => &mut destination,
            // Unread fields are skipped by the next `next_field` call
            _ => continue,
        };
        *slot = Some(inspect_field(field).await?);
    }

    let (source, destination) = match (source, destination) {
        (Some(source), Some(destination)) => (source, destination),
        _ => {
            tracing::error!("No file selected");
            return Err(SwapError::NoFileSelected);
        }
    };

    match (source, destination) {
        (ImageField::NoFileName, _) | (_, ImageField::NoFileName) => {
            tracing::error!("No file selected");
            Err(SwapError::NoFileSelected)
        }
        (ImageField::Image(source), ImageField::Image(destination)) => Ok((source, destination)),
        (ImageField::Unsupported(file_name), _) | (_, ImageField::Unsupported(file_name)) => {
            tracing::error!(file_name = %file_name, "Invalid file format");
            Err(SwapError::InvalidFileFormat)
        }
    }
}

async fn inspect_field(field: Field<'_>) -> SwapResult<ImageField> {
    let Some(file_name) = field
        .file_name()
        .filter(|name| !name.is_empty())
        .map(str::to_string)
    else {
        return Ok(ImageField::NoFileName);
    };

    let Some(extension) = ImageExtension::from_file_name(&file_name) else {
        return Ok(ImageField::Unsupported(file_name));
    };

    let bytes = field.bytes().await?.to_vec();
    Ok(ImageField::Image(UploadedImage {
        file_name,
        extension,
        bytes,
    }))
}
