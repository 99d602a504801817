//! Domain Value Objects
//!
//! Immutable value types for the swap pipeline.

use std::fmt;
use std::path::Path;

/// Image container accepted on upload and by the remote service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageExtension {
    Png,
    Jpg,
    Jpeg,
}

impl ImageExtension {
    /// Parse a bare extension, case-insensitively
    pub fn parse(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some(Self::Png),
            "jpg" => Some(Self::Jpg),
            "jpeg" => Some(Self::Jpeg),
            _ => None,
        }
    }

    /// Extension of an uploaded file name (text after the last dot)
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let (_, ext) = file_name.rsplit_once('.')?;
        Self::parse(ext)
    }

    /// Extension of a filesystem path
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::parse)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpg => "jpg",
            Self::Jpeg => "jpeg",
        }
    }
}

impl fmt::Display for ImageExtension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which detected face to use in an image (1-based, as the remote model counts)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceIndex(u32);

impl FaceIndex {
    pub const FIRST: FaceIndex = FaceIndex(1);

    pub fn new(index: u32) -> Option<Self> {
        (index >= 1).then_some(Self(index))
    }

    pub fn get(&self) -> u32 {
        self.0
    }
}

impl Default for FaceIndex {
    fn default() -> Self {
        Self::FIRST
    }
}

/// One uploaded image, owned by a single request
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub file_name: String,
    pub extension: ImageExtension,
    pub bytes: Vec<u8>,
}

/// Content digest of normalized image bytes
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub(crate) fn from_digest(hex: String) -> Self {
        Self(hex)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// `source:destination` fingerprint pair. Order-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PairKey(String);

impl PairKey {
    pub fn new(source: &Fingerprint, destination: &Fingerprint) -> Self {
        Self(format!("{}:{}", source, destination))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Outcome of normalizing an upload
#[derive(Debug, Clone)]
pub enum Normalization {
    /// Re-encoded as PNG, fitting inside the configured bound
    Normalized {
        bytes: Vec<u8>,
        width: u32,
        height: u32,
        resized: bool,
    },
    /// Normalization failed; the original bytes pass through
    Unchanged { bytes: Vec<u8>, reason: String },
}

impl Normalization {
    pub fn bytes(&self) -> &[u8] {
        match self {
            Self::Normalized { bytes, .. } | Self::Unchanged { bytes, .. } => bytes,
        }
    }

    pub fn is_normalized(&self) -> bool {
        matches!(self, Self::Normalized { .. })
    }
}

/// Classified failure of the remote swap or its finalization
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SwapFailure {
    /// A scratch file is missing or has an unsupported extension
    #[error("Invalid input files")]
    InvalidInput,

    /// The remote call succeeded but produced no usable file
    #[error("Face swap failed")]
    NoResult,

    /// Every remote attempt failed
    #[error("Error: {message}")]
    Remote { attempts: u32, message: String },

    /// The result could not be converted or written to the output directory
    #[error("Failed to save output")]
    SaveFailed(String),
}
