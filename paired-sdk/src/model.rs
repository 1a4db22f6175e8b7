// ABOUTME: Core data model for paired fetches: ids, metadata, images, and outcomes
// ABOUTME: Defines the three-field transport result consumed by the blocking adapter

use image::{DynamicImage, ImageFormat};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::error::{FetchError, LegFailure, TransportError};

/// Identifier naming one image + metadata pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(pub u64);

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ResourceId {
    fn from(id: u64) -> Self {
        ResourceId(id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageMetadata {
    pub name: String,
    pub first_appearance: String,
    pub year: i64,
}

impl fmt::Display for ImageMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} - {})", self.name, self.first_appearance, self.year)
    }
}

/// A decoded bitmap. Shared, never mutated after decoding.
#[derive(Clone)]
pub struct RawImage {
    pixels: Arc<DynamicImage>,
    format: ImageFormat,
}

impl RawImage {
    pub(crate) fn new(pixels: DynamicImage, format: ImageFormat) -> Self {
        Self {
            pixels: Arc::new(pixels),
            format,
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    pub fn as_dynamic(&self) -> &DynamicImage {
        &self.pixels
    }
}

impl PartialEq for RawImage {
    fn eq(&self, other: &Self) -> bool {
        self.format == other.format
            && (Arc::ptr_eq(&self.pixels, &other.pixels) || *self.pixels == *other.pixels)
    }
}

impl fmt::Debug for RawImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawImage")
            .field("format", &self.format)
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}

/// Terminal success value of a paired fetch. Only the orchestrator builds
/// one, and only after both legs succeeded.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailedResource {
    image: RawImage,
    metadata: ImageMetadata,
}

impl DetailedResource {
    pub(crate) fn new(image: RawImage, metadata: ImageMetadata) -> Self {
        Self { image, metadata }
    }

    pub fn image(&self) -> &RawImage {
        &self.image
    }

    pub fn metadata(&self) -> &ImageMetadata {
        &self.metadata
    }

    pub fn into_parts(self) -> (RawImage, ImageMetadata) {
        (self.image, self.metadata)
    }
}

pub type FetchOutcome = std::result::Result<DetailedResource, FetchError>;

/// A completed request: status plus body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub body: Vec<u8>,
}

impl Response {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// Raw shape a callback transport hands back: any subset of the three
/// fields may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransportResult {
    pub bytes: Option<Vec<u8>>,
    pub status: Option<u16>,
    pub error: Option<TransportError>,
}

impl TransportResult {
    pub fn failed(error: TransportError) -> Self {
        Self {
            error: Some(error),
            ..Default::default()
        }
    }

    pub fn into_response(self) -> Result<Response, LegFailure> {
        if let Some(error) = self.error {
            return Err(LegFailure::Transport(error));
        }
        let status = self.status.ok_or(LegFailure::MissingResponse)?;
        let body = self.bytes.ok_or(LegFailure::MissingBody)?;
        Ok(Response { status, body })
    }
}

impl From<Result<Response, TransportError>> for TransportResult {
    fn from(result: Result<Response, TransportError>) -> Self {
        match result {
            Ok(response) => TransportResult {
                bytes: Some(response.body),
                status: Some(response.status),
                error: None,
            },
            Err(error) => TransportResult::failed(error),
        }
    }
}
