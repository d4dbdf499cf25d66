//! High-level image operations.
//!
//! These functions combine calculations with backend execution.
//! They take configuration, compute parameters, and call the backend.

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::calculations::compute_bounded;
use super::params::{EncodeParams, OutputFormat, Quality};
use tracing::debug;

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Shared settings for every image in one batch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConvertConfig {
    pub format: OutputFormat,
    pub quality: Quality,
    /// Upper bound on output width; `None` leaves width unconstrained.
    pub max_width: Option<u32>,
    /// Upper bound on output height; `None` leaves height unconstrained.
    pub max_height: Option<u32>,
}

impl ConvertConfig {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            ..Self::default()
        }
    }

    /// Build from UI-style values: integer quality percent and optional
    /// bounds where `0` means "blank".
    pub fn from_percent(
        format: OutputFormat,
        quality_percent: u32,
        max_width: Option<u32>,
        max_height: Option<u32>,
    ) -> Self {
        Self {
            format,
            quality: Quality::from_percent(quality_percent),
            max_width: max_width.filter(|&w| w > 0),
            max_height: max_height.filter(|&h| h > 0),
        }
    }

    pub fn with_quality(mut self, quality: Quality) -> Self {
        self.quality = quality;
        self
    }

    pub fn with_max_width(mut self, max_width: u32) -> Self {
        self.max_width = Some(max_width).filter(|&w| w > 0);
        self
    }

    pub fn with_max_height(mut self, max_height: u32) -> Self {
        self.max_height = Some(max_height).filter(|&h| h > 0);
        self
    }
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Jpeg,
            quality: Quality::default(),
            max_width: None,
            max_height: None,
        }
    }
}

/// One image after render + encode.
#[derive(Debug, Clone)]
pub struct ConvertedImage {
    pub original: Dimensions,
    pub dimensions: Dimensions,
    pub data: Vec<u8>,
}

/// Plan an encode without executing it.
///
/// Useful for testing parameter generation.
pub fn plan_encode(original: Dimensions, config: &ConvertConfig) -> EncodeParams {
    let Dimensions { width, height } = compute_bounded(
        (original.width, original.height),
        config.max_width,
        config.max_height,
    );

    EncodeParams {
        width,
        height,
        format: config.format,
        quality: config.quality,
    }
}

/// Decode, bound, render and encode a single image.
///
/// The decoded bitmap is moved into the encoder, so at most one bitmap and
/// one encode buffer are alive per call.
pub fn convert_image<B: ImageBackend>(
    backend: &B,
    data: &[u8],
    config: &ConvertConfig,
) -> Result<ConvertedImage> {
    let image = backend.decode(data)?;
    let original = backend.dimensions(&image);
    if original.width == 0 || original.height == 0 {
        return Err(BackendError::Decode(format!(
            "image has no pixels ({}x{})",
            original.width, original.height
        )));
    }

    let params = plan_encode(original, config);
    debug!(
        from = %format!("{}x{}", original.width, original.height),
        to = %format!("{}x{}", params.width, params.height),
        format = %params.format,
        "rendering"
    );

    let encoded = backend.encode(image, &params)?;
    Ok(ConvertedImage {
        original,
        dimensions: Dimensions {
            width: params.width,
            height: params.height,
        },
        data: encoded,
    })
}
