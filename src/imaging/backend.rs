//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the three operations every backend must
//! support: decode, dimensions, and encode (render to exact size + serialize).
//!
//! The production implementation,
//! [`RustBackend`](super::rust_backend::RustBackend), is pure Rust and built
//! on the `image` crate.

use super::params::EncodeParams;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Decode failed: {0}")]
    Decode(String),
    #[error("Encode failed: {0}")]
    Encode(String),
}

/// Pixel dimensions of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Trait for image processing backends.
///
/// A backend owns its in-memory bitmap type. [`encode`](Self::encode) takes
/// the decoded image by value so the bitmap is released as soon as the
/// encoded bytes exist.
pub trait ImageBackend {
    /// In-memory decoded bitmap.
    type Image;

    /// Decode a raw blob into a bitmap.
    fn decode(&self, data: &[u8]) -> Result<Self::Image, BackendError>;

    /// Natural dimensions of a decoded bitmap.
    fn dimensions(&self, image: &Self::Image) -> Dimensions;

    /// Scale to exactly `params.width` x `params.height` and serialize.
    fn encode(&self, image: Self::Image, params: &EncodeParams) -> Result<Vec<u8>, BackendError>;
}
