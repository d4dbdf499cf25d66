//! Shared types passed across the conversion boundary.
//!
//! [`InputImage`] goes in, [`ConversionResult`] comes out. Results serialize
//! (without their pixel payload) into the summary manifest the CLI writes.

use crate::imaging::{Dimensions, OutputFormat};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// One source image handed to the converter.
///
/// The MIME-like type tag is optional: callers that already filtered their
/// files can leave it out. When present it must name a raster image type.
#[derive(Debug, Clone)]
pub struct InputImage {
    pub name: String,
    pub data: Vec<u8>,
    pub mime_type: Option<String>,
}

impl InputImage {
    pub fn new(name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            data,
            mime_type: None,
        }
    }

    pub fn with_mime_type(mut self, mime: impl Into<String>) -> Self {
        self.mime_type = Some(mime.into());
        self
    }

    /// Byte size of the original blob.
    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }

    /// Whether the type tag (if any) names a raster image.
    ///
    /// `image/svg+xml` is a vector format and does not qualify.
    pub fn is_raster(&self) -> bool {
        match &self.mime_type {
            None => true,
            Some(mime) => {
                let mime = mime.trim().to_ascii_lowercase();
                mime.starts_with("image/") && mime != "image/svg+xml"
            }
        }
    }
}

/// Opaque handle identifying one conversion result.
///
/// Derived from the batch position, original name and processed bytes, so it
/// stays stable for identical runs while distinguishing duplicates within a
/// batch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultId(String);

impl ResultId {
    pub(crate) fn derive(index: usize, original_name: &str, data: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update((index as u64).to_le_bytes());
        hasher.update(original_name.as_bytes());
        hasher.update(b"\x00");
        hasher.update(data);
        let digest = format!("{:x}", hasher.finalize());
        Self(digest[..16].to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResultId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The converted artifact for one [`InputImage`], plus display metadata.
#[derive(Debug, Clone, Serialize)]
pub struct ConversionResult {
    pub id: ResultId,
    /// Position of the source image in the batch.
    pub index: usize,
    pub original_name: String,
    pub original_size: u64,
    pub original_dimensions: Dimensions,
    /// Derived file name: original name with the target extension.
    pub output_name: String,
    #[serde(skip)]
    pub data: Vec<u8>,
    pub processed_size: u64,
    pub dimensions: Dimensions,
    /// Percent smaller than the original, one decimal. Negative if larger.
    pub compression_ratio_percent: f64,
    pub format: OutputFormat,
}
