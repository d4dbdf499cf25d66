//! Batch conversion: the core of simple-convert.
//!
//! Takes a [`BatchRequest`] (inputs plus one shared [`ConvertConfig`]) and
//! returns one [`ConversionResult`] per input, in input order.
//!
//! ## Per-image steps
//!
//! ```text
//! decode → compute_bounded → render (exact size) → encode → name → metadata
//! ```
//!
//! ## Failure policy
//!
//! The first failing image aborts the whole batch. The error names the
//! failing item (index and original name) and no partial results are
//! returned. Nothing is retried: failures here are deterministic (corrupt
//! file, unsupported encode), so the caller decides whether to re-run.
//!
//! ## Sequential Processing
//!
//! Images are converted strictly one after another. Only one decoded bitmap
//! and one encode buffer exist at any time, which keeps peak memory flat no
//! matter how large the batch is. The converter keeps no state between
//! calls; accumulating batches is the caller's business.

use crate::imaging::{
    BackendError, ConvertConfig, ConvertedImage, Dimensions, ImageBackend, OutputFormat,
    RustBackend, compression_ratio_percent, convert_image,
};
use crate::naming::output_file_name;
use crate::types::{ConversionResult, InputImage, ResultId};
use std::fmt;
use std::sync::mpsc::Sender;
use thiserror::Error;
use tracing::{debug, info};

/// Identifies the batch item an error refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRef {
    pub index: usize,
    pub name: String,
}

impl fmt::Display for ItemRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} ({})", self.index, self.name)
    }
}

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("Invalid input: batch is empty")]
    EmptyBatch,
    #[error("Invalid input {item}: {reason}")]
    InvalidInput { item: ItemRef, reason: String },
    #[error("Failed to decode {item}: {message}")]
    Decode { item: ItemRef, message: String },
    #[error("Failed to encode {item}: {message}")]
    Encode { item: ItemRef, message: String },
}

/// Coarse classification of a [`ConvertError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    Decode,
    Encode,
}

impl ConvertError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConvertError::EmptyBatch | ConvertError::InvalidInput { .. } => ErrorKind::InvalidInput,
            ConvertError::Decode { .. } => ErrorKind::Decode,
            ConvertError::Encode { .. } => ErrorKind::Encode,
        }
    }

    /// The failing item, if the error concerns one.
    pub fn item(&self) -> Option<&ItemRef> {
        match self {
            ConvertError::EmptyBatch => None,
            ConvertError::InvalidInput { item, .. }
            | ConvertError::Decode { item, .. }
            | ConvertError::Encode { item, .. } => Some(item),
        }
    }

    fn from_backend(item: ItemRef, err: BackendError) -> Self {
        match err {
            BackendError::Decode(message) => ConvertError::Decode { item, message },
            BackendError::Encode(message) => ConvertError::Encode { item, message },
            BackendError::Io(e) => ConvertError::Encode {
                item,
                message: e.to_string(),
            },
        }
    }
}

/// Everything one conversion run needs. Owned by the caller.
#[derive(Debug, Clone)]
pub struct BatchRequest {
    pub inputs: Vec<InputImage>,
    pub config: ConvertConfig,
}

impl BatchRequest {
    pub fn new(inputs: Vec<InputImage>, config: ConvertConfig) -> Self {
        Self { inputs, config }
    }
}

/// Progress events emitted while a batch runs.
#[derive(Debug, Clone)]
pub enum ConvertEvent {
    BatchStarted {
        total: usize,
        format: OutputFormat,
    },
    ImageConverted {
        /// 0-based position in the batch.
        index: usize,
        total: usize,
        original_name: String,
        output_name: String,
        original_dimensions: Dimensions,
        dimensions: Dimensions,
        original_size: u64,
        processed_size: u64,
        compression_ratio_percent: f64,
    },
}

impl ConvertEvent {
    fn converted(result: &ConversionResult, total: usize) -> Self {
        ConvertEvent::ImageConverted {
            index: result.index,
            total,
            original_name: result.original_name.clone(),
            output_name: result.output_name.clone(),
            original_dimensions: result.original_dimensions,
            dimensions: result.dimensions,
            original_size: result.original_size,
            processed_size: result.processed_size,
            compression_ratio_percent: result.compression_ratio_percent,
        }
    }
}

/// Convert a batch with the pure-Rust backend.
pub fn convert_batch(request: &BatchRequest) -> Result<Vec<ConversionResult>, ConvertError> {
    convert_batch_with_backend(&RustBackend::new(), request, None)
}

/// Convert a batch using a specific backend (allows testing with mock).
///
/// When `progress` is given, a [`ConvertEvent`] is sent before the first
/// image and after each converted image. A dropped receiver is ignored.
pub fn convert_batch_with_backend<B: ImageBackend>(
    backend: &B,
    request: &BatchRequest,
    progress: Option<Sender<ConvertEvent>>,
) -> Result<Vec<ConversionResult>, ConvertError> {
    let BatchRequest { inputs, config } = request;
    if inputs.is_empty() {
        return Err(ConvertError::EmptyBatch);
    }
    validate_inputs(inputs)?;

    let total = inputs.len();
    info!(total, format = %config.format, "converting batch");
    emit(
        &progress,
        ConvertEvent::BatchStarted {
            total,
            format: config.format,
        },
    );

    let mut results = Vec::with_capacity(total);
    for (index, input) in inputs.iter().enumerate() {
        debug!(index, name = %input.name, size = input.size(), "converting image");

        let converted = convert_image(backend, &input.data, config).map_err(|e| {
            ConvertError::from_backend(
                ItemRef {
                    index,
                    name: input.name.clone(),
                },
                e,
            )
        })?;

        let result = assemble_result(index, input, config.format, converted);
        emit(&progress, ConvertEvent::converted(&result, total));
        results.push(result);
    }

    info!(total, "batch converted");
    Ok(results)
}

/// Reject items whose type tag is not a raster image before doing any work.
fn validate_inputs(inputs: &[InputImage]) -> Result<(), ConvertError> {
    for (index, input) in inputs.iter().enumerate() {
        if !input.is_raster() {
            return Err(ConvertError::InvalidInput {
                item: ItemRef {
                    index,
                    name: input.name.clone(),
                },
                reason: format!(
                    "'{}' is not a raster image type",
                    input.mime_type.as_deref().unwrap_or_default()
                ),
            });
        }
    }
    Ok(())
}

fn assemble_result(
    index: usize,
    input: &InputImage,
    format: OutputFormat,
    converted: ConvertedImage,
) -> ConversionResult {
    let original_size = input.size();
    let processed_size = converted.data.len() as u64;

    ConversionResult {
        id: ResultId::derive(index, &input.name, &converted.data),
        index,
        original_name: input.name.clone(),
        original_size,
        original_dimensions: converted.original,
        output_name: output_file_name(&input.name, format),
        processed_size,
        dimensions: converted.dimensions,
        compression_ratio_percent: compression_ratio_percent(original_size, processed_size),
        format,
        data: converted.data,
    }
}

fn emit(progress: &Option<Sender<ConvertEvent>>, event: ConvertEvent) {
    if let Some(tx) = progress {
        tx.send(event).ok();
    }
}
