//! # Simple Convert
//!
//! A batch image converter. Hand it a list of images, a target format, an
//! optional quality and optional maximum width/height, and it returns one
//! re-encoded image per input, in input order, each shrunk to fit the bounds
//! with its aspect ratio intact.
//!
//! # Pipeline
//!
//! ```text
//! inputs ──validate──▶ decode ──fit──▶ resize ──encode──▶ ConversionResult
//!                                                              │
//!                                   Staging ◀──────────────────┘
//!                                      │
//!                                      ▼
//!                                  out/photo.jpeg
//! ```
//!
//! Conversion is all-or-nothing. Every input is checked before any work
//! starts, images are converted strictly one after another, and the first
//! failure aborts the batch with an error naming the offending item. Only a
//! fully successful batch produces results.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`convert`] | Batch orchestration: validation, sequential conversion, progress events |
//! | [`imaging`] | Bounding-box math, encoding parameters, the `image`-crate backend |
//! | [`naming`] | Output file names: swap the extension for the target format's |
//! | [`types`] | `InputImage` and `ConversionResult` |
//! | [`download`] | Staged delivery of results into an output directory |
//! | [`config`] | `convert.toml` loading, merging over stock defaults, validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Never Upscale
//!
//! Bounds only shrink. A 300x200 image with a 1000-pixel bound stays
//! 300x200. Width is clamped first, then height, and rounding happens once at
//! the end so the aspect ratio drifts by at most one pixel.
//!
//! ## Pure-Rust Imaging
//!
//! Decoding and encoding go through the `image` crate alone (JPEG, PNG,
//! WebP, AVIF output). No system libraries, so the binary is self-contained.
//!
//! ## Swappable Backend
//!
//! All pixel work sits behind [`imaging::ImageBackend`]. The batch logic is
//! tested against a recording mock that never touches real pixels.

pub mod config;
pub mod convert;
pub mod download;
pub mod imaging;
pub mod naming;
pub mod output;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use convert::{BatchRequest, ConvertError, ErrorKind, convert_batch};
pub use imaging::{ConvertConfig, Dimensions, OutputFormat, Quality, compute_bounded};
pub use types::{ConversionResult, InputImage};
