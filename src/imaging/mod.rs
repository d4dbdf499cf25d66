//! Image processing in pure Rust, built on the `image` crate.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `image::load_from_memory` |
//! | **Bound** | [`compute_bounded`] (two-pass width-then-height clamp) |
//! | **Render** | `resize_exact` + `Triangle` filter |
//! | **Encode** | JPEG / PNG / WebP (lossless) / AVIF encoders |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: High-level functions combining calculations + backend

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use calculations::{compression_ratio_percent, compute_bounded};
pub use operations::{ConvertConfig, ConvertedImage, convert_image, plan_encode};
pub use params::{EncodeParams, OutputFormat, Quality};
pub use rust_backend::{RustBackend, supported_input_extensions};
