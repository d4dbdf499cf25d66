//! Shared test utilities for the simple-convert test suite.
//!
//! Builds small synthetic images in memory so tests never depend on fixture
//! files, plus shortcuts for assembling [`InputImage`]s.
//!
//! # Usage
//!
//! ```ignore
//! use crate::test_helpers::*;
//!
//! let input = input("photo.png", png_bytes(400, 300));
//! let request = BatchRequest::new(vec![input], ConvertConfig::default());
//! ```

use crate::types::InputImage;
use image::{DynamicImage, ImageFormat, RgbImage, RgbaImage};
use std::io::Cursor;

// =========================================================================
// Synthetic images
// =========================================================================

/// Gradient with some per-pixel noise so encoders have real work to do.
fn gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        let noise = ((x.wrapping_mul(31) ^ y.wrapping_mul(17)) % 23) as u8;
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128u8.wrapping_add(noise)])
    })
}

fn encode(img: DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), format).unwrap();
    bytes
}

/// A valid JPEG of the given size.
pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    encode(DynamicImage::ImageRgb8(gradient(width, height)), ImageFormat::Jpeg)
}

/// A valid opaque PNG of the given size.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    encode(DynamicImage::ImageRgb8(gradient(width, height)), ImageFormat::Png)
}

/// A valid PNG with a varying alpha channel.
pub fn rgba_png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbaImage::from_fn(width, height, |x, y| {
        image::Rgba([(x % 256) as u8, (y % 256) as u8, 200, ((x + y) % 256) as u8])
    });
    encode(DynamicImage::ImageRgba8(img), ImageFormat::Png)
}

// =========================================================================
// Inputs
// =========================================================================

/// An input with no type tag.
pub fn input(name: &str, data: Vec<u8>) -> InputImage {
    InputImage::new(name, data)
}

/// An input carrying an explicit MIME-like type tag.
pub fn typed_input(name: &str, mime: &str, data: Vec<u8>) -> InputImage {
    InputImage::new(name, data).with_mime_type(mime)
}
