//! Pure Rust image processing backend built on the `image` crate.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, TIFF, WebP, GIF, BMP) | `image::load_from_memory` |
//! | Resize | `DynamicImage::resize_exact` with the `Triangle` (bilinear) filter |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` (RGB only, alpha flattened) |
//! | Encode → PNG | `image::codecs::png::PngEncoder` (float samples narrowed to 16-bit) |
//! | Encode → WebP | `image::codecs::webp::WebPEncoder` (lossless) |
//! | Encode → AVIF | `image::codecs::avif::AvifEncoder` (rav1e, speed 6) |

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::params::{EncodeParams, OutputFormat, Quality};
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};

/// Input formats with decoders compiled in, keyed by file extension.
///
/// AVIF is not listed: the `"avif"` feature of the `image` crate only brings
/// the encoder.
const INPUT_CANDIDATES: &[(&str, ImageFormat)] = &[
    ("jpg", ImageFormat::Jpeg),
    ("jpeg", ImageFormat::Jpeg),
    ("png", ImageFormat::Png),
    ("tif", ImageFormat::Tiff),
    ("tiff", ImageFormat::Tiff),
    ("webp", ImageFormat::WebP),
    ("gif", ImageFormat::Gif),
    ("bmp", ImageFormat::Bmp),
];

/// Returns the image file extensions that have working decoders compiled in.
pub fn supported_input_extensions() -> Vec<&'static str> {
    INPUT_CANDIDATES
        .iter()
        .filter(|(_, fmt)| fmt.reading_enabled())
        .map(|(ext, _)| *ext)
        .collect()
}

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Serialize a bitmap in the requested format, consuming it.
///
/// Pixel conversions reuse the bitmap's buffer when it already has the
/// encoder's layout.
fn encode_image(
    img: DynamicImage,
    format: OutputFormat,
    quality: Quality,
) -> Result<Vec<u8>, BackendError> {
    let mut buf = Vec::new();
    let result = match format {
        OutputFormat::Jpeg => {
            let rgb = DynamicImage::ImageRgb8(img.into_rgb8());
            let encoder =
                image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buf, quality.encoder_value());
            rgb.write_with_encoder(encoder)
        }
        OutputFormat::Png => {
            let encoder = image::codecs::png::PngEncoder::new(&mut buf);
            png_compatible(img).write_with_encoder(encoder)
        }
        OutputFormat::WebP => {
            let rgba = DynamicImage::ImageRgba8(img.into_rgba8());
            let encoder = image::codecs::webp::WebPEncoder::new_lossless(&mut buf);
            rgba.write_with_encoder(encoder)
        }
        OutputFormat::Avif => {
            let rgba = DynamicImage::ImageRgba8(img.into_rgba8());
            let encoder = image::codecs::avif::AvifEncoder::new_with_speed_quality(
                &mut buf,
                6,
                quality.encoder_value(),
            );
            rgba.write_with_encoder(encoder)
        }
    };
    result.map_err(|e| BackendError::Encode(format!("{} encode failed: {}", format, e)))?;
    Ok(buf)
}

/// PNG has no float samples; 32-bit float bitmaps go out as 16-bit.
fn png_compatible(img: DynamicImage) -> DynamicImage {
    match img {
        DynamicImage::ImageRgb32F(_) => DynamicImage::ImageRgb16(img.into_rgb16()),
        DynamicImage::ImageRgba32F(_) => DynamicImage::ImageRgba16(img.into_rgba16()),
        other => other,
    }
}

impl ImageBackend for RustBackend {
    type Image = DynamicImage;

    fn decode(&self, data: &[u8]) -> Result<DynamicImage, BackendError> {
        image::load_from_memory(data).map_err(|e| BackendError::Decode(e.to_string()))
    }

    fn dimensions(&self, image: &DynamicImage) -> Dimensions {
        Dimensions {
            width: image.width(),
            height: image.height(),
        }
    }

    fn encode(&self, image: DynamicImage, params: &EncodeParams) -> Result<Vec<u8>, BackendError> {
        let rendered = if image.width() == params.width && image.height() == params.height {
            image
        } else {
            let resized = image.resize_exact(params.width, params.height, FilterType::Triangle);
            drop(image);
            resized
        };
        encode_image(rendered, params.format, params.quality)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{jpeg_bytes, png_bytes, rgba_png_bytes};

    fn params(width: u32, height: u32, format: OutputFormat) -> EncodeParams {
        EncodeParams {
            width,
            height,
            format,
            quality: Quality::new(0.8),
        }
    }

    #[test]
    fn supported_extensions_match_decodable_formats() {
        let exts = supported_input_extensions();
        for expected in &["jpg", "jpeg", "png", "tif", "tiff", "webp", "gif", "bmp"] {
            assert!(
                exts.contains(expected),
                "expected {expected} in supported extensions"
            );
        }
        assert!(!exts.contains(&"avif"));
    }

    #[test]
    fn decode_synthetic_jpeg() {
        let backend = RustBackend::new();
        let img = backend.decode(&jpeg_bytes(200, 150)).unwrap();
        assert_eq!(
            backend.dimensions(&img),
            Dimensions {
                width: 200,
                height: 150
            }
        );
    }

    #[test]
    fn decode_garbage_errors() {
        let backend = RustBackend::new();
        let result = backend.decode(b"definitely not pixels");
        assert!(matches!(result, Err(BackendError::Decode(_))));
    }

    #[test]
    fn decode_truncated_png_errors() {
        let backend = RustBackend::new();
        let mut data = png_bytes(64, 64);
        data.truncate(data.len() / 2);
        assert!(matches!(
            backend.decode(&data),
            Err(BackendError::Decode(_))
        ));
    }

    #[test]
    fn encode_scales_to_exact_dimensions() {
        let backend = RustBackend::new();
        for format in [OutputFormat::Jpeg, OutputFormat::Png, OutputFormat::WebP] {
            let img = backend.decode(&png_bytes(400, 300)).unwrap();
            let bytes = backend.encode(img, &params(200, 150, format)).unwrap();
            let decoded = image::load_from_memory(&bytes).unwrap();
            assert_eq!((decoded.width(), decoded.height()), (200, 150), "{format}");
        }
    }

    #[test]
    fn encode_jpeg_flattens_alpha() {
        let backend = RustBackend::new();
        let img = backend.decode(&rgba_png_bytes(32, 32)).unwrap();
        let bytes = backend
            .encode(img, &params(32, 32, OutputFormat::Jpeg))
            .unwrap();
        assert_eq!(
            image::guess_format(&bytes).unwrap(),
            image::ImageFormat::Jpeg
        );
    }

    #[test]
    fn encode_png_ignores_quality() {
        let backend = RustBackend::new();
        let low = EncodeParams {
            quality: Quality::new(0.0),
            ..params(50, 50, OutputFormat::Png)
        };
        let img = backend.decode(&png_bytes(50, 50)).unwrap();
        let bytes = backend.encode(img, &low).unwrap();
        assert_eq!(image::guess_format(&bytes).unwrap(), image::ImageFormat::Png);
    }

    #[test]
    fn lower_jpeg_quality_is_smaller() {
        let backend = RustBackend::new();
        let source = jpeg_bytes(256, 256);

        let high = backend
            .encode(
                backend.decode(&source).unwrap(),
                &EncodeParams {
                    quality: Quality::new(1.0),
                    ..params(256, 256, OutputFormat::Jpeg)
                },
            )
            .unwrap();
        let low = backend
            .encode(
                backend.decode(&source).unwrap(),
                &EncodeParams {
                    quality: Quality::new(0.1),
                    ..params(256, 256, OutputFormat::Jpeg)
                },
            )
            .unwrap();
        assert!(low.len() < high.len());
    }

    #[test]
    fn encode_png_from_float_bitmap() {
        let backend = RustBackend::new();
        let hdr = image::Rgb32FImage::from_fn(8, 8, |x, y| {
            image::Rgb([x as f32 / 8.0, y as f32 / 8.0, 0.5])
        });
        let bytes = backend
            .encode(
                DynamicImage::ImageRgb32F(hdr),
                &params(8, 8, OutputFormat::Png),
            )
            .unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!(decoded.color(), image::ColorType::Rgb16);
        assert_eq!((decoded.width(), decoded.height()), (8, 8));
    }

    #[test]
    fn encode_png_from_float_bitmap_with_alpha() {
        let backend = RustBackend::new();
        let hdr = image::Rgba32FImage::from_pixel(4, 4, image::Rgba([0.25, 0.5, 0.75, 1.0]));
        let bytes = backend
            .encode(
                DynamicImage::ImageRgba32F(hdr),
                &params(2, 2, OutputFormat::Png),
            )
            .unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!(decoded.color(), image::ColorType::Rgba16);
        assert_eq!((decoded.width(), decoded.height()), (2, 2));
    }

    #[test]
    fn encode_png_same_size_keeps_pixels() {
        let backend = RustBackend::new();
        let source = png_bytes(24, 16);
        let original = image::load_from_memory(&source).unwrap().into_rgb8();

        let img = backend.decode(&source).unwrap();
        let bytes = backend
            .encode(img, &params(24, 16, OutputFormat::Png))
            .unwrap();
        let roundtrip = image::load_from_memory(&bytes).unwrap().into_rgb8();
        assert_eq!(roundtrip, original);
    }

    #[test]
    fn encode_avif_produces_bytes() {
        let backend = RustBackend::new();
        let img = backend.decode(&jpeg_bytes(64, 48)).unwrap();
        let bytes = backend
            .encode(img, &params(32, 24, OutputFormat::Avif))
            .unwrap();
        assert!(!bytes.is_empty());
    }
}
