//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

use super::backend::Dimensions;

/// Fit `original` inside optional maximum bounds, preserving aspect ratio.
///
/// The clamp runs in two sequential passes: width first, then height on the
/// result of the width pass. An absent bound (or a bound of `0`) leaves that
/// axis unconstrained. Images are only ever shrunk, never enlarged.
///
/// Intermediate values stay fractional; rounding to whole pixels happens once
/// at the end, and neither side is allowed to round down to zero.
///
/// # Examples
/// ```
/// # use simple_convert::imaging::{compute_bounded, Dimensions};
/// // 4000x3000 bounded to 800px wide → 800x600
/// assert_eq!(
///     compute_bounded((4000, 3000), Some(800), None),
///     Dimensions { width: 800, height: 600 }
/// );
///
/// // No bounds → unchanged
/// assert_eq!(
///     compute_bounded((640, 480), None, None),
///     Dimensions { width: 640, height: 480 }
/// );
/// ```
pub fn compute_bounded(
    original: (u32, u32),
    max_width: Option<u32>,
    max_height: Option<u32>,
) -> Dimensions {
    let (orig_w, orig_h) = original;
    let aspect = orig_w as f64 / orig_h as f64;

    let max_w = effective_bound(max_width, orig_w) as f64;
    let max_h = effective_bound(max_height, orig_h) as f64;

    let mut width = orig_w as f64;
    let mut height = orig_h as f64;

    if width > max_w {
        width = max_w;
        height = width / aspect;
    }

    // Only ever shrinks the pass-1 result, so width stays within max_w.
    if height > max_h {
        height = max_h;
        width = height * aspect;
    }

    Dimensions {
        width: round_px(width),
        height: round_px(height),
    }
}

/// Compression ratio as "percent smaller", rounded to one decimal.
///
/// Negative when the processed artifact is larger than the original.
/// An empty original has no meaningful ratio and reports `0.0`.
pub fn compression_ratio_percent(original_size: u64, processed_size: u64) -> f64 {
    if original_size == 0 {
        return 0.0;
    }
    let saved = original_size as f64 - processed_size as f64;
    round1(saved / original_size as f64 * 100.0)
}

fn effective_bound(bound: Option<u32>, original: u32) -> u32 {
    match bound {
        Some(b) if b > 0 => b,
        _ => original,
    }
}

fn round_px(value: f64) -> u32 {
    (value.round() as u32).max(1)
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dims(width: u32, height: u32) -> Dimensions {
        Dimensions { width, height }
    }

    // =========================================================================
    // compute_bounded tests
    // =========================================================================

    #[test]
    fn unbounded_is_identity() {
        for &(w, h) in &[(1, 1), (640, 480), (480, 640), (4000, 3000), (7, 13)] {
            assert_eq!(compute_bounded((w, h), None, None), dims(w, h));
        }
    }

    #[test]
    fn zero_bounds_are_unbounded() {
        assert_eq!(compute_bounded((640, 480), Some(0), Some(0)), dims(640, 480));
    }

    #[test]
    fn width_bound_preserves_aspect() {
        // 4000x3000 (4:3) → 800 wide
        assert_eq!(compute_bounded((4000, 3000), Some(800), None), dims(800, 600));
    }

    #[test]
    fn width_bound_ratio_within_rounding() {
        let (w, h) = (3001, 1999);
        let result = compute_bounded((w, h), Some(1000), None);
        assert_eq!(result.width, 1000);
        let expected = w as f64 / h as f64;
        let actual = result.width as f64 / result.height as f64;
        // One pixel of rounding on the height side
        let tolerance = expected / result.height as f64;
        assert!((expected - actual).abs() <= tolerance);
    }

    #[test]
    fn height_bound_preserves_aspect() {
        // 3000x4000 portrait → 600 tall
        assert_eq!(compute_bounded((3000, 4000), None, Some(600)), dims(450, 600));
    }

    #[test]
    fn width_then_height_clamp() {
        // Pass 1: 4000x1000 → 2000x500. Pass 2: 500 > 100 → 400x100.
        assert_eq!(
            compute_bounded((4000, 1000), Some(2000), Some(100)),
            dims(400, 100)
        );
    }

    #[test]
    fn width_pass_alone_satisfies_height() {
        // Pass 1: 2000x1000 → 1000x500, which already fits 800 tall
        assert_eq!(
            compute_bounded((2000, 1000), Some(1000), Some(800)),
            dims(1000, 500)
        );
    }

    #[test]
    fn never_upscales() {
        assert_eq!(
            compute_bounded((300, 200), Some(1920), Some(1080)),
            dims(300, 200)
        );
    }

    #[test]
    fn extreme_ratio_never_rounds_to_zero() {
        // 10000x1 bounded to 100 wide → height 0.01 rounds up to 1
        assert_eq!(compute_bounded((10000, 1), Some(100), None), dims(100, 1));
    }

    #[test]
    fn final_height_within_bound() {
        for &(w, h, mw, mh) in &[
            (5000, 5000, 1200, 300),
            (1234, 5678, 900, 700),
            (800, 600, 799, 1),
            (17, 4096, 16, 1024),
        ] {
            let result = compute_bounded((w, h), Some(mw), Some(mh));
            assert!(result.height <= mh, "{w}x{h} → {result:?} exceeds {mh}");
            assert!(result.width <= mw, "{w}x{h} → {result:?} exceeds {mw}");
        }
    }

    #[test]
    fn bounded_result_is_fixed_point() {
        let first = compute_bounded((4000, 3000), Some(800), Some(700));
        let second = compute_bounded((first.width, first.height), None, None);
        assert_eq!(first, second);
    }

    // =========================================================================
    // compression_ratio_percent tests
    // =========================================================================

    #[test]
    fn ratio_sixty_percent_smaller() {
        assert_eq!(compression_ratio_percent(1_000_000, 400_000), 60.0);
    }

    #[test]
    fn ratio_rounds_to_one_decimal() {
        // 1 - 2/3 = 33.333… → 33.3
        assert_eq!(compression_ratio_percent(3, 2), 33.3);
    }

    #[test]
    fn ratio_negative_when_output_grows() {
        assert_eq!(compression_ratio_percent(1000, 1500), -50.0);
    }

    #[test]
    fn ratio_of_empty_original_is_zero() {
        assert_eq!(compression_ratio_percent(0, 100), 0.0);
    }
}
