//! CLI output formatting.
//!
//! # Output Format
//!
//! ```text
//! Converting 3 images → JPEG
//! 001 holiday.png → holiday.jpeg
//!     4000x3000 → 800x600
//!     5.2 MB → 143.7 KB (97.3% smaller)
//! 002 scan.tiff → scan.jpeg
//!     1200x1600 → 600x800
//!     88.0 KB → 91.5 KB (4.0% larger)
//!
//! Converted 3 images: 5.4 MB → 310.2 KB (94.4% smaller)
//! ```
//!
//! # Architecture
//!
//! Each `format_*` function returns `Vec<String>` (or `String`) for
//! testability; `print_*` wrappers write to stdout. Format functions are
//! pure and do no I/O.

use crate::convert::ConvertEvent;
use crate::imaging::{Dimensions, compression_ratio_percent};
use crate::types::ConversionResult;

/// Human-readable byte size with one decimal (`B`, `KB`, `MB`, `GB`).
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    if bytes < 1024 {
        return format!("{} B", bytes);
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", value, UNITS[unit])
}

/// `"60.0% smaller"`, `"12.5% larger"`, or `"same size"`.
pub fn format_ratio(ratio_percent: f64) -> String {
    if ratio_percent > 0.0 {
        format!("{:.1}% smaller", ratio_percent)
    } else if ratio_percent < 0.0 {
        format!("{:.1}% larger", -ratio_percent)
    } else {
        "same size".to_string()
    }
}

fn dims(d: Dimensions) -> String {
    format!("{}x{}", d.width, d.height)
}

/// Format a single conversion progress event as display lines.
pub fn format_convert_event(event: &ConvertEvent) -> Vec<String> {
    match event {
        ConvertEvent::BatchStarted { total, format } => {
            let noun = if *total == 1 { "image" } else { "images" };
            vec![format!("Converting {} {} → {}", total, noun, format)]
        }
        ConvertEvent::ImageConverted {
            index,
            original_name,
            output_name,
            original_dimensions,
            dimensions,
            original_size,
            processed_size,
            compression_ratio_percent,
            ..
        } => vec![
            format!("{:03} {} → {}", index + 1, original_name, output_name),
            format!("    {} → {}", dims(*original_dimensions), dims(*dimensions)),
            format!(
                "    {} → {} ({})",
                format_bytes(*original_size),
                format_bytes(*processed_size),
                format_ratio(*compression_ratio_percent)
            ),
        ],
    }
}

/// One-line totals for a finished batch.
pub fn format_summary(results: &[ConversionResult]) -> String {
    let original: u64 = results.iter().map(|r| r.original_size).sum();
    let processed: u64 = results.iter().map(|r| r.processed_size).sum();
    let noun = if results.len() == 1 { "image" } else { "images" };
    format!(
        "Converted {} {}: {} → {} ({})",
        results.len(),
        noun,
        format_bytes(original),
        format_bytes(processed),
        format_ratio(compression_ratio_percent(original, processed))
    )
}

pub fn print_summary(results: &[ConversionResult]) {
    println!();
    println!("{}", format_summary(results));
}
