//! Output file name derivation.
//!
//! A converted file keeps its original name with the last `.`-delimited
//! extension replaced by the target format's canonical extension:
//!
//! - `holiday.png` → `holiday.jpeg`
//! - `archive.tar.png` → `archive.tar.jpeg` (only the last segment)
//! - `IMG_0001` → `IMG_0001.jpeg` (no extension: append)
//! - `.hidden` → `.hidden.jpeg` (a leading dot is part of the name)
//! - `photo.` → `photo.jpeg` (empty extension is replaced)

use crate::imaging::OutputFormat;

/// Split a file name into `(stem, extension)` on its last dot.
///
/// A dot in the first position does not start an extension, so dotfiles
/// have no extension.
pub fn split_extension(name: &str) -> (&str, Option<&str>) {
    match name.rfind('.') {
        Some(0) | None => (name, None),
        Some(pos) => (&name[..pos], Some(&name[pos + 1..])),
    }
}

/// Derive the output file name for `original` converted to `format`.
pub fn output_file_name(original: &str, format: OutputFormat) -> String {
    let (stem, _) = split_extension(original);
    format!("{}.{}", stem, format.extension())
}
