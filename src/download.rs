//! Delivery of converted images.
//!
//! Results are handed to a delivery target through short-lived staged files.
//! [`Staging`] owns a private temporary directory; [`Staging::stage`] writes
//! one result into it and returns a [`StagedFile`] handle. The staged file is
//! removed as soon as the handle is dropped, so repeated runs never pile up
//! transient files. Dropping the [`Staging`] itself removes the directory.
//!
//! ```text
//! result ──stage──▶ $TMP/simple-convert-XXXX/<id>-photo.jpeg ──copy──▶ out/photo.jpeg
//!                     (removed when the handle drops)
//! ```

use crate::naming::split_extension;
use crate::types::ConversionResult;
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tempfile::TempDir;
use tracing::debug;

/// Private staging area for transient result files.
pub struct Staging {
    dir: TempDir,
    live: AtomicUsize,
}

/// A result written to the staging area. Removed on drop.
pub struct StagedFile<'a> {
    staging: &'a Staging,
    path: PathBuf,
    name: String,
}

impl StagedFile<'_> {
    /// Location of the staged bytes.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name the result should be saved under.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Drop for StagedFile<'_> {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            debug!(path = %self.path.display(), error = %e, "staged file already gone");
        }
        self.staging.live.fetch_sub(1, Ordering::SeqCst);
    }
}

impl Staging {
    pub fn new() -> io::Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix("simple-convert-")
            .tempdir()?;
        Ok(Self {
            dir,
            live: AtomicUsize::new(0),
        })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Number of staged files whose handles are still alive.
    pub fn live(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    /// Write `result` into the staging area.
    pub fn stage(&self, result: &ConversionResult) -> io::Result<StagedFile<'_>> {
        let name = plain_file_name(&result.output_name)?;
        let path = self.dir.path().join(format!("{}-{}", result.id, name));
        fs::write(&path, &result.data)?;
        self.live.fetch_add(1, Ordering::SeqCst);
        Ok(StagedFile {
            staging: self,
            path,
            name,
        })
    }

    /// Save one result as `dest_dir/<output_name>`.
    ///
    /// The staged copy is released before this returns.
    pub fn deliver(&self, result: &ConversionResult, dest_dir: &Path) -> io::Result<PathBuf> {
        let staged = self.stage(result)?;
        let name = staged.name().to_string();
        self.copy_out(&staged, dest_dir, &name)
    }

    /// Save every result into `dest_dir`, in order, pausing `stagger`
    /// between items.
    ///
    /// Output names that collide within the batch (`a.png` and `a.gif` both
    /// becoming `a.jpeg`) get a numeric suffix: `a.jpeg`, `a-1.jpeg`, ...
    pub fn deliver_all(
        &self,
        results: &[ConversionResult],
        dest_dir: &Path,
        stagger: Duration,
    ) -> io::Result<Vec<PathBuf>> {
        let mut used = HashSet::new();
        let mut delivered = Vec::with_capacity(results.len());

        for (i, result) in results.iter().enumerate() {
            if i > 0 && !stagger.is_zero() {
                std::thread::sleep(stagger);
            }
            let staged = self.stage(result)?;
            let name = unique_name(staged.name(), &mut used);
            delivered.push(self.copy_out(&staged, dest_dir, &name)?);
        }

        Ok(delivered)
    }

    fn copy_out(&self, staged: &StagedFile<'_>, dest_dir: &Path, name: &str) -> io::Result<PathBuf> {
        fs::create_dir_all(dest_dir)?;
        let dest = dest_dir.join(name);
        fs::copy(staged.path(), &dest)?;
        debug!(dest = %dest.display(), "delivered");
        Ok(dest)
    }
}

/// Reduce a name to its final path component so it cannot escape the
/// destination directory.
fn plain_file_name(name: &str) -> io::Result<String> {
    Path::new(name)
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("not a usable file name: {name:?}"),
            )
        })
}

fn unique_name(name: &str, used: &mut HashSet<String>) -> String {
    if used.insert(name.to_string()) {
        return name.to_string();
    }
    let (stem, ext) = split_extension(name);
    let mut n = 1;
    loop {
        let candidate = match ext {
            Some(ext) => format!("{stem}-{n}.{ext}"),
            None => format!("{stem}-{n}"),
        };
        if used.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}
