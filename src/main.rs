use clap::{Parser, Subcommand};
use serde::Serialize;
use simple_convert::config::{self, Settings};
use simple_convert::convert::{self, BatchRequest};
use simple_convert::download::Staging;
use simple_convert::imaging::{self, OutputFormat, RustBackend};
use simple_convert::output;
use simple_convert::types::{ConversionResult, InputImage};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use walkdir::WalkDir;

#[derive(Parser)]
#[command(name = "simple-convert")]
#[command(about = "Batch-convert images to another format, size and quality")]
#[command(long_about = "\
Batch-convert images to another format, size and quality

Every image is decoded, shrunk to fit the optional maximum width/height
(aspect ratio preserved, never enlarged), and re-encoded in the target
format. Results keep their original names with the new extension:

  holiday.png  →  converted/holiday.jpeg
  IMG_0001     →  converted/IMG_0001.jpeg

Images are converted one at a time; if any image fails, nothing is written.

Settings are read from ./convert.toml (or --config); flags override them.
Run 'simple-convert gen-config' to generate a documented convert.toml.")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

/// Flags for the convert command. Each overrides the settings file.
#[derive(clap::Args)]
struct ConvertArgs {
    /// Image files and/or directories of images
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Target format: jpeg, png, webp, avif
    #[arg(short, long)]
    format: Option<OutputFormat>,

    /// Encoding quality, 0-100 (JPEG and AVIF only)
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(0..=100))]
    quality: Option<u32>,

    /// Maximum output width in pixels (0 = no bound)
    #[arg(long)]
    max_width: Option<u32>,

    /// Maximum output height in pixels (0 = no bound)
    #[arg(long)]
    max_height: Option<u32>,

    /// Directory to write converted files into
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Settings file (default: ./convert.toml if present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Descend into subdirectories
    #[arg(short, long)]
    recursive: bool,

    /// Pause between saved files, in milliseconds
    #[arg(long)]
    stagger_ms: Option<u64>,

    /// Do not write manifest.json
    #[arg(long)]
    no_manifest: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Convert images
    Convert(ConvertArgs),
    /// Print a stock convert.toml with all options documented
    GenConfig,
    /// List supported output formats
    Formats,
}

/// Summary written next to the converted files.
#[derive(Serialize)]
struct Manifest<'a> {
    format: OutputFormat,
    quality: f32,
    max_width: Option<u32>,
    max_height: Option<u32>,
    images: Vec<ManifestEntry<'a>>,
}

#[derive(Serialize)]
struct ManifestEntry<'a> {
    #[serde(flatten)]
    result: &'a ConversionResult,
    saved_as: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "simple_convert=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Convert(args) => run_convert(args)?,
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
        Command::Formats => {
            for format in OutputFormat::ALL {
                let quality = if format.uses_quality() {
                    "quality applies"
                } else {
                    "lossless, quality ignored"
                };
                println!("{:<5} .{:<5} {}", format.label(), format.extension(), quality);
            }
        }
    }

    Ok(())
}

fn run_convert(args: ConvertArgs) -> Result<(), Box<dyn std::error::Error>> {
    let settings = resolve_settings(&args)?;
    let config = settings.convert_config();
    debug!(?config, "resolved conversion config");

    let inputs = collect_inputs(&args.paths, settings.input.recursive)?;

    let (tx, rx) = std::sync::mpsc::channel();
    let printer = std::thread::spawn(move || {
        for event in rx {
            for line in output::format_convert_event(&event) {
                println!("{}", line);
            }
        }
    });
    let request = BatchRequest::new(inputs, config);
    let result = convert::convert_batch_with_backend(&RustBackend::new(), &request, Some(tx));
    printer
        .join()
        .map_err(|_| "progress printer thread panicked")?;
    let results = result?;

    let dest = PathBuf::from(&settings.delivery.directory);
    let staging = Staging::new()?;
    let saved = staging.deliver_all(
        &results,
        &dest,
        Duration::from_millis(settings.delivery.stagger_ms),
    )?;

    if settings.delivery.manifest {
        let manifest = Manifest {
            format: config.format,
            quality: config.quality.value(),
            max_width: config.max_width,
            max_height: config.max_height,
            images: results
                .iter()
                .zip(&saved)
                .map(|(result, path)| ManifestEntry {
                    result,
                    saved_as: file_name_of(path),
                })
                .collect(),
        };
        let json = serde_json::to_string_pretty(&manifest)?;
        std::fs::write(dest.join("manifest.json"), json)?;
    }

    output::print_summary(&results);
    println!("==> Saved to {}", dest.display());
    Ok(())
}

/// Settings file first, then command-line overrides.
fn resolve_settings(args: &ConvertArgs) -> Result<Settings, config::ConfigError> {
    let mut settings = match &args.config {
        Some(path) => config::load_settings_file(path)?,
        None => config::load_settings(Path::new("."))?,
    };

    if let Some(format) = args.format {
        settings.output.format = format;
    }
    if let Some(quality) = args.quality {
        settings.output.quality = quality;
    }
    if let Some(w) = args.max_width {
        settings.output.max_width = Some(w).filter(|&w| w > 0);
    }
    if let Some(h) = args.max_height {
        settings.output.max_height = Some(h).filter(|&h| h > 0);
    }
    if let Some(dir) = &args.output {
        settings.delivery.directory = dir.to_string_lossy().into_owned();
    }
    if let Some(ms) = args.stagger_ms {
        settings.delivery.stagger_ms = ms;
    }
    settings.input.recursive |= args.recursive;
    settings.delivery.manifest &= !args.no_manifest;

    settings.validate()?;
    Ok(settings)
}

/// Gather image files from the given paths, in a stable order.
///
/// Directories are listed (recursively if asked) and sorted by name. Files
/// without a decodable image extension are skipped with a warning. A path
/// given on the command line that does not exist is an error; unreadable
/// entries below it are skipped with a warning.
fn collect_inputs(paths: &[PathBuf], recursive: bool) -> std::io::Result<Vec<InputImage>> {
    let mut inputs = Vec::new();

    for path in paths {
        if !path.exists() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{}: no such file or directory", path.display()),
            ));
        }
        let max_depth = if path.is_dir() && !recursive { 1 } else { usize::MAX };
        for entry in WalkDir::new(path).max_depth(max_depth).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(error = %e, "skipping unreadable entry");
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let file = entry.path();
            if !has_image_extension(file) {
                warn!(path = %file.display(), "skipping non-image file");
                continue;
            }
            let data = std::fs::read(file)?;
            inputs.push(InputImage::new(file_name_of(file), data));
        }
    }

    Ok(inputs)
}

fn has_image_extension(path: &Path) -> bool {
    let supported = imaging::supported_input_extensions();
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| supported.contains(&e.to_ascii_lowercase().as_str()))
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}
