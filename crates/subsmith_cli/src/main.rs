//! Command line front end for subsmith.
//!
//! Wires the core pipeline together: settings file, model registry,
//! transcription cache, and subtitle export.

mod settings;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};

use subsmith_core::cache::TranscriptionCache;
use subsmith_core::config::{RawConfig, RawValue};
use subsmith_core::logging::init_tracing;
use subsmith_core::registry::ModelRegistry;
use subsmith_core::subtitles::{self, available_export_formats, ExportFormat, ExportOptions};

use settings::{Settings, SettingsManager};

#[derive(Parser)]
#[command(name = "subsmith", version, about = "Speech-to-text subtitle generator", long_about = None)]
struct Cli {
    /// Settings file (defaults to the platform config directory)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Transcribe media files into subtitles
    Transcribe(TranscribeArgs),

    /// List the available transcription models
    Models,

    /// List the supported export formats
    Formats,
}

#[derive(Args)]
struct TranscribeArgs {
    /// Media files to transcribe
    #[arg(required = true, value_name = "MEDIA")]
    media: Vec<PathBuf>,

    /// Model identifier (defaults to the settings entry)
    #[arg(short, long, value_name = "ID")]
    model: Option<String>,

    /// Model config override, repeatable (e.g. --set model_type=tiny)
    #[arg(long = "set", value_name = "KEY=VALUE")]
    set: Vec<String>,

    /// Model config as a JSON object; --set entries override it
    #[arg(long, value_name = "JSON")]
    model_config: Option<String>,

    /// Export format tag (e.g. .srt)
    #[arg(short, long, value_name = "TAG")]
    format: Option<String>,

    /// Output directory (defaults to alongside each media file)
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Frame rate, required for .sub export
    #[arg(long)]
    fps: Option<f64>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings_path = cli
        .config
        .clone()
        .unwrap_or_else(settings::default_settings_path);
    let mut manager = SettingsManager::new(&settings_path);
    manager
        .load_or_create()
        .with_context(|| format!("loading settings from {}", settings_path.display()))?;

    init_tracing(manager.settings().logging.level);
    tracing::debug!(settings = %settings_path.display(), "settings loaded");

    match cli.command {
        Commands::Transcribe(args) => run_transcribe(manager.settings(), args),
        Commands::Models => {
            run_models();
            Ok(())
        }
        Commands::Formats => {
            run_formats();
            Ok(())
        }
    }
}

fn run_transcribe(settings: &Settings, args: TranscribeArgs) -> Result<()> {
    let registry = ModelRegistry::with_builtin_models();
    let cache = TranscriptionCache::new();

    let model = args
        .model
        .unwrap_or_else(|| settings.transcription.default_model.clone());
    let tag = args
        .format
        .unwrap_or_else(|| settings.transcription.default_format.clone());
    let format = ExportFormat::from_tag(&tag)?;
    let options = match args.fps {
        Some(fps) => ExportOptions::with_fps(fps),
        None => ExportOptions::default(),
    };

    let raw = build_raw_config(args.model_config.as_deref(), &args.set)?;

    if let Some(dir) = &args.output {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating output directory {}", dir.display()))?;
    }

    for media in &args.media {
        let doc = cache
            .transcribe(&registry, media, &model, &raw)
            .with_context(|| format!("transcribing {}", media.display()))?;
        let target = output_path(media, args.output.as_deref(), format);
        subtitles::export_to_file(&doc, &target, format, &options)?;
        println!("{}", target.display());
    }
    Ok(())
}

fn run_models() {
    let registry = ModelRegistry::with_builtin_models();
    if registry.is_empty() {
        println!("no models compiled in; rebuild with --features all-engines");
        return;
    }
    for descriptor in registry.iter() {
        println!("{}", descriptor.identifier());
        println!("    {}", descriptor.description());
        println!("    {}", descriptor.url());
    }
}

fn run_formats() {
    for tag in available_export_formats() {
        println!("{tag}");
    }
}

/// Parse one `--set key=value` entry. The value is read as JSON when it
/// parses as JSON (numbers, booleans, null, quoted strings) and as bare
/// text otherwise.
fn parse_override(entry: &str) -> Result<(String, RawValue)> {
    let Some((key, value)) = entry.split_once('=') else {
        bail!("invalid --set entry '{entry}', expected KEY=VALUE");
    };
    let key = key.trim();
    if key.is_empty() {
        bail!("invalid --set entry '{entry}', empty key");
    }
    let parsed = serde_json::from_str::<RawValue>(value)
        .unwrap_or_else(|_| RawValue::Text(value.to_string()));
    Ok((key.to_string(), parsed))
}

/// Combine `--model-config` JSON with `--set` overrides.
fn build_raw_config(model_config: Option<&str>, overrides: &[String]) -> Result<RawConfig> {
    let mut raw: RawConfig = match model_config {
        Some(json) => serde_json::from_str(json).context("parsing --model-config")?,
        None => RawConfig::new(),
    };
    for entry in overrides {
        let (key, value) = parse_override(entry)?;
        raw.insert(key, value);
    }
    Ok(raw)
}

/// Where the exported subtitles go: alongside the media file, or in the
/// output directory under the same stem.
fn output_path(media: &Path, output_dir: Option<&Path>, format: ExportFormat) -> PathBuf {
    let base = media.with_extension(format.extension());
    match (output_dir, base.file_name()) {
        (Some(dir), Some(name)) => dir.join(name),
        (Some(dir), None) => dir.join(format!("subtitles.{}", format.extension())),
        (None, _) => base,
    }
}
