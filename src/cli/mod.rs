pub mod check;
pub mod completions;
pub mod init;
pub mod normalize;
pub mod upload;

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use walkdir::WalkDir;

use crate::config::{Config, CONFIG_FILENAME};
use crate::error::{Result, SigtrimError};
use crate::pipeline::{BackgroundCheck, TrimMode};

/// sigtrim - Signature image normalizer
#[derive(Parser, Debug)]
#[command(name = "sigtrim")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Trim signature images and write transparent PNGs
    Normalize(normalize::NormalizeArgs),

    /// Check that images have a white or transparent background
    Check(check::CheckArgs),

    /// Normalize a signature, store it and record it
    Upload(upload::UploadArgs),

    /// Write a default sigtrim.yaml
    Init(init::InitArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

/// Options shared by every subcommand.
#[derive(Args, Debug, Default)]
pub struct GlobalArgs {
    /// Config file (default: ./sigtrim.yaml when present)
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Background rule, overriding the config
    #[arg(long, global = true, value_enum)]
    pub background: Option<BackgroundCheck>,

    /// Trim rule, overriding the config
    #[arg(long, global = true, value_enum)]
    pub trim: Option<TrimMode>,

    /// Print per-stage details
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

impl GlobalArgs {
    /// Load the config file and apply command-line overrides.
    pub fn load(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => {
                let default = Path::new(CONFIG_FILENAME);
                if default.exists() {
                    Config::load(default)?
                } else {
                    Config::default()
                }
            }
        };

        if let Some(background) = self.background {
            config.background = background;
        }
        if let Some(trim) = self.trim {
            config.trim = trim;
        }

        Ok(config)
    }
}

/// Expand directories into the image files they contain.
///
/// Files are passed through as given; directories are walked recursively
/// and filtered by image extension, sorted for stable output.
pub fn collect_inputs(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for input in inputs {
        if input.is_dir() {
            let mut found: Vec<PathBuf> = WalkDir::new(input)
                .into_iter()
                .filter_map(|entry| entry.ok())
                .filter(|entry| entry.file_type().is_file())
                .map(|entry| entry.into_path())
                .filter(|path| has_image_extension(path))
                .collect();
            found.sort();
            files.extend(found);
        } else if input.exists() {
            files.push(input.clone());
        } else {
            return Err(SigtrimError::Io {
                path: input.clone(),
                message: format!("File not found: {}", input.display()),
            });
        }
    }

    Ok(files)
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| crate::files::mime_for_extension(e).starts_with("image/"))
        .unwrap_or(false)
}
