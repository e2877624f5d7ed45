//! Init command implementation.
//!
//! Writes a `sigtrim.yaml` holding the default configuration.

use std::fs;
use std::path::PathBuf;

use clap::Args;

use crate::config::{Config, CONFIG_FILENAME};
use crate::error::{Result, SigtrimError};
use crate::output::{display_path, Printer};

/// Write a default sigtrim.yaml
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Directory to write the config into (default: current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Overwrite existing sigtrim.yaml
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: InitArgs, printer: &Printer) -> Result<PathBuf> {
    let config_path = args.path.join(CONFIG_FILENAME);

    if config_path.exists() && !args.force {
        return Err(SigtrimError::Config {
            message: format!("{} already exists", CONFIG_FILENAME),
            help: Some("Use --force to overwrite".to_string()),
        });
    }

    let yaml = Config::default().to_yaml()?;

    fs::write(&config_path, yaml).map_err(|e| SigtrimError::Io {
        path: config_path.clone(),
        message: format!("Failed to write config: {}", e),
    })?;

    printer.status("Created", &display_path(&config_path));
    Ok(config_path)
}
