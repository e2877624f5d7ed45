//! Check command implementation.
//!
//! Runs intake and the background check without touching any pixels.

use std::path::PathBuf;

use clap::Args;

use crate::config::Config;
use crate::error::{Result, SigtrimError};
use crate::files::SourceFile;
use crate::output::{display_path, plural, Printer};
use crate::pipeline::{check_background, sampler, BackgroundReport, PipelineOptions};

/// Check that images have a white or transparent background
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Image files or directories to check
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,
}

/// Returns how many files passed.
pub fn run(args: CheckArgs, config: &Config, printer: &Printer) -> Result<usize> {
    let files = super::collect_inputs(&args.inputs)?;
    let options = PipelineOptions::from(config);

    let mut passed = 0;
    for path in &files {
        let display = display_path(path);
        match check_file(path, config, &options) {
            Ok(report) => {
                let reason = if report.has_transparent_pixels {
                    "transparent background"
                } else {
                    "white background"
                };
                printer.status("Accepted", &format!("{} ({})", display, reason));
                passed += 1;
            }
            Err(e) => printer.feedback(&display, &e),
        }
    }

    let failed = files.len() - passed;
    if failed > 0 {
        return Err(SigtrimError::Rejected {
            message: format!("{} rejected", plural(failed, "file", "files")),
            help: None,
        });
    }

    printer.info("Finished", &format!("{} accepted", plural(passed, "file", "files")));
    Ok(passed)
}

fn check_file(path: &std::path::Path, config: &Config, options: &PipelineOptions) -> Result<BackgroundReport> {
    let source = SourceFile::from_path(path)?;
    config.intake.check(&source)?;
    let image = sampler::decode(&source.bytes)?;
    check_background(&image, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::BackgroundCheck;
    use image::{Rgba, RgbaImage};
    use tempfile::tempdir;

    #[test]
    fn test_check_accepts_transparent_png() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sig.png");
        let mut img = RgbaImage::new(30, 10);
        img.put_pixel(5, 5, Rgba([0, 0, 0, 255]));
        img.save(&path).unwrap();

        let passed = run(CheckArgs { inputs: vec![path] }, &Config::default(), &Printer::new()).unwrap();
        assert_eq!(passed, 1);
    }

    #[test]
    fn test_check_rejects_blue() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sig.png");
        RgbaImage::from_pixel(30, 10, Rgba([0, 0, 255, 255]))
            .save(&path)
            .unwrap();

        let result = run(CheckArgs { inputs: vec![path] }, &Config::default(), &Printer::new());
        assert!(result.is_err());
    }

    #[test]
    fn test_check_uses_configured_rule() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sig.png");
        // Blue with a white bottom-right corner: passes last-pixel, fails border.
        let mut img = RgbaImage::from_pixel(30, 10, Rgba([0, 0, 255, 255]));
        for y in 5..10 {
            for x in 20..30 {
                img.put_pixel(x, y, Rgba([255, 255, 255, 255]));
            }
        }
        img.save(&path).unwrap();

        let last_pixel = run(
            CheckArgs { inputs: vec![path.clone()] },
            &Config::default(),
            &Printer::new(),
        );
        assert!(last_pixel.is_ok());

        let border = Config {
            background: BackgroundCheck::Border,
            ..Config::default()
        };
        assert!(run(CheckArgs { inputs: vec![path] }, &border, &Printer::new()).is_err());
    }
}
