//! Normalize command implementation.
//!
//! Runs the pixel stages on local files and writes the trimmed PNGs.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;

use crate::config::Config;
use crate::error::{Result, SigtrimError};
use crate::files::SourceFile;
use crate::output::{dimensions, display_path, plural, Printer};
use crate::pipeline::{encode, normalize, sampler, NormalizedImage, PipelineOptions};

/// Trim signature images and write transparent PNGs
#[derive(Args, Debug)]
pub struct NormalizeArgs {
    /// Image files or directories to process
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Output directory (default: `output` from the config)
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

/// Returns the paths of the PNGs written.
pub fn run(args: NormalizeArgs, config: &Config, printer: &Printer) -> Result<Vec<PathBuf>> {
    let output = args.output.clone().unwrap_or_else(|| config.output.clone());
    let files = super::collect_inputs(&args.inputs)?;

    if files.is_empty() {
        printer.warning("Warning", "no image files found");
        return Ok(Vec::new());
    }

    if !output.exists() {
        fs::create_dir_all(&output).map_err(|e| SigtrimError::Io {
            path: output.clone(),
            message: format!("Failed to create output directory: {}", e),
        })?;
    }

    let options = PipelineOptions::from(config);
    printer.verbose(
        "Options",
        &format!(
            "sample {}, background {:?}, trim {:?}",
            dimensions(options.sample_width, options.sample_height),
            options.background,
            options.trim
        ),
    );

    let mut written = Vec::new();
    let mut claimed = HashSet::new();
    let mut failed = 0;

    for path in &files {
        match process_file(path, &output, &mut claimed, config, &options) {
            Ok((out_path, source_dims, normalized)) => {
                printer.status(
                    "Trimmed",
                    &format!(
                        "{} ({} -> {})",
                        display_path(path),
                        source_dims,
                        dimensions(normalized.width(), normalized.height())
                    ),
                );
                if normalized.region.is_none() {
                    printer.warning("Warning", "no content found, image kept at full size");
                }
                printer.verbose(
                    "Cleared",
                    &format!("{} white pixel(s) -> {}", normalized.cleared, display_path(&out_path)),
                );
                written.push(out_path);
            }
            Err(e) => {
                printer.feedback(&display_path(path), &e);
                failed += 1;
            }
        }
    }

    if failed > 0 {
        return Err(SigtrimError::Rejected {
            message: format!(
                "{} of {} could not be normalized",
                failed,
                plural(files.len(), "file", "files")
            ),
            help: None,
        });
    }

    printer.info(
        "Finished",
        &format!("{} to {}", plural(written.len(), "signature", "signatures"), display_path(&output)),
    );

    Ok(written)
}

fn process_file(
    path: &Path,
    output: &Path,
    claimed: &mut HashSet<PathBuf>,
    config: &Config,
    options: &PipelineOptions,
) -> Result<(PathBuf, String, NormalizedImage)> {
    let source = SourceFile::from_path(path)?;
    config.intake.check(&source)?;

    let image = sampler::decode(&source.bytes)?;
    let source_dims = dimensions(image.width(), image.height());

    let normalized = normalize(&image, options)?;
    let png = encode::encode_png(&normalized.canvas)?;

    let out_path = output_path(output, source.stem(), claimed);
    fs::write(&out_path, png).map_err(|e| SigtrimError::Io {
        path: out_path.clone(),
        message: format!("Failed to write PNG: {}", e),
    })?;

    Ok((out_path, source_dims, normalized))
}

/// `<stem>.png`, or `<stem>-<n>.png` when an earlier input of this run
/// already took that name.
fn output_path(output: &Path, stem: &str, claimed: &mut HashSet<PathBuf>) -> PathBuf {
    let mut candidate = output.join(format!("{}.png", stem));
    let mut n = 1;
    while !claimed.insert(candidate.clone()) {
        candidate = output.join(format!("{}-{}.png", stem, n));
        n += 1;
    }
    candidate
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use tempfile::tempdir;

    fn write_signature(path: &Path, bg: [u8; 4]) {
        let mut img = RgbaImage::from_pixel(40, 20, Rgba(bg));
        for y in 5..10 {
            for x in 10..30 {
                img.put_pixel(x, y, Rgba([20, 20, 20, 255]));
            }
        }
        img.save(path).unwrap();
    }

    #[test]
    fn test_normalize_writes_trimmed_png() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("john.png");
        write_signature(&input, [255, 255, 255, 255]);

        let args = NormalizeArgs {
            inputs: vec![input],
            output: Some(dir.path().join("out")),
        };
        let written = run(args, &Config::default(), &Printer::new()).unwrap();

        assert_eq!(written, vec![dir.path().join("out/john.png")]);
        let img = image::open(&written[0]).unwrap().to_rgba8();
        assert_eq!(img.dimensions(), (20, 5));
    }

    #[test]
    fn test_normalize_reports_rejections() {
        let dir = tempdir().unwrap();
        let good = dir.path().join("good.png");
        let bad = dir.path().join("bad.png");
        write_signature(&good, [255, 255, 255, 255]);
        write_signature(&bad, [0, 0, 255, 255]);

        let args = NormalizeArgs {
            inputs: vec![good, bad],
            output: Some(dir.path().join("out")),
        };
        let result = run(args, &Config::default(), &Printer::new());

        assert!(result.is_err());
        assert!(dir.path().join("out/good.png").exists());
        assert!(!dir.path().join("out/bad.png").exists());
    }

    #[test]
    fn test_normalize_empty_directory() {
        let dir = tempdir().unwrap();
        let args = NormalizeArgs {
            inputs: vec![dir.path().to_path_buf()],
            output: Some(dir.path().join("out")),
        };

        let written = run(args, &Config::default(), &Printer::new()).unwrap();
        assert!(written.is_empty());
    }

    #[test]
    fn test_normalize_same_stem_inputs_get_distinct_outputs() {
        let dir = tempdir().unwrap();
        let inputs = dir.path().join("in");
        fs::create_dir_all(inputs.join("a")).unwrap();
        fs::create_dir_all(inputs.join("b")).unwrap();
        write_signature(&inputs.join("a/sig.png"), [255, 255, 255, 255]);
        write_signature(&inputs.join("b/sig.png"), [255, 255, 255, 255]);

        let out = dir.path().join("out");
        let args = NormalizeArgs {
            inputs: vec![inputs],
            output: Some(out.clone()),
        };
        let written = run(args, &Config::default(), &Printer::new()).unwrap();

        assert_eq!(written, vec![out.join("sig.png"), out.join("sig-1.png")]);
        assert_eq!(fs::read_dir(&out).unwrap().count(), 2);
    }

    #[test]
    fn test_output_path_skips_claimed_names() {
        let out = Path::new("out");
        let mut claimed = HashSet::new();

        assert_eq!(output_path(out, "sig", &mut claimed), out.join("sig.png"));
        assert_eq!(output_path(out, "sig", &mut claimed), out.join("sig-1.png"));
        assert_eq!(output_path(out, "sig", &mut claimed), out.join("sig-2.png"));
        assert_eq!(output_path(out, "other", &mut claimed), out.join("other.png"));
    }
}
