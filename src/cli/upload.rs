//! Upload command implementation.
//!
//! Runs the whole pipeline for one signature, stores the PNG through the
//! directory uploader and appends its record to the JSON record store. The
//! saved record is printed to stdout.

use std::path::PathBuf;

use clap::Args;
use serde::Serialize;

use crate::config::Config;
use crate::error::{Result, SigtrimError};
use crate::files::SourceFile;
use crate::output::{dimensions, display_path, Printer};
use crate::pipeline::{SignaturePipeline, Submission};
use crate::store::{
    DirectoryUploader, JsonRecordStore, MemoryRecordStore, MemoryUploader, RecordStore, Uploader,
};

/// Normalize a signature, store it and record it
#[derive(Args, Debug)]
pub struct UploadArgs {
    /// Signature image to upload
    #[arg(required = true)]
    pub file: PathBuf,

    /// Upload directory (default: `store.uploads` from the config)
    #[arg(long)]
    pub uploads: Option<PathBuf>,

    /// Record file (default: `store.records` from the config)
    #[arg(long)]
    pub records: Option<PathBuf>,

    /// Run the pipeline but keep the result in memory
    #[arg(long)]
    pub dry_run: bool,
}

pub fn run(args: UploadArgs, config: &Config, printer: &Printer) -> Result<Submission> {
    let source = SourceFile::from_path(&args.file)?;
    printer.status("Processing", &display_path(&args.file));

    let submission = if args.dry_run {
        submit(config, &source, MemoryUploader::new(), MemoryRecordStore::new())
    } else {
        let uploads = args.uploads.clone().unwrap_or_else(|| config.store.uploads.clone());
        let records = args.records.clone().unwrap_or_else(|| config.store.records.clone());
        printer.verbose("Store", &format!("{} + {}", display_path(&uploads), display_path(&records)));
        submit(
            config,
            &source,
            DirectoryUploader::new(uploads),
            JsonRecordStore::new(records),
        )
    };

    let submission = submission.inspect_err(|e| printer.feedback(&source.name, e))?;

    let verb = if args.dry_run { "Checked" } else { "Uploaded" };
    printer.status(
        verb,
        &format!(
            "{} as {} ({})",
            source.name,
            submission.stored_name,
            dimensions(submission.width, submission.height)
        ),
    );

    println!("{}", to_json(&submission.record)?);

    Ok(submission)
}

fn submit<U: Uploader, R: RecordStore>(
    config: &Config,
    source: &SourceFile,
    uploader: U,
    records: R,
) -> Result<Submission> {
    SignaturePipeline::from_config(config, uploader, records).submit(source)
}

/// Render a value as one line of JSON for stdout.
fn to_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(|e| SigtrimError::Io {
        path: PathBuf::from("<stdout>"),
        message: format!("Failed to serialize record: {}", e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::files::SignatureRecord;
    use image::{Rgba, RgbaImage};
    use std::fs;
    use tempfile::tempdir;

    fn write_signature(path: &std::path::Path) {
        let mut img = RgbaImage::from_pixel(50, 20, Rgba([255, 255, 255, 255]));
        for x in 10..40 {
            img.put_pixel(x, 10, Rgba([0, 0, 0, 255]));
        }
        img.save(path).unwrap();
    }

    #[test]
    fn test_upload_stores_file_and_record() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("sig.png");
        write_signature(&input);

        let args = UploadArgs {
            file: input,
            uploads: Some(dir.path().join("uploads")),
            records: Some(dir.path().join("records.json")),
            dry_run: false,
        };
        let submission = run(args, &Config::default(), &Printer::new()).unwrap();

        assert_eq!((submission.width, submission.height), (30, 1));
        assert!(dir.path().join("uploads").join(&submission.stored_name).exists());

        let records: Vec<SignatureRecord> =
            serde_json::from_str(&fs::read_to_string(dir.path().join("records.json")).unwrap())
                .unwrap();
        assert_eq!(records, vec![SignatureRecord::image(submission.stored_name)]);
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("sig.png");
        write_signature(&input);

        let args = UploadArgs {
            file: input,
            uploads: Some(dir.path().join("uploads")),
            records: Some(dir.path().join("records.json")),
            dry_run: true,
        };
        run(args, &Config::default(), &Printer::new()).unwrap();

        assert!(!dir.path().join("uploads").exists());
        assert!(!dir.path().join("records.json").exists());
    }

    #[test]
    fn test_record_json_line() {
        let json = to_json(&SignatureRecord::image("1-sig.png")).unwrap();
        assert_eq!(json, r#"{"text":"IMAGE","image":"1-sig.png"}"#);
    }

    #[test]
    fn test_json_failure_is_not_an_upload_error() {
        // serde_json refuses non-string map keys
        let value = std::collections::BTreeMap::from([((1, 2), 3)]);
        let err = to_json(&value).unwrap_err();

        assert!(matches!(err, SigtrimError::Io { .. }));
        assert_eq!(err.channel(), crate::error::Feedback::Field);
    }
}
