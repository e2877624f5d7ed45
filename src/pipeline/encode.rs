//! PNG encoding and upload packaging.

use base64::{engine::general_purpose, Engine as _};
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};

use crate::error::{Result, SigtrimError};
use crate::files::{SignatureFile, SourceFile};
use crate::raster::Canvas;

const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// Encode the canvas as a lossless RGBA PNG.
pub fn encode_png(canvas: &Canvas) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    PngEncoder::new(&mut out)
        .write_image(
            canvas.data(),
            canvas.width(),
            canvas.height(),
            ExtendedColorType::Rgba8,
        )
        .map_err(|e| SigtrimError::Encoding {
            message: format!("PNG encoding failed: {}", e),
        })?;
    Ok(out)
}

/// Wrap PNG bytes as a `data:image/png;base64,` URL.
pub fn to_data_url(png: &[u8]) -> String {
    format!("{}{}", PNG_DATA_URL_PREFIX, general_purpose::STANDARD.encode(png))
}

/// Decode a base64 image data URL back to bytes.
pub fn data_url_to_bytes(url: &str) -> Result<Vec<u8>> {
    if !url.starts_with("data:image/") {
        return Err(SigtrimError::Encoding {
            message: "not an image data URL".to_string(),
        });
    }

    let start = url.find(";base64,").ok_or_else(|| SigtrimError::Encoding {
        message: "data URL is missing the base64 marker".to_string(),
    })?;

    general_purpose::STANDARD
        .decode(&url[start + ";base64,".len()..])
        .map_err(|e| SigtrimError::Encoding {
            message: format!("base64 decoding failed: {}", e),
        })
}

/// Serialize the trimmed canvas and wrap it as the upload payload.
///
/// The payload keeps the source file's name and declared MIME type so the
/// stored signature lines up with what the user selected.
pub fn package(canvas: &Canvas, source: &SourceFile) -> Result<SignatureFile> {
    let url = to_data_url(&encode_png(canvas)?);
    let bytes = data_url_to_bytes(&url)?;

    Ok(SignatureFile {
        name: source.name.clone(),
        mime: source.mime.clone(),
        bytes,
    })
}
