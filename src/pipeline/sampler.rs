//! Decoding and rendering source images onto canvases.

use std::io::Cursor;

use image::imageops::FilterType;
use image::metadata::Orientation;
use image::{DynamicImage, ImageDecoder, ImageError, ImageReader};

use crate::error::{Result, SigtrimError};
use crate::raster::Canvas;

/// Width of the canvas used for the background check.
pub const SAMPLE_WIDTH: u32 = 200;

/// Height of the canvas used for the background check.
pub const SAMPLE_HEIGHT: u32 = 80;

fn decode_error(e: ImageError) -> SigtrimError {
    SigtrimError::Decode {
        message: e.to_string(),
    }
}

/// Decode an uploaded file into a bitmap, upright.
///
/// An EXIF orientation tag is applied, so a rotated phone photo comes out
/// the way it is displayed.
pub fn decode(bytes: &[u8]) -> Result<DynamicImage> {
    let mut decoder = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| decode_error(ImageError::IoError(e)))?
        .into_decoder()
        .map_err(decode_error)?;

    let orientation = decoder.orientation().unwrap_or_else(|e| {
        log::warn!("ignoring unreadable orientation: {}", e);
        Orientation::NoTransforms
    });
    let mut image = DynamicImage::from_decoder(decoder).map_err(decode_error)?;
    if orientation != Orientation::NoTransforms {
        log::debug!("applying {:?}", orientation);
        image.apply_orientation(orientation);
    }

    if image.width() == 0 || image.height() == 0 {
        return Err(SigtrimError::Decode {
            message: format!("image has zero dimensions ({}x{})", image.width(), image.height()),
        });
    }

    Ok(image)
}

/// Draw the image scaled to `width` x `height` and return the pixels.
///
/// The aspect ratio is not preserved; the source is stretched over the whole
/// sample canvas.
pub fn sample(image: &DynamicImage, width: u32, height: u32) -> Canvas {
    let width = width.max(1);
    let height = height.max(1);
    let scaled = image.resize_exact(width, height, FilterType::Triangle);
    log::debug!(
        "sampled {}x{} source into {}x{}",
        image.width(),
        image.height(),
        width,
        height
    );
    Canvas::from(scaled.to_rgba8())
}

/// Draw the image at its native size.
pub fn render(image: &DynamicImage) -> Canvas {
    Canvas::from(image.to_rgba8())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::codecs::jpeg::JpegEncoder;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};

    fn png_bytes(img: &RgbaImage) -> Vec<u8> {
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn test_decode_png() {
        let img = RgbaImage::from_pixel(3, 2, Rgba([1, 2, 3, 255]));
        let decoded = decode(&png_bytes(&img)).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (3, 2));
    }

    /// APP1 segment carrying a little-endian EXIF block with one
    /// Orientation entry.
    fn exif_orientation_segment(orientation: u8) -> Vec<u8> {
        let mut tiff = vec![b'I', b'I', 42, 0, 8, 0, 0, 0];
        tiff.extend_from_slice(&[1, 0]);
        tiff.extend_from_slice(&[0x12, 0x01, 3, 0, 1, 0, 0, 0, orientation, 0, 0, 0]);
        tiff.extend_from_slice(&[0, 0, 0, 0]);

        let mut payload = b"Exif\0\0".to_vec();
        payload.extend_from_slice(&tiff);

        let length = (payload.len() + 2) as u16;
        let mut segment = vec![0xFF, 0xE1];
        segment.extend_from_slice(&length.to_be_bytes());
        segment.extend_from_slice(&payload);
        segment
    }

    fn jpeg_with_orientation(img: &RgbImage, orientation: u8) -> Vec<u8> {
        let mut jpeg = Vec::new();
        JpegEncoder::new_with_quality(&mut jpeg, 95)
            .encode_image(img)
            .unwrap();

        // right after SOI
        let mut bytes = jpeg[..2].to_vec();
        bytes.extend(exif_orientation_segment(orientation));
        bytes.extend_from_slice(&jpeg[2..]);
        bytes
    }

    #[test]
    fn test_decode_applies_exif_rotation() {
        // dark left half, white right half
        let mut img = RgbImage::from_pixel(20, 10, Rgb([255, 255, 255]));
        for y in 0..10 {
            for x in 0..10 {
                img.put_pixel(x, y, Rgb([0, 0, 0]));
            }
        }

        // 6 = rotate 90 degrees clockwise
        let decoded = decode(&jpeg_with_orientation(&img, 6)).unwrap().to_rgb8();

        assert_eq!(decoded.dimensions(), (10, 20));
        // the dark half ends up on top
        assert!(decoded.get_pixel(5, 2).0[0] < 64);
        assert!(decoded.get_pixel(5, 17).0[0] > 192);
    }

    #[test]
    fn test_decode_upright_exif_keeps_size() {
        let img = RgbImage::from_pixel(20, 10, Rgb([255, 255, 255]));
        let decoded = decode(&jpeg_with_orientation(&img, 1)).unwrap();

        assert_eq!((decoded.width(), decoded.height()), (20, 10));
    }

    #[test]
    fn test_decode_garbage() {
        let result = decode(b"definitely not an image");
        assert!(matches!(result, Err(SigtrimError::Decode { .. })));
    }

    #[test]
    fn test_sample_has_fixed_size() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            640,
            480,
            Rgba([255, 255, 255, 255]),
        ));
        let canvas = sample(&img, SAMPLE_WIDTH, SAMPLE_HEIGHT);

        assert_eq!(canvas.dimensions(), (200, 80));
        assert_eq!(canvas.data().len(), 200 * 80 * 4);
    }

    #[test]
    fn test_sample_preserves_flat_colour() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            30,
            10,
            Rgba([255, 255, 255, 255]),
        ));
        let canvas = sample(&img, SAMPLE_WIDTH, SAMPLE_HEIGHT);

        assert_eq!(canvas.pixel(199, 79), [255, 255, 255, 255]);
        assert_eq!(canvas.pixel(0, 0), [255, 255, 255, 255]);
    }

    #[test]
    fn test_render_is_native_size() {
        let img = DynamicImage::ImageRgba8(RgbaImage::new(300, 150));
        assert_eq!(render(&img).dimensions(), (300, 150));
    }
}
