//! Decoding, grayscale conversion and resampling.
//!
//! Every hash goes through the same two steps so results stay reproducible:
//!
//! 1. [`decode`]: the `image` crate decodes the buffer, then each pixel of its RGB8 view is
//!    reduced to luma with the ITU-R BT.601 weights `0.299 R + 0.587 G + 0.114 B`, rounded to
//!    the nearest integer. Alpha is ignored.
//! 2. [`resize`]: the 8-bit luma image is resampled to the exact target size with
//!    `FilterType::Triangle` (bilinear) and widened to `f32`.

use std::path::Path;

use image::imageops::FilterType;
use image::{GrayImage, Luma};
use log::debug;

use super::matrix::PixelMatrix;
use crate::error::{Error, Result};

/// Resampling kernel shared by all algorithms
pub const RESIZE_FILTER: FilterType = FilterType::Triangle;

/// BT.601 luma weights for R, G and B
pub const LUMA_WEIGHTS: [f32; 3] = [0.299, 0.587, 0.114];

/// Decode an encoded image into 8-bit luma
pub fn decode(bytes: &[u8]) -> Result<GrayImage> {
    if bytes.is_empty() {
        return Err(Error::Decode("empty input buffer".to_string()));
    }

    // Format is sniffed from the bytes, not from any file name
    let img = image::load_from_memory(bytes)?;
    if img.width() == 0 || img.height() == 0 {
        return Err(Error::Decode(format!(
            "image has zero dimension ({}x{})",
            img.width(),
            img.height()
        )));
    }

    // Drop alpha and reduce to BT.601 luma
    let rgb = img.to_rgb8();
    let gray = GrayImage::from_fn(rgb.width(), rgb.height(), |x, y| {
        let p = rgb.get_pixel(x, y);
        let luma = LUMA_WEIGHTS[0] * p[0] as f32
            + LUMA_WEIGHTS[1] * p[1] as f32
            + LUMA_WEIGHTS[2] * p[2] as f32;
        Luma([luma.round().clamp(0.0, 255.0) as u8])
    });

    debug!("Decoded {}x{} image", gray.width(), gray.height());
    Ok(gray)
}

/// Resample a decoded image to exactly `width` x `height`
pub fn resize(image: &GrayImage, width: u32, height: u32) -> Result<PixelMatrix> {
    if width == 0 || height == 0 {
        return Err(Error::Configuration(format!(
            "Resize target must be non-empty, got {}x{}",
            width, height
        )));
    }

    // Already the right size: skip the filter pass
    if image.dimensions() == (width, height) {
        return Ok(PixelMatrix::from_gray(image));
    }

    let small = image::imageops::resize(image, width, height, RESIZE_FILTER);
    Ok(PixelMatrix::from_gray(&small))
}

/// Decode and resample in one step
pub fn preprocess(bytes: &[u8], width: u32, height: u32) -> Result<PixelMatrix> {
    if width == 0 || height == 0 {
        return Err(Error::Configuration(format!(
            "Resize target must be non-empty, got {}x{}",
            width, height
        )));
    }
    let gray = decode(bytes)?;
    resize(&gray, width, height)
}

/// Read a whole file into memory
pub fn read_file<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
    let path = path.as_ref();
    std::fs::read(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageOutputFormat, Rgb, RgbImage};
    use std::io::Cursor;

    fn encode_png(img: DynamicImage) -> Vec<u8> {
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_bt601_luma() {
        let img = RgbImage::from_fn(3, 1, |x, _| match x {
            0 => Rgb([255, 0, 0]),
            1 => Rgb([0, 255, 0]),
            _ => Rgb([0, 0, 255]),
        });
        let gray = decode(&encode_png(DynamicImage::ImageRgb8(img))).unwrap();
        assert_eq!(gray.get_pixel(0, 0).0[0], 76);
        assert_eq!(gray.get_pixel(1, 0).0[0], 150);
        assert_eq!(gray.get_pixel(2, 0).0[0], 29);
    }

    #[test]
    fn test_preprocess_exact_dimensions() {
        let img = RgbImage::from_fn(40, 30, |x, y| Rgb([(x * 6) as u8, (y * 8) as u8, 0]));
        let bytes = encode_png(DynamicImage::ImageRgb8(img));

        let m = preprocess(&bytes, 9, 8).unwrap();
        assert_eq!((m.width(), m.height()), (9, 8));
    }

    #[test]
    fn test_decode_errors() {
        assert!(matches!(decode(&[]), Err(Error::Decode(_))));
        assert!(matches!(decode(b"definitely not an image"), Err(Error::Decode(_))));
    }

    #[test]
    fn test_zero_target_is_configuration_error() {
        let gray = GrayImage::new(4, 4);
        assert!(matches!(resize(&gray, 0, 4), Err(Error::Configuration(_))));
        assert!(matches!(preprocess(&[1, 2, 3], 4, 0), Err(Error::Configuration(_))));
    }

    #[test]
    fn test_read_missing_file() {
        let result = read_file("/path/that/does/not/exist.png");
        assert!(matches!(result, Err(Error::Read { .. })));
    }
}
