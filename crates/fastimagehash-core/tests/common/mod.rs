#![allow(dead_code)]

use image::imageops::FilterType;
use image::{DynamicImage, GrayImage, ImageOutputFormat, Luma, Rgb, RgbImage};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::io::Cursor;
use std::path::{Path, PathBuf};

/// A soft round patch of colour
struct Blob {
    x: f32,
    y: f32,
    radius: f32,
    colour: [f32; 3],
}

/// Smooth synthetic scene: a few Gaussian blobs over a vertical gradient
///
/// The same seed always gives the same image.
pub fn blob_scene(seed: u64, width: u32, height: u32) -> RgbImage {
    let mut rng = StdRng::seed_from_u64(seed);
    let (w, h) = (width as f32, height as f32);

    let blobs: Vec<Blob> = (0..6)
        .map(|_| Blob {
            x: rng.gen_range(0.0..w),
            y: rng.gen_range(0.0..h),
            radius: rng.gen_range(0.08..0.3) * w.min(h),
            colour: [
                rng.gen_range(-160.0..160.0),
                rng.gen_range(-160.0..160.0),
                rng.gen_range(-160.0..160.0),
            ],
        })
        .collect();
    let base: [f32; 3] = [
        rng.gen_range(60.0..190.0),
        rng.gen_range(60.0..190.0),
        rng.gen_range(60.0..190.0),
    ];

    RgbImage::from_fn(width, height, |px, py| {
        let (x, y) = (px as f32, py as f32);
        let shade = 40.0 * (y / h - 0.5);
        let mut rgb = [base[0] + shade, base[1] + shade, base[2] + shade];
        for blob in &blobs {
            let d2 = (x - blob.x).powi(2) + (y - blob.y).powi(2);
            let weight = (-d2 / (2.0 * blob.radius * blob.radius)).exp();
            for c in 0..3 {
                rgb[c] += weight * blob.colour[c];
            }
        }
        Rgb(rgb.map(|v| v.round().clamp(0.0, 255.0) as u8))
    })
}

/// Textured synthetic scene with no structure shared between seeds
///
/// A coarse random grid is upsampled and overlaid with fine per-pixel noise, so two seeds give
/// statistically unrelated images.
pub fn texture_scene(seed: u64, width: u32, height: u32) -> RgbImage {
    let mut rng = StdRng::seed_from_u64(seed);

    let coarse = GrayImage::from_fn(24, 18, |_, _| Luma([rng.gen_range(0..=255u8)]));
    let smooth = image::imageops::resize(&coarse, width, height, FilterType::Triangle);
    let tint: [i16; 3] = [
        rng.gen_range(-20..=20),
        rng.gen_range(-20..=20),
        rng.gen_range(-20..=20),
    ];

    RgbImage::from_fn(width, height, |x, y| {
        let base = smooth.get_pixel(x, y)[0] as i16;
        let noise: i16 = rng.gen_range(-12..=12);
        Rgb(tint.map(|t| (base + t + noise).clamp(0, 255) as u8))
    })
}

pub fn encode(img: &RgbImage, format: ImageOutputFormat) -> Vec<u8> {
    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(img.clone())
        .write_to(&mut Cursor::new(&mut bytes), format)
        .unwrap();
    bytes
}

pub fn png_bytes(img: &RgbImage) -> Vec<u8> {
    encode(img, ImageOutputFormat::Png)
}

pub fn jpeg_bytes(img: &RgbImage, quality: u8) -> Vec<u8> {
    encode(img, ImageOutputFormat::Jpeg(quality))
}

/// Write `bytes` to `dir/name` and return the path
pub fn write_file(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}
