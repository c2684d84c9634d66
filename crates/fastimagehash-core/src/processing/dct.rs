//! # DCT perceptual hash (pHash)
//!
//! The image is oversampled to `hash_size * high_freq_factor` pixels on a side, transformed
//! with an orthonormal type-II DCT (rows, then columns) and reduced to its top-left
//! `hash_size × hash_size` low-frequency block. Each coefficient of that block is compared
//! with the median of the block's AC coefficients; the DC term at `[0, 0]` is left out of the
//! median because it only carries overall brightness.
//!
//! Oversampling pushes the energy that would alias into the low band out of it, which keeps
//! the hash stable under rescaling.
//!
//! ## Normalisation
//!
//! `rustdct` computes `X[k] = Σ x[n] cos(π k (2n + 1) / 2L)`. Each 1D output is scaled by
//! `√(1/L)` for `k = 0` and `√(2/L)` otherwise, which makes the 2D transform orthonormal.

use image::GrayImage;
use log::trace;
use ndarray::{Array2, ArrayViewMut1};
use rustdct::{Dct2, DctPlanner};
use serde::{Deserialize, Serialize};

use super::hasher::{
    square_side, threshold_bits, validate_hash_size, validate_sample_dim, ImageHasher,
    DEFAULT_HASH_SIZE,
};
use super::matrix::{median, PixelMatrix};
use super::preprocess::resize;
use crate::error::{Error, Result};
use crate::types::{Hash, HashAlgorithm};

/// Default oversampling factor
pub const DEFAULT_HIGH_FREQ_FACTOR: u32 = 4;

/// Options for the DCT perceptual hash
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DctHash {
    pub hash_size: u32,
    /// Oversampling multiplier applied before the transform
    pub high_freq_factor: u32,
}

impl Default for DctHash {
    fn default() -> Self {
        Self {
            hash_size: DEFAULT_HASH_SIZE,
            high_freq_factor: DEFAULT_HIGH_FREQ_FACTOR,
        }
    }
}

impl DctHash {
    pub fn new(hash_size: u32, high_freq_factor: u32) -> Self {
        Self {
            hash_size,
            high_freq_factor,
        }
    }

    /// Side of the resampled image fed to the transform
    pub fn sample_side(&self) -> u64 {
        self.hash_size as u64 * self.high_freq_factor as u64
    }
}

impl ImageHasher for DctHash {
    fn algorithm(&self) -> HashAlgorithm {
        HashAlgorithm::Perceptual
    }

    fn validate(&self) -> Result<()> {
        validate_hash_size(HashAlgorithm::Perceptual, self.hash_size, 2)?;
        if self.high_freq_factor == 0 {
            return Err(Error::Configuration(
                "phash high frequency factor must be at least 1".to_string(),
            ));
        }
        validate_sample_dim(HashAlgorithm::Perceptual, self.sample_side())
    }

    fn hash_decoded(&self, image: &GrayImage) -> Result<Hash> {
        self.validate()?;
        let side = self.sample_side() as u32;
        let large = resize(image, side, side)?;
        phash(&large, self.hash_size)
    }
}

/// Orthonormal separable 2D DCT-II
pub fn dct_2d(matrix: &PixelMatrix) -> PixelMatrix {
    let mut planner = DctPlanner::new();
    let mut data: Array2<f32> = matrix.data().to_owned();

    let row_dct = planner.plan_dct2(data.ncols());
    for row in data.rows_mut() {
        transform_lane(row, &*row_dct);
    }

    let col_dct = planner.plan_dct2(data.nrows());
    for column in data.columns_mut() {
        transform_lane(column, &*col_dct);
    }

    PixelMatrix::from_array(data)
}

fn transform_lane<T: Dct2<f32> + ?Sized>(mut lane: ArrayViewMut1<f32>, dct: &T) {
    let len = lane.len();
    if len == 0 {
        return;
    }
    let mut buffer = lane.to_vec();
    dct.process_dct2(&mut buffer);

    let dc_scale = (1.0 / len as f32).sqrt();
    let ac_scale = (2.0 / len as f32).sqrt();
    for (k, (dst, src)) in lane.iter_mut().zip(buffer).enumerate() {
        *dst = src * if k == 0 { dc_scale } else { ac_scale };
    }
}

/// Hash an S×S matrix, S >= `hash_size`, from its low-frequency DCT block
pub fn phash(matrix: &PixelMatrix, hash_size: u32) -> Result<Hash> {
    let side = square_side(matrix, HashAlgorithm::Perceptual)?;
    let n = hash_size as usize;
    if n < 2 || n > side {
        return Err(Error::Configuration(format!(
            "phash size {} does not fit a {}-pixel sample grid",
            hash_size, side
        )));
    }

    // Keep the top-left low-frequency block
    let coefficients = dct_2d(matrix);
    let low: Vec<f32> = coefficients
        .data()
        .slice(ndarray::s![..n, ..n])
        .iter()
        .copied()
        .collect();

    // DC at index 0 stays out of the median
    let threshold = median(&low[1..]);
    trace!(
        "phash {}x{} -> {}x{}, DC {:.3}, AC median {:.3}",
        side,
        side,
        n,
        n,
        low[0],
        threshold
    );

    Hash::new(
        HashAlgorithm::Perceptual,
        hash_size,
        threshold_bits(&low, threshold),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_constant_has_only_dc() {
        let m = PixelMatrix::from_vec(8, 8, vec![10.0; 64]).unwrap();
        let c = dct_2d(&m);
        assert!((c.get(0, 0) - 80.0).abs() < 1e-3);
        for (i, v) in c.to_vec().iter().enumerate().skip(1) {
            assert!(v.abs() < 1e-3, "coefficient {} = {}", i, v);
        }
    }

    #[test]
    fn test_energy_is_preserved() {
        let samples: Vec<f32> = (0..256).map(|i| ((i * 31) % 97) as f32).collect();
        let energy: f64 = samples.iter().map(|v| (*v as f64).powi(2)).sum();
        let c = dct_2d(&PixelMatrix::from_vec(16, 16, samples).unwrap());
        let transformed: f64 = c.to_vec().iter().map(|v| (*v as f64).powi(2)).sum();
        assert!((energy - transformed).abs() / energy < 1e-4);
    }

    #[test]
    fn test_cosine_lands_on_its_frequency() {
        // Horizontal cosine at frequency 3 only
        let n = 16;
        let samples: Vec<f32> = (0..n * n)
            .map(|i| {
                let x = (i % n) as f32;
                (PI * 3.0 * (2.0 * x + 1.0) / (2.0 * n as f32)).cos()
            })
            .collect();
        let c = dct_2d(&PixelMatrix::from_vec(n, n, samples).unwrap());
        let peak = c.get(3, 0).abs();
        for y in 0..n {
            for x in 0..n {
                if (x, y) != (3, 0) {
                    assert!(c.get(x, y).abs() < peak * 1e-3);
                }
            }
        }
    }

    #[test]
    fn test_phash_bit_count_and_determinism() {
        let samples: Vec<f32> = (0..32 * 32).map(|i| ((i * 13) % 251) as f32).collect();
        let m = PixelMatrix::from_vec(32, 32, samples).unwrap();
        let a = phash(&m, 8).unwrap();
        let b = phash(&m, 8).unwrap();
        assert_eq!(a.bit_len(), 64);
        assert_eq!(a, b);
    }

    #[test]
    fn test_validation() {
        assert!(DctHash::new(1, 4).validate().is_err());
        assert!(DctHash::new(8, 0).validate().is_err());
        assert!(DctHash::new(8, 100_000).validate().is_err());
        assert!(DctHash::default().validate().is_ok());
    }
}
