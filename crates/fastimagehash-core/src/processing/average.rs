//! Average hash (aHash).
//!
//! The image is reduced to N×N samples and each sample is compared with the mean of all of
//! them. Robust to uniform brightness and contrast changes, fragile under cropping.

use image::GrayImage;
use serde::{Deserialize, Serialize};

use super::hasher::{square_side, threshold_bits, validate_hash_size, ImageHasher, DEFAULT_HASH_SIZE};
use super::matrix::PixelMatrix;
use super::preprocess::resize;
use crate::error::Result;
use crate::types::{Hash, HashAlgorithm};

/// Options for the average hash
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AverageHash {
    pub hash_size: u32,
}

impl Default for AverageHash {
    fn default() -> Self {
        Self {
            hash_size: DEFAULT_HASH_SIZE,
        }
    }
}

impl AverageHash {
    pub fn new(hash_size: u32) -> Self {
        Self { hash_size }
    }
}

impl ImageHasher for AverageHash {
    fn algorithm(&self) -> HashAlgorithm {
        HashAlgorithm::Average
    }

    fn validate(&self) -> Result<()> {
        validate_hash_size(HashAlgorithm::Average, self.hash_size, 1)
    }

    fn hash_decoded(&self, image: &GrayImage) -> Result<Hash> {
        self.validate()?;
        let small = resize(image, self.hash_size, self.hash_size)?;
        ahash(&small)
    }
}

/// Hash an N×N matrix: bit i is set iff sample i is strictly above the mean
pub fn ahash(matrix: &PixelMatrix) -> Result<Hash> {
    let side = square_side(matrix, HashAlgorithm::Average)?;
    let samples = matrix.to_vec();
    let mean = matrix.mean();
    Hash::new(
        HashAlgorithm::Average,
        side as u32,
        threshold_bits(&samples, mean),
    )
}
