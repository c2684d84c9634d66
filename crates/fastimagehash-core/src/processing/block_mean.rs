//! Block-mean hash (mhash).
//!
//! Here `hash_size` counts blocks, not pixels. The image is resampled to
//! `(hash_size * block_size)` pixels on a side and cut into `hash_size²` non-overlapping
//! `block_size × block_size` blocks. Bit i is set when block i's mean is above the median of
//! all block means, which keeps roughly half the bits set on natural images.

use image::GrayImage;
use serde::{Deserialize, Serialize};

use super::hasher::{
    square_side, threshold_bits, validate_hash_size, validate_sample_dim, ImageHasher,
    DEFAULT_HASH_SIZE,
};
use super::matrix::{mean, median, PixelMatrix};
use super::preprocess::resize;
use crate::error::{Error, Result};
use crate::types::{Hash, HashAlgorithm};

/// Default block side in pixels
pub const DEFAULT_BLOCK_SIZE: u32 = 4;

/// Options for the block-mean hash
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockMeanHash {
    /// Blocks per side
    pub hash_size: u32,
    /// Pixels per block side
    pub block_size: u32,
}

impl Default for BlockMeanHash {
    fn default() -> Self {
        Self {
            hash_size: DEFAULT_HASH_SIZE,
            block_size: DEFAULT_BLOCK_SIZE,
        }
    }
}

impl BlockMeanHash {
    pub fn new(hash_size: u32, block_size: u32) -> Self {
        Self {
            hash_size,
            block_size,
        }
    }

    /// Side of the resampled image
    pub fn sample_side(&self) -> u64 {
        self.hash_size as u64 * self.block_size as u64
    }
}

impl ImageHasher for BlockMeanHash {
    fn algorithm(&self) -> HashAlgorithm {
        HashAlgorithm::BlockMean
    }

    fn validate(&self) -> Result<()> {
        validate_hash_size(HashAlgorithm::BlockMean, self.hash_size, 1)?;
        if self.block_size == 0 {
            return Err(Error::Configuration(
                "mhash block size must be at least 1".to_string(),
            ));
        }
        validate_sample_dim(HashAlgorithm::BlockMean, self.sample_side())
    }

    fn hash_decoded(&self, image: &GrayImage) -> Result<Hash> {
        self.validate()?;
        let side = self.sample_side() as u32;
        let small = resize(image, side, side)?;
        mhash(&small, self.block_size)
    }
}

/// Hash a square matrix whose side is a multiple of `block_size`
pub fn mhash(matrix: &PixelMatrix, block_size: u32) -> Result<Hash> {
    let side = square_side(matrix, HashAlgorithm::BlockMean)?;
    let block = block_size as usize;
    if block == 0 || side % block != 0 {
        return Err(Error::Configuration(format!(
            "mhash block size {} does not divide the {}-pixel side",
            block_size, side
        )));
    }

    // exact_chunks walks blocks in row-major order
    let block_means: Vec<f32> = matrix
        .data()
        .exact_chunks((block, block))
        .into_iter()
        .map(|chunk| mean(chunk.iter().copied()))
        .collect();

    let threshold = median(&block_means);
    Hash::new(
        HashAlgorithm::BlockMean,
        (side / block) as u32,
        threshold_bits(&block_means, threshold),
    )
}
