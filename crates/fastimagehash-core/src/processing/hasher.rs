use std::path::Path;
use std::time::Instant;

use image::GrayImage;
use log::debug;

use super::matrix::PixelMatrix;
use super::preprocess::{decode, read_file};
use crate::bits::BitVector;
use crate::error::{Error, Result};
use crate::types::{Hash, HashAlgorithm};

/// Hash size used when none is given
pub const DEFAULT_HASH_SIZE: u32 = 8;

/// Largest sampling grid side any algorithm may request
pub const MAX_SAMPLE_DIM: u32 = 8192;

/// Common interface of the per-algorithm option structs
pub trait ImageHasher: Send + Sync {
    /// The algorithm this hasher runs
    fn algorithm(&self) -> HashAlgorithm;

    /// Check the options without touching any image data
    fn validate(&self) -> Result<()>;

    /// Resample an already decoded image and hash it
    fn hash_decoded(&self, image: &GrayImage) -> Result<Hash>;

    /// Decode an encoded image held in memory and hash it
    fn hash_mem(&self, bytes: &[u8]) -> Result<Hash> {
        self.validate()?;
        let start = Instant::now();
        let image = decode(bytes)?;
        let hash = self.hash_decoded(&image)?;
        debug!(
            "Computed {} in {:.2?}: {}",
            self.algorithm(),
            start.elapsed(),
            hash
        );
        Ok(hash)
    }

    /// Read, decode and hash an image file
    fn hash_file<P: AsRef<Path>>(&self, path: P) -> Result<Hash>
    where
        Self: Sized,
    {
        self.validate()?;
        let bytes = read_file(path)?;
        self.hash_mem(&bytes)
    }
}

/// Reject hash sizes below `min` or whose sampling grid would be unreasonably large
pub fn validate_hash_size(algorithm: HashAlgorithm, hash_size: u32, min: u32) -> Result<()> {
    if hash_size < min {
        return Err(Error::Configuration(format!(
            "{} needs a hash size of at least {}, got {}",
            algorithm, min, hash_size
        )));
    }
    validate_sample_dim(algorithm, hash_size as u64)
}

pub fn validate_sample_dim(algorithm: HashAlgorithm, dim: u64) -> Result<()> {
    if dim > MAX_SAMPLE_DIM as u64 {
        return Err(Error::Configuration(format!(
            "{} would sample a {}-pixel grid side, the limit is {}",
            algorithm, dim, MAX_SAMPLE_DIM
        )));
    }
    Ok(())
}

/// Side of a square, non-empty matrix
pub(crate) fn square_side(matrix: &PixelMatrix, algorithm: HashAlgorithm) -> Result<usize> {
    if !matrix.is_square() || matrix.width() == 0 {
        return Err(Error::Configuration(format!(
            "{} needs a non-empty square matrix, got {}x{}",
            algorithm,
            matrix.width(),
            matrix.height()
        )));
    }
    Ok(matrix.width())
}

/// Bit i = 1 iff `values[i] > threshold`
pub(crate) fn threshold_bits(values: &[f32], threshold: f32) -> BitVector {
    BitVector::from_bools(values.iter().map(|&v| v > threshold))
}
