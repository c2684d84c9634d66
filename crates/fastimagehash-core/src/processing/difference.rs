//! Difference hash (dHash).
//!
//! The image is reduced to (N+1)×N samples; each row yields N bits, one per horizontal
//! neighbour pair, set when the left sample is brighter than the right one.

use image::GrayImage;
use serde::{Deserialize, Serialize};

use super::hasher::{validate_hash_size, validate_sample_dim, ImageHasher, DEFAULT_HASH_SIZE};
use super::matrix::PixelMatrix;
use super::preprocess::resize;
use crate::bits::BitVector;
use crate::error::{Error, Result};
use crate::types::{Hash, HashAlgorithm};

/// Options for the difference hash
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifferenceHash {
    pub hash_size: u32,
}

impl Default for DifferenceHash {
    fn default() -> Self {
        Self {
            hash_size: DEFAULT_HASH_SIZE,
        }
    }
}

impl DifferenceHash {
    pub fn new(hash_size: u32) -> Self {
        Self { hash_size }
    }
}

impl ImageHasher for DifferenceHash {
    fn algorithm(&self) -> HashAlgorithm {
        HashAlgorithm::Difference
    }

    fn validate(&self) -> Result<()> {
        validate_hash_size(HashAlgorithm::Difference, self.hash_size, 1)?;
        validate_sample_dim(HashAlgorithm::Difference, self.hash_size as u64 + 1)
    }

    fn hash_decoded(&self, image: &GrayImage) -> Result<Hash> {
        self.validate()?;
        let small = resize(image, self.hash_size + 1, self.hash_size)?;
        dhash(&small)
    }
}

/// Hash an (N+1)-wide, N-high matrix
pub fn dhash(matrix: &PixelMatrix) -> Result<Hash> {
    let size = matrix.height();
    if size == 0 || matrix.width() != size + 1 {
        return Err(Error::Configuration(format!(
            "dhash needs an (N+1)xN matrix, got {}x{}",
            matrix.width(),
            matrix.height()
        )));
    }

    let mut bits = Vec::with_capacity(size * size);
    for row in matrix.data().rows() {
        for x in 0..size {
            bits.push(row[x] > row[x + 1]);
        }
    }

    Hash::new(HashAlgorithm::Difference, size as u32, BitVector::from_bools(bits))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_left_brighter_sets_bit() {
        // Row 0 falls left to right, row 1 rises
        let m = PixelMatrix::from_vec(3, 2, vec![9.0, 5.0, 1.0, 1.0, 5.0, 9.0]).unwrap();
        let hash = dhash(&m).unwrap();
        assert_eq!(hash.size(), 2);
        assert_eq!(
            (0..4).map(|i| hash.bit(i)).collect::<Vec<_>>(),
            vec![true, true, false, false]
        );
    }

    #[test]
    fn test_brightness_offset_invariance() {
        let base: Vec<f32> = (0..72).map(|i| ((i * 37) % 101) as f32).collect();
        let shifted: Vec<f32> = base.iter().map(|v| v + 40.0).collect();
        let a = dhash(&PixelMatrix::from_vec(9, 8, base).unwrap()).unwrap();
        let b = dhash(&PixelMatrix::from_vec(9, 8, shifted).unwrap()).unwrap();
        assert_eq!(a.distance(&b).unwrap(), 0);
        assert_eq!(a.bit_len(), 64);
    }

    #[test]
    fn test_rejects_square_matrix() {
        let m = PixelMatrix::from_vec(4, 4, vec![0.0; 16]).unwrap();
        assert!(dhash(&m).is_err());
    }

    #[test]
    fn test_hash_decoded_size() {
        let img = GrayImage::from_fn(64, 48, |x, y| image::Luma([((x * 7 + y) % 256) as u8]));
        let hash = DifferenceHash::new(5).hash_decoded(&img).unwrap();
        assert_eq!(hash.bit_len(), 25);
        assert_eq!(hash.as_bytes().len(), 4);
    }
}
