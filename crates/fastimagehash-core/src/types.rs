use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::bits::BitVector;
use crate::error::{Error, Result};

/// Available hash algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HashAlgorithm {
    /// Average hash: pixels compared against the global mean
    #[serde(rename = "ahash")]
    Average,
    /// Difference hash: horizontal gradient signs
    #[serde(rename = "dhash")]
    Difference,
    /// Block-mean hash: block means compared against their median
    #[serde(rename = "mhash")]
    BlockMean,
    /// DCT-based perceptual hash
    #[serde(rename = "phash")]
    Perceptual,
    /// Wavelet hash
    #[serde(rename = "whash")]
    Wavelet,
}

impl HashAlgorithm {
    pub const ALL: [HashAlgorithm; 5] = [
        HashAlgorithm::Average,
        HashAlgorithm::Difference,
        HashAlgorithm::BlockMean,
        HashAlgorithm::Perceptual,
        HashAlgorithm::Wavelet,
    ];

    /// Short name used in configs, CLI flags and output
    pub fn name(&self) -> &'static str {
        match self {
            HashAlgorithm::Average => "ahash",
            HashAlgorithm::Difference => "dhash",
            HashAlgorithm::BlockMean => "mhash",
            HashAlgorithm::Perceptual => "phash",
            HashAlgorithm::Wavelet => "whash",
        }
    }

    /// Whether the algorithm needs a frequency transform (and so N >= 2)
    pub fn is_transform_based(&self) -> bool {
        matches!(self, HashAlgorithm::Perceptual | HashAlgorithm::Wavelet)
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HashAlgorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "ahash" | "average" => Ok(HashAlgorithm::Average),
            "dhash" | "difference" => Ok(HashAlgorithm::Difference),
            "mhash" | "blockmean" | "block-mean" => Ok(HashAlgorithm::BlockMean),
            "phash" | "perceptual" | "dct" => Ok(HashAlgorithm::Perceptual),
            "whash" | "wavelet" => Ok(HashAlgorithm::Wavelet),
            other => Err(Error::Configuration(format!("Unknown hash algorithm: {}", other))),
        }
    }
}

/// Wavelet kernel used by the wavelet hash
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum WaveKernel {
    #[default]
    #[serde(rename = "haar")]
    Haar,
    #[serde(rename = "db4")]
    Daubechies4,
}

impl fmt::Display for WaveKernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WaveKernel::Haar => f.write_str("haar"),
            WaveKernel::Daubechies4 => f.write_str("db4"),
        }
    }
}

impl FromStr for WaveKernel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "haar" => Ok(WaveKernel::Haar),
            "db4" | "daubechies4" | "daubechies" => Ok(WaveKernel::Daubechies4),
            other => Err(Error::Configuration(format!("Unknown wavelet kernel: {}", other))),
        }
    }
}

/// A perceptual hash: `size * size` bits produced by one algorithm
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Hash {
    algorithm: HashAlgorithm,
    size: u32,
    bits: BitVector,
}

impl Hash {
    /// Build a hash from its bits. The bit count must be `size * size`.
    pub fn new(algorithm: HashAlgorithm, size: u32, bits: BitVector) -> Result<Self> {
        let expected = bit_count(size);
        if bits.len() != expected {
            return Err(Error::Configuration(format!(
                "{} of size {} needs {} bits, got {}",
                algorithm,
                size,
                expected,
                bits.len()
            )));
        }
        Ok(Self {
            algorithm,
            size,
            bits,
        })
    }

    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// The hash size N
    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn bit_len(&self) -> usize {
        self.bits.len()
    }

    pub fn bit(&self, index: usize) -> bool {
        self.bits.get(index)
    }

    pub fn bits(&self) -> &BitVector {
        &self.bits
    }

    /// Packed bytes, MSB first
    pub fn as_bytes(&self) -> &[u8] {
        self.bits.as_bytes()
    }

    pub fn count_ones(&self) -> u32 {
        self.bits.count_ones()
    }

    pub fn to_hex(&self) -> String {
        crate::hex_codec::to_hex(self)
    }

    pub fn to_hex_reversed(&self) -> String {
        crate::hex_codec::to_hex_reversed(self)
    }

    /// Calculate the Hamming distance between two hashes
    pub fn distance(&self, other: &Hash) -> Result<u32> {
        if self.algorithm != other.algorithm || self.size != other.size {
            return Err(Error::Incomparable {
                left: self.algorithm,
                left_size: self.size,
                right: other.algorithm,
                right_size: other.size,
            });
        }
        Ok(self.bits.hamming(&other.bits))
    }

    /// Similarity as a percentage (100 = identical bits)
    pub fn similarity(&self, other: &Hash) -> Result<f64> {
        let distance = self.distance(other)?;
        let total = self.bit_len();
        if total == 0 {
            return Ok(100.0);
        }
        Ok((1.0 - distance as f64 / total as f64) * 100.0)
    }

    /// Check if two hashes are within `threshold` differing bits
    pub fn is_similar(&self, other: &Hash, threshold: u32) -> bool {
        matches!(self.distance(other), Ok(d) if d <= threshold)
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Number of bits in a hash of size `size`
pub fn bit_count(size: u32) -> usize {
    (size as usize) * (size as usize)
}
