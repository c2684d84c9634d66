use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

use crate::error::{Error, Result};
use crate::processing::{
    AverageHash, BlockMeanHash, DctHash, DifferenceHash, ImageHasher, WaveletHash,
    DEFAULT_BLOCK_SIZE, DEFAULT_HASH_SIZE, DEFAULT_HIGH_FREQ_FACTOR,
};
use crate::types::{HashAlgorithm, WaveKernel};

/// Configuration for a multi-algorithm hashing run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MultiHashConfig {
    /// Hash side N; every hash carries N² bits
    pub hash_size: u32,

    /// pHash oversampling factor
    pub high_freq_factor: u32,

    /// whash sampling side; unset picks the largest power of two that fits the image
    pub img_scale: Option<u32>,

    /// whash kernel
    pub wave: WaveKernel,

    /// Drop the largest whash LL coefficient from the median and clear its bit
    pub remove_max_ll: bool,

    /// mhash block side in pixels
    pub block_size: u32,

    /// Algorithms to run
    pub algorithms: Vec<HashAlgorithm>,
}

impl Default for MultiHashConfig {
    fn default() -> Self {
        Self {
            hash_size: DEFAULT_HASH_SIZE,
            high_freq_factor: DEFAULT_HIGH_FREQ_FACTOR,
            img_scale: None,
            wave: WaveKernel::Haar,
            remove_max_ll: true,
            block_size: DEFAULT_BLOCK_SIZE,
            algorithms: HashAlgorithm::ALL.to_vec(),
        }
    }
}

impl MultiHashConfig {
    pub fn with_hash_size(mut self, hash_size: u32) -> Self {
        self.hash_size = hash_size;
        self
    }

    pub fn with_high_freq_factor(mut self, high_freq_factor: u32) -> Self {
        self.high_freq_factor = high_freq_factor;
        self
    }

    pub fn with_img_scale(mut self, img_scale: Option<u32>) -> Self {
        self.img_scale = img_scale;
        self
    }

    pub fn with_wave(mut self, wave: WaveKernel) -> Self {
        self.wave = wave;
        self
    }

    pub fn with_remove_max_ll(mut self, remove_max_ll: bool) -> Self {
        self.remove_max_ll = remove_max_ll;
        self
    }

    pub fn with_block_size(mut self, block_size: u32) -> Self {
        self.block_size = block_size;
        self
    }

    pub fn with_algorithms<I: IntoIterator<Item = HashAlgorithm>>(mut self, algorithms: I) -> Self {
        self.algorithms = algorithms.into_iter().collect();
        self
    }

    /// Load configuration from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path.as_ref())
            .map_err(|e| Error::Configuration(format!("Failed to open config file: {}", e)))?;

        let config: MultiHashConfig = serde_json::from_reader(file)
            .map_err(|e| Error::Configuration(format!("Failed to parse config file: {}", e)))?;

        Ok(config)
    }

    /// Save configuration to a file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path.as_ref())
            .map_err(|e| Error::Configuration(format!("Failed to create config file: {}", e)))?;

        serde_json::to_writer_pretty(file, self)
            .map_err(|e| Error::Configuration(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Selected algorithms, deduplicated, in canonical order
    pub fn selected(&self) -> Vec<HashAlgorithm> {
        self.algorithms
            .iter()
            .copied()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Validate the configuration
    ///
    /// Only the options of selected algorithms are checked, so e.g. a zero block size is
    /// accepted when mhash is not requested.
    pub fn validate(&self) -> Result<()> {
        if self.algorithms.is_empty() {
            return Err(Error::Configuration(
                "At least one hash algorithm must be selected".to_string(),
            ));
        }

        for hasher in self.hashers() {
            hasher.validate()?;
        }

        Ok(())
    }

    pub fn average(&self) -> AverageHash {
        AverageHash::new(self.hash_size)
    }

    pub fn difference(&self) -> DifferenceHash {
        DifferenceHash::new(self.hash_size)
    }

    pub fn block_mean(&self) -> BlockMeanHash {
        BlockMeanHash::new(self.hash_size, self.block_size)
    }

    pub fn dct(&self) -> DctHash {
        DctHash::new(self.hash_size, self.high_freq_factor)
    }

    pub fn wavelet(&self) -> WaveletHash {
        WaveletHash {
            hash_size: self.hash_size,
            img_scale: self.img_scale,
            kernel: self.wave,
            remove_max_ll: self.remove_max_ll,
        }
    }

    /// One hasher per selected algorithm
    pub fn hashers(&self) -> Vec<Box<dyn ImageHasher>> {
        self.selected()
            .into_iter()
            .map(|algorithm| -> Box<dyn ImageHasher> {
                match algorithm {
                    HashAlgorithm::Average => Box::new(self.average()),
                    HashAlgorithm::Difference => Box::new(self.difference()),
                    HashAlgorithm::BlockMean => Box::new(self.block_mean()),
                    HashAlgorithm::Perceptual => Box::new(self.dct()),
                    HashAlgorithm::Wavelet => Box::new(self.wavelet()),
                }
            })
            .collect()
    }
}
