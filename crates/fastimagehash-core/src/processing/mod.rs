// Shared building blocks
pub mod hasher;
pub mod matrix;
pub mod preprocess;

// Algorithms
pub mod average;
pub mod block_mean;
pub mod dct;
pub mod difference;
pub mod wavelet;

// Orchestration
pub mod multi;

pub use average::{ahash, AverageHash};
pub use block_mean::{mhash, BlockMeanHash, DEFAULT_BLOCK_SIZE};
pub use dct::{dct_2d, phash, DctHash, DEFAULT_HIGH_FREQ_FACTOR};
pub use difference::{dhash, DifferenceHash};
pub use hasher::{ImageHasher, DEFAULT_HASH_SIZE, MAX_SAMPLE_DIM};
pub use matrix::PixelMatrix;
pub use multi::{multi_hash, multi_hash_decoded, multi_hash_file, MultiHashBundle};
pub use preprocess::{decode, preprocess, resize};
pub use wavelet::{dwt_2d, whash, Subbands, WaveletHash};
