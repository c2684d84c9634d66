//! Perceptual image hashing.
//!
//! This library turns an encoded image into compact bit fingerprints that stay close under
//! re-encoding, rescaling and mild edits:
//! - Average, difference and block-mean hashes on downsampled grayscale samples
//! - DCT perceptual hash (pHash) and wavelet hash (whash)
//! - A multi-hash run that decodes once and computes several hashes in parallel
//! - Hex encoding, Hamming distance, file discovery and batch hashing

// -- Internal Modules --
mod bits;
mod error;

// -- Public Re-exports --
pub use bits::BitVector;
pub use config::MultiHashConfig;
pub use error::{Code, Error, Result};
pub use processing::{
    AverageHash, BlockMeanHash, DctHash, DifferenceHash, ImageHasher, MultiHashBundle,
    WaveletHash,
};
pub use processing::{multi_hash, multi_hash_decoded, multi_hash_file};
pub use types::*;

// -- Public Modules --
pub mod batch;
pub mod config;
pub mod discovery;
pub mod hex_codec;
pub mod logging;
pub mod processing;
pub mod types;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
