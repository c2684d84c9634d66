//! Run several hash algorithms over a single decode.

use std::collections::btree_map;
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Instant;

use image::GrayImage;
use log::debug;
use rayon::prelude::*;

use super::preprocess::{decode, read_file};
use crate::config::MultiHashConfig;
use crate::error::Result;
use crate::types::{Hash, HashAlgorithm};

/// Hashes of one image, keyed by algorithm
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MultiHashBundle {
    hashes: BTreeMap<HashAlgorithm, Hash>,
}

impl MultiHashBundle {
    pub fn get(&self, algorithm: HashAlgorithm) -> Option<&Hash> {
        self.hashes.get(&algorithm)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, HashAlgorithm, Hash> {
        self.hashes.iter()
    }

    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }

    pub fn algorithms(&self) -> Vec<HashAlgorithm> {
        self.hashes.keys().copied().collect()
    }

    /// Hamming distance for every algorithm present in both bundles
    pub fn distances(&self, other: &MultiHashBundle) -> Result<BTreeMap<HashAlgorithm, u32>> {
        let mut distances = BTreeMap::new();
        for (algorithm, hash) in &self.hashes {
            if let Some(theirs) = other.hashes.get(algorithm) {
                distances.insert(*algorithm, hash.distance(theirs)?);
            }
        }
        Ok(distances)
    }
}

impl FromIterator<Hash> for MultiHashBundle {
    fn from_iter<I: IntoIterator<Item = Hash>>(iter: I) -> Self {
        Self {
            hashes: iter.into_iter().map(|h| (h.algorithm(), h)).collect(),
        }
    }
}

impl<'a> IntoIterator for &'a MultiHashBundle {
    type Item = (&'a HashAlgorithm, &'a Hash);
    type IntoIter = btree_map::Iter<'a, HashAlgorithm, Hash>;

    fn into_iter(self) -> Self::IntoIter {
        self.hashes.iter()
    }
}

/// Hash an already decoded image with every selected algorithm
pub fn multi_hash_decoded(image: &GrayImage, config: &MultiHashConfig) -> Result<MultiHashBundle> {
    config.validate()?;
    let hashers = config.hashers();

    let hashes: Vec<Hash> = hashers
        .par_iter()
        .map(|hasher| hasher.hash_decoded(image))
        .collect::<Result<Vec<_>>>()?;

    Ok(hashes.into_iter().collect())
}

/// Decode an encoded image once and hash it with every selected algorithm
///
/// The configuration is validated before any decoding. Any branch failure fails the whole call.
pub fn multi_hash(bytes: &[u8], config: &MultiHashConfig) -> Result<MultiHashBundle> {
    config.validate()?;
    let start = Instant::now();
    let image = decode(bytes)?;
    debug!(
        "Decoded {}x{} image in {:.2?}",
        image.width(),
        image.height(),
        start.elapsed()
    );

    let bundle = multi_hash_decoded(&image, config)?;
    debug!(
        "Computed {} hashes in {:.2?}",
        bundle.len(),
        start.elapsed()
    );
    Ok(bundle)
}

/// Read an image file and hash it with every selected algorithm
pub fn multi_hash_file<P: AsRef<Path>>(path: P, config: &MultiHashConfig) -> Result<MultiHashBundle> {
    config.validate()?;
    let bytes = read_file(path)?;
    multi_hash(&bytes, config)
}
