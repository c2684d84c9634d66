//! Hex serialization of hashes.
//!
//! A hash of size N is exactly `ceil(N² / 4)` lowercase hex characters. Bytes are written two
//! characters at a time; when N² mod 8 is 1 to 4 the final byte carries at most four real bits,
//! so only its data nibble is written and the all-padding nibble is dropped. Padding bits are
//! always zero.
//!
//! The forward encoding keeps the MSB-first packing, so the data nibble of a short final byte
//! is its high nibble. The reversed encoding mirrors the bit order inside every byte before
//! encoding, which gives the least-significant-first layout some other tools print; there the
//! data nibble of a short final byte is its low nibble and the padding sits in the high bits.

use crate::bits::BitVector;
use crate::error::{Error, Result};
use crate::types::{bit_count, Hash, HashAlgorithm};

/// Number of hex characters for a hash of the given size
pub fn hex_len(size: u32) -> usize {
    bit_count(size).div_ceil(4)
}

/// Hex string of the packed hash bytes
pub fn to_hex(hash: &Hash) -> String {
    let mut encoded = hex::encode(hash.as_bytes());
    // Drop the trailing all-padding nibble
    encoded.truncate(hex_len(hash.size()));
    encoded
}

/// Hex string with the bits of every byte reversed
pub fn to_hex_reversed(hash: &Hash) -> String {
    let mirrored: Vec<u8> = hash.as_bytes().iter().map(|b| b.reverse_bits()).collect();
    let mut encoded = hex::encode(mirrored);
    if encoded.len() > hex_len(hash.size()) {
        // The mirrored final byte keeps its bits low; its high nibble is padding
        encoded.remove(encoded.len() - 2);
    }
    encoded
}

/// Parse the output of [`to_hex`]
pub fn from_hex(algorithm: HashAlgorithm, size: u32, s: &str) -> Result<Hash> {
    check_len(size, s)?;
    let mut padded = s.to_string();
    if padded.len() % 2 == 1 {
        padded.push('0');
    }
    build(algorithm, size, decode_bytes(&padded)?)
}

/// Parse the output of [`to_hex_reversed`]
pub fn from_hex_reversed(algorithm: HashAlgorithm, size: u32, s: &str) -> Result<Hash> {
    check_len(size, s)?;
    let mut padded = s.to_string();
    if padded.len() % 2 == 1 {
        padded.insert(padded.len() - 1, '0');
    }
    let bytes = decode_bytes(&padded)?
        .into_iter()
        .map(|b| b.reverse_bits())
        .collect();
    build(algorithm, size, bytes)
}

fn check_len(size: u32, s: &str) -> Result<()> {
    let expected = hex_len(size);
    if s.len() != expected {
        return Err(Error::InvalidHex(format!(
            "expected {} characters for size {}, got {}",
            expected,
            size,
            s.len()
        )));
    }
    if !s.is_ascii() {
        return Err(Error::InvalidHex(format!("non-ASCII input: {}", s)));
    }
    Ok(())
}

fn decode_bytes(s: &str) -> Result<Vec<u8>> {
    hex::decode(s).map_err(|e| Error::InvalidHex(e.to_string()))
}

fn build(algorithm: HashAlgorithm, size: u32, bytes: Vec<u8>) -> Result<Hash> {
    let bits = BitVector::from_bytes(bytes, bit_count(size))
        .ok_or_else(|| Error::InvalidHex("padding bits must be zero".to_string()))?;
    Hash::new(algorithm, size, bits)
}
