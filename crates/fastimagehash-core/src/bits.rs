/// Fixed-length bit sequence packed most-significant-bit first.
///
/// Bits past `len` in the final byte are always zero.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BitVector {
    len: usize,
    bytes: Vec<u8>,
}

impl BitVector {
    /// Create an all-zero vector holding `len` bits
    pub fn zeros(len: usize) -> Self {
        Self {
            len,
            bytes: vec![0; byte_len(len)],
        }
    }

    /// Pack a sequence of booleans, first item into the top bit of byte 0
    pub fn from_bools<I: IntoIterator<Item = bool>>(bits: I) -> Self {
        let mut bytes = Vec::new();
        let mut len = 0;
        for bit in bits {
            if len % 8 == 0 {
                bytes.push(0);
            }
            if bit {
                bytes[len / 8] |= 0x80u8 >> (len % 8);
            }
            len += 1;
        }
        Self { len, bytes }
    }

    /// Wrap packed bytes. Returns `None` when the byte count does not match `len`
    /// or a padding bit is set.
    pub fn from_bytes(bytes: Vec<u8>, len: usize) -> Option<Self> {
        if bytes.len() != byte_len(len) {
            return None;
        }
        let tail = len % 8;
        if tail != 0 {
            let padding_mask = 0xffu8 >> tail;
            if bytes[bytes.len() - 1] & padding_mask != 0 {
                return None;
            }
        }
        Some(Self { len, bytes })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Read bit `index`; out-of-range reads are `false`
    pub fn get(&self, index: usize) -> bool {
        if index >= self.len {
            return false;
        }
        self.bytes[index / 8] & (0x80u8 >> (index % 8)) != 0
    }

    pub fn set(&mut self, index: usize, value: bool) {
        if index >= self.len {
            return;
        }
        let mask = 0x80u8 >> (index % 8);
        if value {
            self.bytes[index / 8] |= mask;
        } else {
            self.bytes[index / 8] &= !mask;
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn count_ones(&self) -> u32 {
        self.bytes.iter().map(|b| b.count_ones()).sum()
    }

    /// Number of differing bits; vectors of different length count the excess as different
    pub fn hamming(&self, other: &BitVector) -> u32 {
        let common: u32 = self
            .bytes
            .iter()
            .zip(other.bytes.iter())
            .map(|(a, b)| (a ^ b).count_ones())
            .sum();
        let longer = if self.bytes.len() > other.bytes.len() {
            &self.bytes[other.bytes.len()..]
        } else {
            &other.bytes[self.bytes.len()..]
        };
        common + longer.iter().map(|b| b.count_ones()).sum::<u32>()
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len).map(move |i| self.get(i))
    }
}

/// Bytes needed to hold `bits` bits
pub fn byte_len(bits: usize) -> usize {
    (bits + 7) / 8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_msb_first_packing() {
        let bits = BitVector::from_bools([true, false, false, false, false, false, false, true, true]);
        assert_eq!(bits.len(), 9);
        assert_eq!(bits.as_bytes(), &[0b1000_0001, 0b1000_0000]);
        assert!(bits.get(8));
        assert!(!bits.get(9));
        assert_eq!(bits.count_ones(), 3);
    }

    #[test]
    fn test_from_bytes_rejects_padding() {
        assert!(BitVector::from_bytes(vec![0xff, 0x80], 9).is_some());
        assert!(BitVector::from_bytes(vec![0xff, 0x40], 9).is_none());
        assert!(BitVector::from_bytes(vec![0xff], 9).is_none());
    }

    #[test]
    fn test_set_and_hamming() {
        let mut a = BitVector::zeros(12);
        let b = BitVector::zeros(12);
        a.set(0, true);
        a.set(11, true);
        assert_eq!(a.hamming(&b), 2);
        a.set(0, false);
        assert_eq!(a.hamming(&b), 1);
        assert_eq!(a.iter().filter(|bit| *bit).count(), 1);
    }
}
