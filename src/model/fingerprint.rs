//! Packed fixed-length binary fingerprints.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const WORD_BITS: usize = u64::BITS as usize;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid fingerprint character '{found}' at position {position}")]
pub struct ParseFingerprintError {
    pub position: usize,
    pub found: char,
}

/// A fixed-length bit vector encoding structural features of a molecule.
///
/// Bits are packed little-endian into `u64` words; bits past `len` in the last
/// word are always zero, so whole-word population counts are exact.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Fingerprint {
    words: Vec<u64>,
    len: usize,
}

impl Fingerprint {
    /// Creates an all-zero fingerprint of `len` bits.
    pub fn zeros(len: usize) -> Self {
        Self {
            words: vec![0; len.div_ceil(WORD_BITS)],
            len,
        }
    }

    pub fn from_bits(bits: &[bool]) -> Self {
        let mut fp = Self::zeros(bits.len());
        for (i, _) in bits.iter().enumerate().filter(|(_, b)| **b) {
            fp.set(i);
        }
        fp
    }

    /// Sets bit `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len()`.
    pub fn set(&mut self, index: usize) {
        assert!(index < self.len, "bit index {index} out of range {}", self.len);
        self.words[index / WORD_BITS] |= 1 << (index % WORD_BITS);
    }

    #[inline]
    pub fn get(&self, index: usize) -> bool {
        index < self.len && self.words[index / WORD_BITS] & (1 << (index % WORD_BITS)) != 0
    }

    /// Number of bits (not words).
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of set bits.
    pub fn count_ones(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    #[inline]
    pub fn words(&self) -> &[u64] {
        &self.words
    }
}

impl FromStr for Fingerprint {
    type Err = ParseFingerprintError;

    /// Parses a string of `0`/`1` characters, position 0 first.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let mut fp = Self::zeros(s.chars().count());
        for (position, c) in s.chars().enumerate() {
            match c {
                '1' => fp.set(position),
                '0' => {}
                found => return Err(ParseFingerprintError { position, found }),
            }
        }
        Ok(fp)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..self.len {
            f.write_str(if self.get(i) { "1" } else { "0" })?;
        }
        Ok(())
    }
}
