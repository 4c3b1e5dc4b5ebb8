//! Sampling indicator bits with rank support.
//!
//! **Interleaved Layout**: `[count | 8 words]` per 512 bits, so a rank query
//! reads its cached count and the bits it counts from one 72-byte stretch.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

const WORD_BITS: usize = 64;
const WORDS_PER_BLOCK: usize = 8;
const BLOCK_BITS: usize = WORD_BITS * WORDS_PER_BLOCK;
/// Count word followed by the block's bit words.
const STRIDE: usize = WORDS_PER_BLOCK + 1;

#[inline(always)]
fn word_index(bit: usize) -> usize {
    let block = bit / BLOCK_BITS;
    block * STRIDE + 1 + (bit % BLOCK_BITS) / WORD_BITS
}

/// Append-only bit vector. Ranks are valid after [`BitVector::build_index`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BitVector {
    words: Vec<u64>,
    len: usize,
    ones: usize,
}

impl BitVector {
    pub fn new() -> Self {
        Self {
            words: Vec::new(),
            len: 0,
            ones: 0,
        }
    }

    pub fn with_capacity(bits: usize) -> Self {
        Self {
            words: Vec::with_capacity(bits.div_ceil(BLOCK_BITS) * STRIDE),
            len: 0,
            ones: 0,
        }
    }

    #[inline]
    pub fn push(&mut self, bit: bool) {
        let idx = word_index(self.len);
        // Opening a block also opens its count word.
        while self.words.len() <= idx {
            self.words.push(0);
        }
        self.words[idx] |= (bit as u64) << (self.len % WORD_BITS);
        self.len += 1;
    }

    /// Fill in the per-block counts.
    pub fn build_index(&mut self) {
        let mut running = 0usize;
        for block in self.words.chunks_mut(STRIDE) {
            block[0] = running as u64;
            running += block[1..].iter().map(|w| w.count_ones() as usize).sum::<usize>();
        }
        self.ones = running;
    }

    #[inline(always)]
    pub fn get(&self, i: usize) -> bool {
        debug_assert!(i < self.len, "bit {} beyond {}", i, self.len);
        (self.words[word_index(i)] >> (i % WORD_BITS)) & 1 == 1
    }

    /// Set bits in `[0, i)`, for `i <= len`.
    #[inline(always)]
    pub fn rank1(&self, i: usize) -> usize {
        debug_assert!(i <= self.len);
        if i == self.len {
            return self.ones;
        }

        let start = (i / BLOCK_BITS) * STRIDE;
        let target = word_index(i);
        let full: usize = self.words[start + 1..target]
            .iter()
            .map(|w| w.count_ones() as usize)
            .sum();
        let partial = self.words[target] & ((1u64 << (i % WORD_BITS)) - 1);

        self.words[start] as usize + full + partial.count_ones() as usize
    }

    /// Set bits in `[0, i]`.
    #[inline(always)]
    pub fn rank1_inclusive(&self, i: usize) -> usize {
        self.rank1(i + 1)
    }

    #[inline]
    pub fn count_ones(&self) -> usize {
        self.ones
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn clear(&mut self) {
        *self = Self::new();
    }

    pub fn heap_bytes(&self) -> usize {
        self.words.capacity() * core::mem::size_of::<u64>()
    }

    /// Word count and cached counts must agree with `len` after decoding.
    pub(crate) fn check(&self) -> Result<()> {
        let expected_words = if self.len == 0 {
            0
        } else {
            word_index(self.len - 1) + 1
        };
        if self.words.len() != expected_words {
            return Err(Error::Corrupt(format!(
                "indicator bits: {} words for {} bits",
                self.words.len(),
                self.len
            )));
        }

        let mut running = 0usize;
        for block in self.words.chunks(STRIDE) {
            if block[0] as usize != running {
                return Err(Error::Corrupt("indicator block counts".to_string()));
            }
            running += block[1..].iter().map(|w| w.count_ones() as usize).sum::<usize>();
        }
        if running != self.ones {
            return Err(Error::Corrupt(format!(
                "indicator bits: {} ones recorded, {} present",
                self.ones, running
            )));
        }
        Ok(())
    }
}

impl Default for BitVector {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<bool> for BitVector {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut bv = BitVector::with_capacity(iter.size_hint().0);
        for bit in iter {
            bv.push(bit);
        }
        bv.build_index();
        bv
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank1_small() {
        // 1 0 1 1 0 1
        let bv: BitVector = [true, false, true, true, false, true].into_iter().collect();

        let expected = [0, 1, 1, 2, 3, 3, 4];
        for (i, &r) in expected.iter().enumerate() {
            assert_eq!(bv.rank1(i), r, "rank1({})", i);
        }
        assert_eq!(bv.rank1_inclusive(0), 1);
        assert_eq!(bv.rank1_inclusive(5), 4);
        assert_eq!(bv.count_ones(), 4);
        assert!(bv.get(0));
        assert!(!bv.get(1));
    }

    #[test]
    fn test_rank1_across_blocks() {
        let bv: BitVector = (0..1300).map(|i| i % 3 == 0).collect();

        let mut expected = 0;
        for i in 0..=1300 {
            assert_eq!(bv.rank1(i), expected, "rank1({})", i);
            if i < 1300 && i % 3 == 0 {
                expected += 1;
            }
        }
        assert!(bv.check().is_ok());
    }

    #[test]
    fn test_block_layout() {
        let bv: BitVector = (0..512).map(|i| i % 2 == 0).collect();
        assert_eq!(bv.words.len(), STRIDE);
        assert_eq!(bv.words[0], 0);

        let bv: BitVector = (0..513).map(|_| true).collect();
        assert_eq!(bv.words.len(), STRIDE + 2);
        assert_eq!(bv.words[STRIDE], 512);
    }

    #[test]
    fn test_check_detects_damage() {
        let mut bv: BitVector = (0..700).map(|i| i % 5 == 0).collect();
        assert!(bv.check().is_ok());

        let mut truncated = bv.clone();
        truncated.words.pop();
        assert!(truncated.check().is_err());

        bv.words[STRIDE] += 1;
        assert!(bv.check().is_err());
    }

    #[test]
    fn test_empty() {
        let bv = BitVector::new();
        assert!(bv.is_empty());
        assert_eq!(bv.rank1(0), 0);
        assert!(bv.check().is_ok());
    }
}
