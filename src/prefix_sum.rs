//! Prefix Sum Table (the C array)
//!
//! `prefix_sum(c)` = number of BWT symbols strictly smaller than `c`.
//! One extra trailing entry holds the total length.

use serde::{Deserialize, Serialize};

use crate::alphabet::Alphabet;
use crate::error::{Error, Result};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrefixSumTable {
    alphabet: Alphabet,
    /// `alphabet.len() + 1` cumulative counts.
    sums: Vec<u64>,
}

impl PrefixSumTable {
    /// Count codes once and accumulate in alphabet order.
    pub fn build(codes: &[u8], alphabet: Alphabet) -> Self {
        Self::accumulate(codes.iter().copied(), alphabet, 0)
    }

    /// Like [`PrefixSumTable::build`] with row `sentinel` holding an
    /// out-of-band terminator that sorts before every symbol.
    pub fn build_with_sentinel(codes: &[u8], alphabet: Alphabet, sentinel: usize) -> Self {
        let real = codes
            .iter()
            .enumerate()
            .filter(|&(row, _)| row != sentinel)
            .map(|(_, &c)| c);
        Self::accumulate(real, alphabet, 1)
    }

    fn accumulate(codes: impl Iterator<Item = u8>, alphabet: Alphabet, leading: u64) -> Self {
        let mut counts = vec![0u64; alphabet.len()];
        for c in codes {
            counts[c as usize] += 1;
        }

        let mut sums = Vec::with_capacity(alphabet.len() + 1);
        let mut sum = leading;
        for count in counts {
            sums.push(sum);
            sum += count;
        }
        sums.push(sum);

        Self { alphabet, sums }
    }

    /// Rank of `symbol` within the alphabet, `None` for foreign bytes.
    #[inline]
    pub fn character_position(&self, symbol: u8) -> Option<usize> {
        self.alphabet.code(symbol).map(usize::from)
    }

    /// Symbols strictly smaller than the symbol of rank `rank`.
    #[inline]
    pub fn prefix_sum(&self, rank: usize) -> usize {
        self.sums[rank] as usize
    }

    /// Total number of symbols counted.
    pub fn total(&self) -> usize {
        self.sums.last().copied().unwrap_or(0) as usize
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    pub fn len(&self) -> usize {
        self.sums.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    pub fn clear(&mut self) {
        self.sums = vec![0; self.alphabet.len() + 1];
    }

    pub(crate) fn check(&self) -> Result<()> {
        self.alphabet.check()?;
        if self.sums.len() != self.alphabet.len() + 1
            || self.sums.windows(2).any(|w| w[0] > w[1])
        {
            return Err(Error::Corrupt("prefix sum table".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_banana_prefix_sums() {
        let alphabet = Alphabet::from_text(b"banana$").unwrap();
        let codes = alphabet.encode(b"annb$aa").unwrap();
        let table = PrefixSumTable::build(&codes, alphabet);

        // $ < a < b < n with counts 1, 3, 1, 2
        assert_eq!(table.len(), 5);
        assert_eq!(table.prefix_sum(0), 0);
        assert_eq!(table.prefix_sum(1), 1);
        assert_eq!(table.prefix_sum(2), 4);
        assert_eq!(table.prefix_sum(3), 5);
        assert_eq!(table.prefix_sum(4), 7);
        assert_eq!(table.total(), 7);

        assert_eq!(table.character_position(b'b'), Some(2));
        assert_eq!(table.character_position(b'z'), None);
    }

    #[test]
    fn test_clear() {
        let alphabet = Alphabet::dna();
        let codes = alphabet.encode(b"ACGTTG").unwrap();
        let mut table = PrefixSumTable::build(&codes, alphabet);
        assert!(!table.is_empty());
        table.clear();
        assert!(table.is_empty());
        assert!(table.check().is_ok());
    }

    #[test]
    fn test_sentinel_sorts_first() {
        // Terminator at row 3 holding the stand-in code 0.
        let alphabet = Alphabet::dna();
        let codes = [0, 3, 2, 0, 3, 0, 1, 0];
        let table = PrefixSumTable::build_with_sentinel(&codes, alphabet, 3);

        // A:3 C:1 G:1 T:2 after the terminator
        assert_eq!(table.prefix_sum(0), 1);
        assert_eq!(table.prefix_sum(1), 4);
        assert_eq!(table.prefix_sum(2), 5);
        assert_eq!(table.prefix_sum(3), 6);
        assert_eq!(table.total(), 8);
        assert!(table.check().is_ok());
    }
}
