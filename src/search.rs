//! FM-Index Search
//!
//! **Architecture**:
//! - LfTable: rank dictionary over the BWT plus prefix sums, shared via `Arc`
//! - CompressedSuffixArray: sampled entries, the rest recovered by LF walks
//! - Locate: Iterator-based (zero allocation for query results)
//!
//! **Core Algorithm**: Backward Search
//! - Process pattern from right to left
//! - Narrow the row range: `sp = C[c] + Rank(c, sp)`, `ep = C[c] + Rank(c, ep)`
//! - Complexity: O(M) where M = pattern length

use core::ops::Range;
use std::path::Path;
use std::sync::Arc;

use crate::alphabet::Alphabet;
use crate::bwt::{bwt, suffix_array, SENTINEL};
use crate::config::OpenMode;
use crate::csa::{CompressedSuffixArray, Values};
use crate::error::{Error, Result};
use crate::lf_table::LfTable;

/// Full-text index over a single byte string.
///
/// Count(Pattern) -> O(Pattern_Length) independent of corpus size.
pub struct FmIndex {
    lf: Arc<LfTable>,
    csa: CompressedSuffixArray<u64>,
    compression_factor: usize,
}

impl FmIndex {
    /// Build index from text
    ///
    /// # Arguments
    /// - `text`: Input text to index, must not contain the `0x00` sentinel
    /// - `compression_factor`: SA sampling interval (lower = faster locate, more memory)
    ///
    /// # Complexity
    /// - Time: O(N log^2 N) with the naive suffix sorter
    /// - Space: O(N / 4) for the 2-bit occurrence table (texts over at most
    ///   four distinct bytes), O(N) bytes for wider alphabets, plus
    ///   O(N / compression_factor) sampled entries
    pub fn build(text: &[u8], compression_factor: usize) -> Result<Self> {
        if let Some(pos) = text.iter().position(|&b| b == SENTINEL) {
            return Err(Error::SentinelInText(pos));
        }

        let mut terminated = Vec::with_capacity(text.len() + 1);
        terminated.extend_from_slice(text);
        terminated.push(SENTINEL);

        // 1. Build SA & BWT
        let sa = suffix_array(&terminated);
        let bwt = bwt(&terminated, &sa);

        // 2. Occurrence table and prefix sums, terminator kept out of band
        let alphabet = if text.is_empty() {
            // Nothing to encode; any alphabet serves.
            Alphabet::dna()
        } else {
            Alphabet::from_text(text)?
        };
        let lf = Arc::new(LfTable::from_bwt_with_sentinel(&bwt, alphabet)?);

        // 3. Sampled suffix array
        let sa: Vec<u64> = sa.into_iter().map(|p| p as u64).collect();
        let mut csa: CompressedSuffixArray<u64> = CompressedSuffixArray::new();
        csa.create_compressed_sa(&sa, compression_factor)?;
        csa.set_lf_table(Arc::clone(&lf));

        log::debug!(
            "fm index: {} symbols, sigma {}, {:?} occurrence layout",
            lf.len(),
            lf.alphabet().len(),
            lf.rank_kind()
        );

        Ok(Self {
            lf,
            csa,
            compression_factor,
        })
    }

    /// Count occurrences of a pattern in O(M) time
    ///
    /// # Example
    /// ```
    /// use fm_csa::FmIndex;
    ///
    /// let index = FmIndex::build(b"abracadabra", 4).unwrap();
    /// assert_eq!(index.count(b"abra"), 2);
    /// ```
    #[inline]
    pub fn count(&self, pattern: &[u8]) -> usize {
        self.backward_search(pattern).len()
    }

    /// Check if pattern exists in text
    #[inline]
    pub fn contains(&self, pattern: &[u8]) -> bool {
        !self.backward_search(pattern).is_empty()
    }

    /// Suffix array rows whose suffixes start with `pattern`.
    #[inline]
    pub fn search_range(&self, pattern: &[u8]) -> Range<usize> {
        self.backward_search(pattern)
    }

    /// Locate all positions where pattern occurs (Iterator version)
    ///
    /// Each position costs fewer than `compression_factor` LF steps.
    ///
    /// # Example
    /// ```
    /// use fm_csa::FmIndex;
    ///
    /// let index = FmIndex::build(b"abracadabra", 2).unwrap();
    /// let mut positions: Vec<_> = index.locate(b"abra").collect();
    /// positions.sort();
    /// assert_eq!(positions, vec![0, 7]);
    /// ```
    #[inline]
    pub fn locate(&self, pattern: &[u8]) -> LocateIter<'_> {
        let range = self.backward_search(pattern);
        LocateIter {
            values: self.csa.iter_range(range),
        }
    }

    /// Locate all positions (collecting into Vec for convenience)
    pub fn locate_all(&self, pattern: &[u8]) -> Vec<usize> {
        self.locate(pattern).collect()
    }

    /// Backward Search Algorithm
    ///
    /// Returns the range [sp, ep) in the suffix array where
    /// all suffixes starting with `pattern` are located.
    fn backward_search(&self, pattern: &[u8]) -> Range<usize> {
        let occ = self.lf.occ_table();
        let psum = self.lf.prefix_sum_table();

        let mut sp = 0;
        let mut ep = self.lf.len();

        for &c in pattern.iter().rev() {
            if c == SENTINEL {
                return 0..0;
            }
            let code = match psum.character_position(c) {
                Some(code) => code,
                None => return 0..0,
            };
            let base = psum.prefix_sum(code);

            sp = base + occ.rank(sp, code as u8);
            ep = base + occ.rank(ep, code as u8);

            if sp >= ep {
                return 0..0;
            }
        }
        sp..ep
    }

    /// The shared LF table.
    pub fn lf_table(&self) -> &Arc<LfTable> {
        &self.lf
    }

    pub fn suffix_array(&self) -> &CompressedSuffixArray<u64> {
        &self.csa
    }

    /// Original text length (excluding sentinel)
    pub fn text_len(&self) -> usize {
        self.lf.len().saturating_sub(1)
    }

    #[inline]
    pub fn compression_factor(&self) -> usize {
        self.compression_factor
    }

    /// Heap footprint of all fibres in bytes.
    pub fn heap_bytes(&self) -> usize {
        self.lf.heap_bytes() + self.csa.sparse().heap_bytes()
    }

    /// Write all four fibres next to `base`.
    pub fn save(&self, base: impl AsRef<Path>) -> Result<()> {
        let base = base.as_ref();
        self.lf.save(base, OpenMode::DEFAULT_SAVE)?;
        self.csa.save(base, OpenMode::DEFAULT_SAVE)
    }

    /// Load an index written by [`FmIndex::save`].
    ///
    /// The compression factor is not stored; it is recovered as the smallest
    /// non-zero sampled offset. Texts shorter than the factor sample only
    /// offset `0`, and report a factor of `text_len() + 1`.
    pub fn open(base: impl AsRef<Path>) -> Result<Self> {
        let base = base.as_ref();
        let mut lf = LfTable::default();
        lf.open(base, OpenMode::DEFAULT_LOAD)?;

        let mut csa: CompressedSuffixArray<u64> = CompressedSuffixArray::new();
        csa.open(base, OpenMode::DEFAULT_LOAD)?;
        if csa.len() != lf.len() {
            return Err(Error::Corrupt(format!(
                "suffix array of {} entries for a BWT of {}",
                csa.len(),
                lf.len()
            )));
        }

        let compression_factor = csa
            .sparse()
            .values()
            .iter()
            .filter(|&&v| v != 0)
            .min()
            .map_or(lf.len(), |&v| v as usize);

        let lf = Arc::new(lf);
        csa.set_lf_table(Arc::clone(&lf));
        Ok(Self {
            lf,
            csa,
            compression_factor,
        })
    }
}

/// Iterator for locate results.
/// **Zero Allocation** - positions are resolved one by one.
pub struct LocateIter<'a> {
    values: Values<'a, u64, Arc<LfTable>>,
}

impl Iterator for LocateIter<'_> {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<usize> {
        self.values.next().map(|v| v as usize)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.values.size_hint()
    }
}

impl ExactSizeIterator for LocateIter<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rank_dictionary::RankKind;
    use tempfile::tempdir;

    #[test]
    fn test_backward_search() {
        let index = FmIndex::build(b"mississippi", 4).unwrap();

        // "issi" appears twice
        assert_eq!(index.count(b"issi"), 2);

        // "mississippi" appears once
        assert_eq!(index.count(b"mississippi"), 1);

        // "xyz" doesn't appear
        assert_eq!(index.count(b"xyz"), 0);
    }

    #[test]
    fn test_count_single_char() {
        let index = FmIndex::build(b"abracadabra", 4).unwrap();

        assert_eq!(index.count(b"a"), 5);
        assert_eq!(index.count(b"b"), 2);
        assert_eq!(index.count(b"r"), 2);
        assert_eq!(index.count(b"c"), 1);
        assert_eq!(index.count(b"d"), 1);
        assert_eq!(index.count(b"z"), 0);
    }

    #[test]
    fn test_contains() {
        let index = FmIndex::build(b"hello world", 4).unwrap();

        assert!(index.contains(b"hello"));
        assert!(index.contains(b"world"));
        assert!(index.contains(b"o w"));
        assert!(!index.contains(b"xyz"));
        assert!(!index.contains(b"d\0"));
    }

    #[test]
    fn test_locate_any_factor() {
        for factor in [1, 2, 3, 4, 11, 50] {
            let index = FmIndex::build(b"abracadabra", factor).unwrap();
            let mut positions = index.locate_all(b"abra");
            positions.sort();
            assert_eq!(positions, vec![0, 7], "factor {}", factor);
        }
    }

    #[test]
    fn test_locate_iterator_exact_size() {
        let index = FmIndex::build(b"abracadabra", 3).unwrap();

        let iter = index.locate(b"a");
        assert_eq!(iter.len(), 5);
        let mut positions: Vec<_> = iter.collect();
        positions.sort();
        assert_eq!(positions, vec![0, 3, 5, 7, 10]);
    }

    #[test]
    fn test_empty_pattern_matches_every_row() {
        let index = FmIndex::build(b"hello", 4).unwrap();
        assert_eq!(index.count(b""), 6);
        assert_eq!(index.text_len(), 5);
    }

    #[test]
    fn test_dna_uses_two_bit_layout() {
        let dna = FmIndex::build(b"ACGTACGTTTGACCA", 2).unwrap();
        assert_eq!(dna.lf_table().rank_kind(), RankKind::TwoBit);
        assert!(dna.lf_table().sentinel_position().is_some());
        assert_eq!(dna.count(b"ACGT"), 2);
        assert_eq!(dna.count(b"A"), 4);
        assert_eq!(dna.count(b"CCA"), 1);
        let mut positions = dna.locate_all(b"ACG");
        positions.sort();
        assert_eq!(positions, vec![0, 4]);

        let three = FmIndex::build(b"ACGACCGGA", 2).unwrap();
        assert_eq!(three.lf_table().rank_kind(), RankKind::TwoBit);
        assert_eq!(three.count(b"GA"), 2);

        let wide = FmIndex::build(b"abracadabra", 2).unwrap();
        assert_eq!(wide.lf_table().rank_kind(), RankKind::Scan);
    }

    #[test]
    fn test_sentinel_rejected() {
        assert!(matches!(
            FmIndex::build(b"ab\0c", 4),
            Err(Error::SentinelInText(2))
        ));
    }

    #[test]
    fn test_zero_factor_rejected() {
        assert!(matches!(
            FmIndex::build(b"abc", 0),
            Err(Error::InvalidCompressionFactor(0))
        ));
    }

    #[test]
    fn test_empty_text() {
        let index = FmIndex::build(b"", 4).unwrap();
        assert_eq!(index.text_len(), 0);
        assert_eq!(index.count(b"a"), 0);
        assert_eq!(index.count(b""), 1);
    }

    #[test]
    fn test_save_open() {
        let dir = tempdir().unwrap();
        let base = dir.path().join("corpus");

        let mut text = Vec::new();
        for _ in 0..40 {
            text.extend_from_slice(b"the quick brown fox jumps over the lazy dog ");
        }
        let index = FmIndex::build(&text, 8).unwrap();
        index.save(&base).unwrap();

        let loaded = FmIndex::open(&base).unwrap();
        assert_eq!(loaded.compression_factor(), 8);
        assert_eq!(loaded.text_len(), index.text_len());
        assert_eq!(loaded.count(b"the"), 80);
        assert_eq!(
            loaded.lf_table().sentinel_position(),
            index.lf_table().sentinel_position()
        );

        let mut a = index.locate_all(b"fox");
        let mut b = loaded.locate_all(b"fox");
        a.sort();
        b.sort();
        assert_eq!(a, b);
    }

    #[test]
    fn test_large_text() {
        let mut text = Vec::new();
        for _ in 0..100 {
            text.extend_from_slice(b"the quick brown fox jumps over the lazy dog ");
        }

        let index = FmIndex::build(&text, 8).unwrap();

        assert_eq!(index.count(b"the"), 200);
        assert_eq!(index.count(b"fox"), 100);
        assert_eq!(index.count(b"xyz"), 0);
        assert!(index.heap_bytes() > 0);
    }
}
