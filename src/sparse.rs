//! Sparse Sampled Array
//!
//! Indicator bits over all suffix array positions plus a compact array of
//! the stored entries. The stored value of a sampled `pos` sits at slot
//! `rank1(pos)` (the inclusive rank minus one).

use std::path::Path;

use crate::bitvec::BitVector;
use crate::config::{OpenMode, SamplingConfig};
use crate::error::{Error, Result};
use crate::persist::{open_fibre, save_fibre, Fibre};
use crate::sa_entry::SaEntry;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SparseSampledArray<V> {
    indicators: BitVector,
    values: Vec<V>,
}

impl<V: SaEntry> SparseSampledArray<V> {
    pub fn new() -> Self {
        Self {
            indicators: BitVector::new(),
            values: Vec::new(),
        }
    }

    /// Sample a full suffix array.
    ///
    /// Position `offset + i` is stored iff `sa[i].seq_offset()` is a multiple
    /// of the compression factor; the first `offset` positions never are.
    pub fn build(sa: &[V], config: &SamplingConfig) -> Result<Self> {
        config.validate()?;
        let factor = config.compression_factor as u64;
        let offset = config.offset;

        let mut indicators = BitVector::with_capacity(offset + sa.len());
        for _ in 0..offset {
            indicators.push(false);
        }
        for entry in sa {
            indicators.push(entry.seq_offset() % factor == 0);
        }
        indicators.build_index();

        let mut values = Vec::with_capacity(indicators.count_ones());
        for (i, entry) in sa.iter().enumerate() {
            if indicators.get(offset + i) {
                values.push(*entry);
            }
        }
        debug_assert_eq!(values.len(), indicators.count_ones());

        log::debug!(
            "sparse suffix array: {} of {} entries stored (factor {}, offset {})",
            values.len(),
            indicators.len(),
            factor,
            offset
        );

        Ok(Self { indicators, values })
    }

    /// Whether `pos` holds an explicit value.
    #[inline(always)]
    pub fn is_stored(&self, pos: usize) -> bool {
        self.indicators.get(pos)
    }

    /// Stored value at `pos`, `None` for unsampled positions.
    #[inline]
    pub fn stored(&self, pos: usize) -> Option<V> {
        if self.is_stored(pos) {
            Some(self.values[self.indicators.rank1(pos)])
        } else {
            None
        }
    }

    pub fn indicators(&self) -> &BitVector {
        &self.indicators
    }

    pub fn values(&self) -> &[V] {
        &self.values
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.indicators.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indicators.is_empty()
    }

    pub fn clear(&mut self) {
        self.indicators.clear();
        self.values = Vec::new();
    }

    pub fn heap_bytes(&self) -> usize {
        self.indicators.heap_bytes() + self.values.capacity() * core::mem::size_of::<V>()
    }

    /// Load `<base>.ind` and `<base>.val`; `self` is untouched on failure.
    pub fn open(&mut self, base: impl AsRef<Path>, mode: OpenMode) -> Result<()> {
        let base = base.as_ref();
        let indicators: BitVector = open_fibre(Fibre::Indicators, base, mode)?;
        indicators.check()?;
        let values: Vec<V> = open_fibre(Fibre::Values, base, mode)?;
        if values.len() != indicators.count_ones() {
            return Err(Error::Corrupt(format!(
                "{} values for {} sampled positions",
                values.len(),
                indicators.count_ones()
            )));
        }

        self.indicators = indicators;
        self.values = values;
        Ok(())
    }

    /// Save both fibres; stops at the first failing one.
    pub fn save(&self, base: impl AsRef<Path>, mode: OpenMode) -> Result<()> {
        let base = base.as_ref();
        save_fibre(&self.indicators, Fibre::Indicators, base, mode)?;
        save_fibre(&self.values, Fibre::Values, base, mode)
    }
}

impl<V: SaEntry> Default for SparseSampledArray<V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sa_entry::SeqPos;
    use tempfile::tempdir;

    const BANANA_SA: [u32; 7] = [6, 5, 3, 1, 0, 4, 2];

    #[test]
    fn test_banana_sampling() {
        let config = SamplingConfig::new().compression_factor(2);
        let sparse = SparseSampledArray::build(&BANANA_SA, &config).unwrap();

        assert_eq!(sparse.len(), 7);
        for (pos, &v) in BANANA_SA.iter().enumerate() {
            assert_eq!(sparse.is_stored(pos), v % 2 == 0, "pos {}", pos);
        }
        assert_eq!(sparse.values(), &[6, 0, 4, 2]);
        assert_eq!(sparse.stored(5), Some(4));
        assert_eq!(sparse.stored(1), None);
    }

    #[test]
    fn test_factor_one_stores_everything() {
        let config = SamplingConfig::new().compression_factor(1);
        let sparse = SparseSampledArray::build(&BANANA_SA, &config).unwrap();
        assert_eq!(sparse.values(), &BANANA_SA);
    }

    #[test]
    fn test_offset_reserves_leading_positions() {
        let config = SamplingConfig::new().compression_factor(3).offset(2);
        let sparse = SparseSampledArray::build(&BANANA_SA, &config).unwrap();

        assert_eq!(sparse.len(), 9);
        assert!(!sparse.is_stored(0));
        assert!(!sparse.is_stored(1));
        // 6, 3, 0 are multiples of 3
        assert_eq!(sparse.values(), &[6, 3, 0]);
        assert_eq!(sparse.stored(2), Some(6));
        assert_eq!(sparse.stored(4), Some(3));
    }

    #[test]
    fn test_pairs_sample_on_offset_only() {
        let sa = [SeqPos::new(3, 4), SeqPos::new(1, 0), SeqPos::new(0, 5)];
        let config = SamplingConfig::new().compression_factor(4);
        let sparse = SparseSampledArray::build(&sa, &config).unwrap();
        assert_eq!(sparse.values(), &[SeqPos::new(3, 4), SeqPos::new(1, 0)]);
    }

    #[test]
    fn test_zero_factor() {
        let config = SamplingConfig::new().compression_factor(0);
        assert!(SparseSampledArray::build(&BANANA_SA, &config).is_err());
    }

    #[test]
    fn test_save_open_roundtrip() {
        let dir = tempdir().unwrap();
        let base = dir.path().join("sa");
        let config = SamplingConfig::new().compression_factor(2);
        let sparse = SparseSampledArray::build(&BANANA_SA, &config).unwrap();
        sparse.save(&base, OpenMode::DEFAULT_SAVE).unwrap();

        let mut loaded = SparseSampledArray::<u32>::new();
        loaded.open(&base, OpenMode::DEFAULT_LOAD).unwrap();
        assert_eq!(loaded, sparse);

        loaded.clear();
        assert!(loaded.is_empty());
    }
}
