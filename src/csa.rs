//! Compressed Suffix Array
//!
//! **Sparse Storage**: only sampled entries are kept.
//! **LF Walk**: unsampled entries are recovered by stepping backwards through
//! the text until a sampled position is hit, then adding the step count.
//!
//! The LF table is held through a handle `L: Deref<Target = LfTable>`: a
//! plain borrow `&'a LfTable` ties the array to the table's lifetime, an
//! `Arc<LfTable>` shares ownership with it.

use core::iter::FusedIterator;
use core::ops::{Deref, Range};
use std::path::Path;
use std::sync::Arc;

use crate::config::{OpenMode, SamplingConfig};
use crate::error::Result;
use crate::lf_table::LfTable;
use crate::sa_entry::SaEntry;
use crate::sparse::SparseSampledArray;

pub struct CompressedSuffixArray<V, L = Arc<LfTable>> {
    sparse: SparseSampledArray<V>,
    lf_table: Option<L>,
}

impl<V, L> CompressedSuffixArray<V, L>
where
    V: SaEntry,
    L: Deref<Target = LfTable>,
{
    /// Uninitialized array: no samples, no LF table.
    pub fn new() -> Self {
        Self {
            sparse: SparseSampledArray::new(),
            lf_table: None,
        }
    }

    /// Ready array from a sampled suffix array and its LF table.
    pub fn with_lf_table(sparse: SparseSampledArray<V>, lf_table: L) -> Self {
        debug_assert_eq!(sparse.len(), lf_table.len());
        Self {
            sparse,
            lf_table: Some(lf_table),
        }
    }

    /// Sample `sa`, storing every entry whose offset divides by `compression_factor`.
    ///
    /// Does not touch the LF table; attach one with [`Self::set_lf_table`].
    pub fn create_compressed_sa(&mut self, sa: &[V], compression_factor: usize) -> Result<()> {
        self.create_compressed_sa_with_offset(sa, compression_factor, 0)
    }

    /// Like [`Self::create_compressed_sa`] with `offset` leading positions
    /// left unsampled for multi-part construction.
    pub fn create_compressed_sa_with_offset(
        &mut self,
        sa: &[V],
        compression_factor: usize,
        offset: usize,
    ) -> Result<()> {
        let config = SamplingConfig::new()
            .compression_factor(compression_factor)
            .offset(offset);
        self.sparse = SparseSampledArray::build(sa, &config)?;
        Ok(())
    }

    pub fn set_lf_table(&mut self, lf_table: L) {
        self.lf_table = Some(lf_table);
    }

    pub fn lf_table(&self) -> Option<&LfTable> {
        self.lf_table.as_deref()
    }

    /// Samples filled and LF table attached.
    pub fn is_ready(&self) -> bool {
        self.lf_table.is_some()
    }

    /// Suffix array entry at `pos`.
    #[inline]
    pub fn value(&self, pos: usize) -> V {
        self.value_and_steps(pos).0
    }

    /// Suffix array entry at `pos` and the number of LF steps it took.
    ///
    /// Fewer than `compression_factor` steps whenever every sequence start
    /// is sampled, which the sampling rule guarantees.
    pub fn value_and_steps(&self, mut pos: usize) -> (V, usize) {
        debug_assert!(pos < self.len(), "position {} beyond {}", pos, self.len());

        let mut steps = 0;
        if !self.sparse.is_stored(pos) {
            let lf = match self.lf_table.as_deref() {
                Some(lf) => lf,
                None => panic!("compressed suffix array queried before an LF table was attached"),
            };
            while !self.sparse.is_stored(pos) {
                pos = lf.lf_mapping(pos);
                steps += 1;
                debug_assert!(steps < self.len(), "LF walk found no sampled position");
            }
        }

        let stored = self.sparse.values()[self.sparse.indicators().rank1(pos)];
        (stored.add_gap_distance(steps), steps)
    }

    /// Whether `pos` is answered without LF steps.
    #[inline]
    pub fn is_stored(&self, pos: usize) -> bool {
        self.sparse.is_stored(pos)
    }

    pub fn sparse(&self) -> &SparseSampledArray<V> {
        &self.sparse
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.sparse.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sparse.is_empty()
    }

    /// Drop the samples. The LF table handle is released as well.
    pub fn clear(&mut self) {
        self.sparse.clear();
        self.lf_table = None;
    }

    pub fn iter(&self) -> Values<'_, V, L> {
        Values {
            csa: self,
            range: 0..self.len(),
        }
    }

    /// Iterate `value(pos)` over a sub-range of positions.
    pub fn iter_range(&self, range: Range<usize>) -> Values<'_, V, L> {
        debug_assert!(range.end <= self.len());
        Values { csa: self, range }
    }

    /// Load the sparse fibre. The LF table is persisted separately.
    pub fn open(&mut self, base: impl AsRef<Path>, mode: OpenMode) -> Result<()> {
        self.sparse.open(base, mode)
    }

    /// Save the sparse fibre. The LF table is persisted separately.
    pub fn save(&self, base: impl AsRef<Path>, mode: OpenMode) -> Result<()> {
        self.sparse.save(base, mode)
    }
}

impl<V, L> Default for CompressedSuffixArray<V, L>
where
    V: SaEntry,
    L: Deref<Target = LfTable>,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<V, L> core::fmt::Debug for CompressedSuffixArray<V, L>
where
    V: SaEntry,
    L: Deref<Target = LfTable>,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CompressedSuffixArray")
            .field("len", &self.len())
            .field("stored", &self.sparse.values().len())
            .field("ready", &self.is_ready())
            .finish()
    }
}

/// Iterator over suffix array entries, resolved on demand.
pub struct Values<'c, V, L> {
    csa: &'c CompressedSuffixArray<V, L>,
    range: Range<usize>,
}

impl<V, L> Iterator for Values<'_, V, L>
where
    V: SaEntry,
    L: Deref<Target = LfTable>,
{
    type Item = V;

    #[inline]
    fn next(&mut self) -> Option<V> {
        let pos = self.range.next()?;
        Some(self.csa.value(pos))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.range.size_hint()
    }

    #[inline]
    fn nth(&mut self, n: usize) -> Option<V> {
        let pos = self.range.nth(n)?;
        Some(self.csa.value(pos))
    }
}

impl<V, L> DoubleEndedIterator for Values<'_, V, L>
where
    V: SaEntry,
    L: Deref<Target = LfTable>,
{
    #[inline]
    fn next_back(&mut self) -> Option<V> {
        let pos = self.range.next_back()?;
        Some(self.csa.value(pos))
    }
}

impl<V, L> ExactSizeIterator for Values<'_, V, L>
where
    V: SaEntry,
    L: Deref<Target = LfTable>,
{
}

impl<V, L> FusedIterator for Values<'_, V, L>
where
    V: SaEntry,
    L: Deref<Target = LfTable>,
{
}

impl<'c, V, L> IntoIterator for &'c CompressedSuffixArray<V, L>
where
    V: SaEntry,
    L: Deref<Target = LfTable>,
{
    type Item = V;
    type IntoIter = Values<'c, V, L>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
