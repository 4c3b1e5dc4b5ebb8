//! LF Table
//!
//! Rank dictionary over the BWT plus the prefix sum table. Together they
//! implement LF-mapping: the step from a BWT position to the position of the
//! preceding text character in sorted-rotation order.
//!
//! The text terminator is either an ordinary alphabet symbol
//! ([`LfTable::from_bwt`]) or kept out of band
//! ([`LfTable::from_bwt_with_sentinel`]), which leaves all four 2-bit codes to
//! real symbols.

use std::path::Path;

use crate::alphabet::Alphabet;
use crate::bwt::SENTINEL;
use crate::config::OpenMode;
use crate::error::{Error, Result};
use crate::persist::{open_fibre, save_fibre, Fibre};
use crate::prefix_sum::PrefixSumTable;
use crate::rank_dictionary::{RankDictionary, RankKind};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LfTable {
    occ_table: RankDictionary,
    prefix_sum_table: PrefixSumTable,
}

impl LfTable {
    pub fn new(occ_table: RankDictionary, prefix_sum_table: PrefixSumTable) -> Self {
        debug_assert_eq!(occ_table.len(), prefix_sum_table.total());
        Self {
            occ_table,
            prefix_sum_table,
        }
    }

    /// Build both fibres from a BWT in two linear scans.
    ///
    /// Alphabets of at most four symbols get the 2-bit rank layout.
    pub fn from_bwt(bwt: &[u8], alphabet: Alphabet) -> Result<Self> {
        let codes = alphabet.encode(bwt)?;
        let occ_table = RankDictionary::build(&codes, alphabet.len());
        let prefix_sum_table = PrefixSumTable::build(&codes, alphabet);
        Ok(Self::new(occ_table, prefix_sum_table))
    }

    /// Build from a BWT holding exactly one [`SENTINEL`] byte that is not
    /// part of `alphabet`.
    ///
    /// The terminator's row is remembered instead of encoded, so DNA keeps the
    /// 2-bit rank layout.
    pub fn from_bwt_with_sentinel(bwt: &[u8], alphabet: Alphabet) -> Result<Self> {
        if alphabet.code(SENTINEL).is_some() {
            return Err(Error::InvalidAlphabet(
                "alphabet contains the sentinel byte".to_string(),
            ));
        }

        let mut sentinel = None;
        let mut found = 0;
        let mut codes = Vec::with_capacity(bwt.len());
        for (position, &symbol) in bwt.iter().enumerate() {
            if symbol == SENTINEL {
                sentinel = Some(position);
                found += 1;
                codes.push(0);
            } else {
                codes.push(
                    alphabet
                        .code(symbol)
                        .ok_or(Error::InvalidSymbol { symbol, position })?,
                );
            }
        }
        let row = match (sentinel, found) {
            (Some(row), 1) => row,
            _ => return Err(Error::SentinelCount(found)),
        };

        let occ_table = RankDictionary::build_with_sentinel(&codes, alphabet.len(), row);
        let prefix_sum_table = PrefixSumTable::build_with_sentinel(&codes, alphabet, row);
        Ok(Self::new(occ_table, prefix_sum_table))
    }

    /// LF(pos) = Rank(c, pos] + C[c] - 1 with `c = BWT[pos]`.
    ///
    /// A permutation of `[0, len)` forming a single cycle when the BWT holds
    /// exactly one sentinel.
    #[inline]
    pub fn lf_mapping(&self, pos: usize) -> usize {
        // The row ending in the terminator precedes the rotation starting with it.
        if self.occ_table.is_sentinel(pos) {
            return 0;
        }
        // Occurrence codes are already ranks within the alphabet.
        let c = self.occ_table.symbol_at(pos);
        self.occ_table.rank_inclusive(pos, c) + self.prefix_sum_table.prefix_sum(c as usize) - 1
    }

    /// BWT symbol (as a byte of the alphabet) at `pos`; an out-of-band
    /// terminator reads as [`SENTINEL`].
    #[inline]
    pub fn symbol_at(&self, pos: usize) -> u8 {
        if self.occ_table.is_sentinel(pos) {
            return SENTINEL;
        }
        self.alphabet().symbol(self.occ_table.symbol_at(pos))
    }

    /// BWT row of the out-of-band terminator.
    pub fn sentinel_position(&self) -> Option<usize> {
        self.occ_table.sentinel_position()
    }

    pub fn occ_table(&self) -> &RankDictionary {
        &self.occ_table
    }

    pub fn prefix_sum_table(&self) -> &PrefixSumTable {
        &self.prefix_sum_table
    }

    pub fn alphabet(&self) -> &Alphabet {
        self.prefix_sum_table.alphabet()
    }

    pub fn rank_kind(&self) -> RankKind {
        self.occ_table.kind()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.occ_table.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.occ_table.is_empty()
    }

    pub fn clear(&mut self) {
        self.occ_table.clear();
        self.prefix_sum_table.clear();
    }

    pub fn heap_bytes(&self) -> usize {
        self.occ_table.heap_bytes() + self.prefix_sum_table.len() * 8 + 256 + self.alphabet().len()
    }

    /// Load both fibres from `<base>.occ` and `<base>.psum`.
    ///
    /// `self` is left untouched unless both load and agree with each other.
    pub fn open(&mut self, base: impl AsRef<Path>, mode: OpenMode) -> Result<()> {
        let base = base.as_ref();
        let occ_table: RankDictionary = open_fibre(Fibre::OccTable, base, mode)?;
        occ_table.check()?;
        let prefix_sum_table: PrefixSumTable = open_fibre(Fibre::PrefixSumTable, base, mode)?;
        prefix_sum_table.check()?;

        let leading = usize::from(occ_table.sentinel_position().is_some());
        if occ_table.len() != prefix_sum_table.total()
            || occ_table.sigma() != prefix_sum_table.alphabet().len()
            || prefix_sum_table.prefix_sum(0) != leading
        {
            return Err(Error::Corrupt(
                "occurrence table and prefix sums disagree".to_string(),
            ));
        }

        self.occ_table = occ_table;
        self.prefix_sum_table = prefix_sum_table;
        Ok(())
    }

    /// Save both fibres; stops at the first failing one.
    pub fn save(&self, base: impl AsRef<Path>, mode: OpenMode) -> Result<()> {
        let base = base.as_ref();
        save_fibre(&self.occ_table, Fibre::OccTable, base, mode)?;
        save_fibre(&self.prefix_sum_table, Fibre::PrefixSumTable, base, mode)
    }
}

impl Default for LfTable {
    fn default() -> Self {
        let alphabet = Alphabet::dna();
        Self {
            occ_table: RankDictionary::new(),
            prefix_sum_table: PrefixSumTable::build(&[], alphabet),
        }
    }
}
