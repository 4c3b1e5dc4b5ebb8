//! Rank Dictionary (Occurrence Table)
//!
//! **2-bit Layout**: [SuperBlock(4 x u64) | Block(u64)] per 32 symbols.
//! A rank query is one cached count plus one popcount.
//!
//! **Scan Layout**: alphabets wider than 4 symbols keep the same superblock
//! spacing but count inside the block with a linear scan.
//!
//! The layout is chosen once at construction from the alphabet size and never
//! changes afterwards.
//!
//! **Sentinel Row**: a text terminator may be kept out of the alphabet. Its
//! BWT row stores code 0 as a stand-in and rank subtracts it back out, so four
//! real symbols plus the terminator still fit the 2-bit layout.

use serde::{Deserialize, Serialize};

use crate::alphabet::TWO_BIT_SIGMA;
use crate::error::{Error, Result};

const BITS_PER_SYMBOL: usize = 2;

/// Symbols per block: one `u64` word at 2 bits per symbol.
pub const BLOCK_SIZE: usize = u64::BITS as usize / BITS_PER_SYMBOL;

/// One bit per 2-bit slot, in the low position of the slot.
const SLOT_MASK: u64 = 0x5555_5555_5555_5555;

/// Cached prefix counts plus one packed block of the BWT.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankSupport {
    /// Occurrences of each code in all preceding blocks.
    pub superblock: [u64; TWO_BIT_SIGMA],
    /// Up to 32 codes, the first one in the two most significant bits.
    pub block: u64,
}

/// Which rank path a dictionary was built with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RankKind {
    /// Bit-parallel popcount over packed 2-bit codes.
    TwoBit,
    /// Linear scan inside the block, any alphabet size.
    Scan,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
enum RankLayout {
    TwoBit(Vec<RankSupport>),
    Scan {
        /// `sigma` counts per block, flattened row-major.
        superblocks: Vec<u64>,
        codes: Vec<u8>,
    },
}

/// Rank support over a BWT given as dense alphabet codes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankDictionary {
    layout: RankLayout,
    sigma: usize,
    len: usize,
    /// BWT row of the out-of-band terminator.
    sentinel: Option<usize>,
}

impl RankDictionary {
    /// Empty dictionary over the 2-bit layout.
    pub fn new() -> Self {
        Self::build(&[], TWO_BIT_SIGMA)
    }

    /// Build from codes in `[0, sigma)` in a single pass.
    ///
    /// Always stores `len / 32 + 1` blocks; the last one may be partial or
    /// empty so that `rank(len, c)` needs no special case.
    pub fn build(codes: &[u8], sigma: usize) -> Self {
        debug_assert!(codes.iter().all(|&c| (c as usize) < sigma));

        let layout = if sigma <= TWO_BIT_SIGMA {
            fill_two_bit(codes)
        } else {
            fill_scan(codes, sigma)
        };
        let dict = Self {
            layout,
            sigma,
            len: codes.len(),
            sentinel: None,
        };
        log::debug!(
            "rank dictionary: {} symbols, sigma {}, {:?} layout, {} heap bytes",
            dict.len,
            dict.sigma,
            dict.kind(),
            dict.heap_bytes()
        );
        dict
    }

    /// Build over codes where row `sentinel` is the out-of-band terminator.
    ///
    /// `codes[sentinel]` must hold the stand-in code 0; it is never counted.
    pub fn build_with_sentinel(codes: &[u8], sigma: usize, sentinel: usize) -> Self {
        debug_assert_eq!(codes.get(sentinel), Some(&0));
        let mut dict = Self::build(codes, sigma);
        dict.sentinel = Some(sentinel);
        dict
    }

    /// Rank(c, pos): occurrences of code `c` in `[0, pos)`.
    ///
    /// Valid for `pos` in `[0, len]`.
    #[inline(always)]
    pub fn rank(&self, pos: usize, c: u8) -> usize {
        debug_assert!(pos <= self.len, "rank position {} beyond {}", pos, self.len);
        debug_assert!((c as usize) < self.sigma.max(1));

        let block = pos / BLOCK_SIZE;
        let offset = pos % BLOCK_SIZE;

        let raw = match &self.layout {
            RankLayout::TwoBit(entries) => {
                let entry = &entries[block];
                entry.superblock[c as usize] as usize + rank_in_block(entry.block, offset, c)
            }
            RankLayout::Scan { superblocks, codes } => {
                let start = block * BLOCK_SIZE;
                let in_block = codes[start..pos].iter().filter(|&&x| x == c).count();
                superblocks[block * self.sigma + c as usize] as usize + in_block
            }
        };

        // The stand-in code of the sentinel row is not an occurrence.
        match self.sentinel {
            Some(row) if c == 0 && row < pos => raw - 1,
            _ => raw,
        }
    }

    /// Occurrences of code `c` in `[0, pos]`, the convention of LF-mapping.
    ///
    /// Valid for `pos` in `[0, len)`.
    #[inline(always)]
    pub fn rank_inclusive(&self, pos: usize, c: u8) -> usize {
        self.rank(pos + 1, c)
    }

    /// Code stored at BWT position `pos`. The sentinel row reads as 0.
    #[inline]
    pub fn symbol_at(&self, pos: usize) -> u8 {
        debug_assert!(pos < self.len, "symbol position {} beyond {}", pos, self.len);

        match &self.layout {
            RankLayout::TwoBit(entries) => {
                let word = entries[pos / BLOCK_SIZE].block;
                ((word >> slot_shift(pos % BLOCK_SIZE)) & 0b11) as u8
            }
            RankLayout::Scan { codes, .. } => codes[pos],
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// BWT row of the out-of-band terminator, if there is one.
    #[inline]
    pub fn sentinel_position(&self) -> Option<usize> {
        self.sentinel
    }

    #[inline(always)]
    pub fn is_sentinel(&self, pos: usize) -> bool {
        self.sentinel == Some(pos)
    }

    /// Alphabet size the dictionary was built for.
    #[inline]
    pub fn sigma(&self) -> usize {
        self.sigma
    }

    pub fn kind(&self) -> RankKind {
        match self.layout {
            RankLayout::TwoBit(_) => RankKind::TwoBit,
            RankLayout::Scan { .. } => RankKind::Scan,
        }
    }

    /// Release all storage. Only `len` and `is_empty` stay meaningful.
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    /// Approximate heap memory usage in bytes.
    pub fn heap_bytes(&self) -> usize {
        match &self.layout {
            RankLayout::TwoBit(entries) => {
                entries.capacity() * core::mem::size_of::<RankSupport>()
            }
            RankLayout::Scan { superblocks, codes } => {
                superblocks.capacity() * 8 + codes.capacity()
            }
        }
    }

    /// Full structural validation after decoding: every code below `sigma`
    /// and every cached count equal to the running count of the codes.
    pub(crate) fn check(&self) -> Result<()> {
        let corrupt = |what: &str| {
            Err(Error::Corrupt(format!(
                "rank dictionary of {} symbols over sigma {}: {}",
                self.len, self.sigma, what
            )))
        };

        let blocks = self.len / BLOCK_SIZE + 1;
        let mut running = vec![0u64; self.sigma];
        match &self.layout {
            RankLayout::TwoBit(entries) => {
                if self.sigma == 0 || self.sigma > TWO_BIT_SIGMA || entries.len() != blocks {
                    return corrupt("layout");
                }
                for (i, entry) in entries.iter().enumerate() {
                    if entry.superblock[..self.sigma] != running[..]
                        || entry.superblock[self.sigma..].iter().any(|&n| n != 0)
                    {
                        return corrupt("block counts");
                    }
                    let used = (self.len - i * BLOCK_SIZE).min(BLOCK_SIZE);
                    for slot in 0..BLOCK_SIZE {
                        let code = ((entry.block >> slot_shift(slot)) & 0b11) as usize;
                        if slot >= used && code != 0 {
                            return corrupt("bits past the end");
                        }
                        if slot < used {
                            if code >= self.sigma {
                                return corrupt("code out of range");
                            }
                            running[code] += 1;
                        }
                    }
                }
            }
            RankLayout::Scan { superblocks, codes } => {
                if self.sigma <= TWO_BIT_SIGMA
                    || codes.len() != self.len
                    || superblocks.len() != blocks * self.sigma
                {
                    return corrupt("layout");
                }
                for (i, counts) in superblocks.chunks(self.sigma).enumerate() {
                    if counts != &running[..] {
                        return corrupt("block counts");
                    }
                    let start = (i * BLOCK_SIZE).min(self.len);
                    let end = (start + BLOCK_SIZE).min(self.len);
                    for &c in &codes[start..end] {
                        if c as usize >= self.sigma {
                            return corrupt("code out of range");
                        }
                        running[c as usize] += 1;
                    }
                }
            }
        }

        if let Some(row) = self.sentinel {
            if row >= self.len || self.symbol_at(row) != 0 {
                return corrupt("sentinel row");
            }
        }
        Ok(())
    }
}

impl Default for RankDictionary {
    fn default() -> Self {
        Self::new()
    }
}

/// Bit offset of slot `i`; slot 0 occupies the two most significant bits.
#[inline(always)]
fn slot_shift(i: usize) -> usize {
    (BLOCK_SIZE - 1 - i) * BITS_PER_SYMBOL
}

fn pack_block(chunk: &[u8]) -> u64 {
    chunk
        .iter()
        .enumerate()
        .fold(0u64, |word, (i, &c)| word | ((c as u64) << slot_shift(i)))
}

fn fill_two_bit(codes: &[u8]) -> RankLayout {
    let mut entries = Vec::with_capacity(codes.len() / BLOCK_SIZE + 1);
    let mut entry = RankSupport::default();

    let mut chunks = codes.chunks_exact(BLOCK_SIZE);
    for chunk in &mut chunks {
        entry.block = pack_block(chunk);
        entries.push(entry);
        for &c in chunk {
            entry.superblock[c as usize] += 1;
        }
    }

    // Last block might be shorter than BLOCK_SIZE, or empty.
    entry.block = pack_block(chunks.remainder());
    entries.push(entry);

    RankLayout::TwoBit(entries)
}

fn fill_scan(codes: &[u8], sigma: usize) -> RankLayout {
    let mut superblocks = Vec::with_capacity((codes.len() / BLOCK_SIZE + 1) * sigma);
    let mut running = vec![0u64; sigma];

    for chunk in codes.chunks_exact(BLOCK_SIZE) {
        superblocks.extend_from_slice(&running);
        for &c in chunk {
            running[c as usize] += 1;
        }
    }
    superblocks.extend_from_slice(&running);

    RankLayout::Scan {
        superblocks,
        codes: codes.to_vec(),
    }
}

/// Occurrences of code `c` among the first `offset` slots of `block`.
#[inline(always)]
fn rank_in_block(block: u64, offset: usize, c: u8) -> usize {
    // Clear every slot from `offset` on; cleared slots read as code 0.
    let word = block & !(u64::MAX >> (offset * BITS_PER_SYMBOL));

    // High bit plane matches when c is 2 or 3.
    let odd = (if c & 0b10 != 0 { word } else { !word }) >> 1;
    // Low bit plane matches when c is 1 or 3.
    let even = if c & 0b01 != 0 { word } else { !word };

    let mut rank = (odd & even & SLOT_MASK).count_ones() as usize;

    // Cleared slots were counted as matches for code 0.
    if c == 0 {
        rank -= BLOCK_SIZE - offset;
    }
    rank
}
