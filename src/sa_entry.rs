//! Suffix array entry types.
//!
//! An entry is either a plain text offset or a `(sequence, offset)` pair for
//! collections of texts. Backward walks only ever move the offset part.

use core::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Value stored in a (sparse) suffix array.
pub trait SaEntry: Copy + Default + PartialEq + fmt::Debug + Serialize + DeserializeOwned {
    /// Offset within the entry's own sequence. Sampling is decided on this.
    fn seq_offset(&self) -> u64;

    /// Entry `distance` text positions further right in the same sequence.
    fn add_gap_distance(self, distance: usize) -> Self;
}

macro_rules! impl_plain_entry {
    ($($t:ty),*) => {
        $(
            impl SaEntry for $t {
                #[inline]
                fn seq_offset(&self) -> u64 {
                    *self as u64
                }

                #[inline]
                fn add_gap_distance(self, distance: usize) -> Self {
                    debug_assert!(
                        <$t>::try_from(distance).map_or(false, |d| self.checked_add(d).is_some()),
                        "gap {} overflows entry {}",
                        distance,
                        self
                    );
                    self.wrapping_add(distance as $t)
                }
            }
        )*
    };
}

impl_plain_entry!(u32, u64, usize);

/// Position inside one text of a collection.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SeqPos {
    /// Index of the text in the collection.
    pub seq: u32,
    /// Offset inside that text.
    pub offset: u32,
}

impl SeqPos {
    pub fn new(seq: u32, offset: u32) -> Self {
        Self { seq, offset }
    }
}

impl fmt::Debug for SeqPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.seq, self.offset)
    }
}

impl SaEntry for SeqPos {
    #[inline]
    fn seq_offset(&self) -> u64 {
        self.offset as u64
    }

    #[inline]
    fn add_gap_distance(self, distance: usize) -> Self {
        debug_assert!(
            u32::try_from(distance).map_or(false, |d| self.offset.checked_add(d).is_some()),
            "gap {} overflows entry {:?}",
            distance,
            self
        );
        Self {
            seq: self.seq,
            offset: self.offset.wrapping_add(distance as u32),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_gap() {
        assert_eq!(5u32.add_gap_distance(3), 8);
        assert_eq!(7usize.seq_offset(), 7);
    }

    #[test]
    fn test_pair_gap_keeps_sequence() {
        let pos = SeqPos::new(2, 10).add_gap_distance(4);
        assert_eq!(pos, SeqPos::new(2, 14));
        assert_eq!(pos.seq_offset(), 14);
        assert_eq!(format!("{:?}", pos), "(2, 14)");
    }

    #[test]
    #[cfg(all(debug_assertions, target_pointer_width = "64"))]
    #[should_panic(expected = "overflows")]
    fn test_plain_gap_too_wide() {
        0u32.add_gap_distance(1 << 32);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "overflows")]
    fn test_pair_gap_overflow() {
        SeqPos::new(0, u32::MAX).add_gap_distance(1);
    }
}
