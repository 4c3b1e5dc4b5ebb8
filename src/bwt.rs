//! Burrows-Wheeler Transform (BWT)
//!
//! Reference suffix array and BWT construction. Production indexes get these
//! from an external suffix-array builder; this naive sorter feeds the facade,
//! tests and benches.

use crate::sa_entry::SeqPos;

/// Sentinel character (lexicographically smallest)
pub const SENTINEL: u8 = 0;

/// Build Suffix Array using naive sorting
///
/// `text` must end with a unique symbol smaller than every other symbol, so
/// sorting suffixes equals sorting cyclic rotations.
/// O(N log^2 N) - For production, use SA-IS algorithm for O(N)
pub fn suffix_array(text: &[u8]) -> Vec<usize> {
    let mut sa: Vec<usize> = (0..text.len()).collect();
    sa.sort_unstable_by(|&a, &b| text[a..].cmp(&text[b..]));
    sa
}

/// Build BWT from text and suffix array
/// BWT[i] = text[SA[i] - 1], wrapping to the last symbol when SA[i] == 0
pub fn bwt(text: &[u8], sa: &[usize]) -> Vec<u8> {
    let n = text.len();
    sa.iter().map(|&idx| text[(idx + n - 1) % n]).collect()
}

/// Suffix array and BWT of a text collection.
#[derive(Clone, Debug)]
pub struct MultiText {
    /// Texts concatenated, text `i` terminated by the byte `i`.
    pub text: Vec<u8>,
    /// Suffix array as `(text, offset)` pairs.
    pub suffix_array: Vec<SeqPos>,
    pub bwt: Vec<u8>,
}

/// Index a collection of texts as one cyclic text.
///
/// Text `i` gets the terminator byte `i`, so texts may only use bytes of
/// value `texts.len()` or above. Every terminator is unique, which keeps
/// LF-mapping a single cycle over the whole collection.
pub fn multi_suffix_array(texts: &[&[u8]]) -> MultiText {
    debug_assert!(texts.len() <= 256);
    debug_assert!(texts
        .iter()
        .all(|t| t.iter().all(|&b| (b as usize) >= texts.len())));

    let mut text = Vec::with_capacity(texts.iter().map(|t| t.len() + 1).sum());
    let mut origin = Vec::with_capacity(text.capacity());
    for (seq, t) in texts.iter().enumerate() {
        text.extend_from_slice(t);
        text.push(seq as u8);
        origin.extend((0..=t.len()).map(|offset| SeqPos::new(seq as u32, offset as u32)));
    }

    let sa = suffix_array(&text);
    let bwt = bwt(&text, &sa);
    let suffix_array = sa.iter().map(|&p| origin[p]).collect();

    MultiText {
        text,
        suffix_array,
        bwt,
    }
}
